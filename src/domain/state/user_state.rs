//! The rolling per-user state record.
//!
//! One record per user_id, read and written whole. Every decision call and
//! every feedback call mutates a copy and writes the full record back, so
//! the storage layer only ever sees complete states.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::catalog::{AccountStage, Category};
use crate::domain::engine::ConfidencePosture;
use crate::domain::foundation::{DecisionId, Timestamp, UserId};

/// Maximum entries kept in the avoid and defer pools. Older entries are
/// silently dropped, newest kept.
pub const POOL_CAP: usize = 30;

/// Maximum decision records kept in history.
pub const HISTORY_CAP: usize = 30;

/// Observed outcome of a past recommendation, reported via feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    NoVolume,
    SomeVolume,
    Scaled,
}

impl Outcome {
    /// Anything that moved at all counts as a success for streak tracking.
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::SomeVolume | Outcome::Scaled)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Outcome::NoVolume => "no_volume",
            Outcome::SomeVolume => "some_volume",
            Outcome::Scaled => "scaled",
        };
        write!(f, "{}", s)
    }
}

/// An entry in the avoid or defer pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolItem {
    pub label: String,
    pub reason: String,
    pub ts: Timestamp,
}

/// One decision, as remembered in the rolling history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub ts: Timestamp,
    pub decision_id: DecisionId,
    pub label: String,
    pub category: Category,
    pub price_band: String,
    pub in_stock: bool,
    pub decision: ConfidencePosture,
    pub outcome: Option<Outcome>,
}

/// Summary of the most recent recommendation, used by feedback as a
/// fallback join key when the caller omits the decision_id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LastReco {
    pub decision_id: DecisionId,
    pub label: String,
    pub ts: Timestamp,
    pub category: Category,
    pub price_band: String,
    pub in_stock: bool,
}

/// Feedback counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Stats {
    pub success: u32,
    pub fail: u32,
    pub consecutive_fail: u32,
    pub env_trigger_count: u32,
}

/// Rolling state for one seller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserState {
    pub user_id: UserId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub onboarding_step: u32,
    pub account_stage: AccountStage,
    pub daily_slots: u8,
    pub last_reco: Option<LastReco>,
    pub avoid_pool: Vec<PoolItem>,
    pub defer_pool: Vec<PoolItem>,
    pub stats: Stats,
    pub history: Vec<HistoryRecord>,
}

impl UserState {
    /// Fresh state for a user seen for the first time.
    pub fn new(user_id: UserId, now: Timestamp) -> Self {
        Self {
            user_id,
            created_at: now,
            updated_at: now,
            onboarding_step: 0,
            account_stage: AccountStage::Explore,
            daily_slots: 1,
            last_reco: None,
            avoid_pool: Vec::new(),
            defer_pool: Vec::new(),
            stats: Stats::default(),
            history: Vec::new(),
        }
    }

    /// Annotates the most recent history record carrying `decision_id` with
    /// the observed outcome and updates the feedback counters.
    ///
    /// Returns whether a record matched. An unknown decision_id is a no-op on
    /// history but the counters still move; callers surface the `matched`
    /// flag so clients can tell the two apart.
    pub fn record_outcome(&mut self, decision_id: &str, outcome: Outcome, now: Timestamp) -> bool {
        let matched = self
            .history
            .iter_mut()
            .rev()
            .find(|r| r.decision_id.to_string() == decision_id)
            .map(|r| r.outcome = Some(outcome))
            .is_some();

        if outcome.is_success() {
            self.stats.success += 1;
            self.stats.consecutive_fail = 0;
        } else {
            self.stats.fail += 1;
            self.stats.consecutive_fail += 1;
        }
        self.updated_at = now;

        matched
    }

    /// Truncates history and pools to their caps, keeping the newest entries.
    pub fn enforce_caps(&mut self) {
        truncate_to_newest(&mut self.history, HISTORY_CAP);
        truncate_to_newest(&mut self.avoid_pool, POOL_CAP);
        truncate_to_newest(&mut self.defer_pool, POOL_CAP);
    }
}

fn truncate_to_newest<T>(entries: &mut Vec<T>, cap: usize) {
    if entries.len() > cap {
        entries.drain(..entries.len() - cap);
    }
}
