//! Risk analysis over the rolling history.
//!
//! The environment-unfavorable trigger is a one-shot rolling-window signal:
//! broad recent failure across distinct products, not one chronically bad
//! item. It fires at most once per cool-down; the counter resets the next
//! time a decision runs without triggering.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::domain::catalog::{Candidate, RiskTag};
use crate::domain::foundation::Timestamp;
use crate::domain::state::{Outcome, UserState};

/// Days of history considered by the environment trigger.
pub const ENV_WINDOW_DAYS: i64 = 7;

/// Minimum `no_volume` records within the window.
pub const ENV_MIN_FAILURES: usize = 3;

/// Minimum distinct labels among those failures.
pub const ENV_MIN_LABELS: usize = 2;

/// The primary risk attached to a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskKind {
    Env,
    Product,
    Content,
    Stage,
}

impl fmt::Display for RiskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskKind::Env => "env",
            RiskKind::Product => "product",
            RiskKind::Content => "content",
            RiskKind::Stage => "stage",
        };
        write!(f, "{}", s)
    }
}

/// Whether the trailing-window failure pattern marks the environment as
/// unfavorable.
pub fn env_unfavorable(state: &UserState, now: Timestamp) -> bool {
    let cutoff = now.minus_days(ENV_WINDOW_DAYS);
    let recent_failures: Vec<_> = state
        .history
        .iter()
        .filter(|r| !r.ts.is_before(&cutoff) && r.outcome == Some(Outcome::NoVolume))
        .collect();

    if recent_failures.len() < ENV_MIN_FAILURES {
        return false;
    }

    let labels: HashSet<&str> = recent_failures.iter().map(|r| r.label.as_str()).collect();
    if labels.len() < ENV_MIN_LABELS {
        return false;
    }

    // One-shot: stays quiet until a non-triggering call resets the counter.
    state.stats.env_trigger_count == 0
}

/// Picks the primary risk in priority order: environment first, then the
/// winner's own risk tags, then stage fit as the default.
pub fn primary_risk(winner: &Candidate, env_trigger: bool) -> RiskKind {
    if env_trigger {
        return RiskKind::Env;
    }
    if winner.has_risk(RiskTag::ReturnRisk) {
        return RiskKind::Product;
    }
    if winner.has_risk(RiskTag::Homogeneous) {
        return RiskKind::Content;
    }
    RiskKind::Stage
}
