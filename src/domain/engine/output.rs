//! The public recommendation object.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::dont_do::DontDoItem;
use super::risk::RiskKind;
use super::scoring::ConfidencePosture;
use crate::domain::foundation::DecisionId;

/// Output verbosity, gated by the per-user onboarding step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    /// Early calls: framed as the best among several good options.
    Best,
    /// Later calls: a single definitive pick.
    Only,
}

impl OutputMode {
    /// Mode for a given onboarding step (pre-increment).
    pub fn for_step(step: u32) -> Self {
        if step < 2 {
            OutputMode::Best
        } else {
            OutputMode::Only
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OutputMode::Best => "best",
            OutputMode::Only => "only",
        };
        write!(f, "{}", s)
    }
}

/// What is likely to go wrong and what to do about it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureExpectation {
    pub likely: RiskKind,
    pub next_action: String,
}

/// Decision metadata for observability and client rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionMeta {
    pub mode: OutputMode,
    pub confidence_style: ConfidencePosture,
    pub rules_fired: Vec<String>,
    /// Onboarding step at the time the decision was assembled.
    pub state_snapshot_version: u32,
}

/// The structured recommendation returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionOutput {
    pub decision_id: DecisionId,
    pub headline: String,
    pub action: String,
    pub reason_one_line: String,
    pub primary_risk: String,
    pub why_it: Vec<String>,
    pub dont_do: Vec<DontDoItem>,
    pub failure_expectation: FailureExpectation,
    pub meta: DecisionMeta,
}
