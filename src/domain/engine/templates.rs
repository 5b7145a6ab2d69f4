//! Narrative templates for recommendation output.
//!
//! Static lookup tables keyed by output mode, confidence posture, and risk
//! kind. The rewriting step downstream may re-express these; the engine
//! itself always emits exactly this text.

use super::output::OutputMode;
use super::risk::RiskKind;
use super::scoring::ConfidencePosture;

/// Reason line used when the environment trigger fires, overriding the
/// posture-derived reason.
pub const ENV_REASON: &str = "Recent environment is cold, hold your pace for now";

/// Generic reasons for backfilled don't-do entries.
pub const DONT_DO_DEFER: &str = "Stage or timing is not right, wait";
pub const DONT_DO_AVOID: &str = "High-risk direction, avoid for now";

/// Returns the headline for an output mode.
pub fn headline(mode: OutputMode) -> &'static str {
    match mode {
        OutputMode::Best => "Today's best pick",
        OutputMode::Only => "List only this one today",
    }
}

/// Returns the recommended action for a confidence posture.
pub fn action(posture: ConfidencePosture) -> &'static str {
    match posture {
        ConfidencePosture::Strong => {
            "List it now at your current cadence and watch the first 24 hours"
        }
        ConfidencePosture::Conservative => {
            "Start with a small test batch, hold cost, and watch the response"
        }
    }
}

/// Returns the one-line reason for a confidence posture.
pub fn reason(posture: ConfidencePosture) -> &'static str {
    match posture {
        ConfidencePosture::Strong => "The trend window is clear and the cost of a miss is low",
        ConfidencePosture::Conservative => "Steady for this stage, validate before you scale",
    }
}

/// Returns the human-readable statement for a primary risk.
pub fn risk_statement(kind: RiskKind) -> &'static str {
    match kind {
        RiskKind::Env => "Environment is unfavorable, do not rush to scale",
        RiskKind::Content => "Content follow-through may be weak",
        RiskKind::Product => "Product differentiation is thin",
        RiskKind::Stage => "Fit with your current stage is low",
    }
}

/// Returns the corrective next action for a primary risk.
pub fn next_action(kind: RiskKind) -> &'static str {
    match kind {
        RiskKind::Env => "Change time slot and content structure, then run one more small test",
        RiskKind::Content => {
            "Rework the cover image and first three seconds of video, then retest"
        }
        RiskKind::Product => {
            "Adjust the selling point or switch to a differentiated item at the same price"
        }
        RiskKind::Stage => "Go back to basics testing and wait for stable data before advancing",
    }
}
