//! Policy filters: hard eliminations, soft deferrals, and the timing
//! heuristic.

use super::DecisionRequest;
use crate::domain::catalog::{AccountStage, Candidate, RiskTag, Season};

/// Reasons attached to pool entries when a rule fires.
pub const AVOID_STOCK_REASON: &str = "insufficient stock and limited daily slots";
pub const AVOID_RETURN_RISK_REASON: &str = "return risk too high for the exploration stage";
pub const DEFER_HOMOGENEOUS_REASON: &str = "too homogeneous for the exploration stage";
pub const DEFER_SEASON_REASON: &str = "season mismatch, timing is not right";

/// Verdict of a filter over one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterVerdict {
    /// Candidate proceeds.
    Pass,
    /// Candidate is postponed, not permanently excluded.
    Defer(&'static str),
    /// Candidate is eliminated for this call.
    Avoid(&'static str),
}

/// Applies the hard policy rules in priority order; the first match wins.
pub fn hard_filters(req: &DecisionRequest, candidate: &Candidate) -> FilterVerdict {
    if !req.in_stock && req.daily_slots <= 1 {
        return FilterVerdict::Avoid(AVOID_STOCK_REASON);
    }

    if candidate.has_risk(RiskTag::ReturnRisk) && req.account_stage == AccountStage::Explore {
        return FilterVerdict::Avoid(AVOID_RETURN_RISK_REASON);
    }

    if candidate.has_risk(RiskTag::Homogeneous) && req.account_stage == AccountStage::Explore {
        return FilterVerdict::Defer(DEFER_HOMOGENEOUS_REASON);
    }

    FilterVerdict::Pass
}

/// Defers any candidate whose season does not match the current one.
///
/// Runs only on candidates that already passed the hard rules.
pub fn timing_heuristic(candidate: &Candidate, current_season: Season) -> FilterVerdict {
    if candidate.season != current_season {
        return FilterVerdict::Defer(DEFER_SEASON_REASON);
    }
    FilterVerdict::Pass
}
