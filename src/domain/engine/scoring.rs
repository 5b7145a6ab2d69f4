//! Candidate scoring, ranking, and confidence posture.
//!
//! Scoring is a base value plus independent additive adjustments, so
//! evaluation order never affects the result. Ranking is a stable
//! descending sort: equal scores keep catalog insertion order.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::DecisionRequest;
use crate::domain::catalog::{Candidate, RiskTag};

/// Every candidate starts here before adjustments.
pub const BASE_SCORE: i32 = 50;

/// Score gap between first and second place required for a strong posture.
pub const STRONG_MARGIN: i32 = 8;

/// Fallback band midpoint when a price band cannot be parsed.
pub const DEFAULT_PRICE_MID: i64 = 100;

/// How the recommendation is framed: push hard or test small.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidencePosture {
    Strong,
    Conservative,
}

impl fmt::Display for ConfidencePosture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConfidencePosture::Strong => "strong",
            ConfidencePosture::Conservative => "conservative",
        };
        write!(f, "{}", s)
    }
}

/// Parses a "low-high" price band into its integer midpoint.
///
/// Malformed input never raises; it falls back to [`DEFAULT_PRICE_MID`] so
/// scoring stays computable for any request.
pub fn price_band_midpoint(band: &str) -> i64 {
    let parts: Vec<&str> = band.split('-').collect();
    if parts.len() < 2 {
        return DEFAULT_PRICE_MID;
    }
    match (
        parts[0].trim().parse::<i64>(),
        parts[1].trim().parse::<i64>(),
    ) {
        (Ok(low), Ok(high)) => (low + high) / 2,
        _ => DEFAULT_PRICE_MID,
    }
}

/// Scores one candidate against the request.
pub fn score_candidate(req: &DecisionRequest, candidate: &Candidate) -> i32 {
    let mut score = BASE_SCORE;

    if candidate.matches_category(req.category) {
        score += 15;
    }

    let band_mid = price_band_midpoint(&req.price_band);
    score -= ((candidate.price_mid - band_mid).abs() / 10).min(10) as i32;

    if candidate.stage_fit == req.account_stage {
        score += 10;
    } else {
        score -= 5;
    }

    if req.in_stock {
        score += 5;
    }
    if req.daily_slots == 1 {
        score -= 3;
    }

    if candidate.has_risk(RiskTag::ReturnRisk) {
        score -= 5;
    }
    if candidate.has_risk(RiskTag::Homogeneous) {
        score -= 3;
    }

    score
}

/// Outcome of ranking a candidate set.
#[derive(Debug, Clone, Copy)]
pub struct Ranked<'a> {
    pub winner: &'a Candidate,
    pub top_score: i32,
    /// Second-best score, or the winner's own score when it stands alone.
    pub second_score: i32,
}

/// Ranks candidates by descending score and returns the winner.
///
/// The sort is stable: candidates with equal scores keep their catalog
/// order, so the earlier catalog entry wins ties.
pub fn rank<'a>(req: &DecisionRequest, candidates: &[&'a Candidate]) -> Option<Ranked<'a>> {
    let mut scored: Vec<(i32, &Candidate)> = candidates
        .iter()
        .map(|c| (score_candidate(req, c), *c))
        .collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0));

    let (top_score, winner) = *scored.first()?;
    let second_score = scored.get(1).map(|s| s.0).unwrap_or(top_score);

    Some(Ranked {
        winner,
        top_score,
        second_score,
    })
}

/// Derives the confidence posture from the score margin and stock status.
///
/// Out-of-stock requests are always conservative regardless of margin.
pub fn confidence_posture(top: i32, second: i32, in_stock: bool) -> ConfidencePosture {
    if !in_stock {
        return ConfidencePosture::Conservative;
    }
    if top - second >= STRONG_MARGIN {
        ConfidencePosture::Strong
    } else {
        ConfidencePosture::Conservative
    }
}
