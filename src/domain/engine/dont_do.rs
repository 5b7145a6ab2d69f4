//! Assembly of the "don't do" list shipped alongside every recommendation.
//!
//! Pools come first; when a first-time user has empty pools the list is
//! backfilled from the candidate set, so every recommendation carries
//! actionable negative guidance.

use serde::{Deserialize, Serialize};

use super::templates;
use crate::domain::catalog::Candidate;
use crate::domain::state::PoolItem;

/// Hard cap on the list length.
pub const DONT_DO_MAX: usize = 3;

/// Whether an entry is a permanent elimination or a postponement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolStatus {
    Avoid,
    Defer,
}

/// One negative-guidance entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DontDoItem {
    pub label: String,
    pub status: PoolStatus,
    pub reason: String,
}

/// Builds the don't-do list from the pools and the current candidate set.
///
/// Takes up to the two most recent avoid entries, then up to two most
/// recent defer entries (stopping at three). Thin pools are backfilled from
/// the candidate list with generic reasons; the result never exceeds three
/// entries and is only shorter when the candidate set itself is.
pub fn assemble(
    avoid_pool: &[PoolItem],
    defer_pool: &[PoolItem],
    candidates: &[&Candidate],
) -> Vec<DontDoItem> {
    let mut items: Vec<DontDoItem> = Vec::new();

    for entry in newest(avoid_pool, 2) {
        items.push(DontDoItem {
            label: entry.label.clone(),
            status: PoolStatus::Avoid,
            reason: entry.reason.clone(),
        });
    }
    for entry in newest(defer_pool, 2) {
        if items.len() >= DONT_DO_MAX {
            break;
        }
        items.push(DontDoItem {
            label: entry.label.clone(),
            status: PoolStatus::Defer,
            reason: entry.reason.clone(),
        });
    }

    if items.len() < 2 {
        for candidate in candidates {
            if items.len() >= 2 {
                break;
            }
            items.push(DontDoItem {
                label: candidate.label.clone(),
                status: PoolStatus::Defer,
                reason: templates::DONT_DO_DEFER.to_string(),
            });
        }
    }

    if items.len() < DONT_DO_MAX {
        if let Some(last) = candidates.last() {
            items.push(DontDoItem {
                label: last.label.clone(),
                status: PoolStatus::Avoid,
                reason: templates::DONT_DO_AVOID.to_string(),
            });
        }
    }

    items.truncate(DONT_DO_MAX);
    items
}

fn newest(pool: &[PoolItem], n: usize) -> &[PoolItem] {
    &pool[pool.len().saturating_sub(n)..]
}
