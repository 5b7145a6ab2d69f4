//! HTTP DTOs for the public API.
//!
//! These types decouple the wire format from domain types. Enum fields are
//! validated by serde during deserialization; the remaining bounds are
//! checked by the domain constructors before the core ever runs.

use serde::{Deserialize, Serialize};

use crate::domain::catalog::{AccountStage, Category};
use crate::domain::engine::DecisionRequest;
use crate::domain::foundation::{UserId, ValidationError};
use crate::domain::state::{Outcome, Stats};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Request body for POST /v1/decision.
#[derive(Debug, Clone, Deserialize)]
pub struct DecisionRequestDto {
    pub user_id: String,
    pub category: Category,
    pub price_band: String,
    pub account_stage: AccountStage,
    pub daily_slots: u8,
    pub in_stock: bool,
    #[serde(default)]
    pub notes: Option<String>,
}

impl DecisionRequestDto {
    /// Converts into the validated domain request.
    pub fn into_domain(self) -> Result<DecisionRequest, ValidationError> {
        DecisionRequest::new(
            UserId::new(self.user_id)?,
            self.category,
            self.price_band,
            self.account_stage,
            self.daily_slots,
            self.in_stock,
            self.notes,
        )
    }
}

/// Request body for POST /v1/feedback.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedbackRequestDto {
    pub user_id: String,
    #[serde(default)]
    pub decision_id: Option<String>,
    pub outcome: Outcome,
}

/// Request body for POST /v1/qa.
#[derive(Debug, Clone, Deserialize)]
pub struct QaRequestDto {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub question: String,
}

impl QaRequestDto {
    /// Q&A accepts anonymous callers; blank ids collapse to "guest".
    pub fn user_id(&self) -> Result<UserId, ValidationError> {
        match self.user_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => UserId::new(id),
            _ => UserId::new("guest"),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Response body for POST /v1/feedback.
#[derive(Debug, Clone, Serialize)]
pub struct FeedbackResponse {
    pub ok: bool,
    pub matched: bool,
    pub updated_state: FeedbackStateSummary,
}

/// The slice of state the feedback caller cares about.
#[derive(Debug, Clone, Serialize)]
pub struct FeedbackStateSummary {
    pub success: u32,
    pub fail: u32,
    pub consecutive_fail: u32,
    pub weak_link: bool,
}

impl FeedbackStateSummary {
    pub fn new(stats: &Stats, weak_link: bool) -> Self {
        Self {
            success: stats.success,
            fail: stats.fail,
            consecutive_fail: stats.consecutive_fail,
            weak_link,
        }
    }
}

/// Response body for POST /v1/qa.
#[derive(Debug, Clone, Serialize)]
pub struct QaResponse {
    pub user_id: String,
    pub question: String,
    pub answer: String,
}

/// Uniform error body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            detail: None,
        }
    }

    pub fn with_detail(error: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            detail: Some(detail.into()),
        }
    }
}
