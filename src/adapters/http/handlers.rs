//! HTTP handlers for the public API.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::application::handlers::{
    AskError, AskHandler, DecideHandler, FeedbackCommand, FeedbackError, FeedbackHandler,
};

use super::dto::{
    DecisionRequestDto, ErrorResponse, FeedbackRequestDto, FeedbackResponse,
    FeedbackStateSummary, QaRequestDto, QaResponse,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct ApiHandlers {
    decide: Arc<DecideHandler>,
    feedback: Arc<FeedbackHandler>,
    ask: Arc<AskHandler>,
}

impl ApiHandlers {
    pub fn new(
        decide: Arc<DecideHandler>,
        feedback: Arc<FeedbackHandler>,
        ask: Arc<AskHandler>,
    ) -> Self {
        Self {
            decide,
            feedback,
            ask,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /v1/decision - Issue a recommendation.
pub async fn decision(
    State(handlers): State<ApiHandlers>,
    Json(dto): Json<DecisionRequestDto>,
) -> Response {
    let req = match dto.into_domain() {
        Ok(req) => req,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::with_detail("invalid_request", e.to_string())),
            )
                .into_response()
        }
    };

    match handlers.decide.handle(req).await {
        Ok(output) => (StatusCode::OK, Json(output)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "decision failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("internal_error")),
            )
                .into_response()
        }
    }
}

/// POST /v1/feedback - Record the outcome of a past decision.
pub async fn feedback(
    State(handlers): State<ApiHandlers>,
    Json(dto): Json<FeedbackRequestDto>,
) -> Response {
    let user_id = match crate::domain::foundation::UserId::new(dto.user_id) {
        Ok(id) => id,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::with_detail("invalid_request", e.to_string())),
            )
                .into_response()
        }
    };

    let cmd = FeedbackCommand {
        user_id,
        decision_id: dto.decision_id,
        outcome: dto.outcome,
    };

    match handlers.feedback.handle(cmd).await {
        Ok(result) => {
            let response = FeedbackResponse {
                ok: true,
                matched: result.matched,
                updated_state: FeedbackStateSummary::new(&result.stats, result.weak_link),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(FeedbackError::NotFound(_)) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("not_found")),
        )
            .into_response(),
        Err(FeedbackError::DecisionIdRequired) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("decision_id_required")),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "feedback failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("internal_error")),
            )
                .into_response()
        }
    }
}

/// POST /v1/qa - Answer a free-form seller question.
pub async fn qa(State(handlers): State<ApiHandlers>, Json(dto): Json<QaRequestDto>) -> Response {
    let user_id = match dto.user_id() {
        Ok(id) => id,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::with_detail("invalid_request", e.to_string())),
            )
                .into_response()
        }
    };

    match handlers.ask.handle(user_id.clone(), &dto.question).await {
        Ok(answer) => {
            let response = QaResponse {
                user_id: user_id.to_string(),
                question: dto.question.trim().to_string(),
                answer,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(AskError::QuestionRequired) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("question_required")),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "qa failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse::new("model_unavailable")),
            )
                .into_response()
        }
    }
}

/// GET /health - Liveness probe.
pub async fn health() -> Response {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "status": "ok" })),
    )
        .into_response()
}
