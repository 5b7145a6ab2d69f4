//! HTTP routes for the public API.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{decision, feedback, health, qa, ApiHandlers};

/// Creates the API router with all endpoints.
pub fn api_routes(handlers: ApiHandlers) -> Router {
    Router::new()
        .route("/v1/decision", post(decision))
        .route("/v1/feedback", post(feedback))
        .route("/v1/qa", post(qa))
        .route("/health", get(health))
        .with_state(handlers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{PassthroughReformatter, UnconfiguredChatModel};
    use crate::adapters::storage::{InMemoryChatLog, InMemoryStateStore};
    use crate::application::handlers::{AskHandler, DecideHandler, FeedbackHandler};
    use crate::domain::engine::Engine;
    use std::sync::Arc;

    #[test]
    fn api_routes_compiles() {
        let store = Arc::new(InMemoryStateStore::new());
        let handlers = ApiHandlers::new(
            Arc::new(DecideHandler::new(
                Engine::new(),
                store.clone(),
                Arc::new(PassthroughReformatter::new()),
            )),
            Arc::new(FeedbackHandler::new(store)),
            Arc::new(AskHandler::new(
                Arc::new(InMemoryChatLog::new(20)),
                Arc::new(UnconfiguredChatModel::new()),
            )),
        );
        let _router = api_routes(handlers);
    }
}
