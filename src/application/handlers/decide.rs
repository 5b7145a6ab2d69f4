//! Decide - command handler for issuing a recommendation.

use std::sync::Arc;

use crate::domain::engine::{DecisionOutput, DecisionRequest, Engine};
use crate::domain::foundation::Timestamp;
use crate::domain::state::UserState;
use crate::ports::{DraftReformatter, StateStore, StateStoreError};

/// Errors surfaced by the decide operation.
///
/// The engine itself cannot fail; only the storage seam can.
#[derive(Debug, thiserror::Error)]
pub enum DecideError {
    #[error(transparent)]
    Store(#[from] StateStoreError),
}

/// Handler for the decision operation.
///
/// Loads (or initializes) the user's state, runs the engine, lets the
/// reformatter re-express the draft, persists the updated state, and
/// returns the final output. The reformat step resolves before the state
/// write, so a persisted decision always corresponds to a delivered one.
pub struct DecideHandler {
    engine: Engine,
    store: Arc<dyn StateStore>,
    reformatter: Arc<dyn DraftReformatter>,
}

impl DecideHandler {
    pub fn new(
        engine: Engine,
        store: Arc<dyn StateStore>,
        reformatter: Arc<dyn DraftReformatter>,
    ) -> Self {
        Self {
            engine,
            store,
            reformatter,
        }
    }

    pub async fn handle(&self, req: DecisionRequest) -> Result<DecisionOutput, DecideError> {
        let now = Timestamp::now();
        let state = self
            .store
            .find(&req.user_id)
            .await?
            .unwrap_or_else(|| UserState::new(req.user_id.clone(), now));

        let (draft, updated_state, rules_fired) = self.engine.decide(&req, state, now);
        let reformatted = self.reformatter.reformat(&draft).await;

        self.store.save(&updated_state).await?;

        tracing::info!(
            user_id = %req.user_id,
            decision_id = %draft.decision_id,
            mode = %draft.meta.mode,
            confidence = %draft.meta.confidence_style,
            rules = ?rules_fired,
            reformatted = reformatted.ok,
            "decision issued"
        );

        Ok(reformatted.output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::PassthroughReformatter;
    use crate::adapters::storage::InMemoryStateStore;
    use crate::domain::catalog::{AccountStage, Category};
    use crate::domain::engine::{DecisionRequest, Engine};
    use crate::domain::foundation::UserId;
    use crate::ports::StateStore;

    fn handler_with_store() -> (DecideHandler, Arc<InMemoryStateStore>) {
        let store = Arc::new(InMemoryStateStore::new());
        let handler = DecideHandler::new(
            Engine::new(),
            store.clone(),
            Arc::new(PassthroughReformatter::new()),
        );
        (handler, store)
    }

    fn request(user: &str) -> DecisionRequest {
        DecisionRequest::new(
            UserId::new(user).unwrap(),
            Category::Top,
            "60-80",
            AccountStage::Explore,
            2,
            true,
            None,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn first_call_creates_state_and_persists_it() {
        let (handler, store) = handler_with_store();

        let output = handler.handle(request("seller-1")).await.unwrap();

        let state = store
            .find(&UserId::new("seller-1").unwrap())
            .await
            .unwrap()
            .expect("state should have been created");
        assert_eq!(state.onboarding_step, 1);
        assert_eq!(state.history.len(), 1);
        assert_eq!(state.history[0].decision_id, output.decision_id);
        assert_eq!(output.meta.state_snapshot_version, 0);
    }

    #[tokio::test]
    async fn repeated_calls_advance_the_same_user() {
        let (handler, store) = handler_with_store();

        for _ in 0..3 {
            handler.handle(request("seller-1")).await.unwrap();
        }

        let state = store
            .find(&UserId::new("seller-1").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(state.onboarding_step, 3);
        assert_eq!(state.history.len(), 3);
    }

    #[tokio::test]
    async fn users_do_not_share_state() {
        let (handler, store) = handler_with_store();

        handler.handle(request("seller-a")).await.unwrap();
        handler.handle(request("seller-b")).await.unwrap();

        let a = store
            .find(&UserId::new("seller-a").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(a.onboarding_step, 1);
    }

    #[tokio::test]
    async fn passthrough_reformatter_preserves_the_draft() {
        let (handler, _) = handler_with_store();

        let output = handler.handle(request("seller-1")).await.unwrap();

        // The passthrough cannot invent content: the narrative fields come
        // straight from the rule templates.
        assert!(!output.headline.is_empty());
        assert!(!output.dont_do.is_empty());
    }
}
