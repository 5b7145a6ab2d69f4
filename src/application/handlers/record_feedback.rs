//! RecordFeedback - command handler for annotating a past decision with its
//! observed outcome.

use std::sync::Arc;

use crate::domain::foundation::{Timestamp, UserId};
use crate::domain::state::{Outcome, Stats};
use crate::ports::{StateStore, StateStoreError};

/// Command to record feedback for a decision.
#[derive(Debug, Clone)]
pub struct FeedbackCommand {
    pub user_id: UserId,
    /// Decision to annotate; falls back to the user's last recommendation
    /// when absent.
    pub decision_id: Option<String>,
    pub outcome: Outcome,
}

/// Result of recording feedback.
#[derive(Debug, Clone)]
pub struct FeedbackResult {
    /// Whether a history record was actually annotated. Feedback against an
    /// unknown decision_id still succeeds; this flag lets callers tell the
    /// difference.
    pub matched: bool,
    /// True when the decision_id was inferred from the last recommendation
    /// rather than supplied, a lower-confidence correlation.
    pub weak_link: bool,
    pub stats: Stats,
}

/// Errors surfaced by the feedback operation.
#[derive(Debug, thiserror::Error)]
pub enum FeedbackError {
    #[error("No state recorded for user {0}")]
    NotFound(UserId),

    #[error("decision_id is required: the user has no prior recommendation to fall back to")]
    DecisionIdRequired,

    #[error(transparent)]
    Store(#[from] StateStoreError),
}

/// Handler for recording decision outcomes.
pub struct FeedbackHandler {
    store: Arc<dyn StateStore>,
}

impl FeedbackHandler {
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, cmd: FeedbackCommand) -> Result<FeedbackResult, FeedbackError> {
        let now = Timestamp::now();
        let mut state = self
            .store
            .find(&cmd.user_id)
            .await?
            .ok_or_else(|| FeedbackError::NotFound(cmd.user_id.clone()))?;

        let (decision_id, weak_link) = match cmd.decision_id {
            Some(id) => (id, false),
            None => match &state.last_reco {
                Some(last) => (last.decision_id.to_string(), true),
                None => return Err(FeedbackError::DecisionIdRequired),
            },
        };

        let matched = state.record_outcome(&decision_id, cmd.outcome, now);
        state.enforce_caps();
        self.store.save(&state).await?;

        tracing::info!(
            user_id = %cmd.user_id,
            decision_id = %decision_id,
            outcome = %cmd.outcome,
            matched,
            weak_link,
            "feedback recorded"
        );

        Ok(FeedbackResult {
            matched,
            weak_link,
            stats: state.stats,
        })
    }
}
