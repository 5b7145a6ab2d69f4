//! Draft Reformatter Port - the narrow contract for the optional language
//! model rewriting step.
//!
//! The capability is `reformat(draft) -> (final, ok)`: implementations may
//! re-express the engine's draft into better prose, but must fall back to
//! the draft verbatim on any failure. The call never errors; a failed
//! rewrite is an `ok = false` passthrough, not a fault the caller handles.

use async_trait::async_trait;

use crate::domain::engine::DecisionOutput;

/// Result of a reformat attempt.
#[derive(Debug, Clone)]
pub struct Reformatted {
    /// The output to return to the caller; the draft itself when `ok` is
    /// false.
    pub output: DecisionOutput,
    /// Whether the rewrite actually happened.
    pub ok: bool,
}

impl Reformatted {
    /// A passthrough result carrying the draft unchanged.
    pub fn fallback(draft: &DecisionOutput) -> Self {
        Self {
            output: draft.clone(),
            ok: false,
        }
    }
}

/// Port for the draft rewriting capability.
#[async_trait]
pub trait DraftReformatter: Send + Sync {
    /// Rewrites the draft, or returns it unchanged with `ok = false`.
    async fn reformat(&self, draft: &DecisionOutput) -> Reformatted;
}
