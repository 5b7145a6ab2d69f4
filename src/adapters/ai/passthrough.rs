//! No-LLM adapters, used when no language model is configured and in tests.

use async_trait::async_trait;

use crate::domain::engine::DecisionOutput;
use crate::ports::{ChatModel, ChatModelError, ChatTurn, DraftReformatter, Reformatted};

/// Reformatter that always returns the draft unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughReformatter;

impl PassthroughReformatter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DraftReformatter for PassthroughReformatter {
    async fn reformat(&self, draft: &DecisionOutput) -> Reformatted {
        Reformatted::fallback(draft)
    }
}

/// Chat model stand-in that reports the capability as missing.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredChatModel;

impl UnconfiguredChatModel {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ChatModel for UnconfiguredChatModel {
    async fn answer(
        &self,
        _question: &str,
        _history: &[ChatTurn],
    ) -> Result<String, ChatModelError> {
        Err(ChatModelError::NotConfigured)
    }
}
