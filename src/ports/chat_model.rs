//! Chat Model Port - stateless Q&A completion.

use async_trait::async_trait;

use super::ChatTurn;

/// Errors that can occur while asking the chat model.
#[derive(Debug, thiserror::Error)]
pub enum ChatModelError {
    #[error("Chat model transport error: {0}")]
    Transport(String),

    #[error("Chat model returned an unusable response: {0}")]
    BadResponse(String),

    #[error("No chat model is configured")]
    NotConfigured,
}

/// Port for answering a seller's free-form question.
///
/// Pure forwarding: the history provides context, nothing here feeds back
/// into the decision engine.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn answer(&self, question: &str, history: &[ChatTurn])
        -> Result<String, ChatModelError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_display_their_detail() {
        let err = ChatModelError::Transport("timeout".to_string());
        assert!(err.to_string().contains("timeout"));

        let err = ChatModelError::NotConfigured;
        assert!(err.to_string().contains("configured"));
    }
}
