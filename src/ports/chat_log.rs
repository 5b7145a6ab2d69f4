//! Chat Log Port - bounded per-user conversation history for Q&A.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::UserId;

/// Who produced a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Ai,
}

/// One turn of the Q&A conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn ai(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Ai,
            content: content.into(),
        }
    }
}

/// Errors that can occur during chat log operations.
#[derive(Debug, thiserror::Error)]
pub enum ChatLogError {
    #[error("Chat log backend error: {0}")]
    Backend(String),
}

/// Port for the bounded per-user chat history.
///
/// Implementations cap the stored turns and silently drop the oldest.
#[async_trait]
pub trait ChatLog: Send + Sync {
    /// Returns the retained turns for a user, oldest first.
    async fn recent(&self, user_id: &UserId) -> Result<Vec<ChatTurn>, ChatLogError>;

    /// Appends one turn, evicting the oldest past the cap.
    async fn append(&self, user_id: &UserId, turn: ChatTurn) -> Result<(), ChatLogError>;
}
