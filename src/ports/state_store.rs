//! State Store Port - persistence contract for per-user rolling state.
//!
//! The whole record is read and written atomically per user_id; partial
//! updates are never visible to other readers.

use async_trait::async_trait;

use crate::domain::foundation::UserId;
use crate::domain::state::UserState;

/// Errors that can occur during state store operations.
#[derive(Debug, thiserror::Error)]
pub enum StateStoreError {
    #[error("Failed to serialize state for user {user_id}: {reason}")]
    Serialization { user_id: UserId, reason: String },

    #[error("Failed to deserialize state for user {user_id}: {reason}")]
    Deserialization { user_id: UserId, reason: String },

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Port for loading and saving one user's state record.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Loads the state for a user, or `None` if the user has never been
    /// seen. Callers that want a fresh default build one themselves.
    async fn find(&self, user_id: &UserId) -> Result<Option<UserState>, StateStoreError>;

    /// Writes the full state record, replacing any previous version.
    async fn save(&self, state: &UserState) -> Result<(), StateStoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserId;

    #[test]
    fn serialization_error_names_the_user() {
        let err = StateStoreError::Serialization {
            user_id: UserId::new("seller-1").unwrap(),
            reason: "bad json".to_string(),
        };
        assert!(err.to_string().contains("seller-1"));
        assert!(err.to_string().contains("serialize"));
    }

    #[test]
    fn backend_error_displays_detail() {
        let err = StateStoreError::Backend("connection refused".to_string());
        assert!(err.to_string().contains("connection refused"));
    }
}
