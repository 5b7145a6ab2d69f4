//! Storage configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Which state/chat backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    Postgres,
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Backend selection
    #[serde(default)]
    pub backend: StorageBackend,

    /// PostgreSQL connection URL, required for the postgres backend
    #[serde(default)]
    pub database_url: Option<String>,

    /// Q&A rounds retained per user in the chat log
    #[serde(default = "default_chat_max_turns")]
    pub chat_max_turns: usize,
}

impl StorageConfig {
    /// Validate storage configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.backend == StorageBackend::Postgres && self.database_url.is_none() {
            return Err(ValidationError::MissingDatabaseUrl);
        }
        if self.chat_max_turns == 0 {
            return Err(ValidationError::InvalidChatMaxTurns);
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            database_url: None,
            chat_max_turns: default_chat_max_turns(),
        }
    }
}

fn default_chat_max_turns() -> usize {
    20
}
