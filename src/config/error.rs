//! Configuration error types

use thiserror::Error;

/// Errors while loading configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}

/// Errors from semantic validation of loaded configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Server port must not be 0")]
    InvalidPort,

    #[error("storage.database_url is required when storage.backend is postgres")]
    MissingDatabaseUrl,

    #[error("storage.chat_max_turns must be at least 1")]
    InvalidChatMaxTurns,

    #[error("ai.timeout_secs must be at least 1")]
    InvalidTimeout,
}
