//! Storage adapters for user state and chat history.

mod in_memory;
mod postgres;

pub use in_memory::{InMemoryChatLog, InMemoryStateStore};
pub use postgres::{connect, migrate, PostgresChatLog, PostgresStateStore};
