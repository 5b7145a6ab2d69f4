//! Ports: the interfaces the engine's callers depend on.
//!
//! Adapters implement these traits; the application layer receives them as
//! `Arc<dyn Trait>` and never sees a concrete backend.

mod chat_log;
mod chat_model;
mod reformatter;
mod state_store;

pub use chat_log::{ChatLog, ChatLogError, ChatRole, ChatTurn};
pub use chat_model::{ChatModel, ChatModelError};
pub use reformatter::{DraftReformatter, Reformatted};
pub use state_store::{StateStore, StateStoreError};
