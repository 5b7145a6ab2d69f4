//! Shared value objects for the domain layer.

mod errors;
mod ids;
mod timestamp;

pub use errors::ValidationError;
pub use ids::{DecisionId, UserId};
pub use timestamp::Timestamp;
