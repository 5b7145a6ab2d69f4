//! Command handlers, one per operation.

mod ask;
mod decide;
mod record_feedback;

pub use ask::{AskError, AskHandler};
pub use decide::{DecideError, DecideHandler};
pub use record_feedback::{FeedbackCommand, FeedbackError, FeedbackHandler, FeedbackResult};
