//! Language model adapters.

mod openai;
mod passthrough;

pub use openai::{OpenAiClient, OpenAiConfig};
pub use passthrough::{PassthroughReformatter, UnconfiguredChatModel};
