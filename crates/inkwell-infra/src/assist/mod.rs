//! Language-model integrations.

mod openai;

pub use openai::{OpenAiCompletionService, OpenAiConfig};
