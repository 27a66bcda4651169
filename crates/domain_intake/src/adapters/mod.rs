//! External Adapters for Conversational Intake
//!
//! - **OpenAiExtractor**: OpenAI chat completions with function calling
//! - **ScriptedExtractor**: canned replies for tests (behind the `mock` feature)

pub mod openai;

#[cfg(any(test, feature = "mock"))]
pub mod scripted;

pub use openai::{OpenAiConfig, OpenAiExtractor};

#[cfg(any(test, feature = "mock"))]
pub use scripted::ScriptedExtractor;
