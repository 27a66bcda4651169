//! Conversational Intake Domain
//!
//! Turns a spoken conversation into claim details one utterance at a time.
//! The language model sits behind the [`ClaimExtractor`] port; this crate
//! owns the merge rules, the question order, and the completeness check
//! shared with structured submissions.

pub mod adapters;
pub mod conversation;
pub mod error;
pub mod extractor;
pub mod service;

pub use adapters::{OpenAiConfig, OpenAiExtractor};
pub use conversation::{ConversationMessage, ConversationRole, ConversationStep, PartialClaimData};
pub use error::IntakeError;
pub use extractor::{ClaimExtractor, ExtractionOutcome, ExtractionRequest};
pub use service::{IntakeService, IntakeTurn, IntakeTurnResult};

#[cfg(any(test, feature = "mock"))]
pub use adapters::ScriptedExtractor;
