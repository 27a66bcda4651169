//! Extraction port
//!
//! The language model that reads a caller's words is an external system.
//! The intake service only sees it through [`ClaimExtractor`].

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{DomainPort, PortError};

use crate::conversation::{ConversationMessage, ConversationStep, PartialClaimData};

/// One caller utterance plus the conversation so far
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionRequest {
    pub user_input: String,
    /// Earlier user and assistant messages, oldest first
    pub history: Vec<ConversationMessage>,
    pub current_step: ConversationStep,
    pub current_data: PartialClaimData,
}

/// What the extractor understood from one utterance
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionOutcome {
    /// Only the fields mentioned in this utterance
    pub extracted: PartialClaimData,
    /// Spoken reply for the caller
    pub reply: String,
    pub confidence: Option<Decimal>,
    pub next_step: Option<ConversationStep>,
}

#[async_trait]
pub trait ClaimExtractor: DomainPort {
    /// Short identifier used in logs and health output
    fn name(&self) -> &'static str;

    async fn extract(&self, request: &ExtractionRequest) -> Result<ExtractionOutcome, PortError>;
}
