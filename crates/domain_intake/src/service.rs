//! One conversational intake turn

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::conversation::{ConversationMessage, ConversationRole, ConversationStep, PartialClaimData};
use crate::error::IntakeError;
use crate::extractor::{ClaimExtractor, ExtractionRequest};

const DEFAULT_CONFIDENCE: Decimal = dec!(0.8);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntakeTurn {
    pub user_input: String,
    #[serde(default)]
    pub history: Vec<ConversationMessage>,
    #[serde(default)]
    pub current_step: ConversationStep,
    #[serde(default)]
    pub current_data: PartialClaimData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntakeTurnResult {
    pub reply: String,
    /// Everything collected so far, this turn included
    pub claim_data: PartialClaimData,
    /// Only what this turn contributed
    pub extracted: PartialClaimData,
    pub next_step: ConversationStep,
    pub confidence: Decimal,
    pub is_complete: bool,
}

#[derive(Clone)]
pub struct IntakeService {
    extractor: Arc<dyn ClaimExtractor>,
}

impl IntakeService {
    pub fn new(extractor: Arc<dyn ClaimExtractor>) -> Self {
        Self { extractor }
    }

    pub fn extractor_name(&self) -> &'static str {
        self.extractor.name()
    }

    #[instrument(skip(self, turn), fields(step = %turn.current_step, extractor = self.extractor.name()))]
    pub async fn process_turn(&self, turn: IntakeTurn) -> Result<IntakeTurnResult, IntakeError> {
        if turn.user_input.trim().is_empty() {
            return Err(IntakeError::EmptyInput);
        }

        let history: Vec<ConversationMessage> = turn
            .history
            .into_iter()
            .filter(|message| message.role != ConversationRole::System)
            .collect();

        let request = ExtractionRequest {
            user_input: turn.user_input,
            history,
            current_step: turn.current_step,
            current_data: turn.current_data,
        };

        let outcome = self.extractor.extract(&request).await.map_err(|e| {
            warn!(error = %e, transient = e.is_transient(), "Claim extraction failed");
            IntakeError::Extraction(e)
        })?;

        let mut claim_data = request.current_data;
        claim_data.merge(outcome.extracted.clone());

        let next_step = outcome.next_step.unwrap_or_else(|| claim_data.next_step());
        let is_complete = claim_data.is_complete();
        let confidence = outcome.confidence.unwrap_or(DEFAULT_CONFIDENCE);

        info!(next_step = %next_step, is_complete, confidence = %confidence, "Intake turn processed");

        Ok(IntakeTurnResult {
            reply: outcome.reply,
            claim_data,
            extracted: outcome.extracted,
            next_step,
            confidence,
            is_complete,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ScriptedExtractor;
    use crate::extractor::ExtractionOutcome;
    use chrono::Utc;
    use core_kernel::PortError;

    fn turn(input: &str) -> IntakeTurn {
        IntakeTurn {
            user_input: input.to_string(),
            history: Vec::new(),
            current_step: ConversationStep::Greeting,
            current_data: PartialClaimData::default(),
        }
    }

    #[tokio::test]
    async fn test_blank_input_is_rejected_before_extraction() {
        let extractor = Arc::new(ScriptedExtractor::new());
        let service = IntakeService::new(extractor.clone());

        let err = service.process_turn(turn("   ")).await.unwrap_err();
        assert!(matches!(err, IntakeError::EmptyInput));
        assert!(extractor.requests().is_empty());
    }

    #[tokio::test]
    async fn test_defaults_when_extractor_is_silent() {
        let extractor = Arc::new(ScriptedExtractor::with_outcomes([ExtractionOutcome {
            extracted: PartialClaimData {
                customer_name: Some("John Smith".to_string()),
                ..Default::default()
            },
            reply: "Thanks John, where are you?".to_string(),
            confidence: None,
            next_step: None,
        }]));
        let service = IntakeService::new(extractor);

        let result = service.process_turn(turn("This is John Smith")).await.unwrap();
        assert_eq!(result.confidence, dec!(0.8));
        assert_eq!(result.next_step, ConversationStep::CollectingLocation);
        assert!(!result.is_complete);
        assert_eq!(result.claim_data.customer_name.as_deref(), Some("John Smith"));
    }

    #[tokio::test]
    async fn test_system_messages_are_dropped() {
        let extractor = Arc::new(ScriptedExtractor::with_outcomes([ExtractionOutcome::default()]));
        let service = IntakeService::new(extractor.clone());

        let mut input = turn("hello");
        input.history = vec![
            ConversationMessage {
                role: ConversationRole::System,
                content: "Claim started".to_string(),
                timestamp: Utc::now(),
            },
            ConversationMessage {
                role: ConversationRole::User,
                content: "hi".to_string(),
                timestamp: Utc::now(),
            },
        ];
        service.process_turn(input).await.unwrap();

        let requests = extractor.requests();
        assert_eq!(requests[0].history.len(), 1);
        assert_eq!(requests[0].history[0].role, ConversationRole::User);
    }

    #[tokio::test]
    async fn test_extractor_failure_is_surfaced() {
        let extractor = Arc::new(ScriptedExtractor::new());
        extractor.push(Err(PortError::Timeout {
            operation: "extract_claim_information".to_string(),
            duration_ms: 30_000,
        }));
        let service = IntakeService::new(extractor);

        let err = service.process_turn(turn("my car broke down")).await.unwrap_err();
        assert!(matches!(err, IntakeError::Extraction(PortError::Timeout { .. })));
        assert!(!err.is_bad_input());
    }
}
