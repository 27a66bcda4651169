//! Conversational intake DTOs

use serde::{Deserialize, Serialize};

use domain_intake::{ConversationMessage, ConversationStep, IntakeTurnResult, PartialClaimData};

/// Body of an intake turn; `user_input` is optional here so that a missing
/// value gets the intake error rather than a deserialization error
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct IntakeTurnRequest {
    pub user_input: Option<String>,
    pub history: Vec<ConversationMessage>,
    pub current_step: ConversationStep,
    pub current_data: PartialClaimData,
}

#[derive(Debug, Serialize)]
pub struct IntakeTurnResponse {
    pub success: bool,
    #[serde(flatten)]
    pub result: IntakeTurnResult,
}
