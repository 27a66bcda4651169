//! Intake errors

use thiserror::Error;

use core_kernel::PortError;

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("User input is required")]
    MissingInput,

    #[error("User input cannot be empty")]
    EmptyInput,

    /// Conversational intake is switched off (no extraction service configured)
    #[error("Conversational intake is not configured")]
    Disabled,

    #[error("Failed to process voice input: {0}")]
    Extraction(#[from] PortError),
}

impl IntakeError {
    /// True when the caller sent something unusable, as opposed to an upstream failure
    pub fn is_bad_input(&self) -> bool {
        matches!(self, IntakeError::MissingInput | IntakeError::EmptyInput)
    }
}
