//! Provider domain errors

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Unknown provider category: {0}")]
    UnknownCategory(String),
}
