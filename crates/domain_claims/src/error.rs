//! Claims domain errors

use thiserror::Error;

use core_kernel::MoneyError;
use domain_policy::{PolicyError, ServiceType};

use crate::validation::ValidationError;

/// Errors that can occur in the claims domain
///
/// Coverage denials are not errors; they come back as a
/// [`CoverageDecision`](crate::CoverageDecision) with `is_approved == false`.
#[derive(Debug, Error)]
pub enum ClaimError {
    #[error("Claim not found: {0}")]
    ClaimNotFound(String),

    #[error("No decision recorded for claim {0}")]
    DecisionNotFound(String),

    #[error("Unknown claim status: {0}")]
    UnknownStatus(String),

    #[error("Invalid status transition from {from} to {to}")]
    InvalidStatusTransition { from: String, to: String },

    /// Dispatch was requested for a claim the coverage engine did not approve
    #[error("Cannot dispatch service for unapproved claim")]
    UnapprovedDispatch,

    #[error("No service providers available for {0}")]
    NoProviderAvailable(ServiceType),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Policy(#[from] PolicyError),

    #[error(transparent)]
    Money(#[from] MoneyError),
}
