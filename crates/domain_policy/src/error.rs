//! Policy domain errors

use thiserror::Error;

use crate::service::ServiceType;

/// Errors that can occur in the policy domain
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolicyError {
    /// No policy stored under this number
    #[error("Policy not found: {0}")]
    PolicyNotFound(String),

    /// The monthly allowance for the service was used up before this claim
    #[error("Monthly {service} limit reached on {policy_number}")]
    LimitReached {
        policy_number: String,
        service: ServiceType,
    },

    #[error("Unknown service type: {0}")]
    UnknownServiceType(String),

    #[error("Unknown issue type: {0}")]
    UnknownIssueType(String),

    #[error("Unknown urgency level: {0}")]
    UnknownUrgencyLevel(String),

    /// The in-memory store lock was poisoned by a panicking writer
    #[error("Policy store unavailable")]
    StoreUnavailable,
}
