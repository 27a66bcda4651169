//! Ports for external collaborators
//!
//! The claim engine itself is pure; the only calls that leave the process are
//! made through port traits (today, the conversational extraction service).
//! Adapters translate their transport failures into [`PortError`] so callers
//! can tell a retryable outage from a malformed reply.
//!
//! ```rust,ignore
//! #[async_trait]
//! pub trait ClaimExtractor: DomainPort {
//!     async fn extract(&self, request: &ExtractionRequest) -> Result<ExtractionOutcome, PortError>;
//! }
//! ```

use thiserror::Error;

/// Error type for port operations
#[derive(Debug, Error)]
pub enum PortError {
    /// The request was rejected as invalid
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    /// Connection to the external system failed
    #[error("Connection error: {message}")]
    Connection {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The operation timed out
    #[error("Timeout after {duration_ms}ms: {operation}")]
    Timeout {
        operation: String,
        duration_ms: u64,
    },

    /// Credentials were missing or rejected
    #[error("Unauthorized: {message}")]
    Unauthorized {
        message: String,
    },

    /// Rate limit exceeded for external API
    #[error("Rate limited: retry after {retry_after_secs}s")]
    RateLimited {
        retry_after_secs: u64,
    },

    /// The external system is unavailable
    #[error("Service unavailable: {service}")]
    ServiceUnavailable {
        service: String,
    },

    /// The external reply could not be mapped to domain types
    #[error("Transformation error: {message}")]
    Transformation {
        message: String,
    },

    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl PortError {
    pub fn validation(message: impl Into<String>) -> Self {
        PortError::Validation {
            message: message.into(),
            field: None,
        }
    }

    pub fn connection(message: impl Into<String>) -> Self {
        PortError::Connection {
            message: message.into(),
            source: None,
        }
    }

    pub fn transformation(message: impl Into<String>) -> Self {
        PortError::Transformation {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        PortError::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Returns true if this error indicates a transient failure that may succeed on retry
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            PortError::Connection { .. }
                | PortError::Timeout { .. }
                | PortError::RateLimited { .. }
                | PortError::ServiceUnavailable { .. }
        )
    }
}

/// Marker trait for all domain ports
///
/// Ports are shared behind `Arc` across request handlers and spawned tasks.
pub trait DomainPort: Send + Sync + 'static {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_error_validation() {
        let error = PortError::validation("messages must not be empty");
        assert!(!error.is_transient());
        assert_eq!(error.to_string(), "Validation error: messages must not be empty");
    }

    #[test]
    fn test_port_error_transient() {
        let timeout = PortError::Timeout {
            operation: "extract_claim_information".to_string(),
            duration_ms: 30_000,
        };
        assert!(timeout.is_transient());
        assert!(PortError::RateLimited { retry_after_secs: 20 }.is_transient());
        assert!(!PortError::transformation("bad arguments").is_transient());
    }
}
