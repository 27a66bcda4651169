//! API error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use core_kernel::PortError;
use domain_claims::{ClaimError, ValidationError};
use domain_intake::IntakeError;
use domain_notification::NotificationError;
use domain_policy::PolicyError;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {message}")]
    Validation {
        field: Option<&'static str>,
        message: String,
    },

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Upstream failure: {0}")]
    BadGateway(String),

    /// A caller broke an internal contract, e.g. dispatching an unapproved claim
    #[error("Contract violation: {0}")]
    ContractViolation(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<&'static str>,
}

impl ApiError {
    fn parts(&self) -> (StatusCode, &'static str, String, Option<&'static str>) {
        match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone(), None),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone(), None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg.clone(), None),
            ApiError::Validation { field, message } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                message.clone(),
                *field,
            ),
            ApiError::ServiceUnavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "service_unavailable", msg.clone(), None)
            }
            ApiError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, "upstream_error", msg.clone(), None),
            ApiError::ContractViolation(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "contract_violation",
                msg.clone(),
                None,
            ),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg.clone(), None),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message, field) = self.parts();

        if status.is_server_error() {
            error!(status = %status.as_u16(), error = error_type, %message, "Request failed");
        }

        let body = ErrorResponse {
            success: false,
            error: error_type.to_string(),
            message,
            field,
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation {
            field: Some(err.field),
            message: err.message,
        }
    }
}

impl From<ClaimError> for ApiError {
    fn from(err: ClaimError) -> Self {
        match err {
            ClaimError::ClaimNotFound(_) | ClaimError::DecisionNotFound(_) => {
                ApiError::NotFound(err.to_string())
            }
            ClaimError::UnknownStatus(_) => ApiError::Validation {
                field: Some("status"),
                message: err.to_string(),
            },
            ClaimError::InvalidStatusTransition { .. } => ApiError::Conflict(err.to_string()),
            ClaimError::UnapprovedDispatch => ApiError::ContractViolation(err.to_string()),
            ClaimError::NoProviderAvailable(_) => ApiError::ServiceUnavailable(err.to_string()),
            ClaimError::Validation(validation) => validation.into(),
            ClaimError::Policy(policy) => policy.into(),
            ClaimError::Money(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<PolicyError> for ApiError {
    fn from(err: PolicyError) -> Self {
        match err {
            PolicyError::PolicyNotFound(_) => ApiError::NotFound(err.to_string()),
            PolicyError::StoreUnavailable => ApiError::ServiceUnavailable(err.to_string()),
            PolicyError::LimitReached { .. } => ApiError::Conflict(err.to_string()),
            _ => ApiError::Validation {
                field: None,
                message: err.to_string(),
            },
        }
    }
}

impl From<NotificationError> for ApiError {
    fn from(err: NotificationError) -> Self {
        match err {
            NotificationError::NotFound(_) => ApiError::NotFound(err.to_string()),
            NotificationError::StatusRegression { .. } => ApiError::Conflict(err.to_string()),
        }
    }
}

impl From<IntakeError> for ApiError {
    fn from(err: IntakeError) -> Self {
        match err {
            IntakeError::MissingInput | IntakeError::EmptyInput => ApiError::BadRequest(err.to_string()),
            IntakeError::Disabled => ApiError::ServiceUnavailable(err.to_string()),
            IntakeError::Extraction(ref port) if port.is_transient() => {
                ApiError::ServiceUnavailable(err.to_string())
            }
            IntakeError::Extraction(PortError::Validation { .. }) => ApiError::BadRequest(err.to_string()),
            IntakeError::Extraction(_) => ApiError::BadGateway(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_policy::ServiceType;

    #[test]
    fn test_claim_error_status_codes() {
        let status = |err: ClaimError| ApiError::from(err).parts().0;

        assert_eq!(status(ClaimError::ClaimNotFound("CLM-2026-001".into())), StatusCode::NOT_FOUND);
        assert_eq!(
            status(ClaimError::InvalidStatusTransition {
                from: "completed".into(),
                to: "pending".into(),
            }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status(ClaimError::NoProviderAvailable(ServiceType::Lockout)),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(status(ClaimError::UnapprovedDispatch), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(status(ClaimError::UnknownStatus("lost".into())), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_intake_error_status_codes() {
        let status = |err: IntakeError| ApiError::from(err).parts().0;

        assert_eq!(status(IntakeError::EmptyInput), StatusCode::BAD_REQUEST);
        assert_eq!(status(IntakeError::Disabled), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            status(IntakeError::Extraction(PortError::RateLimited { retry_after_secs: 20 })),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status(IntakeError::Extraction(PortError::transformation("bad json"))),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_validation_keeps_field() {
        let (status, kind, message, field) = ApiError::Validation {
            field: Some("location.city"),
            message: "City is required".to_string(),
        }
        .parts();

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(kind, "validation_error");
        assert_eq!(message, "City is required");
        assert_eq!(field, Some("location.city"));
    }
}
