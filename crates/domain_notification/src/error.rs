//! Notification domain errors

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NotificationError {
    #[error("Notification not found: {0}")]
    NotFound(String),

    #[error("Notification status cannot move from {from} back to {to}")]
    StatusRegression { from: String, to: String },
}
