//! SMS notification records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::{ClaimId, NotificationId};

use crate::error::NotificationError;

/// What a message tells the customer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationKind {
    ClaimApproved,
    ServiceDispatched,
    ArrivalUpdate,
    Completion,
}

/// Delivery progress; only ever moves forward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Sent,
    Delivered,
    Read,
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DeliveryStatus::Sent => "sent",
            DeliveryStatus::Delivered => "delivered",
            DeliveryStatus::Read => "read",
        };
        f.write_str(label)
    }
}

/// A message sent to a customer about their claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmsNotification {
    pub id: NotificationId,
    pub claim_id: ClaimId,
    pub customer_name: String,
    pub customer_phone: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub status: DeliveryStatus,
}

impl SmsNotification {
    /// Moves the status forward
    ///
    /// Returns `Ok(false)` when already at `next`, and an error for any
    /// attempt to move backwards.
    pub fn advance_to(&mut self, next: DeliveryStatus) -> Result<bool, NotificationError> {
        if next < self.status {
            return Err(NotificationError::StatusRegression {
                from: self.status.to_string(),
                to: next.to_string(),
            });
        }
        if next == self.status {
            return Ok(false);
        }
        self.status = next;
        Ok(true)
    }

    pub fn is_read(&self) -> bool {
        self.status == DeliveryStatus::Read
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notification() -> SmsNotification {
        SmsNotification {
            id: NotificationId::new(),
            claim_id: ClaimId::from_parts(2024, 1),
            customer_name: "John Smith".to_string(),
            customer_phone: "(555) 123-4567".to_string(),
            message: "Hi John!".to_string(),
            timestamp: Utc::now(),
            kind: NotificationKind::ClaimApproved,
            status: DeliveryStatus::Sent,
        }
    }

    #[test]
    fn test_status_moves_forward() {
        let mut sms = notification();
        assert!(sms.advance_to(DeliveryStatus::Delivered).unwrap());
        assert!(sms.advance_to(DeliveryStatus::Read).unwrap());
        assert!(sms.is_read());
    }

    #[test]
    fn test_status_never_regresses() {
        let mut sms = notification();
        sms.advance_to(DeliveryStatus::Read).unwrap();

        let err = sms.advance_to(DeliveryStatus::Delivered).unwrap_err();
        assert!(matches!(err, NotificationError::StatusRegression { .. }));
        assert_eq!(sms.status, DeliveryStatus::Read);
    }

    #[test]
    fn test_repeat_status_is_noop() {
        let mut sms = notification();
        assert!(!sms.advance_to(DeliveryStatus::Sent).unwrap());
    }

    #[test]
    fn test_kind_serializes_as_type() {
        let json = serde_json::to_value(notification()).unwrap();
        assert_eq!(json["type"], "claim-approved");
        assert_eq!(json["status"], "sent");
    }
}
