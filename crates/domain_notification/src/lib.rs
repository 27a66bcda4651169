//! Notification Domain - Customer SMS updates
//!
//! Builds the text messages a customer receives while a claim moves from
//! approval to arrival, keeps the log of what was sent, and simulates
//! carrier delivery receipts.

pub mod center;
pub mod error;
pub mod sms;
pub mod templates;

pub use center::{DeliveryDelays, NotificationCenter, NotificationListener};
pub use error::NotificationError;
pub use sms::{DeliveryStatus, NotificationKind, SmsNotification};
pub use templates::{
    approval_message, arrival_message, dispatch_message, first_name, ApprovalNotice,
    ApprovalOutcome, ArrivalNotice, DispatchNotice, ProviderSummary, NO_DEDUCTIBLE_FACTOR,
    PHONE_NOT_PROVIDED, SUPPORT_LINE,
};
