//! Notification DTOs

use serde::{Deserialize, Serialize};

use domain_notification::SmsNotification;

#[derive(Debug, Default, Deserialize)]
pub struct NotificationQuery {
    pub claim_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct NotificationListResponse {
    pub success: bool,
    pub unread: usize,
    pub notifications: Vec<SmsNotification>,
}

impl NotificationListResponse {
    pub fn new(notifications: Vec<SmsNotification>) -> Self {
        Self {
            success: true,
            unread: notifications.iter().filter(|n| !n.is_read()).count(),
            notifications,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NotificationResponse {
    pub success: bool,
    pub notification: SmsNotification,
}
