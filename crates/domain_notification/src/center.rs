//! Notification center
//!
//! Holds every SMS sent during the process lifetime, newest first, and
//! simulates carrier delivery by flipping each message from `sent` to
//! `delivered` after a per-kind delay.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use core_kernel::{ClaimId, Clock, NotificationId, SubscriptionId};
use tracing::{debug, info, warn};

use crate::error::NotificationError;
use crate::sms::{DeliveryStatus, NotificationKind, SmsNotification};
use crate::templates::{
    approval_message, arrival_message, dispatch_message, ApprovalNotice, ArrivalNotice,
    DispatchNotice, PHONE_NOT_PROVIDED,
};

/// Callback invoked with the full notification list after every change
pub type NotificationListener = Arc<dyn Fn(&[SmsNotification]) + Send + Sync>;

/// Simulated carrier delivery latency per message kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryDelays {
    pub approval: Duration,
    pub dispatch: Duration,
    pub arrival: Duration,
}

impl DeliveryDelays {
    pub fn for_kind(&self, kind: NotificationKind) -> Duration {
        match kind {
            NotificationKind::ClaimApproved => self.approval,
            NotificationKind::ServiceDispatched => self.dispatch,
            NotificationKind::ArrivalUpdate | NotificationKind::Completion => self.arrival,
        }
    }
}

impl Default for DeliveryDelays {
    fn default() -> Self {
        Self {
            approval: Duration::from_millis(2000),
            dispatch: Duration::from_millis(1500),
            arrival: Duration::from_millis(1000),
        }
    }
}

#[derive(Default)]
struct CenterState {
    notifications: Vec<SmsNotification>,
    listeners: Vec<(SubscriptionId, NotificationListener)>,
    next_subscription: u64,
}

struct Inner {
    state: Mutex<CenterState>,
    clock: Arc<dyn Clock>,
    delays: DeliveryDelays,
}

/// Shared handle to the notification log
#[derive(Clone)]
pub struct NotificationCenter {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for NotificationCenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationCenter")
            .field("delays", &self.inner.delays)
            .finish_non_exhaustive()
    }
}

impl NotificationCenter {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_delays(clock, DeliveryDelays::default())
    }

    pub fn with_delays(clock: Arc<dyn Clock>, delays: DeliveryDelays) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(CenterState::default()),
                clock,
                delays,
            }),
        }
    }

    pub fn delays(&self) -> DeliveryDelays {
        self.inner.delays
    }

    /// Sends the decision message for a claim an agent just approved
    pub fn send_claim_approval(&self, notice: &ApprovalNotice) -> NotificationId {
        self.send(
            notice.claim_id.clone(),
            &notice.customer_name,
            notice.customer_phone.as_deref(),
            approval_message(notice),
            NotificationKind::ClaimApproved,
        )
    }

    pub fn send_service_dispatch(&self, notice: &DispatchNotice) -> NotificationId {
        self.send(
            notice.claim_id.clone(),
            &notice.customer_name,
            notice.customer_phone.as_deref(),
            dispatch_message(notice),
            NotificationKind::ServiceDispatched,
        )
    }

    pub fn send_arrival_update(&self, notice: &ArrivalNotice) -> NotificationId {
        self.send(
            notice.claim_id.clone(),
            &notice.customer_name,
            notice.customer_phone.as_deref(),
            arrival_message(notice),
            NotificationKind::ArrivalUpdate,
        )
    }

    pub fn mark_as_read(&self, id: &NotificationId) -> Result<(), NotificationError> {
        self.advance(id, DeliveryStatus::Read)
    }

    /// All notifications, newest first
    pub fn notifications(&self) -> Vec<SmsNotification> {
        self.lock().notifications.clone()
    }

    pub fn for_claim(&self, claim_id: &ClaimId) -> Vec<SmsNotification> {
        self.lock()
            .notifications
            .iter()
            .filter(|sms| &sms.claim_id == claim_id)
            .cloned()
            .collect()
    }

    pub fn get(&self, id: &NotificationId) -> Option<SmsNotification> {
        self.lock()
            .notifications
            .iter()
            .find(|sms| &sms.id == id)
            .cloned()
    }

    pub fn subscribe(&self, listener: NotificationListener) -> SubscriptionId {
        let mut state = self.lock();
        state.next_subscription += 1;
        let id = SubscriptionId::new(state.next_subscription);
        state.listeners.push((id, listener));
        id
    }

    /// Returns false when the subscription was already gone
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut state = self.lock();
        let before = state.listeners.len();
        state.listeners.retain(|(existing, _)| *existing != id);
        state.listeners.len() != before
    }

    fn send(
        &self,
        claim_id: ClaimId,
        customer_name: &str,
        customer_phone: Option<&str>,
        message: String,
        kind: NotificationKind,
    ) -> NotificationId {
        let notification = SmsNotification {
            id: NotificationId::new(),
            claim_id,
            customer_name: customer_name.to_string(),
            customer_phone: customer_phone
                .filter(|phone| !phone.trim().is_empty())
                .unwrap_or(PHONE_NOT_PROVIDED)
                .to_string(),
            message,
            timestamp: self.inner.clock.now(),
            kind,
            status: DeliveryStatus::Sent,
        };
        let id = notification.id;

        info!(
            notification_id = %id,
            claim_id = %notification.claim_id,
            kind = ?kind,
            "SMS notification sent"
        );

        let (snapshot, listeners) = {
            let mut state = self.lock();
            state.notifications.insert(0, notification);
            (state.notifications.clone(), Self::listeners_of(&state))
        };
        Self::notify(&listeners, &snapshot);

        self.schedule_delivery(id, self.inner.delays.for_kind(kind));
        id
    }

    fn schedule_delivery(&self, id: NotificationId, delay: Duration) {
        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                warn!(notification_id = %id, "No async runtime; delivery will not be simulated");
                return;
            }
        };

        let center = self.clone();
        handle.spawn(async move {
            tokio::time::sleep(delay).await;
            center.mark_delivered(&id);
        });
    }

    fn mark_delivered(&self, id: &NotificationId) {
        let already_past = self
            .get(id)
            .map(|sms| sms.status >= DeliveryStatus::Delivered)
            .unwrap_or(true);
        if already_past {
            return;
        }

        match self.advance(id, DeliveryStatus::Delivered) {
            Ok(()) => debug!(notification_id = %id, "SMS notification delivered"),
            Err(err) => debug!(notification_id = %id, error = %err, "Delivery update skipped"),
        }
    }

    fn advance(&self, id: &NotificationId, status: DeliveryStatus) -> Result<(), NotificationError> {
        let (snapshot, listeners) = {
            let mut state = self.lock();
            let sms = state
                .notifications
                .iter_mut()
                .find(|sms| &sms.id == id)
                .ok_or_else(|| NotificationError::NotFound(id.to_string()))?;

            if !sms.advance_to(status)? {
                return Ok(());
            }
            (state.notifications.clone(), Self::listeners_of(&state))
        };

        Self::notify(&listeners, &snapshot);
        Ok(())
    }

    fn listeners_of(state: &CenterState) -> Vec<NotificationListener> {
        state
            .listeners
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect()
    }

    fn notify(listeners: &[NotificationListener], snapshot: &[SmsNotification]) {
        for listener in listeners {
            listener(snapshot);
        }
    }

    fn lock(&self) -> MutexGuard<'_, CenterState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use core_kernel::FixedClock;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn center() -> NotificationCenter {
        let clock = FixedClock::at(Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap());
        NotificationCenter::new(Arc::new(clock))
    }

    fn arrival(claim: u32) -> ArrivalNotice {
        ArrivalNotice {
            claim_id: ClaimId::from_parts(2024, claim),
            customer_name: "Mike Davis".to_string(),
            customer_phone: None,
            minutes_away: 10,
        }
    }

    #[test]
    fn test_send_without_runtime_keeps_sent_status() {
        let center = center();
        let id = center.send_arrival_update(&arrival(1));

        let sms = center.get(&id).unwrap();
        assert_eq!(sms.status, DeliveryStatus::Sent);
        assert_eq!(sms.customer_phone, PHONE_NOT_PROVIDED);
        assert_eq!(sms.kind, NotificationKind::ArrivalUpdate);
    }

    #[test]
    fn test_newest_first_and_claim_filter() {
        let center = center();
        let first = center.send_arrival_update(&arrival(1));
        let second = center.send_arrival_update(&arrival(2));

        let all = center.notifications();
        assert_eq!(all[0].id, second);
        assert_eq!(all[1].id, first);
        assert_eq!(center.for_claim(&ClaimId::from_parts(2024, 1)).len(), 1);
    }

    #[test]
    fn test_mark_unknown_notification() {
        let center = center();
        let err = center.mark_as_read(&NotificationId::new()).unwrap_err();
        assert!(matches!(err, NotificationError::NotFound(_)));
    }

    #[test]
    fn test_listeners_and_unsubscribe() {
        let center = center();
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let subscription = center.subscribe(Arc::new(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        }));

        let id = center.send_arrival_update(&arrival(1));
        center.mark_as_read(&id).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        assert!(center.unsubscribe(subscription));
        assert!(!center.unsubscribe(subscription));
        center.send_arrival_update(&arrival(2));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_default_delays() {
        let delays = DeliveryDelays::default();
        assert_eq!(delays.for_kind(NotificationKind::ClaimApproved), Duration::from_millis(2000));
        assert_eq!(delays.for_kind(NotificationKind::ServiceDispatched), Duration::from_millis(1500));
        assert_eq!(delays.for_kind(NotificationKind::ArrivalUpdate), Duration::from_millis(1000));
    }
}
