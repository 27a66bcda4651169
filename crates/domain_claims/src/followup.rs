//! Follow-up messages after an agent approves a covered claim
//!
//! One task per claim sends the dispatch message, waits, then sends the
//! arrival update. Cancelling the claim aborts the task so no further
//! messages go out.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::task::AbortHandle;
use tracing::{debug, info, warn};

use core_kernel::ClaimId;
use domain_notification::{ArrivalNotice, DispatchNotice, NotificationCenter};

use crate::driver::DriverProfileSource;

/// What the follow-up messages need to know about the claim
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowUpPlan {
    pub claim_id: ClaimId,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub provider_name: String,
    pub eta_minutes: u32,
}

impl FollowUpPlan {
    /// Minutes quoted in the arrival update, 70% of the original ETA rounded down
    pub fn arrival_minutes(&self) -> u32 {
        self.eta_minutes * 7 / 10
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FollowUpDelays {
    /// From approval to the dispatch message
    pub dispatch: Duration,
    /// From the dispatch message to the arrival update
    pub arrival: Duration,
}

impl Default for FollowUpDelays {
    fn default() -> Self {
        Self {
            dispatch: Duration::from_secs(5),
            arrival: Duration::from_secs(3),
        }
    }
}

struct Inner {
    notifications: NotificationCenter,
    drivers: Arc<dyn DriverProfileSource>,
    delays: FollowUpDelays,
    tasks: Mutex<HashMap<ClaimId, AbortHandle>>,
}

#[derive(Clone)]
pub struct FollowUpScheduler {
    inner: Arc<Inner>,
}

impl FollowUpScheduler {
    pub fn new(
        notifications: NotificationCenter,
        drivers: Arc<dyn DriverProfileSource>,
        delays: FollowUpDelays,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                notifications,
                drivers,
                delays,
                tasks: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Starts the dispatch/arrival sequence for a claim
    ///
    /// Returns false when there is no async runtime to run it on. A sequence
    /// already running for the same claim is replaced.
    pub fn schedule(&self, plan: FollowUpPlan) -> bool {
        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                warn!(claim_id = %plan.claim_id, "No async runtime; follow-up messages skipped");
                return false;
            }
        };

        let claim_id = plan.claim_id.clone();
        let scheduler = self.clone();
        // held across the spawn so the task cannot finish before it is tracked
        let mut tasks = self.tasks();
        let task = handle.spawn(async move {
            scheduler.run(plan).await;
        });

        if let Some(previous) = tasks.insert(claim_id, task.abort_handle()) {
            previous.abort();
        }
        true
    }

    /// Aborts pending follow-ups; true when something was still pending
    pub fn cancel(&self, claim_id: &ClaimId) -> bool {
        match self.tasks().remove(claim_id) {
            Some(handle) => {
                let pending = !handle.is_finished();
                handle.abort();
                if pending {
                    info!(claim_id = %claim_id, "Follow-up messages cancelled");
                }
                pending
            }
            None => false,
        }
    }

    pub fn is_pending(&self, claim_id: &ClaimId) -> bool {
        self.tasks()
            .get(claim_id)
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Number of claims with a follow-up sequence still tracked
    pub fn pending_count(&self) -> usize {
        self.tasks().len()
    }

    async fn run(&self, plan: FollowUpPlan) {
        let delays = self.inner.delays;

        tokio::time::sleep(delays.dispatch).await;
        let driver = self.inner.drivers.next_profile();
        self.inner.notifications.send_service_dispatch(&DispatchNotice {
            claim_id: plan.claim_id.clone(),
            customer_name: plan.customer_name.clone(),
            customer_phone: plan.customer_phone.clone(),
            provider_name: plan.provider_name.clone(),
            driver_name: driver.name,
            driver_phone: driver.phone,
            vehicle: driver.vehicle,
            eta_minutes: plan.eta_minutes,
        });

        tokio::time::sleep(delays.arrival).await;
        self.inner.notifications.send_arrival_update(&ArrivalNotice {
            claim_id: plan.claim_id.clone(),
            customer_name: plan.customer_name.clone(),
            customer_phone: plan.customer_phone.clone(),
            minutes_away: plan.arrival_minutes(),
        });

        self.finish(&plan.claim_id);
    }

    /// Drops the claim's entry unless a newer sequence has replaced it
    fn finish(&self, claim_id: &ClaimId) {
        let Some(current) = tokio::task::try_id() else {
            return;
        };
        let mut tasks = self.tasks();
        if tasks.get(claim_id).is_some_and(|handle| handle.id() == current) {
            tasks.remove(claim_id);
            debug!(claim_id = %claim_id, "Follow-up messages complete");
        }
    }

    fn tasks(&self) -> MutexGuard<'_, HashMap<ClaimId, AbortHandle>> {
        self.inner
            .tasks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    use crate::driver::{DriverProfile, FixedDriverProfile};

    fn plan(eta: u32) -> FollowUpPlan {
        FollowUpPlan {
            claim_id: ClaimId::from_parts(2026, 1),
            customer_name: "John Smith".to_string(),
            customer_phone: None,
            provider_name: "QuickFix Towing".to_string(),
            eta_minutes: eta,
        }
    }

    #[test]
    fn test_arrival_minutes_round_down() {
        assert_eq!(plan(25).arrival_minutes(), 17);
        assert_eq!(plan(20).arrival_minutes(), 14);
        assert_eq!(plan(10).arrival_minutes(), 7);
    }

    fn scheduler() -> FollowUpScheduler {
        let clock = Arc::new(core_kernel::FixedClock::at(
            chrono::Utc.with_ymd_and_hms(2026, 3, 4, 10, 0, 0).unwrap(),
        ));
        FollowUpScheduler::new(
            NotificationCenter::new(clock),
            Arc::new(FixedDriverProfile(DriverProfile {
                name: "Mike Johnson".to_string(),
                phone: "(555) 010-2030".to_string(),
                vehicle: "White Ford Transit".to_string(),
            })),
            FollowUpDelays::default(),
        )
    }

    async fn settle() {
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_finished_sequences_are_forgotten() {
        let scheduler = scheduler();
        let claim_id = plan(25).claim_id;
        assert!(scheduler.schedule(plan(25)));
        assert!(scheduler.is_pending(&claim_id));

        tokio::time::sleep(Duration::from_secs(9)).await;
        settle().await;

        assert!(!scheduler.is_pending(&claim_id));
        assert_eq!(scheduler.pending_count(), 0);
        assert_eq!(scheduler.inner.notifications.for_claim(&claim_id).len(), 2);
        assert!(!scheduler.cancel(&claim_id));
    }

    #[tokio::test(start_paused = true)]
    async fn test_replaced_sequence_sends_once() {
        let scheduler = scheduler();
        let claim_id = plan(25).claim_id;
        scheduler.schedule(plan(25));
        settle().await;
        scheduler.schedule(plan(20));

        tokio::time::sleep(Duration::from_secs(9)).await;
        settle().await;

        assert_eq!(scheduler.inner.notifications.for_claim(&claim_id).len(), 2);
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn test_schedule_without_runtime_is_skipped() {
        let scheduler = scheduler();
        assert!(!scheduler.schedule(plan(25)));
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn test_default_delays() {
        let delays = FollowUpDelays::default();
        assert_eq!(delays.dispatch, Duration::from_secs(5));
        assert_eq!(delays.arrival, Duration::from_secs(3));
    }
}
