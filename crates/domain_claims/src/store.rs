//! Claim lifecycle store
//!
//! Holds every claim and its agent-facing decision, newest first. Each
//! mutation hands observers a fresh [`StoreSnapshot`] once the lock has been
//! released, so an observer may read the store again without deadlocking.

use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::info;

use core_kernel::{ClaimId, ClaimIdGenerator, Clock, CustomerId, DecisionId, NotificationId, SubscriptionId};
use domain_notification::{ApprovalNotice, NotificationCenter, ProviderSummary};

use crate::claim::{ClaimRecord, ClaimStatus, Priority};
use crate::claim_data::ClaimData;
use crate::decision::{AgentOverride, AiDecision, DecisionOutcome, OverrideAction};
use crate::error::ClaimError;
use crate::followup::{FollowUpPlan, FollowUpScheduler};
use crate::strategy::{Assessment, DecisionStrategy};

/// Point-in-time copy of the store, newest entries first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreSnapshot {
    pub claims: Vec<ClaimRecord>,
    pub decisions: Vec<AiDecision>,
}

impl StoreSnapshot {
    pub fn decision_for(&self, claim_id: &ClaimId) -> Option<&AiDecision> {
        self.decisions.iter().find(|decision| &decision.claim_id == claim_id)
    }
}

pub type StoreListener = Arc<dyn Fn(&StoreSnapshot) + Send + Sync>;

#[derive(Default)]
struct StoreState {
    snapshot: StoreSnapshot,
    listeners: Vec<(SubscriptionId, StoreListener)>,
    next_subscription: u64,
}

struct Inner {
    state: Mutex<StoreState>,
    ids: ClaimIdGenerator,
    clock: Arc<dyn Clock>,
    strategy: Arc<dyn DecisionStrategy>,
    notifications: NotificationCenter,
    followups: FollowUpScheduler,
}

/// Shared handle to the claim store
#[derive(Clone)]
pub struct ClaimsStore {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for ClaimsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClaimsStore")
            .field("strategy", &self.inner.strategy.name())
            .finish_non_exhaustive()
    }
}

impl ClaimsStore {
    /// `strategy` assesses claims submitted through [`ClaimsStore::submit`]
    pub fn new(
        clock: Arc<dyn Clock>,
        strategy: Arc<dyn DecisionStrategy>,
        notifications: NotificationCenter,
        followups: FollowUpScheduler,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(StoreState::default()),
                ids: ClaimIdGenerator::default(),
                clock,
                strategy,
                notifications,
                followups,
            }),
        }
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.inner.notifications
    }

    pub fn followups(&self) -> &FollowUpScheduler {
        &self.inner.followups
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.inner.clock.now()
    }

    /// Reserves the next claim reference
    pub fn next_claim_id(&self, at: DateTime<Utc>) -> ClaimId {
        self.inner.ids.next_id(at)
    }

    /// Submits a claim for agent review using the store's strategy
    pub fn submit(&self, claim: ClaimData) -> Result<ClaimId, ClaimError> {
        let strategy = Arc::clone(&self.inner.strategy);
        self.submit_with(strategy.as_ref(), claim)
    }

    /// Submits a claim assessed by `strategy`; the claim waits as pending
    pub fn submit_with(&self, strategy: &dyn DecisionStrategy, claim: ClaimData) -> Result<ClaimId, ClaimError> {
        let now = self.now();
        let assessment = strategy.assess(&claim, now);
        let claim_id = self.next_claim_id(now);
        let total_cost = assessment.coverage.total_cost(assessment.estimated_cost)?;

        let record = ClaimRecord {
            id: claim_id.clone(),
            customer_id: CustomerId::new(),
            priority: Priority::from(claim.urgency_level),
            status: ClaimStatus::Pending,
            coverage: assessment.coverage.clone(),
            dispatch: None,
            decided_by: strategy.name().to_string(),
            assigned_agent_id: None,
            total_cost,
            created_at: now,
            updated_at: now,
            claim_data: claim,
        };
        let decision = decision_from(&claim_id, assessment, now);

        info!(
            claim_id = %claim_id,
            strategy = strategy.name(),
            decision = %decision.decision,
            confidence = %decision.confidence,
            "Claim submitted for review"
        );
        self.insert(record, decision);
        Ok(claim_id)
    }

    /// Stores a claim and its decision at the front of the queue
    pub fn insert(&self, record: ClaimRecord, decision: AiDecision) {
        self.mutate(|snapshot| {
            snapshot.claims.insert(0, record);
            snapshot.decisions.insert(0, decision);
        });
    }

    /// Agent takes the claim and the customer is told the outcome
    ///
    /// The notice reflects the effective decision. Dispatch and arrival
    /// follow-ups go out only when the original decision was covered with a
    /// suggested provider.
    pub fn approve(&self, claim_id: &ClaimId, agent_id: &str) -> Result<NotificationId, ClaimError> {
        let now = self.now();
        let (record, decision) = self.try_mutate(|snapshot| {
            let decision = snapshot
                .decision_for(claim_id)
                .cloned()
                .ok_or_else(|| ClaimError::DecisionNotFound(claim_id.to_string()))?;
            let record = find_claim(snapshot, claim_id)?;
            record.update_status(ClaimStatus::Assigned, now)?;
            record.assigned_agent_id = Some(agent_id.to_string());
            Ok((record.clone(), decision))
        })?;

        let outcome = decision.effective_decision();
        let notice = ApprovalNotice {
            claim_id: claim_id.clone(),
            customer_name: record.customer_name().to_string(),
            customer_phone: record.customer_phone().map(str::to_string),
            outcome: outcome.approval_outcome(),
            positive_factors: decision.factors.positive.clone(),
            provider: decision.provider.as_ref().map(|provider| ProviderSummary {
                name: provider.name.clone(),
                eta_minutes: provider.eta_minutes,
                cost: provider.cost,
            }),
            estimated_cost: decision.estimated_cost,
        };
        let notification_id = self.inner.notifications.send_claim_approval(&notice);

        info!(claim_id = %claim_id, agent_id, decision = %outcome, "Claim approved by agent");

        let original = decision.decision;
        if let (DecisionOutcome::Covered, Some(provider)) = (original, decision.provider.as_ref()) {
            self.inner.followups.schedule(FollowUpPlan {
                claim_id: claim_id.clone(),
                customer_name: notice.customer_name.clone(),
                customer_phone: notice.customer_phone.clone(),
                provider_name: provider.name.clone(),
                eta_minutes: provider.eta_minutes,
            });
        }

        Ok(notification_id)
    }

    /// Records an agent's correction; the original decision is kept
    pub fn override_decision(
        &self,
        claim_id: &ClaimId,
        agent_id: &str,
        new_decision: DecisionOutcome,
        reason: &str,
    ) -> Result<AgentOverride, ClaimError> {
        let entry = AgentOverride {
            agent_id: agent_id.to_string(),
            agent_name: format!("Agent {agent_id}"),
            action: OverrideAction::Modify,
            reason: reason.to_string(),
            timestamp: self.now(),
            new_decision: Some(new_decision),
        };

        self.try_mutate(|snapshot| {
            let decision = snapshot
                .decisions
                .iter_mut()
                .find(|decision| &decision.claim_id == claim_id)
                .ok_or_else(|| ClaimError::DecisionNotFound(claim_id.to_string()))?;
            decision.overrides.push(entry.clone());
            Ok(())
        })?;

        info!(claim_id = %claim_id, agent_id, decision = %new_decision, "Decision overridden");
        Ok(entry)
    }

    /// Moves a claim along its lifecycle
    pub fn update_status(&self, claim_id: &ClaimId, status: ClaimStatus) -> Result<ClaimRecord, ClaimError> {
        let now = self.now();
        let record = self.try_mutate(|snapshot| {
            let record = find_claim(snapshot, claim_id)?;
            record.update_status(status, now)?;
            Ok(record.clone())
        })?;

        if status == ClaimStatus::Cancelled {
            self.inner.followups.cancel(claim_id);
        }
        info!(claim_id = %claim_id, status = %status, "Claim status updated");
        Ok(record)
    }

    pub fn get(&self, claim_id: &ClaimId) -> Option<ClaimRecord> {
        self.lock()
            .snapshot
            .claims
            .iter()
            .find(|record| &record.id == claim_id)
            .cloned()
    }

    pub fn claims(&self) -> Vec<ClaimRecord> {
        self.lock().snapshot.claims.clone()
    }

    pub fn decisions(&self) -> Vec<AiDecision> {
        self.lock().snapshot.decisions.clone()
    }

    pub fn decision_for(&self, claim_id: &ClaimId) -> Option<AiDecision> {
        self.lock().snapshot.decision_for(claim_id).cloned()
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        self.lock().snapshot.clone()
    }

    pub fn subscribe(&self, listener: StoreListener) -> SubscriptionId {
        let mut state = self.lock();
        state.next_subscription += 1;
        let id = SubscriptionId::new(state.next_subscription);
        state.listeners.push((id, listener));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut state = self.lock();
        let before = state.listeners.len();
        state.listeners.retain(|(existing, _)| *existing != id);
        state.listeners.len() != before
    }

    fn mutate(&self, change: impl FnOnce(&mut StoreSnapshot)) {
        let (snapshot, listeners) = {
            let mut state = self.lock();
            change(&mut state.snapshot);
            (state.snapshot.clone(), listeners_of(&state))
        };
        notify(&snapshot, listeners);
    }

    /// Applies `change` under the lock; observers only hear about successes
    fn try_mutate<T>(
        &self,
        change: impl FnOnce(&mut StoreSnapshot) -> Result<T, ClaimError>,
    ) -> Result<T, ClaimError> {
        let (value, snapshot, listeners) = {
            let mut state = self.lock();
            let value = change(&mut state.snapshot)?;
            (value, state.snapshot.clone(), listeners_of(&state))
        };
        notify(&snapshot, listeners);
        Ok(value)
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn listeners_of(state: &StoreState) -> Vec<StoreListener> {
    state.listeners.iter().map(|(_, listener)| Arc::clone(listener)).collect()
}

fn notify(snapshot: &StoreSnapshot, listeners: Vec<StoreListener>) {
    for listener in listeners {
        listener(snapshot);
    }
}

fn find_claim<'a>(snapshot: &'a mut StoreSnapshot, claim_id: &ClaimId) -> Result<&'a mut ClaimRecord, ClaimError> {
    snapshot
        .claims
        .iter_mut()
        .find(|record| &record.id == claim_id)
        .ok_or_else(|| ClaimError::ClaimNotFound(claim_id.to_string()))
}

/// Agent-facing record of what a strategy concluded
pub fn decision_from(claim_id: &ClaimId, assessment: Assessment, at: DateTime<Utc>) -> AiDecision {
    AiDecision {
        id: DecisionId::new(),
        claim_id: claim_id.clone(),
        decision: assessment.decision,
        confidence: assessment.confidence,
        reasoning: assessment.reasoning,
        factors: assessment.factors,
        recommended_action: assessment.recommended_action,
        provider: assessment.provider,
        estimated_cost: assessment.estimated_cost,
        timestamp: at,
        overrides: Vec::new(),
    }
}
