//! End-to-end processing of a validated claim submission
//!
//! Coverage is decided against the policy repository, an approved claim is
//! dispatched straight away, and the result is stored as `approved` or
//! `denied`. Usage counters move only for approved claims.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use core_kernel::{Clock, CustomerId};
use domain_policy::PolicyError;

use crate::claim::{ClaimRecord, ClaimStatus, Priority};
use crate::claim_data::ClaimData;
use crate::dispatch::{DispatchEngine, ServiceDispatch};
use crate::error::ClaimError;
use crate::store::{decision_from, ClaimsStore};
use crate::strategy::{Assessment, DecisionStrategy, PolicyCoverageStrategy};

#[derive(Clone)]
pub struct ClaimProcessor {
    strategy: PolicyCoverageStrategy,
    dispatch: DispatchEngine,
    store: ClaimsStore,
    clock: Arc<dyn Clock>,
}

impl ClaimProcessor {
    pub fn new(
        strategy: PolicyCoverageStrategy,
        dispatch: DispatchEngine,
        store: ClaimsStore,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            strategy,
            dispatch,
            store,
            clock,
        }
    }

    pub fn store(&self) -> &ClaimsStore {
        &self.store
    }

    /// Decides, dispatches and records a claim
    ///
    /// When no provider can take an approved claim the error is returned and
    /// neither the store nor the policy's usage changes. A claim that loses
    /// the last monthly use to a concurrent claim is reassessed and denied.
    #[instrument(skip(self, claim), fields(customer = %claim.customer_name, issue_type = %claim.issue_type))]
    pub fn process(&self, claim: ClaimData) -> Result<ClaimRecord, ClaimError> {
        let now = self.clock.now();
        let mut assessment = self.strategy.assess(&claim, now);
        let mut dispatch = self.dispatch_approved(&claim, &assessment, now)?;

        if assessment.coverage.is_approved && !assessment.coverage.policy.is_unknown() {
            let recorded = self
                .strategy
                .coverage_engine()
                .policies()
                .record_usage(&assessment.coverage.policy.policy_number, claim.service_type());
            match recorded {
                Ok(_) => {}
                Err(PolicyError::LimitReached { policy_number, service }) => {
                    warn!(%policy_number, %service, "Monthly limit used up by a concurrent claim");
                    assessment = self.strategy.assess(&claim, now);
                    if assessment.coverage.is_approved {
                        return Err(PolicyError::LimitReached { policy_number, service }.into());
                    }
                    dispatch = None;
                }
                Err(err) => return Err(err.into()),
            }
        }

        let coverage = assessment.coverage.clone();
        let cost = dispatch
            .as_ref()
            .map(|dispatch| dispatch.estimated_cost)
            .unwrap_or(assessment.estimated_cost);
        let total_cost = coverage.total_cost(cost)?;

        let claim_id = self.store.next_claim_id(now);
        let status = if coverage.is_approved {
            ClaimStatus::Approved
        } else {
            ClaimStatus::Denied
        };

        let record = ClaimRecord {
            id: claim_id.clone(),
            customer_id: CustomerId::new(),
            priority: Priority::from(claim.urgency_level),
            status,
            coverage,
            dispatch,
            decided_by: self.strategy.name().to_string(),
            assigned_agent_id: None,
            total_cost,
            created_at: now,
            updated_at: now,
            claim_data: claim,
        };
        let decision = decision_from(&claim_id, assessment, now);

        info!(
            claim_id = %claim_id,
            status = %status,
            total_cost = %record.total_cost,
            "Claim processed"
        );
        self.store.insert(record.clone(), decision);
        Ok(record)
    }

    fn dispatch_approved(
        &self,
        claim: &ClaimData,
        assessment: &Assessment,
        now: DateTime<Utc>,
    ) -> Result<Option<ServiceDispatch>, ClaimError> {
        if !assessment.coverage.is_approved {
            return Ok(None);
        }
        self.dispatch
            .dispatch_at(claim, &assessment.coverage, now)
            .map(Some)
    }
}
