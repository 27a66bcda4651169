//! Coverage decision engine
//!
//! Decides whether a policy pays for a roadside claim. Checks run in a fixed
//! order and the first failing check determines the outcome:
//!
//! 1. the policy resolves (by number, else by customer name)
//! 2. the policy is active
//! 3. roadside assistance is part of the policy
//! 4. the monthly limit for the service has not been reached
//! 5. the service is covered
//!
//! A denial is an ordinary [`CoverageDecision`], never an error.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

use core_kernel::{Clock, Money, MoneyError};
use domain_policy::{PolicyRecord, PolicyRepository, PricingRules, ServiceType};

use crate::claim_data::ClaimData;

/// How much of the estimated cost the policy pays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverageType {
    Full,
    Partial,
    None,
}

/// Outcome of the coverage checks for one claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageDecision {
    pub is_approved: bool,
    pub coverage_type: CoverageType,
    pub approved_services: Vec<ServiceType>,
    pub deductible: Money,
    pub max_coverage: Money,
    /// Present only on approval
    pub estimated_cost: Option<Money>,
    pub reason: String,
    pub confidence: Decimal,
    /// Policy the decision was made against; a placeholder when none matched
    pub policy: PolicyRecord,
}

impl CoverageDecision {
    fn denied(policy: PolicyRecord, reason: String, confidence: Decimal) -> Self {
        let currency = policy.deductible.currency();
        Self {
            is_approved: false,
            coverage_type: CoverageType::None,
            approved_services: Vec::new(),
            deductible: policy.deductible,
            max_coverage: Money::zero(currency),
            estimated_cost: None,
            reason,
            confidence,
            policy,
        }
    }

    pub fn is_full(&self) -> bool {
        self.is_approved && self.coverage_type == CoverageType::Full
    }

    /// Claim total for a service costing `cost`: the capped cost plus the
    /// deductible when approved, zero otherwise
    pub fn total_cost(&self, cost: Money) -> Result<Money, MoneyError> {
        if !self.is_approved {
            return Ok(Money::zero(cost.currency()));
        }
        cost.checked_min(&self.max_coverage)?.checked_add(&self.deductible)
    }
}

/// Rule-based coverage engine over the policy repository
#[derive(Clone)]
pub struct CoverageEngine {
    policies: Arc<dyn PolicyRepository>,
    pricing: PricingRules,
    clock: Arc<dyn Clock>,
}

impl CoverageEngine {
    pub fn new(policies: Arc<dyn PolicyRepository>, pricing: PricingRules, clock: Arc<dyn Clock>) -> Self {
        Self {
            policies,
            pricing,
            clock,
        }
    }

    pub fn pricing(&self) -> &PricingRules {
        &self.pricing
    }

    pub fn policies(&self) -> &Arc<dyn PolicyRepository> {
        &self.policies
    }

    /// Decides coverage as of now
    pub fn decide(&self, claim: &ClaimData) -> CoverageDecision {
        self.decide_at(claim, self.clock.now())
    }

    /// Decides coverage with pricing evaluated at `at`
    pub fn decide_at(&self, claim: &ClaimData, at: DateTime<Utc>) -> CoverageDecision {
        let decision = self.evaluate(claim, at);
        info!(
            customer = %claim.customer_name,
            policy_number = %decision.policy.policy_number,
            issue_type = %claim.issue_type,
            approved = decision.is_approved,
            reason = %decision.reason,
            "Coverage decided"
        );
        decision
    }

    /// Looks the policy up by number when one was given, else by name
    pub fn resolve_policy(&self, claim: &ClaimData) -> Option<PolicyRecord> {
        match claim.policy_number() {
            Some(number) => self.policies.find_by_number(number),
            None => self.policies.find_by_customer_name(&claim.customer_name),
        }
    }

    fn evaluate(&self, claim: &ClaimData, at: DateTime<Utc>) -> CoverageDecision {
        let Some(policy) = self.resolve_policy(claim) else {
            debug!(customer = %claim.customer_name, "No policy matched claim");
            return CoverageDecision::denied(
                PolicyRecord::unknown(&claim.customer_name, at.date_naive()),
                "Policy not found or customer not verified".to_string(),
                dec!(0.1),
            );
        };

        if !policy.is_active() {
            let reason = format!("Policy is {}", policy.status);
            return CoverageDecision::denied(policy, reason, dec!(0.9));
        }

        if !policy.roadside.included {
            return CoverageDecision::denied(
                policy,
                "Roadside assistance not included in policy".to_string(),
                dec!(0.9),
            );
        }

        let service = claim.service_type();
        if policy.roadside.limit_reached(service) {
            let reason = format!("Monthly {service} limit exceeded");
            return CoverageDecision::denied(policy, reason, dec!(0.9));
        }

        let issue_as_service = ServiceType::from_alias(claim.issue_type.as_str());
        let covered = policy.roadside.covers(service)
            || issue_as_service.is_some_and(|alias| policy.roadside.covers(alias));
        if !covered {
            let reason = format!("Service type '{}' not covered by policy", claim.issue_type);
            return CoverageDecision::denied(policy, reason, dec!(0.8));
        }

        let estimated_cost = self.pricing.estimate(service, claim.urgency_level, at);
        let max_coverage = self.pricing.max_coverage(service);
        let coverage_type = if estimated_cost.amount() > max_coverage.amount() {
            CoverageType::Partial
        } else {
            CoverageType::Full
        };

        CoverageDecision {
            is_approved: true,
            coverage_type,
            approved_services: vec![service],
            deductible: policy.deductible,
            max_coverage,
            estimated_cost: Some(estimated_cost),
            reason: "Claim approved under roadside assistance coverage".to_string(),
            confidence: dec!(0.95),
            policy,
        }
    }
}
