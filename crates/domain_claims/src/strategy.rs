//! Decision strategies
//!
//! Two entry points assess claims differently. Structured submissions go
//! through [`PolicyCoverageStrategy`], which runs the full coverage rules
//! against the policy repository. Dashboard submissions go through
//! [`PlanTierStrategy`], which infers a plan tier from the policy number and
//! applies flat tier terms.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::Money;
use domain_notification::NO_DEDUCTIBLE_FACTOR;
use domain_policy::PlanTier;
use domain_provider::{ProviderCategory, ProviderDirectory};
use std::sync::Arc;

use crate::claim_data::ClaimData;
use crate::coverage::{CoverageDecision, CoverageEngine, CoverageType};
use crate::decision::{DecisionFactors, DecisionOutcome, ProviderSuggestion};
use crate::dispatch::{eta_minutes, DispatchEngine};

const MAX_CONFIDENCE: Decimal = dec!(0.99);
const FALLBACK_COST: Decimal = dec!(75);

/// Everything a strategy concluded about one claim
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub coverage: CoverageDecision,
    pub decision: DecisionOutcome,
    pub confidence: Decimal,
    pub reasoning: String,
    pub factors: DecisionFactors,
    pub recommended_action: String,
    pub provider: Option<ProviderSuggestion>,
    pub estimated_cost: Money,
}

pub trait DecisionStrategy: Send + Sync {
    /// Recorded on each claim the strategy assessed
    fn name(&self) -> &'static str;

    fn assess(&self, claim: &ClaimData, at: DateTime<Utc>) -> Assessment;
}

fn recommended_action(decision: DecisionOutcome, provider: Option<&ProviderSuggestion>) -> String {
    match decision {
        DecisionOutcome::Covered => format!(
            "Dispatch {} immediately",
            provider.map(|p| p.name.as_str()).unwrap_or("service provider")
        ),
        DecisionOutcome::RequiresReview => "Agent review required - cost analysis needed".to_string(),
        DecisionOutcome::NotCovered => "Deny claim and offer policy upgrade options".to_string(),
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

/// Full coverage rules against the stored policy
#[derive(Clone)]
pub struct PolicyCoverageStrategy {
    coverage: CoverageEngine,
    dispatch: DispatchEngine,
}

impl PolicyCoverageStrategy {
    pub const NAME: &'static str = "policy-coverage";

    pub fn new(coverage: CoverageEngine, dispatch: DispatchEngine) -> Self {
        Self { coverage, dispatch }
    }

    pub fn coverage_engine(&self) -> &CoverageEngine {
        &self.coverage
    }
}

impl DecisionStrategy for PolicyCoverageStrategy {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn assess(&self, claim: &ClaimData, at: DateTime<Utc>) -> Assessment {
        let coverage = self.coverage.decide_at(claim, at);
        let service = claim.service_type();

        let decision = match (coverage.is_approved, coverage.coverage_type) {
            (true, CoverageType::Full) => DecisionOutcome::Covered,
            (true, _) => DecisionOutcome::RequiresReview,
            (false, _) => DecisionOutcome::NotCovered,
        };

        let provider = self.dispatch.select_provider(service).map(|provider| {
            let eta = eta_minutes(provider.response_time_minutes, claim.urgency_level);
            ProviderSuggestion::from_provider(&provider, eta)
        });

        let mut factors = DecisionFactors::default();
        if coverage.policy.is_active() {
            factors.positive.push("Active policy".to_string());
        }
        match decision {
            DecisionOutcome::Covered => {
                factors.positive.extend(strings(&["Covered service type", "Within cost limits"]));
                if coverage.policy.has_no_deductible() {
                    factors.positive.push(NO_DEDUCTIBLE_FACTOR.to_string());
                }
                if provider.is_some() {
                    factors.positive.push("Service provider available".to_string());
                }
            }
            DecisionOutcome::RequiresReview => {
                factors.positive.push("Covered service type".to_string());
                factors.negative.push("Cost exceeds policy limit".to_string());
                factors.neutral.push("May require customer co-pay".to_string());
            }
            DecisionOutcome::NotCovered => {
                factors.negative.push(coverage.reason.clone());
            }
        }

        let estimated_cost = coverage
            .estimated_cost
            .unwrap_or_else(|| self.coverage.pricing().estimate(service, claim.urgency_level, at));

        Assessment {
            decision,
            confidence: coverage.confidence.min(MAX_CONFIDENCE),
            reasoning: coverage.reason.clone(),
            recommended_action: recommended_action(decision, provider.as_ref()),
            factors,
            provider,
            estimated_cost,
            coverage,
        }
    }
}

/// Flat plan-tier heuristic used by the agent dashboard
#[derive(Clone)]
pub struct PlanTierStrategy {
    providers: Arc<dyn ProviderDirectory>,
}

impl PlanTierStrategy {
    pub const NAME: &'static str = "plan-tier";

    pub fn new(providers: Arc<dyn ProviderDirectory>) -> Self {
        Self { providers }
    }
}

impl DecisionStrategy for PlanTierStrategy {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn assess(&self, claim: &ClaimData, at: DateTime<Utc>) -> Assessment {
        let tier = PlanTier::for_policy_number(claim.policy_number());
        let provider = self
            .providers
            .first_in_category(ProviderCategory::for_issue(claim.issue_type));

        let covered = tier.covers(claim.issue_type);
        let estimated_cost = provider
            .as_ref()
            .map(|p| p.base_cost)
            .unwrap_or_else(|| Money::usd(FALLBACK_COST));
        let within_limit = estimated_cost.amount() <= tier.max_cost.amount();
        let issue = claim.issue_type.label();

        let mut factors = DecisionFactors::default();
        let (decision, mut confidence, reasoning) = if covered && within_limit {
            factors
                .positive
                .extend(strings(&["Active policy", "Covered service type", "Within cost limits"]));
            if tier.has_no_deductible() {
                factors.positive.push(NO_DEDUCTIBLE_FACTOR.to_string());
            }
            if provider.is_some() {
                factors.positive.push("Service provider available".to_string());
            }
            (
                DecisionOutcome::Covered,
                dec!(0.92),
                format!(
                    "{issue} is covered under {} policy. Service provider available with reasonable cost.",
                    tier.name
                ),
            )
        } else if covered {
            factors.positive.extend(strings(&["Active policy", "Covered service type"]));
            factors.negative.push("Cost exceeds policy limit".to_string());
            factors.neutral.push("May require customer co-pay".to_string());
            (
                DecisionOutcome::RequiresReview,
                dec!(0.68),
                format!("{issue} is covered but estimated cost exceeds policy limit. Agent review required."),
            )
        } else {
            factors.positive.push("Active policy".to_string());
            factors.negative.push("Service not covered in current plan".to_string());
            factors.neutral.push("Policy upgrade available".to_string());
            (
                DecisionOutcome::NotCovered,
                dec!(0.88),
                format!("{issue} is not covered under {} policy. Consider policy upgrade.", tier.name),
            )
        };

        if claim.urgency_level == domain_policy::UrgencyLevel::Urgent {
            factors.positive.push("Emergency priority location".to_string());
            confidence += dec!(0.05);
        }
        let confidence = confidence.min(MAX_CONFIDENCE);

        let suggestion = provider
            .as_ref()
            .map(|p| ProviderSuggestion::from_provider(p, p.response_time_minutes));

        let service = claim.service_type();
        let coverage = CoverageDecision {
            is_approved: decision == DecisionOutcome::Covered,
            coverage_type: match decision {
                DecisionOutcome::Covered => CoverageType::Full,
                DecisionOutcome::RequiresReview => CoverageType::Partial,
                DecisionOutcome::NotCovered => CoverageType::None,
            },
            approved_services: if covered { vec![service] } else { Vec::new() },
            deductible: tier.deductible,
            max_coverage: tier.max_cost,
            estimated_cost: covered.then_some(estimated_cost),
            reason: reasoning.clone(),
            confidence,
            policy: tier.assumed_policy(claim.policy_number(), &claim.customer_name, at.date_naive()),
        };

        Assessment {
            decision,
            confidence,
            reasoning,
            recommended_action: recommended_action(decision, suggestion.as_ref()),
            factors,
            provider: suggestion,
            estimated_cost,
            coverage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use core_kernel::FixedClock;
    use domain_policy::{InMemoryPolicyRepository, IssueType, PricingRules, UrgencyLevel};
    use domain_provider::InMemoryProviderDirectory;

    use crate::claim_data::{Location, VehicleInfo};

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 4, 10, 0, 0).unwrap()
    }

    fn claim(policy: Option<&str>, issue: IssueType, urgency: UrgencyLevel) -> ClaimData {
        ClaimData {
            customer_name: "John Smith".to_string(),
            policy_number: policy.map(str::to_string),
            phone_number: Some("(555) 123-4567".to_string()),
            location: Location {
                address: "123 Main St".to_string(),
                city: "Springfield".to_string(),
                state: "IL".to_string(),
                zip_code: "62701".to_string(),
                coordinates: None,
            },
            vehicle_info: VehicleInfo {
                make: "Toyota".to_string(),
                model: "Camry".to_string(),
                year: 2020,
                color: None,
                license_plate: None,
            },
            issue_type: issue,
            issue_description: "Needs roadside service".to_string(),
            urgency_level: urgency,
        }
    }

    fn plan_tier() -> PlanTierStrategy {
        PlanTierStrategy::new(Arc::new(InMemoryProviderDirectory::dashboard_roster()))
    }

    fn policy_coverage() -> PolicyCoverageStrategy {
        let clock = Arc::new(FixedClock::at(at()));
        PolicyCoverageStrategy::new(
            CoverageEngine::new(
                Arc::new(InMemoryPolicyRepository::seeded()),
                PricingRules::default(),
                clock.clone(),
            ),
            DispatchEngine::new(
                Arc::new(InMemoryProviderDirectory::seeded()),
                PricingRules::default(),
                clock,
            ),
        )
    }

    #[test]
    fn test_plan_tier_premium_lockout_covered() {
        let assessment = plan_tier().assess(&claim(Some("PREMIUM-1234"), IssueType::Lockout, UrgencyLevel::Medium), at());

        assert_eq!(assessment.decision, DecisionOutcome::Covered);
        assert_eq!(assessment.confidence, dec!(0.92));
        assert_eq!(
            assessment.reasoning,
            "lockout is covered under Premium Roadside policy. Service provider available with reasonable cost."
        );
        assert!(assessment.factors.has_positive(NO_DEDUCTIBLE_FACTOR));
        assert_eq!(assessment.estimated_cost, Money::usd(dec!(75)));
        assert_eq!(assessment.recommended_action, "Dispatch FastKey Locksmith immediately");
        assert!(assessment.coverage.is_approved);
    }

    #[test]
    fn test_plan_tier_basic_flat_tire_needs_review() {
        // Flat tires go to the towing roster entry at $85, under the $100 cap
        let assessment = plan_tier().assess(&claim(None, IssueType::FlatTire, UrgencyLevel::Medium), at());
        assert_eq!(assessment.decision, DecisionOutcome::Covered);
        assert!(!assessment.factors.has_positive(NO_DEDUCTIBLE_FACTOR));
        assert_eq!(
            assessment.reasoning,
            "flat tire is covered under Basic Roadside policy. Service provider available with reasonable cost."
        );
    }

    #[test]
    fn test_plan_tier_not_covered_urgent() {
        let assessment = plan_tier().assess(&claim(None, IssueType::Towing, UrgencyLevel::Urgent), at());

        assert_eq!(assessment.decision, DecisionOutcome::NotCovered);
        assert_eq!(assessment.confidence, dec!(0.93));
        assert!(assessment.factors.has_positive("Emergency priority location"));
        assert_eq!(assessment.recommended_action, "Deny claim and offer policy upgrade options");
        assert!(!assessment.coverage.is_approved);
        assert_eq!(assessment.coverage.coverage_type, CoverageType::None);
    }

    #[test]
    fn test_plan_tier_confidence_is_capped() {
        let assessment = plan_tier().assess(
            &claim(Some("premium-plus-9"), IssueType::EngineTrouble, UrgencyLevel::Urgent),
            at(),
        );
        assert_eq!(assessment.decision, DecisionOutcome::Covered);
        assert_eq!(assessment.confidence, dec!(0.97));
        assert!(assessment.confidence <= MAX_CONFIDENCE);
    }

    #[test]
    fn test_plan_tier_requires_review_when_over_cap() {
        let roster = InMemoryProviderDirectory::new(
            InMemoryProviderDirectory::dashboard_roster()
                .providers()
                .into_iter()
                .map(|mut p| {
                    p.base_cost = Money::usd(dec!(150));
                    p
                })
                .collect(),
        );
        let strategy = PlanTierStrategy::new(Arc::new(roster));
        let assessment = strategy.assess(&claim(None, IssueType::DeadBattery, UrgencyLevel::Low), at());

        assert_eq!(assessment.decision, DecisionOutcome::RequiresReview);
        assert_eq!(assessment.confidence, dec!(0.68));
        assert_eq!(assessment.recommended_action, "Agent review required - cost analysis needed");
        assert_eq!(assessment.coverage.coverage_type, CoverageType::Partial);
    }

    #[test]
    fn test_policy_coverage_approved_is_covered() {
        let assessment = policy_coverage().assess(
            &claim(Some("POL-ABC123456"), IssueType::FlatTire, UrgencyLevel::Medium),
            at(),
        );

        assert_eq!(assessment.decision, DecisionOutcome::Covered);
        assert_eq!(assessment.confidence, dec!(0.95));
        assert_eq!(assessment.provider.as_ref().unwrap().id, "SP-003");
        assert_eq!(assessment.recommended_action, "Dispatch Auto Rescue Pro immediately");
        // John Smith carries a $25 deductible
        assert!(!assessment.factors.has_positive(NO_DEDUCTIBLE_FACTOR));
    }

    #[test]
    fn test_policy_coverage_denial_quotes_estimate() {
        let assessment = policy_coverage().assess(
            &claim(Some("POL-DEF456789"), IssueType::Lockout, UrgencyLevel::Medium),
            at(),
        );

        assert_eq!(assessment.decision, DecisionOutcome::NotCovered);
        assert_eq!(assessment.reasoning, "Service type 'lockout' not covered by policy");
        // 60 * 1.1
        assert_eq!(assessment.estimated_cost, Money::usd(dec!(66)));
        assert!(assessment.coverage.estimated_cost.is_none());
    }
}
