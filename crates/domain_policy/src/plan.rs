//! Plan tier terms used by the dashboard heuristic
//!
//! The dashboard does not consult the policy repository. It infers a tier
//! from the policy number text and applies flat tier terms instead.

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use core_kernel::Money;

use crate::policy::{PlanType, PolicyRecord, PolicyStatus, RoadsideBenefit, UNKNOWN_POLICY_NUMBER};
use crate::service::IssueType;

/// Flat terms for one plan tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanTier {
    pub plan: PlanType,
    pub name: String,
    pub covered_issues: Vec<IssueType>,
    pub monthly_limit: u32,
    pub deductible: Money,
    pub max_cost: Money,
}

impl PlanTier {
    pub fn basic() -> Self {
        Self {
            plan: PlanType::Basic,
            name: "Basic Roadside".to_string(),
            covered_issues: vec![IssueType::DeadBattery, IssueType::FlatTire],
            monthly_limit: 2,
            deductible: Money::usd(dec!(25)),
            max_cost: Money::usd(dec!(100)),
        }
    }

    pub fn premium() -> Self {
        Self {
            plan: PlanType::Premium,
            name: "Premium Roadside".to_string(),
            covered_issues: vec![
                IssueType::DeadBattery,
                IssueType::FlatTire,
                IssueType::Lockout,
                IssueType::FuelDelivery,
                IssueType::Towing,
            ],
            monthly_limit: 4,
            deductible: Money::usd(dec!(0)),
            max_cost: Money::usd(dec!(200)),
        }
    }

    pub fn premium_plus() -> Self {
        Self {
            plan: PlanType::PremiumPlus,
            name: "Premium Plus".to_string(),
            covered_issues: vec![
                IssueType::DeadBattery,
                IssueType::FlatTire,
                IssueType::Lockout,
                IssueType::FuelDelivery,
                IssueType::Towing,
                IssueType::EngineTrouble,
            ],
            monthly_limit: 6,
            deductible: Money::usd(dec!(0)),
            max_cost: Money::usd(dec!(300)),
        }
    }

    /// Infers the tier from free-form policy number text
    ///
    /// "premium" and "plus" anywhere (case-insensitive) selects Premium Plus,
    /// "premium" alone selects Premium, anything else (or no number) is Basic.
    pub fn for_policy_number(policy_number: Option<&str>) -> Self {
        let text = policy_number.unwrap_or_default().to_lowercase();
        if text.contains("premium") {
            if text.contains("plus") {
                Self::premium_plus()
            } else {
                Self::premium()
            }
        } else {
            Self::basic()
        }
    }

    pub fn covers(&self, issue: IssueType) -> bool {
        self.covered_issues.contains(&issue)
    }

    pub fn has_no_deductible(&self) -> bool {
        self.deductible.is_zero()
    }

    /// Policy record implied by the tier terms
    ///
    /// The dashboard never reads the repository, so decisions made on that
    /// path carry this projection instead of a stored policy.
    pub fn assumed_policy(
        &self,
        policy_number: Option<&str>,
        customer_name: &str,
        on: NaiveDate,
    ) -> PolicyRecord {
        let covered_services: BTreeSet<_> = self
            .covered_issues
            .iter()
            .map(|issue| issue.service_type())
            .collect();

        PolicyRecord {
            policy_number: policy_number
                .filter(|number| !number.trim().is_empty())
                .unwrap_or(UNKNOWN_POLICY_NUMBER)
                .to_string(),
            customer_name: customer_name.to_string(),
            phone: None,
            email: None,
            plan: self.plan,
            status: PolicyStatus::Active,
            effective_date: on,
            expiration_date: on,
            deductible: self.deductible,
            coverage_limit: self.max_cost,
            roadside: RoadsideBenefit {
                included: true,
                max_tow_distance_miles: 0,
                monthly_limits: covered_services
                    .iter()
                    .map(|service| (*service, self.monthly_limit))
                    .collect::<BTreeMap<_, _>>(),
                covered_services,
                usage_this_month: BTreeMap::new(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_inference() {
        assert_eq!(PlanTier::for_policy_number(Some("PREMIUM-PLUS-42")).plan, PlanType::PremiumPlus);
        assert_eq!(PlanTier::for_policy_number(Some("premium123")).plan, PlanType::Premium);
        assert_eq!(PlanTier::for_policy_number(Some("POL-ABC123456")).plan, PlanType::Basic);
        assert_eq!(PlanTier::for_policy_number(None).plan, PlanType::Basic);
    }

    #[test]
    fn test_tier_coverage() {
        assert!(PlanTier::basic().covers(IssueType::FlatTire));
        assert!(!PlanTier::basic().covers(IssueType::Lockout));
        assert!(PlanTier::premium().covers(IssueType::Towing));
        assert!(!PlanTier::premium().covers(IssueType::EngineTrouble));
        assert!(PlanTier::premium_plus().covers(IssueType::EngineTrouble));
        assert!(!PlanTier::premium_plus().covers(IssueType::Accident));
    }

    #[test]
    fn test_assumed_policy_mirrors_tier() {
        let on = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let policy = PlanTier::basic().assumed_policy(Some("BASIC-001"), "Mike Davis", on);

        assert_eq!(policy.policy_number, "BASIC-001");
        assert_eq!(policy.plan, PlanType::Basic);
        assert!(policy.is_active());
        assert!(policy.roadside.covers(crate::ServiceType::TireChange));
        assert_eq!(policy.roadside.monthly_limit(crate::ServiceType::BatteryJump), Some(2));
        assert!(!policy.roadside.covers(crate::ServiceType::Lockout));

        let anonymous = PlanTier::premium().assumed_policy(None, "Jane Doe", on);
        assert!(anonymous.is_unknown());
    }

    #[test]
    fn test_deductibles() {
        assert!(!PlanTier::basic().has_no_deductible());
        assert!(PlanTier::premium().has_no_deductible());
    }
}
