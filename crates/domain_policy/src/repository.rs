//! Policy repository
//!
//! Lookup of policies by number or customer name and the single mutation the
//! claim engine performs: bumping a usage counter when a claim is approved.

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::RwLock;
use tracing::{debug, info, warn};

use core_kernel::Money;

use crate::error::PolicyError;
use crate::policy::{PlanType, PolicyRecord, PolicyStatus, RoadsideBenefit};
use crate::service::ServiceType;

/// Canonical prefix carried by issued policy numbers
pub const POLICY_NUMBER_PREFIX: &str = "POL-";

/// Read and usage-tracking access to policies
pub trait PolicyRepository: Send + Sync {
    /// Finds a policy by number; case-insensitive, `POL-` prefix optional
    fn find_by_number(&self, policy_number: &str) -> Option<PolicyRecord>;

    /// Finds a policy by exact customer name, ignoring case
    fn find_by_customer_name(&self, customer_name: &str) -> Option<PolicyRecord>;

    /// Increments the monthly usage counter, returning the new count
    ///
    /// The limit is checked again under the same write, so concurrent
    /// claims can never push usage past it.
    fn record_usage(&self, policy_number: &str, service: ServiceType) -> Result<u32, PolicyError>;

    fn list(&self) -> Vec<PolicyRecord>;
}

/// Normalizes a policy number to the stored key form
pub fn normalize_policy_number(policy_number: &str) -> String {
    let upper = policy_number.trim().to_uppercase();
    if upper.starts_with(POLICY_NUMBER_PREFIX) {
        upper
    } else {
        format!("{POLICY_NUMBER_PREFIX}{upper}")
    }
}

/// Process-local policy store seeded at start
#[derive(Debug, Default)]
pub struct InMemoryPolicyRepository {
    policies: RwLock<BTreeMap<String, PolicyRecord>>,
}

impl InMemoryPolicyRepository {
    pub fn new(policies: impl IntoIterator<Item = PolicyRecord>) -> Self {
        let policies = policies
            .into_iter()
            .map(|policy| (normalize_policy_number(&policy.policy_number), policy))
            .collect();
        Self {
            policies: RwLock::new(policies),
        }
    }

    /// Repository holding the reference policies
    pub fn seeded() -> Self {
        Self::new(seed_policies())
    }

    pub fn insert(&self, policy: PolicyRecord) {
        if let Ok(mut policies) = self.policies.write() {
            policies.insert(normalize_policy_number(&policy.policy_number), policy);
        }
    }

    pub fn len(&self) -> usize {
        self.policies.read().map(|p| p.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PolicyRepository for InMemoryPolicyRepository {
    fn find_by_number(&self, policy_number: &str) -> Option<PolicyRecord> {
        let key = normalize_policy_number(policy_number);
        let found = self.policies.read().ok()?.get(&key).cloned();
        debug!(policy_number = %key, found = found.is_some(), "Policy lookup by number");
        found
    }

    fn find_by_customer_name(&self, customer_name: &str) -> Option<PolicyRecord> {
        let wanted = customer_name.trim().to_lowercase();
        let policies = self.policies.read().ok()?;
        let found = policies
            .values()
            .find(|policy| policy.customer_name.to_lowercase() == wanted)
            .cloned();
        debug!(found = found.is_some(), "Policy lookup by customer name");
        found
    }

    fn record_usage(&self, policy_number: &str, service: ServiceType) -> Result<u32, PolicyError> {
        let key = normalize_policy_number(policy_number);
        let mut policies = self
            .policies
            .write()
            .map_err(|_| PolicyError::StoreUnavailable)?;
        let policy = policies
            .get_mut(&key)
            .ok_or_else(|| PolicyError::PolicyNotFound(key.clone()))?;

        if policy.roadside.limit_reached(service) {
            warn!(policy_number = %key, service = %service, "Monthly limit reached before usage was recorded");
            return Err(PolicyError::LimitReached {
                policy_number: key,
                service,
            });
        }

        let used = policy.roadside.record_use(service);
        info!(policy_number = %key, service = %service, used, "Recorded roadside usage");
        Ok(used)
    }

    fn list(&self) -> Vec<PolicyRecord> {
        self.policies
            .read()
            .map(|policies| policies.values().cloned().collect())
            .unwrap_or_default()
    }
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn benefit(
    max_tow_distance_miles: u32,
    limits: &[(ServiceType, u32)],
    usage: &[(ServiceType, u32)],
) -> RoadsideBenefit {
    RoadsideBenefit {
        included: true,
        max_tow_distance_miles,
        covered_services: limits.iter().map(|(service, _)| *service).collect::<BTreeSet<_>>(),
        monthly_limits: limits.iter().copied().collect(),
        usage_this_month: usage.iter().copied().collect(),
    }
}

/// Reference policies loaded at process start
///
/// Every covered service carries a monthly limit, so a service outside the
/// covered set is reported as "not covered" rather than as a limit problem.
pub fn seed_policies() -> Vec<PolicyRecord> {
    use ServiceType::*;

    vec![
        PolicyRecord {
            policy_number: "POL-ABC123456".to_string(),
            customer_name: "John Smith".to_string(),
            phone: Some("(555) 123-4567".to_string()),
            email: Some("john.smith@email.com".to_string()),
            plan: PlanType::PremiumPlus,
            status: PolicyStatus::Active,
            effective_date: date(2026, 1, 1),
            expiration_date: date(2026, 12, 31),
            deductible: Money::usd(dec!(25)),
            coverage_limit: Money::usd(dec!(200)),
            roadside: benefit(
                100,
                &[
                    (Towing, 2),
                    (TireChange, 3),
                    (BatteryJump, 4),
                    (Lockout, 3),
                    (FuelDelivery, 2),
                    (RoadsideRepair, 2),
                ],
                &[(BatteryJump, 1)],
            ),
        },
        PolicyRecord {
            policy_number: "POL-XYZ789012".to_string(),
            customer_name: "Sarah Johnson".to_string(),
            phone: Some("(555) 987-6543".to_string()),
            email: Some("sarah.johnson@email.com".to_string()),
            plan: PlanType::Premium,
            status: PolicyStatus::Active,
            effective_date: date(2026, 1, 1),
            expiration_date: date(2026, 12, 31),
            deductible: Money::usd(dec!(50)),
            coverage_limit: Money::usd(dec!(150)),
            roadside: benefit(
                50,
                &[
                    (Towing, 1),
                    (TireChange, 2),
                    (BatteryJump, 3),
                    (Lockout, 2),
                    (FuelDelivery, 1),
                ],
                &[(BatteryJump, 3), (Lockout, 1)],
            ),
        },
        PolicyRecord {
            policy_number: "POL-DEF456789".to_string(),
            customer_name: "Mike Davis".to_string(),
            phone: Some("(555) 456-7890".to_string()),
            email: Some("mike.davis@email.com".to_string()),
            plan: PlanType::Basic,
            status: PolicyStatus::Active,
            effective_date: date(2026, 1, 1),
            expiration_date: date(2026, 12, 31),
            deductible: Money::usd(dec!(75)),
            coverage_limit: Money::usd(dec!(100)),
            roadside: benefit(
                25,
                &[(Towing, 1), (TireChange, 1), (BatteryJump, 2)],
                &[(Towing, 1)],
            ),
        },
        PolicyRecord {
            policy_number: "POL-GHI321654".to_string(),
            customer_name: "Emily Chen".to_string(),
            phone: Some("(555) 321-6540".to_string()),
            email: Some("emily.chen@email.com".to_string()),
            plan: PlanType::Premium,
            status: PolicyStatus::Suspended,
            effective_date: date(2026, 1, 1),
            expiration_date: date(2026, 12, 31),
            deductible: Money::usd(dec!(50)),
            coverage_limit: Money::usd(dec!(150)),
            roadside: benefit(50, &[(Towing, 1), (TireChange, 2), (BatteryJump, 3)], &[]),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_policy_number() {
        assert_eq!(normalize_policy_number("abc123456"), "POL-ABC123456");
        assert_eq!(normalize_policy_number(" pol-abc123456 "), "POL-ABC123456");
    }

    #[test]
    fn test_find_by_number_with_and_without_prefix() {
        let repo = InMemoryPolicyRepository::seeded();
        assert!(repo.find_by_number("POL-ABC123456").is_some());
        assert!(repo.find_by_number("ABC123456").is_some());
        assert!(repo.find_by_number("NOPE00000").is_none());
    }

    #[test]
    fn test_find_by_customer_name_ignores_case() {
        let repo = InMemoryPolicyRepository::seeded();
        let policy = repo.find_by_customer_name("sarah JOHNSON").unwrap();
        assert_eq!(policy.policy_number, "POL-XYZ789012");
        assert!(repo.find_by_customer_name("Sarah").is_none());
    }

    #[test]
    fn test_record_usage_increments() {
        let repo = InMemoryPolicyRepository::seeded();
        assert_eq!(repo.record_usage("ABC123456", ServiceType::BatteryJump).unwrap(), 2);
        assert_eq!(
            repo.find_by_number("POL-ABC123456").unwrap().roadside.usage(ServiceType::BatteryJump),
            2
        );
    }

    #[test]
    fn test_record_usage_refuses_past_the_limit() {
        let repo = InMemoryPolicyRepository::seeded();
        assert_eq!(repo.record_usage("XYZ789012", ServiceType::Towing).unwrap(), 1);

        let err = repo.record_usage("XYZ789012", ServiceType::Towing).unwrap_err();

        assert!(matches!(err, PolicyError::LimitReached { service: ServiceType::Towing, .. }));
        assert_eq!(
            repo.find_by_number("POL-XYZ789012").unwrap().roadside.usage(ServiceType::Towing),
            1
        );
    }

    #[test]
    fn test_record_usage_unknown_policy() {
        let repo = InMemoryPolicyRepository::seeded();
        let err = repo.record_usage("POL-MISSING1", ServiceType::Towing).unwrap_err();
        assert!(matches!(err, PolicyError::PolicyNotFound(_)));
    }

    #[test]
    fn test_seed_shape() {
        let repo = InMemoryPolicyRepository::seeded();
        assert_eq!(repo.len(), 4);

        let basic = repo.find_by_number("POL-DEF456789").unwrap();
        assert!(!basic.roadside.covers(ServiceType::Lockout));
        assert_eq!(basic.roadside.monthly_limit(ServiceType::Lockout), None);
    }
}
