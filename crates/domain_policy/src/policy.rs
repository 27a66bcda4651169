//! Policy records and the roadside benefit they carry

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use core_kernel::{Currency, Money};

use crate::service::ServiceType;

/// Policy number used for the placeholder returned when no policy matches
pub const UNKNOWN_POLICY_NUMBER: &str = "UNKNOWN";

/// Policy status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyStatus {
    Active,
    Inactive,
    Suspended,
}

impl PolicyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyStatus::Active => "active",
            PolicyStatus::Inactive => "inactive",
            PolicyStatus::Suspended => "suspended",
        }
    }
}

impl fmt::Display for PolicyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Marketed plan level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlanType {
    Basic,
    Premium,
    #[serde(rename = "Premium Plus")]
    PremiumPlus,
}

impl PlanType {
    pub fn display_name(&self) -> &'static str {
        match self {
            PlanType::Basic => "Basic",
            PlanType::Premium => "Premium",
            PlanType::PremiumPlus => "Premium Plus",
        }
    }
}

/// Roadside assistance terms of a policy
///
/// Usage counters are compared against limits at decision time only;
/// nothing here rejects an increment past the limit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadsideBenefit {
    pub included: bool,
    pub max_tow_distance_miles: u32,
    pub covered_services: BTreeSet<ServiceType>,
    pub monthly_limits: BTreeMap<ServiceType, u32>,
    pub usage_this_month: BTreeMap<ServiceType, u32>,
}

impl RoadsideBenefit {
    /// A benefit that covers nothing
    pub fn excluded() -> Self {
        Self {
            included: false,
            max_tow_distance_miles: 0,
            covered_services: BTreeSet::new(),
            monthly_limits: BTreeMap::new(),
            usage_this_month: BTreeMap::new(),
        }
    }

    pub fn covers(&self, service: ServiceType) -> bool {
        self.covered_services.contains(&service)
    }

    pub fn monthly_limit(&self, service: ServiceType) -> Option<u32> {
        self.monthly_limits.get(&service).copied()
    }

    pub fn usage(&self, service: ServiceType) -> u32 {
        self.usage_this_month.get(&service).copied().unwrap_or(0)
    }

    /// True when the service has a limit and usage has reached it
    pub fn limit_reached(&self, service: ServiceType) -> bool {
        self.monthly_limit(service)
            .is_some_and(|limit| self.usage(service) >= limit)
    }

    /// Records one more use of `service`, returning the new count
    pub fn record_use(&mut self, service: ServiceType) -> u32 {
        let used = self.usage_this_month.entry(service).or_insert(0);
        *used += 1;
        *used
    }
}

/// A customer's policy as seen by the roadside claim engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyRecord {
    pub policy_number: String,
    pub customer_name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub plan: PlanType,
    pub status: PolicyStatus,
    pub effective_date: NaiveDate,
    pub expiration_date: NaiveDate,
    pub deductible: Money,
    pub coverage_limit: Money,
    pub roadside: RoadsideBenefit,
}

impl PolicyRecord {
    /// Placeholder used when neither policy number nor name resolves
    pub fn unknown(customer_name: impl Into<String>, on: NaiveDate) -> Self {
        Self {
            policy_number: UNKNOWN_POLICY_NUMBER.to_string(),
            customer_name: customer_name.into(),
            phone: None,
            email: None,
            plan: PlanType::Basic,
            status: PolicyStatus::Inactive,
            effective_date: on,
            expiration_date: on,
            deductible: Money::zero(Currency::USD),
            coverage_limit: Money::zero(Currency::USD),
            roadside: RoadsideBenefit::excluded(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == PolicyStatus::Active
    }

    pub fn is_unknown(&self) -> bool {
        self.policy_number == UNKNOWN_POLICY_NUMBER
    }

    pub fn has_no_deductible(&self) -> bool {
        self.deductible.amount() == dec!(0)
    }
}
