//! Service provider records

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use core_kernel::Money;
use domain_policy::{IssueType, ServiceType};

use crate::error::ProviderError;

/// Kind of business a provider is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProviderCategory {
    Towing,
    Mechanic,
    Locksmith,
    FuelDelivery,
    Roadside,
}

impl ProviderCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderCategory::Towing => "towing",
            ProviderCategory::Mechanic => "mechanic",
            ProviderCategory::Locksmith => "locksmith",
            ProviderCategory::FuelDelivery => "fuel-delivery",
            ProviderCategory::Roadside => "roadside",
        }
    }

    /// Whether this provider runs tow trucks rather than roadside vans
    pub fn is_towing(&self) -> bool {
        matches!(self, ProviderCategory::Towing)
    }

    /// True when this category is the natural fit for `service`:
    /// tow operators for towing, general roadside crews for everything else
    pub fn specializes_in(&self, service: ServiceType) -> bool {
        match self {
            ProviderCategory::Towing => service.is_towing(),
            ProviderCategory::Roadside => !service.is_towing(),
            _ => false,
        }
    }

    /// Category the dashboard sends for a reported issue
    pub fn for_issue(issue: IssueType) -> Self {
        match issue {
            IssueType::Towing | IssueType::Accident => ProviderCategory::Towing,
            IssueType::DeadBattery | IssueType::EngineTrouble => ProviderCategory::Mechanic,
            IssueType::Lockout => ProviderCategory::Locksmith,
            IssueType::FuelDelivery => ProviderCategory::FuelDelivery,
            IssueType::FlatTire | IssueType::Other => ProviderCategory::Towing,
        }
    }
}

impl fmt::Display for ProviderCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderCategory {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "towing" => Ok(ProviderCategory::Towing),
            "mechanic" => Ok(ProviderCategory::Mechanic),
            "locksmith" => Ok(ProviderCategory::Locksmith),
            "fuel-delivery" => Ok(ProviderCategory::FuelDelivery),
            "roadside" => Ok(ProviderCategory::Roadside),
            other => Err(ProviderError::UnknownCategory(other.to_string())),
        }
    }
}

/// A provider that can be dispatched to a roadside claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceProvider {
    pub id: String,
    pub name: String,
    pub category: ProviderCategory,
    pub phone: String,
    /// Customer rating on a 0-5 scale
    pub rating: Decimal,
    /// Typical minutes from dispatch to arrival
    pub response_time_minutes: u32,
    /// Display only; not used for selection
    pub distance_miles: Decimal,
    pub base_cost: Money,
    pub services: BTreeSet<ServiceType>,
}

impl ServiceProvider {
    pub fn supports(&self, service: ServiceType) -> bool {
        self.services.contains(&service)
    }
}
