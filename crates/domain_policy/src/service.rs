//! Roadside service catalog
//!
//! Customers describe an *issue*; policies and providers deal in *services*.
//! This module owns the vocabulary on both sides and the static mapping
//! between them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PolicyError;

/// Canonical roadside service category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceType {
    Towing,
    TireChange,
    BatteryJump,
    Lockout,
    FuelDelivery,
    RoadsideRepair,
}

impl ServiceType {
    pub const ALL: [ServiceType; 6] = [
        ServiceType::Towing,
        ServiceType::TireChange,
        ServiceType::BatteryJump,
        ServiceType::Lockout,
        ServiceType::FuelDelivery,
        ServiceType::RoadsideRepair,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::Towing => "towing",
            ServiceType::TireChange => "tire-change",
            ServiceType::BatteryJump => "battery-jump",
            ServiceType::Lockout => "lockout",
            ServiceType::FuelDelivery => "fuel-delivery",
            ServiceType::RoadsideRepair => "roadside-repair",
        }
    }

    /// Parses a canonical id or one of the legacy camelCase aliases
    ///
    /// Returns `None` for anything that is not a service name, which lets
    /// callers check arbitrary issue text against a policy's covered set.
    pub fn from_alias(value: &str) -> Option<Self> {
        match value {
            "towing" => Some(ServiceType::Towing),
            "tire-change" | "tireChange" => Some(ServiceType::TireChange),
            "battery-jump" | "batteryJump" => Some(ServiceType::BatteryJump),
            "lockout" => Some(ServiceType::Lockout),
            "fuel-delivery" | "fuelDelivery" => Some(ServiceType::FuelDelivery),
            "roadside-repair" | "roadsideRepair" => Some(ServiceType::RoadsideRepair),
            _ => None,
        }
    }

    pub fn is_towing(&self) -> bool {
        matches!(self, ServiceType::Towing)
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceType {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_alias(s).ok_or_else(|| PolicyError::UnknownServiceType(s.to_string()))
    }
}

/// The problem a customer reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueType {
    FlatTire,
    DeadBattery,
    Lockout,
    Towing,
    FuelDelivery,
    EngineTrouble,
    Accident,
    Other,
}

impl IssueType {
    pub const ALL: [IssueType; 8] = [
        IssueType::FlatTire,
        IssueType::DeadBattery,
        IssueType::Lockout,
        IssueType::Towing,
        IssueType::FuelDelivery,
        IssueType::EngineTrouble,
        IssueType::Accident,
        IssueType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IssueType::FlatTire => "flat-tire",
            IssueType::DeadBattery => "dead-battery",
            IssueType::Lockout => "lockout",
            IssueType::Towing => "towing",
            IssueType::FuelDelivery => "fuel-delivery",
            IssueType::EngineTrouble => "engine-trouble",
            IssueType::Accident => "accident",
            IssueType::Other => "other",
        }
    }

    /// Service dispatched for this issue; anything unrecognised is a roadside repair
    pub fn service_type(&self) -> ServiceType {
        match self {
            IssueType::FlatTire => ServiceType::TireChange,
            IssueType::DeadBattery => ServiceType::BatteryJump,
            IssueType::Lockout => ServiceType::Lockout,
            IssueType::Towing => ServiceType::Towing,
            IssueType::FuelDelivery => ServiceType::FuelDelivery,
            IssueType::EngineTrouble | IssueType::Accident | IssueType::Other => {
                ServiceType::RoadsideRepair
            }
        }
    }

    /// Human wording used in agent-facing reasoning, e.g. "flat tire"
    pub fn label(&self) -> String {
        self.as_str().replacen('-', " ", 1)
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IssueType {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IssueType::ALL
            .into_iter()
            .find(|issue| issue.as_str() == s)
            .ok_or_else(|| PolicyError::UnknownIssueType(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_to_service_mapping() {
        assert_eq!(IssueType::FlatTire.service_type(), ServiceType::TireChange);
        assert_eq!(IssueType::DeadBattery.service_type(), ServiceType::BatteryJump);
        assert_eq!(IssueType::Lockout.service_type(), ServiceType::Lockout);
        assert_eq!(IssueType::Towing.service_type(), ServiceType::Towing);
        assert_eq!(IssueType::FuelDelivery.service_type(), ServiceType::FuelDelivery);
        assert_eq!(IssueType::EngineTrouble.service_type(), ServiceType::RoadsideRepair);
        assert_eq!(IssueType::Accident.service_type(), ServiceType::RoadsideRepair);
        assert_eq!(IssueType::Other.service_type(), ServiceType::RoadsideRepair);
    }

    #[test]
    fn test_service_aliases() {
        assert_eq!(ServiceType::from_alias("batteryJump"), Some(ServiceType::BatteryJump));
        assert_eq!(ServiceType::from_alias("battery-jump"), Some(ServiceType::BatteryJump));
        assert_eq!(ServiceType::from_alias("flat-tire"), None);
        assert!("winch".parse::<ServiceType>().is_err());
    }

    #[test]
    fn test_issue_serde_uses_kebab_case() {
        let json = serde_json::to_string(&IssueType::EngineTrouble).unwrap();
        assert_eq!(json, "\"engine-trouble\"");
        assert_eq!("fuel-delivery".parse::<IssueType>().unwrap(), IssueType::FuelDelivery);
    }

    #[test]
    fn test_issue_label() {
        assert_eq!(IssueType::FlatTire.label(), "flat tire");
        assert_eq!(IssueType::Other.label(), "other");
    }
}
