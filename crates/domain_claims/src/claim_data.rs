//! Intake payload for a roadside claim

use serde::{Deserialize, Serialize};

use domain_policy::{IssueType, ServiceType, UrgencyLevel};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Where the vehicle is
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleInfo {
    pub make: String,
    pub model: String,
    pub year: i32,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub license_plate: Option<String>,
}

impl VehicleInfo {
    /// e.g. "2020 Toyota Camry"
    pub fn describe(&self) -> String {
        format!("{} {} {}", self.year, self.make, self.model)
    }
}

/// A validated claim as the decision engine sees it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimData {
    pub customer_name: String,
    #[serde(default)]
    pub policy_number: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    pub location: Location,
    pub vehicle_info: VehicleInfo,
    pub issue_type: IssueType,
    pub issue_description: String,
    #[serde(default)]
    pub urgency_level: UrgencyLevel,
}

impl ClaimData {
    /// Service the reported issue maps to
    pub fn service_type(&self) -> ServiceType {
        self.issue_type.service_type()
    }

    /// Policy number, ignoring blank input
    pub fn policy_number(&self) -> Option<&str> {
        non_blank(self.policy_number.as_deref())
    }

    /// Phone number, ignoring blank input
    pub fn phone_number(&self) -> Option<&str> {
        non_blank(self.phone_number.as_deref())
    }

    pub fn completeness(&self) -> CompletenessView<'_> {
        CompletenessView {
            customer_name: Some(&self.customer_name),
            address: Some(&self.location.address),
            city: Some(&self.location.city),
            make: Some(&self.vehicle_info.make),
            model: Some(&self.vehicle_info.model),
            issue_type: Some(self.issue_type.as_str()),
            issue_description: Some(&self.issue_description),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.completeness().is_complete()
    }
}

/// The fields that decide whether a claim has enough detail to submit
///
/// Shared by fully-typed claims and partially collected intake data so that
/// both sides answer "is this complete?" the same way.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompletenessView<'a> {
    pub customer_name: Option<&'a str>,
    pub address: Option<&'a str>,
    pub city: Option<&'a str>,
    pub make: Option<&'a str>,
    pub model: Option<&'a str>,
    pub issue_type: Option<&'a str>,
    pub issue_description: Option<&'a str>,
}

impl CompletenessView<'_> {
    /// True iff every required field is present and not blank
    pub fn is_complete(&self) -> bool {
        [
            self.customer_name,
            self.address,
            self.city,
            self.make,
            self.model,
            self.issue_type,
            self.issue_description,
        ]
        .into_iter()
        .all(|field| non_blank(field).is_some())
    }
}

pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
