//! Submission validation
//!
//! Rules run in a fixed order and the first failure is reported. The raw
//! submission keeps every field optional and untyped so that each rule can
//! report its own message instead of a generic deserialization error.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use domain_policy::{IssueType, UrgencyLevel};

use crate::claim_data::{non_blank, ClaimData, Coordinates, Location, VehicleInfo};

const EARLIEST_VEHICLE_YEAR: i32 = 1990;

static PHONE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[\d\s\-\(\)\.]{10,}$").expect("valid pattern"));
static POLICY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?i:POL-)?[A-Za-z0-9]{6,}$").expect("valid pattern"));
static STATE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z]{2}$").expect("valid pattern"));
static ZIP_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{5}(-\d{4})?$").expect("valid pattern"));
static PLATE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^[A-Z0-9\s\-]{2,10}$").expect("valid pattern"));

/// First rule a submission failed
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize)]
#[error("{message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: &str) -> Self {
        Self {
            field,
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationSubmission {
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub coordinates: Option<Coordinates>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VehicleSubmission {
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub color: Option<String>,
    pub license_plate: Option<String>,
}

/// Claim as received from a caller, before any rule has run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClaimSubmission {
    pub customer_name: Option<String>,
    pub policy_number: Option<String>,
    pub phone_number: Option<String>,
    pub location: Option<LocationSubmission>,
    pub vehicle_info: Option<VehicleSubmission>,
    pub issue_type: Option<String>,
    pub issue_description: Option<String>,
    pub urgency_level: Option<String>,
}

impl From<ClaimData> for ClaimSubmission {
    fn from(claim: ClaimData) -> Self {
        Self {
            customer_name: Some(claim.customer_name),
            policy_number: claim.policy_number,
            phone_number: claim.phone_number,
            location: Some(LocationSubmission {
                address: Some(claim.location.address),
                city: Some(claim.location.city),
                state: Some(claim.location.state),
                zip_code: Some(claim.location.zip_code),
                coordinates: claim.location.coordinates,
            }),
            vehicle_info: Some(VehicleSubmission {
                make: Some(claim.vehicle_info.make),
                model: Some(claim.vehicle_info.model),
                year: Some(claim.vehicle_info.year),
                color: claim.vehicle_info.color,
                license_plate: claim.vehicle_info.license_plate,
            }),
            issue_type: Some(claim.issue_type.as_str().to_string()),
            issue_description: Some(claim.issue_description),
            urgency_level: Some(claim.urgency_level.as_str().to_string()),
        }
    }
}

fn trimmed_len(value: Option<&str>) -> usize {
    value.map(|v| v.trim().chars().count()).unwrap_or(0)
}

fn require_len(
    value: Option<&str>,
    min: usize,
    field: &'static str,
    message: &str,
) -> Result<(), ValidationError> {
    if trimmed_len(value) < min {
        return Err(ValidationError::new(field, message));
    }
    Ok(())
}

fn owned(value: Option<&str>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

impl ClaimSubmission {
    /// Runs every rule in order and builds the typed claim
    ///
    /// `current_year` bounds the vehicle model year (one model year ahead is
    /// accepted).
    pub fn validate(&self, current_year: i32) -> Result<ClaimData, ValidationError> {
        let location = self.location.clone().unwrap_or_default();
        let vehicle = self.vehicle_info.clone().unwrap_or_default();

        require_len(
            self.customer_name.as_deref(),
            2,
            "customer_name",
            "Customer name is required and must be at least 2 characters",
        )?;
        require_len(location.address.as_deref(), 5, "location.address", "Complete address is required")?;
        require_len(location.city.as_deref(), 2, "location.city", "City is required")?;

        let state_ok = location
            .state
            .as_deref()
            .is_some_and(|state| STATE_PATTERN.is_match(state));
        if !state_ok {
            return Err(ValidationError::new(
                "location.state",
                "Valid 2-character state code is required",
            ));
        }

        require_len(vehicle.make.as_deref(), 2, "vehicle_info.make", "Vehicle make is required")?;
        require_len(vehicle.model.as_deref(), 1, "vehicle_info.model", "Vehicle model is required")?;

        let year = match vehicle.year {
            Some(year) if (EARLIEST_VEHICLE_YEAR..=current_year + 1).contains(&year) => year,
            _ => {
                return Err(ValidationError::new(
                    "vehicle_info.year",
                    "Valid vehicle year is required",
                ))
            }
        };

        let raw_issue = non_blank(self.issue_type.as_deref())
            .ok_or_else(|| ValidationError::new("issue_type", "Issue type is required"))?;

        require_len(
            self.issue_description.as_deref(),
            10,
            "issue_description",
            "Detailed issue description is required (at least 10 characters)",
        )?;

        let phone = non_blank(self.phone_number.as_deref());
        if let Some(phone) = phone {
            if !PHONE_PATTERN.is_match(phone) {
                return Err(ValidationError::new("phone_number", "Phone number format is invalid"));
            }
        }

        let policy_number = non_blank(self.policy_number.as_deref());
        if let Some(policy_number) = policy_number {
            if !POLICY_PATTERN.is_match(policy_number) {
                return Err(ValidationError::new(
                    "policy_number",
                    "Policy number format is invalid",
                ));
            }
        }

        let zip = non_blank(location.zip_code.as_deref())
            .ok_or_else(|| ValidationError::new("location.zip_code", "ZIP code is required"))?;
        if !ZIP_PATTERN.is_match(zip) {
            return Err(ValidationError::new("location.zip_code", "ZIP code format is invalid"));
        }

        let plate = non_blank(vehicle.license_plate.as_deref());
        if let Some(plate) = plate {
            if !PLATE_PATTERN.is_match(plate) {
                return Err(ValidationError::new(
                    "vehicle_info.license_plate",
                    "License plate format is invalid",
                ));
            }
        }

        let issue_type: IssueType = raw_issue
            .parse()
            .map_err(|_| ValidationError::new("issue_type", "Invalid issue type specified"))?;

        let urgency_level = match non_blank(self.urgency_level.as_deref()) {
            Some(level) => level.parse::<UrgencyLevel>().map_err(|_| {
                ValidationError::new("urgency_level", "Invalid urgency level specified")
            })?,
            None => UrgencyLevel::default(),
        };

        if urgency_level == UrgencyLevel::Urgent && phone.is_none() {
            return Err(ValidationError::new(
                "phone_number",
                "Phone number is required for urgent claims",
            ));
        }

        Ok(ClaimData {
            customer_name: owned(self.customer_name.as_deref()),
            policy_number: policy_number.map(str::to_string),
            phone_number: phone.map(str::to_string),
            location: Location {
                address: owned(location.address.as_deref()),
                city: owned(location.city.as_deref()),
                state: owned(location.state.as_deref()).to_uppercase(),
                zip_code: zip.to_string(),
                coordinates: location.coordinates,
            },
            vehicle_info: VehicleInfo {
                make: owned(vehicle.make.as_deref()),
                model: owned(vehicle.model.as_deref()),
                year,
                color: non_blank(vehicle.color.as_deref()).map(str::to_string),
                license_plate: plate.map(str::to_string),
            },
            issue_type,
            issue_description: owned(self.issue_description.as_deref()),
            urgency_level,
        })
    }
}
