//! Pre-built Test Fixtures
//!
//! Ready-to-use test data for the seeded customers and the three reference
//! scenarios. Values line up with the seeded policy and provider data, so
//! outcomes are predictable.

use chrono::{DateTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use serde_json::{json, Value};

use domain_claims::{ClaimData, ClaimSubmission, DriverProfile, Location, VehicleInfo};
use domain_policy::{seed_policies, IssueType, PolicyRecord, UrgencyLevel};

/// Seeded policy book, built once
pub static SEEDED_POLICIES: Lazy<Vec<PolicyRecord>> = Lazy::new(seed_policies);

/// Fixture for temporal test data
///
/// All instants are in UTC, which is also the default pricing zone.
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// Wednesday 10:00, day band
    pub fn weekday_morning() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 4, 10, 0, 0).unwrap()
    }

    /// Wednesday 19:00, evening band
    pub fn weekday_evening() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 4, 19, 0, 0).unwrap()
    }

    /// Wednesday 23:30, night band
    pub fn weekday_night() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 4, 23, 30, 0).unwrap()
    }

    /// Saturday noon, weekend band
    pub fn saturday_noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 7, 12, 0, 0).unwrap()
    }
}

/// Seeded customers and their policy numbers
pub struct CustomerFixtures;

impl CustomerFixtures {
    /// Premium Plus, $25 deductible
    pub fn john_smith() -> (&'static str, &'static str) {
        ("John Smith", "POL-ABC123456")
    }

    /// Battery jumps already at the monthly maximum
    pub fn sarah_johnson() -> (&'static str, &'static str) {
        ("Sarah Johnson", "POL-XYZ789012")
    }

    /// Basic plan, no lockout service
    pub fn mike_davis() -> (&'static str, &'static str) {
        ("Mike Davis", "POL-DEF456789")
    }

    pub fn emily_chen() -> (&'static str, &'static str) {
        ("Emily Chen", "POL-GHI321654")
    }
}

/// Fixture for claim details
pub struct ClaimFixtures;

impl ClaimFixtures {
    pub fn location() -> Location {
        Location {
            address: "123 Main St".to_string(),
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            zip_code: "62701".to_string(),
            coordinates: None,
        }
    }

    pub fn vehicle() -> VehicleInfo {
        VehicleInfo {
            make: "Toyota".to_string(),
            model: "Camry".to_string(),
            year: 2020,
            color: Some("Blue".to_string()),
            license_plate: Some("ABC 123".to_string()),
        }
    }

    /// A seeded customer's claim with everything filled in
    pub fn for_customer(customer: (&str, &str), issue: IssueType) -> ClaimData {
        let (name, policy) = customer;
        ClaimData {
            customer_name: name.to_string(),
            policy_number: Some(policy.to_string()),
            phone_number: Some("(555) 123-4567".to_string()),
            location: Self::location(),
            vehicle_info: Self::vehicle(),
            issue_type: issue,
            issue_description: "Stuck on the shoulder of the highway".to_string(),
            urgency_level: UrgencyLevel::Medium,
        }
    }

    /// Scenario A: covered in full and dispatched
    pub fn scenario_a() -> ClaimData {
        Self::for_customer(CustomerFixtures::john_smith(), IssueType::FlatTire)
    }

    /// Scenario B: battery jump past the monthly limit
    pub fn scenario_b() -> ClaimData {
        Self::for_customer(CustomerFixtures::sarah_johnson(), IssueType::DeadBattery)
    }

    /// Scenario C: lockout on a plan without it
    pub fn scenario_c() -> ClaimData {
        Self::for_customer(CustomerFixtures::mike_davis(), IssueType::Lockout)
    }

    /// Nobody in the policy book
    pub fn unknown_customer() -> ClaimData {
        let mut claim = Self::for_customer(("Pat Nobody", "POL-ZZZ000000"), IssueType::Towing);
        claim.policy_number = None;
        claim
    }
}

/// Fixture for raw submissions
pub struct SubmissionFixtures;

impl SubmissionFixtures {
    pub fn valid() -> ClaimSubmission {
        ClaimFixtures::scenario_a().into()
    }

    /// Request body as a client would post it
    pub fn json(claim: &ClaimData) -> Value {
        json!({
            "customer_name": claim.customer_name,
            "policy_number": claim.policy_number,
            "phone_number": claim.phone_number,
            "location": {
                "address": claim.location.address,
                "city": claim.location.city,
                "state": claim.location.state,
                "zip_code": claim.location.zip_code
            },
            "vehicle_info": {
                "make": claim.vehicle_info.make,
                "model": claim.vehicle_info.model,
                "year": claim.vehicle_info.year,
                "color": claim.vehicle_info.color,
                "license_plate": claim.vehicle_info.license_plate
            },
            "issue_type": claim.issue_type.as_str(),
            "issue_description": claim.issue_description,
            "urgency_level": claim.urgency_level.as_str()
        })
    }
}

pub struct DriverFixtures;

impl DriverFixtures {
    pub fn driver() -> DriverProfile {
        DriverProfile {
            name: "Mike Johnson".to_string(),
            phone: "(555) 010-2030".to_string(),
            vehicle: "White Ford Transit".to_string(),
        }
    }
}
