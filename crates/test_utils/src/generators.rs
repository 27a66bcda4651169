//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating claims that pass submission
//! validation, plus partial intake data for merge properties.

use fake::faker::address::en::{CityName, StreetName};
use fake::faker::name::en::Name;
use fake::Fake;
use proptest::prelude::*;
use rand::{rngs::StdRng, SeedableRng};

use domain_claims::{ClaimData, ClaimSubmission, Location, VehicleInfo};
use domain_intake::PartialClaimData;
use domain_policy::{IssueType, UrgencyLevel};

/// Strategy for any issue type
pub fn issue_type_strategy() -> impl Strategy<Value = IssueType> {
    proptest::sample::select(IssueType::ALL.to_vec())
}

/// Strategy for any urgency level
pub fn urgency_strategy() -> impl Strategy<Value = UrgencyLevel> {
    proptest::sample::select(UrgencyLevel::ALL.to_vec())
}

/// Policy numbers in the accepted format, with and without the prefix
pub fn policy_number_strategy() -> impl Strategy<Value = String> {
    (any::<bool>(), "[A-Z0-9]{6,12}").prop_map(|(prefixed, body)| {
        if prefixed {
            format!("POL-{body}")
        } else {
            body
        }
    })
}

/// US-style phone numbers in a few common layouts
pub fn phone_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "\\([2-9][0-9]{2}\\) [0-9]{3}-[0-9]{4}",
        "[2-9][0-9]{2}-[0-9]{3}-[0-9]{4}",
        "\\+1 [2-9][0-9]{9}",
    ]
}

pub fn zip_strategy() -> impl Strategy<Value = String> {
    prop_oneof!["[0-9]{5}", "[0-9]{5}-[0-9]{4}"]
}

/// Seeded fake data for a human-looking name
pub fn customer_name_strategy() -> impl Strategy<Value = String> {
    any::<u64>().prop_map(|seed| {
        let mut rng = StdRng::seed_from_u64(seed);
        let name: String = Name().fake_with_rng(&mut rng);
        name
    })
}

fn location_strategy() -> impl Strategy<Value = Location> {
    (any::<u64>(), 1u32..9999, "[A-Z]{2}", zip_strategy()).prop_map(
        |(seed, number, state, zip_code)| {
            let mut rng = StdRng::seed_from_u64(seed);
            let street: String = StreetName().fake_with_rng(&mut rng);
            let city: String = CityName().fake_with_rng(&mut rng);
            Location {
                address: format!("{number} {street}"),
                city,
                state,
                zip_code,
                coordinates: None,
            }
        },
    )
}

fn vehicle_strategy() -> impl Strategy<Value = VehicleInfo> {
    (
        proptest::sample::select(vec!["Toyota", "Honda", "Ford", "Subaru", "Tesla"]),
        proptest::sample::select(vec!["Camry", "Civic", "F-150", "Outback", "Model 3"]),
        1990i32..=2026,
        proptest::option::of("[A-Z0-9]{2,7}"),
    )
        .prop_map(|(make, model, year, license_plate)| VehicleInfo {
            make: make.to_string(),
            model: model.to_string(),
            year,
            color: None,
            license_plate,
        })
}

/// Claims that validate for any current year of 2026 or later
///
/// Urgent claims always carry a phone number.
pub fn claim_data_strategy() -> impl Strategy<Value = ClaimData> {
    (
        customer_name_strategy(),
        proptest::option::of(policy_number_strategy()),
        proptest::option::of(phone_strategy()),
        phone_strategy(),
        location_strategy(),
        vehicle_strategy(),
        issue_type_strategy(),
        urgency_strategy(),
    )
        .prop_map(
            |(customer_name, policy_number, phone, fallback_phone, location, vehicle_info, issue_type, urgency_level)| {
                let phone_number = match urgency_level {
                    UrgencyLevel::Urgent => Some(phone.unwrap_or(fallback_phone)),
                    _ => phone,
                };
                ClaimData {
                    customer_name,
                    policy_number,
                    phone_number,
                    location,
                    vehicle_info,
                    issue_type,
                    issue_description: format!("Roadside trouble: {}", issue_type.as_str()),
                    urgency_level,
                }
            },
        )
}

pub fn submission_strategy() -> impl Strategy<Value = ClaimSubmission> {
    claim_data_strategy().prop_map(ClaimSubmission::from)
}

/// Partially collected intake data; any field may be missing or blank
pub fn partial_claim_strategy() -> impl Strategy<Value = PartialClaimData> {
    let text = || proptest::option::of(prop_oneof![Just(String::new()), Just("  ".to_string()), "[A-Za-z ]{2,20}"]);
    (
        text(),
        proptest::option::of(policy_number_strategy()),
        proptest::option::of(phone_strategy()),
        proptest::option::of(issue_type_strategy()),
        text(),
        proptest::option::of(urgency_strategy()),
    )
        .prop_map(
            |(customer_name, policy_number, phone_number, issue_type, issue_description, urgency_level)| {
                PartialClaimData {
                    customer_name,
                    policy_number,
                    phone_number,
                    location: None,
                    vehicle_info: None,
                    issue_type,
                    issue_description,
                    urgency_level,
                }
            },
        )
}
