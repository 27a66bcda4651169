//! Integration tests for identifiers

use chrono::{TimeZone, Utc};
use core_kernel::{ClaimId, ClaimIdGenerator, DecisionId, DispatchId, NotificationId};

#[test]
fn test_prefixed_ids_round_trip_through_display() {
    let dispatch = DispatchId::new();
    let parsed: DispatchId = dispatch.to_string().parse().unwrap();
    assert_eq!(dispatch, parsed);

    assert!(DecisionId::new().to_string().starts_with("DEC-"));
    assert!(NotificationId::new().to_string().starts_with("SMS-"));
}

#[test]
fn test_claim_ids_use_year_of_issue() {
    let generator = ClaimIdGenerator::default();
    let new_year = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 1).unwrap();

    let id = generator.next_id(new_year);
    assert_eq!(id, ClaimId::from_parts(2026, 1));
    assert_eq!(id.to_string(), "CLM-2026-001");
}

#[test]
fn test_claim_id_serializes_as_plain_string() {
    let id = ClaimId::from_parts(2024, 3);
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, "\"CLM-2024-003\"");

    let back: ClaimId = serde_json::from_str(&json).unwrap();
    assert_eq!(back, id);
}
