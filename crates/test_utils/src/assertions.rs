//! Custom Test Assertions
//!
//! Assertion helpers for claim outcomes that report the claim context on
//! failure instead of a bare `left != right`.

use core_kernel::Money;
use rust_decimal::Decimal;

use domain_claims::{ClaimRecord, ClaimStatus, CoverageType};
use domain_notification::{NotificationKind, SmsNotification};

/// Asserts that two Money values are approximately equal within a tolerance
///
/// # Panics
///
/// Panics if the currencies don't match or the amounts differ by more than tolerance
pub fn assert_money_approx_eq(actual: &Money, expected: &Money, tolerance: Decimal) {
    assert_eq!(
        actual.currency(),
        expected.currency(),
        "Currency mismatch: actual={}, expected={}",
        actual.currency(),
        expected.currency()
    );

    let diff = (actual.amount() - expected.amount()).abs();
    assert!(
        diff <= tolerance,
        "Money amounts differ by more than tolerance: actual={}, expected={}, diff={}, tolerance={}",
        actual.amount(),
        expected.amount(),
        diff,
        tolerance
    );
}

/// Asserts the claim was approved and dispatched with full coverage
pub fn assert_approved_and_dispatched(claim: &ClaimRecord) {
    assert_eq!(
        claim.status,
        ClaimStatus::Approved,
        "Claim {} expected approved, got {} ({})",
        claim.id,
        claim.status,
        claim.coverage.reason
    );
    assert!(claim.coverage.is_approved, "Coverage not approved for {}", claim.id);
    assert_eq!(claim.coverage.coverage_type, CoverageType::Full);
    assert!(claim.dispatch.is_some(), "Approved claim {} has no dispatch", claim.id);
}

/// Asserts the claim was denied and that the reason mentions `fragment`
pub fn assert_denied_with_reason(claim: &ClaimRecord, fragment: &str) {
    assert_eq!(
        claim.status,
        ClaimStatus::Denied,
        "Claim {} expected denied, got {}",
        claim.id,
        claim.status
    );
    assert!(!claim.coverage.is_approved);
    assert!(claim.dispatch.is_none(), "Denied claim {} was dispatched", claim.id);
    assert!(claim.total_cost.is_zero(), "Denied claim {} has a cost", claim.id);
    assert!(
        claim.coverage.reason.contains(fragment),
        "Denial reason {:?} does not mention {:?}",
        claim.coverage.reason,
        fragment
    );
}

/// Asserts the messages have exactly these kinds, in this order
pub fn assert_notification_kinds(notifications: &[SmsNotification], expected: &[NotificationKind]) {
    let kinds: Vec<NotificationKind> = notifications.iter().map(|n| n.kind).collect();
    assert_eq!(kinds, expected, "Unexpected notification sequence");
}

/// Asserts a confidence value lies in [0, 1]
pub fn assert_confidence_in_range(confidence: Decimal) {
    assert!(
        (Decimal::ZERO..=Decimal::ONE).contains(&confidence),
        "Confidence {} outside [0, 1]",
        confidence
    );
}
