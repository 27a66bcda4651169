//! Delivery simulation tests on tokio's paused clock

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use core_kernel::{ClaimId, Money, TokioClock};
use domain_notification::*;
use rust_decimal_macros::dec;

fn center() -> NotificationCenter {
    let clock = TokioClock::anchored_at(Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap());
    NotificationCenter::new(Arc::new(clock))
}

fn approval_notice() -> ApprovalNotice {
    ApprovalNotice {
        claim_id: ClaimId::from_parts(2024, 6),
        customer_name: "John Smith".to_string(),
        customer_phone: Some("(555) 123-4567".to_string()),
        outcome: ApprovalOutcome::Covered,
        positive_factors: vec![NO_DEDUCTIBLE_FACTOR.to_string()],
        provider: Some(ProviderSummary {
            name: "QuickFix Towing".to_string(),
            eta_minutes: 25,
            cost: Money::usd(dec!(85)),
        }),
        estimated_cost: Money::usd(dec!(85)),
    }
}

async fn settle() {
    for _ in 0..5 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test(start_paused = true)]
async fn test_approval_is_delivered_after_two_seconds() {
    let center = center();
    let id = center.send_claim_approval(&approval_notice());

    tokio::time::sleep(Duration::from_millis(1999)).await;
    settle().await;
    assert_eq!(center.get(&id).unwrap().status, DeliveryStatus::Sent);

    tokio::time::sleep(Duration::from_millis(2)).await;
    settle().await;
    assert_eq!(center.get(&id).unwrap().status, DeliveryStatus::Delivered);
}

#[tokio::test(start_paused = true)]
async fn test_read_before_delivery_does_not_regress() {
    let center = center();
    let id = center.send_claim_approval(&approval_notice());

    center.mark_as_read(&id).unwrap();
    tokio::time::sleep(Duration::from_secs(3)).await;
    settle().await;

    assert_eq!(center.get(&id).unwrap().status, DeliveryStatus::Read);
}

#[tokio::test(start_paused = true)]
async fn test_timestamps_follow_virtual_time() {
    let center = center();
    let first = center.send_claim_approval(&approval_notice());
    tokio::time::sleep(Duration::from_secs(5)).await;
    let second = center.send_arrival_update(&ArrivalNotice {
        claim_id: ClaimId::from_parts(2024, 6),
        customer_name: "John Smith".to_string(),
        customer_phone: None,
        minutes_away: 17,
    });

    let first = center.get(&first).unwrap();
    let second = center.get(&second).unwrap();
    assert!(first.timestamp < second.timestamp);
    assert_eq!(center.notifications()[0].id, second.id);
}

#[tokio::test(start_paused = true)]
async fn test_custom_delays_are_honoured() {
    let clock = TokioClock::anchored_at(Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap());
    let center = NotificationCenter::with_delays(
        Arc::new(clock),
        DeliveryDelays {
            approval: Duration::from_millis(10),
            dispatch: Duration::from_millis(10),
            arrival: Duration::from_millis(10),
        },
    );
    let id = center.send_claim_approval(&approval_notice());

    tokio::time::sleep(Duration::from_millis(11)).await;
    settle().await;
    assert_eq!(center.get(&id).unwrap().status, DeliveryStatus::Delivered);
}
