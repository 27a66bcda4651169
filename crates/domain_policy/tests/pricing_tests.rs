//! Pricing rule tests across urgency levels and time bands

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use domain_policy::{PricingRules, ServiceType, TimeBand, UrgencyLevel};

fn service_strategy() -> impl Strategy<Value = ServiceType> {
    prop::sample::select(ServiceType::ALL.to_vec())
}

fn urgency_strategy() -> impl Strategy<Value = UrgencyLevel> {
    prop::sample::select(UrgencyLevel::ALL.to_vec())
}

fn instant_strategy() -> impl Strategy<Value = DateTime<Utc>> {
    (0i64..(60 * 24 * 28)).prop_map(|minutes| {
        Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap() + Duration::minutes(minutes)
    })
}

// ============================================================================
// Fixed examples
// ============================================================================

mod examples {
    use super::*;

    #[test]
    fn test_saturday_uses_weekend_multiplier_at_any_hour() {
        let rules = PricingRules::default();
        let saturday_night = Utc.with_ymd_and_hms(2024, 3, 16, 23, 0, 0).unwrap();

        assert_eq!(rules.time_band(saturday_night), TimeBand::Weekend);
        // 60 x 1.25 x 1.2 = 90
        assert_eq!(
            rules.estimate(ServiceType::Lockout, UrgencyLevel::High, saturday_night).amount(),
            dec!(90)
        );
    }

    #[test]
    fn test_roadside_repair_urgent_night() {
        let rules = PricingRules::default();
        let tuesday_3am = Utc.with_ymd_and_hms(2024, 3, 12, 3, 0, 0).unwrap();
        // 100 x 1.5 x 1.3 = 195
        assert_eq!(
            rules.estimate(ServiceType::RoadsideRepair, UrgencyLevel::Urgent, tuesday_3am).amount(),
            dec!(195)
        );
    }
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn estimate_is_deterministic(
        service in service_strategy(),
        urgency in urgency_strategy(),
        at in instant_strategy(),
    ) {
        let rules = PricingRules::default();
        prop_assert_eq!(rules.estimate(service, urgency, at), rules.estimate(service, urgency, at));
    }

    #[test]
    fn estimate_matches_rounded_product(
        service in service_strategy(),
        urgency in urgency_strategy(),
        at in instant_strategy(),
    ) {
        let rules = PricingRules::default();
        let raw = rules.base_cost(service).amount()
            * rules.urgency_multiplier(urgency)
            * rules.time_multiplier(at);
        let expected = raw.round_dp_with_strategy(0, rust_decimal::RoundingStrategy::MidpointAwayFromZero);

        prop_assert_eq!(rules.estimate(service, urgency, at).amount(), expected);
        prop_assert_eq!(expected.fract(), Decimal::ZERO);
    }

    #[test]
    fn higher_urgency_never_costs_less(
        service in service_strategy(),
        at in instant_strategy(),
    ) {
        let rules = PricingRules::default();
        let costs: Vec<Decimal> = UrgencyLevel::ALL
            .iter()
            .map(|urgency| rules.estimate(service, *urgency, at).amount())
            .collect();
        prop_assert!(costs.windows(2).all(|pair| pair[0] <= pair[1]));
    }
}
