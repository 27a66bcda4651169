//! Integration tests for Money as used in cost calculations

use core_kernel::{Currency, Money, MoneyError};
use rust_decimal_macros::dec;

mod creation {
    use super::*;

    #[test]
    fn test_new_rounds_to_four_decimal_places() {
        let m = Money::new(dec!(82.123456789), Currency::USD);
        assert_eq!(m.amount(), dec!(82.1235));
    }

    #[test]
    fn test_from_minor_converts_cents() {
        let m = Money::from_minor(7550, Currency::USD);
        assert_eq!(m.amount(), dec!(75.50));
    }

    #[test]
    fn test_zero_is_neither_positive_nor_negative() {
        let m = Money::zero(Currency::USD);
        assert!(m.is_zero());
        assert!(!m.is_positive());
        assert!(!m.is_negative());
    }
}

mod multiplier_chains {
    use super::*;

    #[test]
    fn test_towing_urgent_night_chain() {
        // 75 x 1.5 x 1.3 = 146.25
        let cost = Money::usd(dec!(75)).multiply(dec!(1.5)).multiply(dec!(1.3));
        assert_eq!(cost.amount(), dec!(146.25));
        assert_eq!(cost.round_to_whole().amount(), dec!(146));
    }

    #[test]
    fn test_tire_change_medium_evening_rounds_half_up() {
        // 50 x 1.1 x 1.1 = 60.5
        let cost = Money::usd(dec!(50)).multiply(dec!(1.1)).multiply(dec!(1.1));
        assert_eq!(cost.round_to_whole().amount(), dec!(61));
    }

    #[test]
    fn test_total_cost_is_capped_cost_plus_deductible() {
        let cost = Money::usd(dec!(620));
        let cap = Money::usd(dec!(500));
        let deductible = Money::usd(dec!(25));

        let total = cost.checked_min(&cap).unwrap().checked_add(&deductible).unwrap();
        assert_eq!(total.amount(), dec!(525));
    }
}

mod currency_safety {
    use super::*;

    #[test]
    fn test_subtraction_rejects_mixed_currencies() {
        let usd = Money::usd(dec!(10));
        let cad = Money::new(dec!(10), Currency::CAD);

        assert_eq!(
            usd.checked_sub(&cad),
            Err(MoneyError::CurrencyMismatch("USD".to_string(), "CAD".to_string()))
        );
    }

    #[test]
    fn test_symbols() {
        assert_eq!(Currency::USD.symbol(), "$");
        assert_eq!(Currency::CAD.symbol(), "C$");
        assert_eq!(Currency::CAD.code(), "CAD");
    }
}
