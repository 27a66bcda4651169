//! Roadside pricing rules
//!
//! Estimated cost = base cost x urgency multiplier x time-of-day multiplier,
//! rounded to whole currency units. The time band is evaluated in the
//! service region's timezone, not UTC.

use chrono::{DateTime, Datelike, Timelike, Utc, Weekday};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use core_kernel::{Currency, Money, Timezone};

use crate::error::PolicyError;
use crate::service::ServiceType;

/// How quickly the customer needs help
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrgencyLevel {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl UrgencyLevel {
    pub const ALL: [UrgencyLevel; 4] = [
        UrgencyLevel::Low,
        UrgencyLevel::Medium,
        UrgencyLevel::High,
        UrgencyLevel::Urgent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UrgencyLevel::Low => "low",
            UrgencyLevel::Medium => "medium",
            UrgencyLevel::High => "high",
            UrgencyLevel::Urgent => "urgent",
        }
    }

    /// Minutes shaved off a provider's base response time
    pub fn eta_adjustment_minutes(&self) -> i64 {
        match self {
            UrgencyLevel::Urgent => -5,
            UrgencyLevel::High => -2,
            UrgencyLevel::Medium | UrgencyLevel::Low => 0,
        }
    }
}

impl fmt::Display for UrgencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UrgencyLevel {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UrgencyLevel::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| PolicyError::UnknownUrgencyLevel(s.to_string()))
    }
}

/// Time-of-day pricing band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeBand {
    Day,
    Evening,
    Night,
    Weekend,
}

impl TimeBand {
    /// Classifies a local weekday and hour
    ///
    /// Weekend wins over the hour of day; weekdays split into
    /// 08:00-17:59 day, 18:00-21:59 evening, everything else night.
    pub fn classify(weekday: Weekday, hour: u32) -> Self {
        if matches!(weekday, Weekday::Sat | Weekday::Sun) {
            return TimeBand::Weekend;
        }
        match hour {
            8..=17 => TimeBand::Day,
            18..=21 => TimeBand::Evening,
            _ => TimeBand::Night,
        }
    }
}

/// Configuration tables for roadside cost estimation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingRules {
    currency: Currency,
    timezone: Timezone,
    base_costs: BTreeMap<ServiceType, Decimal>,
    urgency_multipliers: BTreeMap<UrgencyLevel, Decimal>,
    time_multipliers: BTreeMap<TimeBand, Decimal>,
    towing_coverage_cap: Decimal,
    service_coverage_cap: Decimal,
}

impl Default for PricingRules {
    fn default() -> Self {
        Self::standard(Timezone::default())
    }
}

impl PricingRules {
    /// Standard US roadside rate card, evaluated in `timezone`
    pub fn standard(timezone: Timezone) -> Self {
        let base_costs = BTreeMap::from([
            (ServiceType::Towing, dec!(75)),
            (ServiceType::TireChange, dec!(50)),
            (ServiceType::BatteryJump, dec!(45)),
            (ServiceType::Lockout, dec!(60)),
            (ServiceType::FuelDelivery, dec!(35)),
            (ServiceType::RoadsideRepair, dec!(100)),
        ]);
        let urgency_multipliers = BTreeMap::from([
            (UrgencyLevel::Low, dec!(1.0)),
            (UrgencyLevel::Medium, dec!(1.1)),
            (UrgencyLevel::High, dec!(1.25)),
            (UrgencyLevel::Urgent, dec!(1.5)),
        ]);
        let time_multipliers = BTreeMap::from([
            (TimeBand::Day, dec!(1.0)),
            (TimeBand::Evening, dec!(1.1)),
            (TimeBand::Night, dec!(1.3)),
            (TimeBand::Weekend, dec!(1.2)),
        ]);

        Self {
            currency: Currency::USD,
            timezone,
            base_costs,
            urgency_multipliers,
            time_multipliers,
            towing_coverage_cap: dec!(500),
            service_coverage_cap: dec!(300),
        }
    }

    /// Overrides the base rate for one service
    pub fn with_base_cost(mut self, service: ServiceType, amount: Decimal) -> Self {
        self.base_costs.insert(service, amount);
        self
    }

    pub fn timezone(&self) -> Timezone {
        self.timezone
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn base_cost(&self, service: ServiceType) -> Money {
        let amount = self
            .base_costs
            .get(&service)
            .or_else(|| self.base_costs.get(&ServiceType::RoadsideRepair))
            .copied()
            .unwrap_or(Decimal::ZERO);
        Money::new(amount, self.currency)
    }

    pub fn urgency_multiplier(&self, urgency: UrgencyLevel) -> Decimal {
        self.urgency_multipliers
            .get(&urgency)
            .copied()
            .unwrap_or(Decimal::ONE)
    }

    /// Band for an instant, evaluated in the configured timezone
    pub fn time_band(&self, at: DateTime<Utc>) -> TimeBand {
        let local = self.timezone.to_local(at);
        TimeBand::classify(local.weekday(), local.hour())
    }

    pub fn time_multiplier(&self, at: DateTime<Utc>) -> Decimal {
        self.time_multipliers
            .get(&self.time_band(at))
            .copied()
            .unwrap_or(Decimal::ONE)
    }

    /// Estimated cost rounded to whole units, midpoint away from zero
    pub fn estimate(&self, service: ServiceType, urgency: UrgencyLevel, at: DateTime<Utc>) -> Money {
        self.base_cost(service)
            .multiply(self.urgency_multiplier(urgency))
            .multiply(self.time_multiplier(at))
            .round_to_whole()
    }

    /// Most the policy pays toward a single service call
    pub fn max_coverage(&self, service: ServiceType) -> Money {
        let cap = if service.is_towing() {
            self.towing_coverage_cap
        } else {
            self.service_coverage_cap
        };
        Money::new(cap, self.currency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn weekday_at(hour: u32) -> DateTime<Utc> {
        // 2024-03-13 is a Wednesday
        Utc.with_ymd_and_hms(2024, 3, 13, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_time_band_boundaries() {
        assert_eq!(TimeBand::classify(Weekday::Wed, 7), TimeBand::Night);
        assert_eq!(TimeBand::classify(Weekday::Wed, 8), TimeBand::Day);
        assert_eq!(TimeBand::classify(Weekday::Wed, 17), TimeBand::Day);
        assert_eq!(TimeBand::classify(Weekday::Wed, 18), TimeBand::Evening);
        assert_eq!(TimeBand::classify(Weekday::Wed, 21), TimeBand::Evening);
        assert_eq!(TimeBand::classify(Weekday::Wed, 22), TimeBand::Night);
        assert_eq!(TimeBand::classify(Weekday::Sat, 12), TimeBand::Weekend);
        assert_eq!(TimeBand::classify(Weekday::Sun, 3), TimeBand::Weekend);
    }

    #[test]
    fn test_estimate_tire_change_medium_daytime() {
        let rules = PricingRules::default();
        // 50 x 1.1 x 1.0 = 55
        let cost = rules.estimate(ServiceType::TireChange, UrgencyLevel::Medium, weekday_at(10));
        assert_eq!(cost.amount(), dec!(55));
    }

    #[test]
    fn test_estimate_rounds_midpoint_up() {
        let rules = PricingRules::default();
        // 45 x 1.1 x 1.1 = 54.45 -> 54 ; 75 x 1.1 x 1.3 = 107.25 -> 107
        assert_eq!(
            rules.estimate(ServiceType::BatteryJump, UrgencyLevel::Medium, weekday_at(19)).amount(),
            dec!(54)
        );
        assert_eq!(
            rules.estimate(ServiceType::Towing, UrgencyLevel::Medium, weekday_at(23)).amount(),
            dec!(107)
        );
        // 35 x 1.5 x 1.1 = 57.75 -> 58
        assert_eq!(
            rules.estimate(ServiceType::FuelDelivery, UrgencyLevel::Urgent, weekday_at(20)).amount(),
            dec!(58)
        );
    }

    #[test]
    fn test_time_band_uses_configured_timezone() {
        let tz: Timezone = "America/New_York".parse().unwrap();
        let rules = PricingRules::standard(tz);
        // 14:00 UTC on a Wednesday in March is 10:00 in New York
        assert_eq!(rules.time_band(weekday_at(14)), TimeBand::Day);
        // 02:00 UTC Wednesday is 22:00 Tuesday in New York
        assert_eq!(rules.time_band(weekday_at(2)), TimeBand::Night);
    }

    #[test]
    fn test_max_coverage_caps() {
        let rules = PricingRules::default();
        assert_eq!(rules.max_coverage(ServiceType::Towing).amount(), dec!(500));
        assert_eq!(rules.max_coverage(ServiceType::Lockout).amount(), dec!(300));
    }

    #[test]
    fn test_urgency_parsing() {
        assert_eq!("urgent".parse::<UrgencyLevel>().unwrap(), UrgencyLevel::Urgent);
        assert!("critical".parse::<UrgencyLevel>().is_err());
        assert_eq!(UrgencyLevel::default(), UrgencyLevel::Medium);
    }
}
