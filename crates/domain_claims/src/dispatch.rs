//! Dispatch engine
//!
//! Picks a provider for an approved claim and works out arrival time, cost
//! and the instructions read back to the customer.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use core_kernel::{Clock, DispatchId, Money};
use domain_policy::{PricingRules, ServiceType, UrgencyLevel};
use domain_provider::{ProviderDirectory, ServiceProvider};

use crate::claim_data::ClaimData;
use crate::coverage::CoverageDecision;
use crate::error::ClaimError;

const RATING_WEIGHT: Decimal = dec!(20);
const RESPONSE_BASELINE_MINUTES: i64 = 60;
const SPECIALIZATION_BONUS: Decimal = dec!(10);
const MIN_ETA_MINUTES: i64 = 10;

/// Provider assignment for an approved claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceDispatch {
    pub dispatch_id: DispatchId,
    pub service_type: ServiceType,
    pub provider: ServiceProvider,
    pub eta_minutes: u32,
    pub estimated_arrival: DateTime<Utc>,
    pub estimated_cost: Money,
    pub instructions: Vec<String>,
}

/// Selection score: `rating * 20 + (60 - response time) + specialization bonus`
pub fn provider_score(provider: &ServiceProvider, service: ServiceType) -> Decimal {
    let response = Decimal::from(RESPONSE_BASELINE_MINUTES - i64::from(provider.response_time_minutes));
    let bonus = if provider.category.specializes_in(service) {
        SPECIALIZATION_BONUS
    } else {
        Decimal::ZERO
    };
    provider.rating * RATING_WEIGHT + response + bonus
}

/// Minutes until arrival, never below ten
pub fn eta_minutes(base_response_minutes: u32, urgency: UrgencyLevel) -> u32 {
    let adjusted = i64::from(base_response_minutes) + urgency.eta_adjustment_minutes();
    u32::try_from(adjusted.max(MIN_ETA_MINUTES)).unwrap_or(u32::MAX)
}

/// Customer instructions: three general lines, then three for the service
pub fn instructions(claim: &ClaimData, service: ServiceType) -> Vec<String> {
    let contact = claim.phone_number().unwrap_or("the number on file");
    let mut lines = vec![
        format!("Service technician will contact you at {contact}"),
        "Please remain with your vehicle if safe to do so".to_string(),
        "Have your driver's license and insurance information ready".to_string(),
    ];

    let specific: [&str; 3] = match service {
        ServiceType::Towing => [
            "Remove all personal items from the vehicle",
            "Take photos of any damage for insurance purposes",
            "Provide destination address to the tow truck driver",
        ],
        ServiceType::TireChange => [
            "Move to a safe location away from traffic if possible",
            "Turn on hazard lights",
            "Stay in the vehicle if on a busy road",
        ],
        ServiceType::BatteryJump => [
            "Turn off all electrical accessories",
            "Locate your vehicle's battery",
            "Do not attempt to jumpstart the vehicle yourself",
        ],
        ServiceType::Lockout => [
            "Verify your identity with photo ID",
            "Confirm vehicle ownership or rental agreement",
            "Check all doors and windows before service arrival",
        ],
        ServiceType::FuelDelivery => [
            "Move vehicle to safe location if possible",
            "Specify fuel type when technician calls",
            "Have payment ready for fuel cost",
        ],
        ServiceType::RoadsideRepair => [
            "Describe symptoms to the technician",
            "Do not attempt repairs yourself",
            "Be prepared for potential towing if repair is not possible",
        ],
    };
    lines.extend(specific.iter().map(|line| line.to_string()));
    lines
}

#[derive(Clone)]
pub struct DispatchEngine {
    providers: Arc<dyn ProviderDirectory>,
    pricing: PricingRules,
    clock: Arc<dyn Clock>,
}

impl DispatchEngine {
    pub fn new(providers: Arc<dyn ProviderDirectory>, pricing: PricingRules, clock: Arc<dyn Clock>) -> Self {
        Self {
            providers,
            pricing,
            clock,
        }
    }

    /// Highest-scoring capable provider; the first listed wins a tie
    pub fn select_provider(&self, service: ServiceType) -> Option<ServiceProvider> {
        let mut best: Option<(ServiceProvider, Decimal)> = None;
        for provider in self.providers.capable_of(service) {
            let score = provider_score(&provider, service);
            match &best {
                Some((_, best_score)) if score <= *best_score => {}
                _ => best = Some((provider, score)),
            }
        }
        best.map(|(provider, _)| provider)
    }

    pub fn dispatch(&self, claim: &ClaimData, coverage: &CoverageDecision) -> Result<ServiceDispatch, ClaimError> {
        self.dispatch_at(claim, coverage, self.clock.now())
    }

    /// Dispatches with cost and arrival computed from `at`
    pub fn dispatch_at(
        &self,
        claim: &ClaimData,
        coverage: &CoverageDecision,
        at: DateTime<Utc>,
    ) -> Result<ServiceDispatch, ClaimError> {
        if !coverage.is_approved {
            return Err(ClaimError::UnapprovedDispatch);
        }

        let service = claim.service_type();
        let provider = self.select_provider(service).ok_or_else(|| {
            warn!(service = %service, "No provider can take this service");
            ClaimError::NoProviderAvailable(service)
        })?;

        let eta = eta_minutes(provider.response_time_minutes, claim.urgency_level);
        let estimated_cost = self.pricing.estimate(service, claim.urgency_level, at);

        let dispatch = ServiceDispatch {
            dispatch_id: DispatchId::new(),
            service_type: service,
            eta_minutes: eta,
            estimated_arrival: at + Duration::minutes(i64::from(eta)),
            estimated_cost,
            instructions: instructions(claim, service),
            provider,
        };

        info!(
            dispatch_id = %dispatch.dispatch_id,
            provider = %dispatch.provider.name,
            service = %service,
            eta_minutes = eta,
            "Service dispatched"
        );
        Ok(dispatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use core_kernel::FixedClock;
    use domain_policy::{IssueType, PolicyRecord};
    use domain_provider::{InMemoryProviderDirectory, ProviderCategory};
    use std::collections::BTreeSet;

    use crate::claim_data::{Location, VehicleInfo};
    use crate::coverage::CoverageType;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 4, 10, 0, 0).unwrap()
    }

    fn engine(directory: InMemoryProviderDirectory) -> DispatchEngine {
        DispatchEngine::new(Arc::new(directory), PricingRules::default(), Arc::new(FixedClock::at(at())))
    }

    fn claim(issue: IssueType, urgency: UrgencyLevel) -> ClaimData {
        ClaimData {
            customer_name: "John Smith".to_string(),
            policy_number: None,
            phone_number: None,
            location: Location {
                address: "123 Main St".to_string(),
                city: "Springfield".to_string(),
                state: "IL".to_string(),
                zip_code: "62701".to_string(),
                coordinates: None,
            },
            vehicle_info: VehicleInfo {
                make: "Toyota".to_string(),
                model: "Camry".to_string(),
                year: 2020,
                color: None,
                license_plate: None,
            },
            issue_type: issue,
            issue_description: "Needs roadside service".to_string(),
            urgency_level: urgency,
        }
    }

    fn coverage(approved: bool) -> CoverageDecision {
        CoverageDecision {
            is_approved: approved,
            coverage_type: if approved { CoverageType::Full } else { CoverageType::None },
            approved_services: Vec::new(),
            deductible: Money::usd(dec!(25)),
            max_coverage: Money::usd(dec!(300)),
            estimated_cost: None,
            reason: String::new(),
            confidence: dec!(0.95),
            policy: PolicyRecord::unknown("John Smith", at().date_naive()),
        }
    }

    fn provider(id: &str, category: ProviderCategory, rating: Decimal, response: u32) -> ServiceProvider {
        ServiceProvider {
            id: id.to_string(),
            name: id.to_string(),
            category,
            phone: "(555) 000-0000".to_string(),
            rating,
            response_time_minutes: response,
            distance_miles: dec!(1),
            base_cost: Money::usd(dec!(50)),
            services: BTreeSet::from([ServiceType::Towing, ServiceType::TireChange]),
        }
    }

    #[test]
    fn test_unapproved_dispatch_is_rejected() {
        let result = engine(InMemoryProviderDirectory::seeded())
            .dispatch(&claim(IssueType::FlatTire, UrgencyLevel::Medium), &coverage(false));
        assert!(matches!(result, Err(ClaimError::UnapprovedDispatch)));
    }

    #[test]
    fn test_no_provider_available() {
        let result = engine(InMemoryProviderDirectory::new(Vec::new()))
            .dispatch(&claim(IssueType::Lockout, UrgencyLevel::Medium), &coverage(true));
        assert!(matches!(
            result,
            Err(ClaimError::NoProviderAvailable(ServiceType::Lockout))
        ));
    }

    #[test]
    fn test_towing_prefers_highest_score() {
        let dispatch = engine(InMemoryProviderDirectory::seeded())
            .dispatch(&claim(IssueType::Towing, UrgencyLevel::Medium), &coverage(true))
            .unwrap();
        assert_eq!(dispatch.provider.id, "SP-001");
        assert_eq!(dispatch.eta_minutes, 15);
        // 75 * 1.1
        assert_eq!(dispatch.estimated_cost, Money::usd(dec!(83)));
        assert_eq!(dispatch.estimated_arrival, at() + Duration::minutes(15));
    }

    #[test]
    fn test_score_formula() {
        let towing = provider("T", ProviderCategory::Towing, dec!(4.8), 15);
        assert_eq!(provider_score(&towing, ServiceType::Towing), dec!(151));
        assert_eq!(provider_score(&towing, ServiceType::TireChange), dec!(141));

        let roadside = provider("R", ProviderCategory::Roadside, dec!(4.0), 30);
        assert_eq!(provider_score(&roadside, ServiceType::TireChange), dec!(120));
    }

    #[test]
    fn test_tie_goes_to_first_listed() {
        let directory = InMemoryProviderDirectory::new(vec![
            provider("FIRST", ProviderCategory::Towing, dec!(4.5), 20),
            provider("SECOND", ProviderCategory::Towing, dec!(4.5), 20),
        ]);
        let chosen = engine(directory).select_provider(ServiceType::Towing).unwrap();
        assert_eq!(chosen.id, "FIRST");
    }

    #[test]
    fn test_eta_adjustment_and_floor() {
        assert_eq!(eta_minutes(20, UrgencyLevel::Urgent), 15);
        assert_eq!(eta_minutes(20, UrgencyLevel::High), 18);
        assert_eq!(eta_minutes(20, UrgencyLevel::Low), 20);
        assert_eq!(eta_minutes(12, UrgencyLevel::Urgent), 10);
        assert_eq!(eta_minutes(3, UrgencyLevel::Medium), 10);
    }

    #[test]
    fn test_instructions() {
        let mut data = claim(IssueType::DeadBattery, UrgencyLevel::Medium);
        let lines = instructions(&data, ServiceType::BatteryJump);
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "Service technician will contact you at the number on file");
        assert_eq!(lines[3], "Turn off all electrical accessories");

        data.phone_number = Some("(555) 123-4567".to_string());
        let lines = instructions(&data, ServiceType::Towing);
        assert_eq!(lines[0], "Service technician will contact you at (555) 123-4567");
        assert_eq!(lines[5], "Provide destination address to the tow truck driver");
    }
}
