//! Test Data Builders
//!
//! Builders with sensible defaults so tests only spell out the fields they
//! care about, plus a harness builder that wires the claim pipeline together
//! the same way the API server does.

use chrono::{DateTime, Utc};
use std::sync::Arc;

use core_kernel::{Clock, FixedClock, TokioClock};
use domain_claims::{
    ClaimData, ClaimProcessor, ClaimsStore, CoverageEngine, DispatchEngine, DriverProfile,
    FixedDriverProfile, FollowUpDelays, FollowUpScheduler, PlanTierStrategy, PolicyCoverageStrategy,
};
use domain_notification::{DeliveryDelays, NotificationCenter};
use domain_policy::{InMemoryPolicyRepository, IssueType, PricingRules, UrgencyLevel};
use domain_provider::InMemoryProviderDirectory;

use crate::fixtures::{ClaimFixtures, DriverFixtures, TemporalFixtures};

/// Builder for claim details
pub struct ClaimDataBuilder {
    claim: ClaimData,
}

impl Default for ClaimDataBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaimDataBuilder {
    /// Starts from scenario A
    pub fn new() -> Self {
        Self {
            claim: ClaimFixtures::scenario_a(),
        }
    }

    pub fn with_customer(mut self, name: impl Into<String>) -> Self {
        self.claim.customer_name = name.into();
        self
    }

    pub fn with_policy_number(mut self, number: impl Into<String>) -> Self {
        self.claim.policy_number = Some(number.into());
        self
    }

    pub fn without_policy_number(mut self) -> Self {
        self.claim.policy_number = None;
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.claim.phone_number = Some(phone.into());
        self
    }

    pub fn without_phone(mut self) -> Self {
        self.claim.phone_number = None;
        self
    }

    pub fn with_issue(mut self, issue: IssueType) -> Self {
        self.claim.issue_type = issue;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.claim.issue_description = description.into();
        self
    }

    pub fn with_urgency(mut self, urgency: UrgencyLevel) -> Self {
        self.claim.urgency_level = urgency;
        self
    }

    pub fn with_city(mut self, city: impl Into<String>, state: impl Into<String>) -> Self {
        self.claim.location.city = city.into();
        self.claim.location.state = state.into();
        self
    }

    pub fn with_vehicle(mut self, make: impl Into<String>, model: impl Into<String>, year: i32) -> Self {
        self.claim.vehicle_info.make = make.into();
        self.claim.vehicle_info.model = model.into();
        self.claim.vehicle_info.year = year;
        self
    }

    pub fn build(self) -> ClaimData {
        self.claim
    }
}

/// Claim pipeline assembled for a test
pub struct TestHarness {
    pub clock: Arc<dyn Clock>,
    pub policies: Arc<InMemoryPolicyRepository>,
    pub processor: ClaimProcessor,
}

impl TestHarness {
    pub fn store(&self) -> &ClaimsStore {
        self.processor.store()
    }

    pub fn notifications(&self) -> &NotificationCenter {
        self.store().notifications()
    }
}

/// Builder for [`TestHarness`]
///
/// Defaults: fixed clock on a weekday morning, seeded policies and
/// providers, standard UTC pricing, a fixed driver, default delays.
pub struct TestHarnessBuilder {
    clock: Arc<dyn Clock>,
    policies: InMemoryPolicyRepository,
    providers: InMemoryProviderDirectory,
    dashboard_providers: InMemoryProviderDirectory,
    pricing: PricingRules,
    driver: DriverProfile,
    followup_delays: FollowUpDelays,
    delivery_delays: DeliveryDelays,
}

impl Default for TestHarnessBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestHarnessBuilder {
    pub fn new() -> Self {
        Self {
            clock: Arc::new(FixedClock::at(TemporalFixtures::weekday_morning())),
            policies: InMemoryPolicyRepository::seeded(),
            providers: InMemoryProviderDirectory::seeded(),
            dashboard_providers: InMemoryProviderDirectory::dashboard_roster(),
            pricing: PricingRules::default(),
            driver: DriverFixtures::driver(),
            followup_delays: FollowUpDelays::default(),
            delivery_delays: DeliveryDelays::default(),
        }
    }

    /// Fixed clock; time never moves unless the test moves it
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.clock = Arc::new(FixedClock::at(now));
        self
    }

    /// Clock that follows tokio's (pausable) time from `anchor`
    pub fn with_tokio_clock_at(mut self, anchor: DateTime<Utc>) -> Self {
        self.clock = Arc::new(TokioClock::anchored_at(anchor));
        self
    }

    pub fn with_policies(mut self, policies: InMemoryPolicyRepository) -> Self {
        self.policies = policies;
        self
    }

    pub fn with_providers(mut self, providers: InMemoryProviderDirectory) -> Self {
        self.providers = providers;
        self
    }

    pub fn with_dashboard_providers(mut self, providers: InMemoryProviderDirectory) -> Self {
        self.dashboard_providers = providers;
        self
    }

    pub fn with_pricing(mut self, pricing: PricingRules) -> Self {
        self.pricing = pricing;
        self
    }

    pub fn with_driver(mut self, driver: DriverProfile) -> Self {
        self.driver = driver;
        self
    }

    pub fn with_followup_delays(mut self, delays: FollowUpDelays) -> Self {
        self.followup_delays = delays;
        self
    }

    pub fn with_delivery_delays(mut self, delays: DeliveryDelays) -> Self {
        self.delivery_delays = delays;
        self
    }

    pub fn build(self) -> TestHarness {
        let clock = self.clock;
        let policies = Arc::new(self.policies);
        let providers = Arc::new(self.providers);

        let notifications = NotificationCenter::with_delays(clock.clone(), self.delivery_delays);
        let followups = FollowUpScheduler::new(
            notifications.clone(),
            Arc::new(FixedDriverProfile(self.driver)),
            self.followup_delays,
        );
        let store = ClaimsStore::new(
            clock.clone(),
            Arc::new(PlanTierStrategy::new(Arc::new(self.dashboard_providers))),
            notifications,
            followups,
        );

        let dispatch = DispatchEngine::new(providers, self.pricing.clone(), clock.clone());
        let strategy = PolicyCoverageStrategy::new(
            CoverageEngine::new(policies.clone(), self.pricing, clock.clone()),
            dispatch.clone(),
        );
        let processor = ClaimProcessor::new(strategy, dispatch, store, clock.clone());

        TestHarness {
            clock,
            policies,
            processor,
        }
    }
}
