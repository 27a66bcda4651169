//! Policy Domain
//!
//! Reference data and rules the roadside claim engine decides against:
//!
//! - **Service catalog**: issue types customers report, service types
//!   providers perform, and the mapping between them
//! - **Policies**: roadside benefit terms, monthly limits and usage counters
//! - **Pricing**: base costs with urgency and time-of-day multipliers
//! - **Plan tiers**: flat terms used by the dashboard heuristic
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_policy::{InMemoryPolicyRepository, PolicyRepository, PricingRules};
//!
//! let policies = InMemoryPolicyRepository::seeded();
//! let policy = policies.find_by_number("ABC123456");
//! let cost = PricingRules::default().estimate(ServiceType::Towing, UrgencyLevel::High, now);
//! ```

pub mod service;
pub mod policy;
pub mod pricing;
pub mod plan;
pub mod repository;
pub mod error;

pub use service::{IssueType, ServiceType};
pub use policy::{PlanType, PolicyRecord, PolicyStatus, RoadsideBenefit, UNKNOWN_POLICY_NUMBER};
pub use pricing::{PricingRules, TimeBand, UrgencyLevel};
pub use plan::PlanTier;
pub use repository::{
    normalize_policy_number, seed_policies, InMemoryPolicyRepository, PolicyRepository,
};
pub use error::PolicyError;
