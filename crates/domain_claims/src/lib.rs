//! Roadside Claims Domain
//!
//! This crate decides whether a policy covers a roadside request, picks the
//! provider to send, and tracks the claim from submission to completion.
//!
//! # Claim Lifecycle
//!
//! ```text
//! pending ──► assigned ──► in-progress ──► completed
//!    │           ▲
//!    ▼           │
//! denied ────────┘          (any non-terminal state ──► cancelled)
//!
//! approved ──► assigned | in-progress
//! ```
//!
//! Structured submissions are decided and dispatched immediately by the
//! [`ClaimProcessor`]. Dashboard submissions wait as `pending` in the
//! [`ClaimsStore`] until an agent approves them.

pub mod claim;
pub mod claim_data;
pub mod coverage;
pub mod decision;
pub mod dispatch;
pub mod driver;
pub mod error;
pub mod followup;
pub mod processor;
pub mod store;
pub mod strategy;
pub mod validation;

pub use claim::{ClaimRecord, ClaimStatus, Priority};
pub use claim_data::{ClaimData, CompletenessView, Coordinates, Location, VehicleInfo};
pub use coverage::{CoverageDecision, CoverageEngine, CoverageType};
pub use decision::{
    AgentOverride, AiDecision, DecisionFactors, DecisionOutcome, OverrideAction, ProviderSuggestion,
};
pub use dispatch::{DispatchEngine, ServiceDispatch};
pub use driver::{DriverProfile, DriverProfileSource, FixedDriverProfile, RandomDriverProfiles};
pub use error::ClaimError;
pub use followup::{FollowUpDelays, FollowUpPlan, FollowUpScheduler};
pub use processor::ClaimProcessor;
pub use store::{ClaimsStore, StoreListener, StoreSnapshot};
pub use strategy::{Assessment, DecisionStrategy, PlanTierStrategy, PolicyCoverageStrategy};
pub use validation::{ClaimSubmission, LocationSubmission, ValidationError, VehicleSubmission};
