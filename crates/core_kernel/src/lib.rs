//! Core Kernel - Foundational types for the roadside claims system
//!
//! This crate provides the building blocks shared by every domain crate:
//! - Money types with precise decimal arithmetic
//! - Clocks and timezone handling
//! - Claim references and prefixed UUID identifiers
//! - The error type used by ports to external systems

pub mod money;
pub mod temporal;
pub mod identifiers;
pub mod ports;
pub mod error;

pub use money::{Money, Currency, MoneyError};
pub use temporal::{Clock, FixedClock, SystemClock, TemporalError, Timezone, TokioClock};
pub use identifiers::{
    ClaimId, ClaimIdGenerator, CustomerId, DecisionId, DispatchId, IdentifierError,
    NotificationId, SubscriptionId,
};
pub use ports::{DomainPort, PortError};
pub use error::CoreError;
