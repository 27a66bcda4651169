//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! roadside claims test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built test data for the seeded customers and scenarios
//! - `builders`: Claim builders and a harness wiring the claim pipeline
//! - `assertions`: Custom assertion helpers for claim outcomes
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use assertions::*;
pub use generators::*;
