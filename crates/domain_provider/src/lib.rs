//! Service Provider Domain
//!
//! The roster of towing companies, mechanics, locksmiths and fuel couriers
//! that roadside claims are dispatched to. Providers are reference data:
//! immutable after load and looked up through [`ProviderDirectory`].

pub mod provider;
pub mod directory;
pub mod error;

pub use provider::{ProviderCategory, ServiceProvider};
pub use directory::{InMemoryProviderDirectory, ProviderDirectory};
pub use error::ProviderError;
