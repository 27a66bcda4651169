//! Request handlers, one module per resource

pub mod claims;
pub mod dashboard;
pub mod health;
pub mod intake;
pub mod notifications;
pub mod policies;
