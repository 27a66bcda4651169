//! Request/response bodies

pub mod claims;
pub mod dashboard;
pub mod intake;
pub mod notifications;
pub mod policies;
