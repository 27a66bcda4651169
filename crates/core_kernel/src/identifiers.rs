//! Strongly-typed identifiers for domain entities
//!
//! Most identifiers are newtypes around UUIDs displayed with a short prefix.
//! Claim identifiers are the exception: customers read them back over the
//! phone, so they use the sequential `CLM-YYYY-NNN` reference format.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};
use thiserror::Error;
use uuid::Uuid;

macro_rules! define_id {
    ($name:ident, $prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new time-ordered identifier (v7)
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Returns the identifier prefix for display
            pub fn prefix() -> &'static str {
                $prefix
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}-{}", $prefix, self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let uuid_str = s.strip_prefix(concat!($prefix, "-")).unwrap_or(s);
                Ok(Self(Uuid::parse_str(uuid_str)?))
            }
        }
    };
}

define_id!(DispatchId, "DISP");
define_id!(DecisionId, "DEC");
define_id!(NotificationId, "SMS");
define_id!(CustomerId, "CUST");

/// Handle returned when registering a change observer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Errors raised when parsing a claim reference
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentifierError {
    #[error("Claim reference must start with CLM-: {0}")]
    MissingClaimPrefix(String),
}

/// Human-readable claim reference, e.g. `CLM-2024-001`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimId(String);

impl ClaimId {
    pub const PREFIX: &'static str = "CLM";

    /// Builds the reference for a given year and sequence number
    pub fn from_parts(year: i32, sequence: u32) -> Self {
        Self(format!("{}-{}-{:03}", Self::PREFIX, year, sequence))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last four characters, used for short tracking links
    pub fn short_code(&self) -> &str {
        let start = self
            .0
            .char_indices()
            .rev()
            .nth(3)
            .map(|(idx, _)| idx)
            .unwrap_or(0);
        &self.0[start..]
    }
}

impl fmt::Display for ClaimId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ClaimId {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.strip_prefix("CLM-") {
            Some(rest) if !rest.is_empty() => Ok(Self(trimmed.to_string())),
            _ => Err(IdentifierError::MissingClaimPrefix(s.to_string())),
        }
    }
}

/// Issues sequential claim references within a process
#[derive(Debug)]
pub struct ClaimIdGenerator {
    next: AtomicU32,
}

impl ClaimIdGenerator {
    /// Starts numbering at `first`
    pub fn starting_at(first: u32) -> Self {
        Self {
            next: AtomicU32::new(first),
        }
    }

    /// Issues the next reference stamped with the year of `at`
    pub fn next_id(&self, at: DateTime<Utc>) -> ClaimId {
        let sequence = self.next.fetch_add(1, Ordering::SeqCst);
        ClaimId::from_parts(at.year(), sequence)
    }
}

impl Default for ClaimIdGenerator {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_dispatch_id_display() {
        let id = DispatchId::new();
        assert!(id.to_string().starts_with("DISP-"));
    }

    #[test]
    fn test_id_parsing() {
        let original = NotificationId::new();
        let parsed: NotificationId = original.to_string().parse().unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn test_claim_id_format() {
        let id = ClaimId::from_parts(2024, 7);
        assert_eq!(id.as_str(), "CLM-2024-007");
        assert_eq!(id.short_code(), "-007");
    }

    #[test]
    fn test_claim_id_generator_is_sequential() {
        let generator = ClaimIdGenerator::starting_at(6);
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();

        assert_eq!(generator.next_id(at).as_str(), "CLM-2025-006");
        assert_eq!(generator.next_id(at).as_str(), "CLM-2025-007");
    }

    #[test]
    fn test_claim_id_parse_requires_prefix() {
        assert!("CLM-2024-001".parse::<ClaimId>().is_ok());
        assert!("2024-001".parse::<ClaimId>().is_err());
        assert!("CLM-".parse::<ClaimId>().is_err());
    }
}
