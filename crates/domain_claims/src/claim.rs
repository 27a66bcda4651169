//! Claim record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::{ClaimId, CustomerId, Money};
use domain_policy::UrgencyLevel;

use crate::claim_data::ClaimData;
use crate::coverage::CoverageDecision;
use crate::dispatch::ServiceDispatch;
use crate::error::ClaimError;

/// Claim status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClaimStatus {
    /// Submitted, waiting for an agent
    Pending,
    /// Approved by the coverage engine on submission
    Approved,
    /// Denied by the coverage engine on submission
    Denied,
    /// An agent has taken the claim
    Assigned,
    /// Provider on scene
    InProgress,
    Completed,
    Cancelled,
}

impl ClaimStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimStatus::Pending => "pending",
            ClaimStatus::Approved => "approved",
            ClaimStatus::Denied => "denied",
            ClaimStatus::Assigned => "assigned",
            ClaimStatus::InProgress => "in-progress",
            ClaimStatus::Completed => "completed",
            ClaimStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ClaimStatus::Completed | ClaimStatus::Cancelled)
    }

    /// Whether the lifecycle allows moving from `self` to `target`
    pub fn can_transition_to(&self, target: ClaimStatus) -> bool {
        use ClaimStatus::*;
        matches!(
            (*self, target),
            (Pending, Assigned) |
            (Pending, Denied) |
            (Approved, Assigned) |
            (Approved, InProgress) |
            (Denied, Assigned) |
            (Assigned, InProgress) |
            (InProgress, Completed) |
            (Pending | Approved | Denied | Assigned | InProgress, Cancelled)
        )
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClaimStatus {
    type Err = ClaimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            ClaimStatus::Pending,
            ClaimStatus::Approved,
            ClaimStatus::Denied,
            ClaimStatus::Assigned,
            ClaimStatus::InProgress,
            ClaimStatus::Completed,
            ClaimStatus::Cancelled,
        ]
        .into_iter()
        .find(|status| status.as_str() == s)
        .ok_or_else(|| ClaimError::UnknownStatus(s.to_string()))
    }
}

/// Queue priority, taken from the customer's urgency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl From<UrgencyLevel> for Priority {
    fn from(urgency: UrgencyLevel) -> Self {
        match urgency {
            UrgencyLevel::Low => Priority::Low,
            UrgencyLevel::Medium => Priority::Medium,
            UrgencyLevel::High => Priority::High,
            UrgencyLevel::Urgent => Priority::Urgent,
        }
    }
}

/// A stored roadside claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimRecord {
    pub id: ClaimId,
    pub customer_id: CustomerId,
    pub claim_data: ClaimData,
    pub status: ClaimStatus,
    pub priority: Priority,
    pub coverage: CoverageDecision,
    pub dispatch: Option<ServiceDispatch>,
    /// Name of the strategy that assessed the claim
    pub decided_by: String,
    pub assigned_agent_id: Option<String>,
    /// Customer's share plus what the policy pays; zero when denied
    pub total_cost: Money,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ClaimRecord {
    pub fn customer_name(&self) -> &str {
        &self.claim_data.customer_name
    }

    pub fn customer_phone(&self) -> Option<&str> {
        self.claim_data.phone_number()
    }

    /// Updates the status
    pub fn update_status(&mut self, status: ClaimStatus, at: DateTime<Utc>) -> Result<(), ClaimError> {
        if !self.status.can_transition_to(status) {
            return Err(ClaimError::InvalidStatusTransition {
                from: self.status.to_string(),
                to: status.to_string(),
            });
        }
        self.status = status;
        self.updated_at = at;
        Ok(())
    }
}
