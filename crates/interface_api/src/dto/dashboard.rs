//! Agent dashboard DTOs

use serde::{Deserialize, Serialize};

use core_kernel::{ClaimId, NotificationId};
use domain_claims::{AgentOverride, AiDecision, ClaimRecord, ClaimStatus, DecisionOutcome, StoreSnapshot};

/// Queue counts shown above the claim list
#[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total: usize,
    pub pending: usize,
    pub assigned: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub overridden: usize,
}

impl DashboardSummary {
    pub fn of(snapshot: &StoreSnapshot) -> Self {
        let count = |status: ClaimStatus| snapshot.claims.iter().filter(|c| c.status == status).count();
        Self {
            total: snapshot.claims.len(),
            pending: count(ClaimStatus::Pending),
            assigned: count(ClaimStatus::Assigned),
            in_progress: count(ClaimStatus::InProgress),
            completed: count(ClaimStatus::Completed),
            overridden: snapshot.decisions.iter().filter(|d| d.is_overridden()).count(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub success: bool,
    pub summary: DashboardSummary,
    pub claims: Vec<ClaimRecord>,
    pub decisions: Vec<AiDecision>,
}

impl From<StoreSnapshot> for DashboardResponse {
    fn from(snapshot: StoreSnapshot) -> Self {
        Self {
            success: true,
            summary: DashboardSummary::of(&snapshot),
            claims: snapshot.claims,
            decisions: snapshot.decisions,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SubmittedClaimResponse {
    pub success: bool,
    pub claim_id: ClaimId,
    pub decision: Option<AiDecision>,
}

/// Agent id may come in the body or the `x-agent-id` header
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ApproveRequest {
    pub agent_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ApprovalResponse {
    pub success: bool,
    pub notification_id: NotificationId,
    pub claim: ClaimRecord,
}

#[derive(Debug, Deserialize)]
pub struct OverrideRequest {
    #[serde(default)]
    pub agent_id: Option<String>,
    pub decision: DecisionOutcome,
    pub reason: String,
}

#[derive(Debug, Serialize)]
pub struct OverrideResponse {
    pub success: bool,
    pub agent_override: AgentOverride,
    pub effective_decision: DecisionOutcome,
}
