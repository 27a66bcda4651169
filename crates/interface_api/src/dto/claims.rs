//! Claims DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{ClaimId, Money};
use domain_claims::{AiDecision, ClaimRecord, ClaimStatus, CoverageDecision, ServiceDispatch};

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// Outcome of a processed claim submission
#[derive(Debug, Serialize)]
pub struct ClaimResponse {
    pub success: bool,
    pub claim_id: ClaimId,
    pub status: ClaimStatus,
    pub coverage: CoverageDecision,
    pub dispatch: Option<ServiceDispatch>,
    pub estimated_arrival: Option<DateTime<Utc>>,
    pub total_cost: Money,
    pub message: String,
}

impl From<ClaimRecord> for ClaimResponse {
    fn from(record: ClaimRecord) -> Self {
        let message = match &record.dispatch {
            Some(dispatch) => format!(
                "Claim approved. {} is on the way, arriving in about {} minutes.",
                dispatch.provider.name, dispatch.eta_minutes
            ),
            None => record.coverage.reason.clone(),
        };

        Self {
            success: true,
            estimated_arrival: record.dispatch.as_ref().map(|d| d.estimated_arrival),
            claim_id: record.id,
            status: record.status,
            coverage: record.coverage,
            dispatch: record.dispatch,
            total_cost: record.total_cost,
            message,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ClaimDetailResponse {
    pub success: bool,
    pub claim: ClaimRecord,
    pub decision: Option<AiDecision>,
}

#[derive(Debug, Serialize)]
pub struct ClaimStatusResponse {
    pub success: bool,
    pub claim: ClaimRecord,
}
