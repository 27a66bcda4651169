//! Agent dashboard handlers

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};

use crate::dto::dashboard::*;
use crate::extract::AppJson;
use crate::handlers::claims::parse_claim_id;
use crate::middleware::AGENT_HEADER;
use crate::{error::ApiError, AppState};
use domain_claims::ClaimSubmission;

/// Current claims and decisions
pub async fn snapshot(State(state): State<AppState>) -> Json<DashboardResponse> {
    Json(state.store().snapshot().into())
}

/// Queues a claim for agent review
pub async fn submit_claim(
    State(state): State<AppState>,
    AppJson(submission): AppJson<ClaimSubmission>,
) -> Result<(StatusCode, Json<SubmittedClaimResponse>), ApiError> {
    let claim = submission.validate(state.current_year())?;
    let claim_id = state.store().submit(claim)?;

    Ok((
        StatusCode::CREATED,
        Json(SubmittedClaimResponse {
            success: true,
            decision: state.store().decision_for(&claim_id),
            claim_id,
        }),
    ))
}

/// Approves a claim; the body may be omitted when `x-agent-id` is sent
pub async fn approve_claim(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    request: Option<AppJson<ApproveRequest>>,
) -> Result<Json<ApprovalResponse>, ApiError> {
    let id = parse_claim_id(&id)?;
    let agent_id = agent_id(request.and_then(|AppJson(body)| body.agent_id), &headers)?;

    let notification_id = state.store().approve(&id, &agent_id)?;
    let claim = state
        .store()
        .get(&id)
        .ok_or_else(|| ApiError::NotFound(format!("Claim not found: {id}")))?;

    Ok(Json(ApprovalResponse {
        success: true,
        notification_id,
        claim,
    }))
}

pub async fn override_decision(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    AppJson(request): AppJson<OverrideRequest>,
) -> Result<Json<OverrideResponse>, ApiError> {
    let id = parse_claim_id(&id)?;
    let agent_id = agent_id(request.agent_id, &headers)?;

    let reason = request.reason.trim();
    if reason.is_empty() {
        return Err(ApiError::Validation {
            field: Some("reason"),
            message: "Override reason is required".to_string(),
        });
    }

    let agent_override = state
        .store()
        .override_decision(&id, &agent_id, request.decision, reason)?;
    let effective_decision = state
        .store()
        .decision_for(&id)
        .map(|decision| decision.effective_decision())
        .unwrap_or(request.decision);

    Ok(Json(OverrideResponse {
        success: true,
        agent_override,
        effective_decision,
    }))
}

fn agent_id(from_body: Option<String>, headers: &HeaderMap) -> Result<String, ApiError> {
    from_body
        .or_else(|| {
            headers
                .get(AGENT_HEADER)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string)
        })
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::Validation {
            field: Some("agent_id"),
            message: "Agent id is required".to_string(),
        })
}
