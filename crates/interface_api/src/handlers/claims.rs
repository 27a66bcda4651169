//! Claims handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use core_kernel::ClaimId;
use domain_claims::{ClaimError, ClaimStatus, ClaimSubmission};

use crate::dto::claims::*;
use crate::extract::AppJson;
use crate::{error::ApiError, AppState};

/// Validates, decides and dispatches a claim in one step
pub async fn submit_claim(
    State(state): State<AppState>,
    AppJson(submission): AppJson<ClaimSubmission>,
) -> Result<(StatusCode, Json<ClaimResponse>), ApiError> {
    let claim = submission.validate(state.current_year())?;
    let record = state.processor.process(claim)?;

    info!(claim_id = %record.id, status = %record.status, "Claim processed");
    Ok((StatusCode::CREATED, Json(record.into())))
}

/// Gets a claim with its decision
pub async fn get_claim(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ClaimDetailResponse>, ApiError> {
    let id = parse_claim_id(&id)?;
    let claim = state
        .store()
        .get(&id)
        .ok_or_else(|| ClaimError::ClaimNotFound(id.to_string()))?;

    Ok(Json(ClaimDetailResponse {
        success: true,
        decision: state.store().decision_for(&id),
        claim,
    }))
}

/// Updates claim status
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(request): AppJson<UpdateStatusRequest>,
) -> Result<Json<ClaimStatusResponse>, ApiError> {
    let id = parse_claim_id(&id)?;
    let status: ClaimStatus = request.status.trim().parse()?;
    let claim = state.store().update_status(&id, status)?;

    Ok(Json(ClaimStatusResponse { success: true, claim }))
}

/// Malformed references cannot name a stored claim, so they are reported as missing
pub(crate) fn parse_claim_id(raw: &str) -> Result<ClaimId, ApiError> {
    raw.parse()
        .map_err(|_| ClaimError::ClaimNotFound(raw.to_string()).into())
}
