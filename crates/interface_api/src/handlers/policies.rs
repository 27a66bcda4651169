//! Policy lookup handler

use axum::{
    extract::{Path, State},
    Json,
};

use domain_policy::PolicyError;

use crate::dto::policies::PolicyResponse;
use crate::{error::ApiError, AppState};

/// Gets a policy by number; the `POL-` prefix is optional
pub async fn get_policy(
    State(state): State<AppState>,
    Path(number): Path<String>,
) -> Result<Json<PolicyResponse>, ApiError> {
    let policy = state
        .policies
        .find_by_number(&number)
        .ok_or(PolicyError::PolicyNotFound(number))?;

    Ok(Json(PolicyResponse {
        success: true,
        policy,
    }))
}
