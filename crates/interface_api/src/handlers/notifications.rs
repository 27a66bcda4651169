//! Notification handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};

use core_kernel::NotificationId;
use domain_notification::NotificationError;

use crate::dto::notifications::*;
use crate::handlers::claims::parse_claim_id;
use crate::{error::ApiError, AppState};

/// Lists notifications, newest first
pub async fn list_notifications(
    State(state): State<AppState>,
    Query(query): Query<NotificationQuery>,
) -> Result<Json<NotificationListResponse>, ApiError> {
    let notifications = match query.claim_id.as_deref().map(str::trim).filter(|id| !id.is_empty()) {
        Some(raw) => state.notifications().for_claim(&parse_claim_id(raw)?),
        None => state.notifications().notifications(),
    };

    Ok(Json(NotificationListResponse::new(notifications)))
}

pub async fn mark_as_read(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<Json<NotificationResponse>, ApiError> {
    let not_found = || NotificationError::NotFound(raw.clone());
    let id: NotificationId = raw.parse().map_err(|_| not_found())?;

    state.notifications().mark_as_read(&id)?;
    let notification = state.notifications().get(&id).ok_or_else(not_found)?;

    Ok(Json(NotificationResponse {
        success: true,
        notification,
    }))
}
