//! Conversational intake handler

use axum::{extract::State, Json};

use domain_intake::{IntakeError, IntakeTurn};

use crate::dto::intake::*;
use crate::extract::AppJson;
use crate::{error::ApiError, AppState};

/// Processes one utterance of a voice or chat claim conversation
pub async fn process_turn(
    State(state): State<AppState>,
    AppJson(request): AppJson<IntakeTurnRequest>,
) -> Result<Json<IntakeTurnResponse>, ApiError> {
    let user_input = request.user_input.ok_or(IntakeError::MissingInput)?;
    let intake = state.intake.as_ref().ok_or(IntakeError::Disabled)?;

    let result = intake
        .process_turn(IntakeTurn {
            user_input,
            history: request.history,
            current_step: request.current_step,
            current_data: request.current_data,
        })
        .await?;

    Ok(Json(IntakeTurnResponse {
        success: true,
        result,
    }))
}
