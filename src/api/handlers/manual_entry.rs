//! Handler for public manual chlorine entry.

use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;
use validator::Validate;

use crate::api::dto::chlorine::{ManualEntryRequest, ManualEntryResponse};
use crate::application::services::ManualAction;
use crate::error::AppError;
use crate::state::AppState;

/// Stores a chlorine reading typed in by a user.
///
/// # Endpoint
///
/// `POST /api/chlorine/manual`
///
/// Used when a utility's report cannot be processed automatically. The entry
/// is marked "Manual User Entry", dated today, and replaces automated data.
///
/// # Response Codes
///
/// - **201 Created**: no chlorine record existed
/// - **200 OK**: the existing record was replaced
/// - **400**: invalid input or failed quality checks
/// - **404**: unknown utility
pub async fn manual_entry_handler(
    State(state): State<AppState>,
    Json(payload): Json<ManualEntryRequest>,
) -> Result<(StatusCode, Json<ManualEntryResponse>), AppError> {
    payload.validate()?;

    let outcome = state
        .record_service
        .submit_manual_measurement(payload.into(), Utc::now().date_naive())
        .await?;

    let status = match outcome.action {
        ManualAction::Inserted => StatusCode::CREATED,
        ManualAction::Updated => StatusCode::OK,
    };

    Ok((status, Json(outcome.into())))
}
