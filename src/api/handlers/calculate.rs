//! Handlers for exposure calculations.

use axum::{Json, extract::State};
use validator::Validate;

use crate::api::dto::calculate::{
    CalculateRequest, CalculateResponse, EstimateRequest, EstimateResponse,
};
use crate::error::AppError;
use crate::state::AppState;

/// Estimates exposure for the household of a ZIP code.
///
/// # Endpoint
///
/// `POST /api/calculate`
///
/// # Request Body
///
/// ```json
/// {
///   "zip_code": "37135",
///   "pwsid": "TN0000511",        // optional, picks among several utilities
///   "glasses_per_day": 8,
///   "glass_volume_liters": 0.25, // optional, defaults to an 8 fl oz glass
///   "shower_minutes": 10         // optional
/// }
/// ```
///
/// # Errors
///
/// - 400 for malformed ZIP/PWSID or out-of-range consumption figures
/// - 404 when no utility serves the ZIP code or it has no chlorine data
pub async fn calculate_handler(
    State(state): State<AppState>,
    Json(payload): Json<CalculateRequest>,
) -> Result<Json<CalculateResponse>, AppError> {
    payload.validate()?;

    let outcome = state.calculator_service.calculate(payload.into()).await?;

    Ok(Json(outcome.into()))
}

/// Estimates exposure from a chlorine level the caller already knows.
///
/// # Endpoint
///
/// `POST /api/estimate`
pub async fn estimate_handler(
    State(state): State<AppState>,
    Json(payload): Json<EstimateRequest>,
) -> Result<Json<EstimateResponse>, AppError> {
    let result = state.calculator_service.estimate(
        payload.chlorine_ppm,
        payload.glasses_per_day,
        payload.glass_volume_liters,
        payload.shower_minutes,
    )?;

    Ok(Json(result.into()))
}
