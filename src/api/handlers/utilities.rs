//! Handlers for utility and chlorine lookups.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use validator::Validate;

use crate::api::dto::chlorine::ChlorineResponse;
use crate::api::dto::utility::{UtilitiesQuery, UtilitiesResponse, UtilityResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Lists the utilities serving a ZIP code.
///
/// # Endpoint
///
/// `GET /api/utilities?zip=37135`
///
/// The primary utility comes first, then the rest by population served.
///
/// # Errors
///
/// - 400 if `zip` is not five digits
/// - 404 if no utility is mapped to the ZIP code
pub async fn utilities_by_zip_handler(
    State(state): State<AppState>,
    Query(query): Query<UtilitiesQuery>,
) -> Result<Json<UtilitiesResponse>, AppError> {
    query.validate()?;

    let utilities = state.utility_service.utilities_for_zip(&query.zip).await?;

    Ok(Json(UtilitiesResponse {
        zip_code: query.zip,
        utilities: utilities.into_iter().map(Into::into).collect(),
    }))
}

/// `GET /api/utilities/{pwsid}`
pub async fn utility_handler(
    State(state): State<AppState>,
    Path(pwsid): Path<String>,
) -> Result<Json<UtilityResponse>, AppError> {
    let utility = state.utility_service.get_utility(&pwsid).await?;
    Ok(Json(utility.into()))
}

/// Returns the chlorine statistics of a utility.
///
/// # Endpoint
///
/// `GET /api/utilities/{pwsid}/chlorine`
///
/// # Errors
///
/// Returns 404 with "No chlorine data available for this utility" when the
/// utility has no chlorine record.
pub async fn utility_chlorine_handler(
    State(state): State<AppState>,
    Path(pwsid): Path<String>,
) -> Result<Json<ChlorineResponse>, AppError> {
    let data = state.chlorine_service.chlorine_for_utility(&pwsid).await?;
    Ok(Json(data.into()))
}
