//! Handlers for administrative data maintenance.
//!
//! All routes here sit behind Bearer token authentication.

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::Utc;
use validator::Validate;

use crate::api::dto::audit::AuditQuery;
use crate::api::dto::record::{
    ChlorineFields, CleanupResponse, DeleteResponse, RecordKeyRequest, RecordRequest,
    UpsertQuery, UpsertResponse,
};
use crate::domain::audit::AuditReport;
use crate::domain::entities::RecordKey;
use crate::domain::validation::QualityReport;
use crate::error::AppError;
use crate::state::AppState;

/// Inserts or replaces a record in one of the reference tables.
///
/// # Endpoint
///
/// `PUT /api/admin/records?force=false`
///
/// # Request Body
///
/// A record tagged with its table:
///
/// ```json
/// {
///   "table": "chlorine_data",
///   "pwsid": "TN0000511",
///   "average_chlorine_ppm": 1.63,
///   "last_updated": "2024-12-31",
///   "data_source": "2024 Consumer Confidence Report"
/// }
/// ```
///
/// # Errors
///
/// - 400 for malformed records or chlorine data failing quality checks
/// - 409 when existing chlorine data is kept (retry with `force=true`)
pub async fn upsert_record_handler(
    State(state): State<AppState>,
    Query(query): Query<UpsertQuery>,
    Json(payload): Json<RecordRequest>,
) -> Result<Json<UpsertResponse>, AppError> {
    payload.validate()?;

    let outcome = state
        .record_service
        .upsert(payload.into(), query.force.unwrap_or(false))
        .await?;

    Ok(Json(outcome.into()))
}

/// Deletes a record by key.
///
/// # Endpoint
///
/// `DELETE /api/admin/records`
///
/// Deleting a water utility also removes its ZIP mappings and chlorine data.
///
/// # Errors
///
/// Returns 404 if no row matches the key.
pub async fn delete_record_handler(
    State(state): State<AppState>,
    Json(payload): Json<RecordKeyRequest>,
) -> Result<Json<DeleteResponse>, AppError> {
    let key = RecordKey::from(payload);
    let label = key.to_string();

    let deleted = state.record_service.delete(key).await?;

    Ok(Json(DeleteResponse {
        key: label,
        deleted,
    }))
}

/// `DELETE /api/admin/chlorine/estimated`
pub async fn cleanup_estimated_handler(
    State(state): State<AppState>,
) -> Result<Json<CleanupResponse>, AppError> {
    let pwsids = state.record_service.cleanup_estimated().await?;

    Ok(Json(CleanupResponse {
        deleted: pwsids.len(),
        pwsids,
    }))
}

/// Scores chlorine data without storing it.
///
/// # Endpoint
///
/// `POST /api/admin/chlorine/validate`
pub async fn validate_chlorine_handler(
    State(state): State<AppState>,
    Json(payload): Json<ChlorineFields>,
) -> Result<Json<QualityReport>, AppError> {
    payload.validate()?;

    let report = state.record_service.assess(&payload.into()).await?;

    Ok(Json(report))
}

/// Reports how fresh the chlorine data of every active utility is.
///
/// # Endpoint
///
/// `GET /api/admin/audit?stale_after_days=180`
pub async fn audit_handler(
    State(state): State<AppState>,
    Query(query): Query<AuditQuery>,
) -> Result<Json<AuditReport>, AppError> {
    let report = state
        .chlorine_service
        .audit(Utc::now().date_naive(), query.stale_after_days())
        .await?;

    Ok(Json(report))
}
