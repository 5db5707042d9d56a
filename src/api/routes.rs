//! API route configuration.
//!
//! Routes are returned without rate limiting or authentication;
//! [`crate::routes::app_router`] layers those on.

use crate::api::handlers::{
    audit_handler, calculate_handler, cleanup_estimated_handler, delete_record_handler,
    estimate_handler, manual_entry_handler, upsert_record_handler, utilities_by_zip_handler,
    utility_chlorine_handler, utility_handler, validate_chlorine_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, post, put},
};

/// Read-only lookups and calculations.
///
/// # Endpoints
///
/// - `GET  /utilities?zip=`             - Utilities serving a ZIP code
/// - `GET  /utilities/{pwsid}`          - A single utility
/// - `GET  /utilities/{pwsid}/chlorine` - Chlorine data of a utility
/// - `POST /calculate`                  - Exposure for a ZIP code
/// - `POST /estimate`                   - Exposure for a given chlorine level
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/utilities", get(utilities_by_zip_handler))
        .route("/utilities/{pwsid}", get(utility_handler))
        .route("/utilities/{pwsid}/chlorine", get(utility_chlorine_handler))
        .route("/calculate", post(calculate_handler))
        .route("/estimate", post(estimate_handler))
}

/// Public writes.
///
/// # Endpoints
///
/// - `POST /chlorine/manual` - Submit a chlorine reading by hand
pub fn submission_routes() -> Router<AppState> {
    Router::new().route("/chlorine/manual", post(manual_entry_handler))
}

/// Data maintenance, protected by Bearer token authentication.
///
/// # Endpoints
///
/// - `PUT    /records`             - Insert or replace a record
/// - `DELETE /records`             - Delete a record by key
/// - `DELETE /chlorine/estimated`  - Remove estimated chlorine data
/// - `POST   /chlorine/validate`   - Score chlorine data without storing it
/// - `GET    /audit`               - Freshness audit of all utilities
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/records",
            put(upsert_record_handler).delete(delete_record_handler),
        )
        .route("/chlorine/estimated", delete(cleanup_estimated_handler))
        .route("/chlorine/validate", post(validate_chlorine_handler))
        .route("/audit", get(audit_handler))
}
