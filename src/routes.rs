//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /health`   - Health check: DB and cache (public)
//! - `/api/*`         - Lookups and calculations (public)
//! - `/api/chlorine/manual` - Manual chlorine entry (public, strict limit)
//! - `/api/admin/*`   - Data maintenance (Bearer token required)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket (configurable for proxy deployments)
//! - **Authentication** - Bearer token on admin routes
//! - **Path normalization** - Trailing slash handling

use crate::api::handlers::health_handler;
use crate::api::middleware::{auth, rate_limit, tracing};
use crate::api::routes::{admin_routes, public_routes, submission_routes};
use crate::state::AppState;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `behind_proxy` - when `true`, rate limiting reads client IP from
///   `X-Forwarded-For` / `X-Real-IP` headers instead of the peer socket address;
///   enable only when the service runs behind a trusted reverse proxy
pub fn app_router(state: AppState, behind_proxy: bool) -> NormalizePath<Router> {
    let admin = admin_routes().route_layer(middleware::from_fn_with_state(
        state.clone(),
        auth::layer,
    ));
    let admin = rate_limit::apply(admin, rate_limit::SECURE, behind_proxy);

    let submissions = rate_limit::apply(submission_routes(), rate_limit::SECURE, behind_proxy);
    let public = rate_limit::apply(public_routes(), rate_limit::PUBLIC, behind_proxy);

    let api = Router::new()
        .merge(public)
        .merge(submissions)
        .nest("/admin", admin);

    let router = Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api)
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
