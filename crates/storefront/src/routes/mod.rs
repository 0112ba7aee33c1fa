//! HTTP route handlers for the storefront API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                     - Liveness check
//! GET  /health/ready               - Readiness check (database)
//!
//! # Vendors
//! GET  /api/vendors                - Approved vendor directory
//! GET  /api/vendors/{slug}         - One approved vendor
//!
//! # Auth
//! POST /api/auth/logout            - Clear session cookies
//!
//! # Cart validation
//! POST /api/cart/validate/add      - Validate an add-to-cart body
//! POST /api/cart/validate/update   - Validate an update-quantity body
//! POST /api/cart/validate/merge    - Validate a guest cart merge body
//! ```
//!
//! [`crate::app`] layers rate limits and the middleware stack over these.

pub mod api;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth API router.
pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/logout", post(api::auth::logout))
}

/// Create the vendor API router.
pub fn vendor_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(api::vendors::index))
        .route("/{slug}", get(api::vendors::show))
}

/// Create the cart validation API router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/validate/add", post(api::cart::validate_add))
        .route("/validate/update", post(api::cart::validate_update))
        .route("/validate/merge", post(api::cart::validate_merge))
}

/// Create the health check router.
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
}

/// Create all routes for the storefront, without rate limits.
pub fn routes() -> Router<AppState> {
    health_routes()
        .nest("/api/auth", auth_routes())
        .nest("/api/vendors", vendor_routes())
        .nest("/api/cart", cart_routes())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies database connectivity before returning OK.
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
