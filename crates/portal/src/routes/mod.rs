//! HTTP route handlers for the portal.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                     - Session resolver (loading | redirect | blank)
//! GET  /health               - Liveness
//! GET  /health/ready         - Readiness (hosted auth reachable)
//!
//! # Auth
//! GET  /login                - Login page
//! POST /login                - Login action
//! POST /logout               - Logout action
//!
//! # Landing views (role-guarded)
//! GET  /admin                - Admin dashboard
//! GET  /customer-dashboard   - Customer dashboard
//!
//! # Access guard
//! GET  /unauthorized         - Role mismatch page
//! GET  /unauthorized/back    - Back one step
//! GET  /unauthorized/home    - Home
//!
//! # API
//! GET  /api/session/route    - Resolver decision as JSON
//! GET  /api/admin/me         - Signed-in admin (401/403 otherwise)
//! GET  /api/customer/me      - Signed-in customer (401/403 otherwise)
//! ```

pub mod auth;
pub mod dashboards;
pub mod guard;
pub mod resolver;

use axum::{
    Router,
    extract::State,
    http::{StatusCode, Uri},
    routing::{get, post},
};

use crate::error::AppError;
use crate::state::AppState;

/// Create the access-guard routes router.
pub fn guard_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(guard::unauthorized))
        .route("/back", get(guard::back))
        .route("/home", get(guard::home))
}

/// Create all routes for the portal.
pub fn routes() -> Router<AppState> {
    let paths = bsm_core::RoutePaths::DEFAULT;

    Router::new()
        .route(paths.home, get(resolver::landing))
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .route(paths.login, get(auth::login_page).post(auth::login))
        .route("/logout", post(auth::logout))
        .route(paths.admin, get(dashboards::admin))
        .route(paths.customer, get(dashboards::customer))
        .nest(paths.unauthorized, guard_routes())
        .route("/api/session/route", get(resolver::route_decision))
        .route("/api/admin/me", get(dashboards::admin_me))
        .route("/api/customer/me", get(dashboards::customer_me))
        .fallback(not_found)
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the hosted auth service is unreachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    if state.auth().is_reachable().await {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}
