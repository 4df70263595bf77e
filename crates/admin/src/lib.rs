//! Meroghar property records backend.
//!
//! Owners, addresses and homes stored in `PostgreSQL`, an email login for
//! user accounts, and a staff-only JSON admin surface for listing,
//! searching and filtering the records.
//!
//! # Layout
//!
//! - [`db`] - connection pool, migrations and one repository per table
//! - [`models`] - domain records and their validated inputs
//! - [`services`] - the email authentication backend
//! - [`listing`] - declarative listing configs and search/filter SQL
//! - [`routes`], [`middleware`] - the axum HTTP surface

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod listing;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use axum::{Router, extract::State, http::StatusCode, routing::get};
use tower_http::services::ServeDir;

use config::MEDIA_URL;
use state::AppState;

/// Build the application router (without session or tracing layers).
pub fn app(state: AppState) -> Router {
    let media = ServeDir::new(&state.config().media_root);
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes::routes())
        .nest_service(MEDIA_URL, media)
        .with_state(state)
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
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
