//! Raincheck server library.
//!
//! This crate provides the inventory/sales API as a library, allowing it to
//! be tested end-to-end and reused by the CLI tools.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the full application router.
///
/// Includes every API route plus the `/health` liveness endpoint, the
/// request-id middleware, permissive CORS (the dashboard is served from a
/// separate origin), and request tracing. Sentry layers are added by the
/// binary so tests run without them.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .layer(axum::middleware::from_fn(
            middleware::request_id::request_id_middleware,
        ))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check upstreams.
async fn health() -> &'static str {
    "ok"
}
