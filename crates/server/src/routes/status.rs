//! Liveness status route.

use axum::Json;
use serde::Serialize;

/// Body of the root status route.
#[derive(Debug, Serialize)]
pub struct ApiStatus {
    pub status: &'static str,
}

/// `GET /` - liveness status string, no auth required.
pub async fn root() -> Json<ApiStatus> {
    Json(ApiStatus {
        status: "Raincheck API running",
    })
}
