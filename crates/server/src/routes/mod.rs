//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                    - Liveness status string
//!
//! # Catalog
//! GET  /products            - The merchant's products
//! POST /products/init       - Seed the starter catalog once per merchant
//!
//! # Forecasting
//! GET  /predict/{product_id} - 5-day demand forecast (optional lat/lon)
//! POST /retrain              - Retrain the demand model from the
//!                              merchant's sales log
//!
//! # Ledger
//! POST /sales               - Record a sale (optional lat/lon)
//! POST /restock             - Add stock
//! GET  /sales/history       - Recent sales, ascending by date
//!
//! # Analytics
//! GET  /analytics/summary   - Month-to-date revenue and top product
//! ```
//!
//! All routes except `/` require the merchant identifier header; see
//! [`crate::middleware::auth`].

pub mod analytics;
pub mod predict;
pub mod products;
pub mod retrain;
pub mod sales;
pub mod status;

use axum::{
    Router,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use crate::services::weather::Coords;
use crate::state::AppState;

/// Create all routes for the API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(status::root))
        .route("/products", get(products::index))
        .route("/products/init", post(products::init))
        .route("/predict/{product_id}", get(predict::show))
        .route("/sales", post(sales::create))
        .route("/sales/history", get(sales::history))
        .route("/restock", post(sales::restock))
        .route("/analytics/summary", get(analytics::summary))
        .route("/retrain", post(retrain::run))
}

/// Simple `{"status": ...}` acknowledgment body.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

impl StatusResponse {
    pub const SUCCESS: Self = Self { status: "success" };
    pub const SKIPPED: Self = Self { status: "skipped" };
}

/// Optional device coordinates accepted by weather-dependent routes.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct LocationQuery {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

impl LocationQuery {
    /// Coordinates when both components were supplied.
    #[must_use]
    pub fn coords(self) -> Option<Coords> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some(Coords { lat, lon }),
            _ => None,
        }
    }
}
