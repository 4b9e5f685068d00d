//! Analytics route handler.

use axum::{Json, extract::State};
use chrono::Utc;

use crate::db::{ProductRepository, SalesRepository};
use crate::error::Result;
use crate::middleware::RequireMerchant;
use crate::services::analytics::{self, Summary};
use crate::state::AppState;

/// `GET /analytics/summary` - month-to-date revenue and top product.
pub async fn summary(
    State(state): State<AppState>,
    RequireMerchant(merchant): RequireMerchant,
) -> Result<Json<Summary>> {
    let sales = SalesRepository::new(state.store())
        .all_for_merchant(&merchant)
        .await?;
    let products = ProductRepository::new(state.store()).list(&merchant).await?;

    let month_start = analytics::month_start(Utc::now().date_naive());
    Ok(Json(analytics::summarize(&sales, &products, month_start)))
}
