//! Product catalog route handlers.

use axum::{Json, extract::State};

use crate::db::ProductRepository;
use crate::error::Result;
use crate::middleware::RequireMerchant;
use crate::models::Product;
use crate::routes::StatusResponse;
use crate::state::AppState;

/// `GET /products` - the merchant's products, ordered by ID.
pub async fn index(
    State(state): State<AppState>,
    RequireMerchant(merchant): RequireMerchant,
) -> Result<Json<Vec<Product>>> {
    let products = ProductRepository::new(state.store()).list(&merchant).await?;
    Ok(Json(products))
}

/// `POST /products/init` - seed the starter catalog once per merchant.
///
/// Idempotent: a merchant that already has products gets `skipped`.
pub async fn init(
    State(state): State<AppState>,
    RequireMerchant(merchant): RequireMerchant,
) -> Result<Json<StatusResponse>> {
    let repository = ProductRepository::new(state.store());

    if repository.exists_any(&merchant).await? {
        return Ok(Json(StatusResponse::SKIPPED));
    }

    repository.insert_defaults(&merchant).await?;
    tracing::info!(merchant = %merchant, "seeded starter catalog");
    Ok(Json(StatusResponse::SUCCESS))
}
