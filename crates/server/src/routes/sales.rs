//! Inventory ledger route handlers: sales, restocking, history.

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::NaiveDate;
use serde::Deserialize;

use raincheck_core::{ProductId, WeatherCategory};

use crate::db::{ProductRepository, SalesRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireMerchant;
use crate::models::{NewSaleRecord, SaleRecord};
use crate::routes::{LocationQuery, StatusResponse};
use crate::state::AppState;

/// Body of `POST /sales`.
#[derive(Debug, Deserialize)]
pub struct SaleInput {
    pub product_id: i64,
    pub quantity: i64,
    pub date: NaiveDate,
}

/// Body of `POST /restock`.
#[derive(Debug, Deserialize)]
pub struct RestockInput {
    pub product_id: i64,
    pub quantity: i64,
}

/// `POST /sales` - record a sale and decrement stock.
///
/// The sale is tagged with the current weather category; if the weather
/// upstream fails the sale still goes through, tagged Cloudy. Responds 400
/// when the quantity exceeds stock and 404 when the product is not owned.
pub async fn create(
    State(state): State<AppState>,
    RequireMerchant(merchant): RequireMerchant,
    Query(location): Query<LocationQuery>,
    Json(input): Json<SaleInput>,
) -> Result<Json<StatusResponse>> {
    if input.quantity <= 0 {
        return Err(AppError::BadRequest("quantity must be positive".to_owned()));
    }

    let products = ProductRepository::new(state.store());
    let product = products
        .get_owned(ProductId::new(input.product_id), &merchant)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {}", input.product_id)))?;

    if product.stock < input.quantity {
        return Err(AppError::InsufficientStock {
            available: product.stock,
        });
    }

    // Read-then-write: two concurrent sales against the same product can
    // race (lost update). The store offers no transaction over REST.
    products
        .set_stock(product.id, &merchant, product.stock - input.quantity)
        .await?;

    // Sales must not fail because the weather API is down; degrade to the
    // neutral category and keep the typed error in the log.
    let recorded_weather = match state.weather().current(location.coords()).await {
        Ok(category) => category,
        Err(err) => {
            tracing::warn!(error = %err, "weather lookup failed, recording sale as Cloudy");
            WeatherCategory::Cloudy
        }
    };

    SalesRepository::new(state.store())
        .record(&NewSaleRecord {
            merchant_id: merchant,
            product_id: product.id,
            quantity_sold: input.quantity,
            date: input.date,
            recorded_weather,
        })
        .await?;

    Ok(Json(StatusResponse::SUCCESS))
}

/// `POST /restock` - add stock to an owned product.
///
/// No upper bound; responds 404 when the product is not owned.
pub async fn restock(
    State(state): State<AppState>,
    RequireMerchant(merchant): RequireMerchant,
    Json(input): Json<RestockInput>,
) -> Result<Json<StatusResponse>> {
    if input.quantity < 0 {
        return Err(AppError::BadRequest(
            "quantity must be non-negative".to_owned(),
        ));
    }

    let products = ProductRepository::new(state.store());
    let product = products
        .get_owned(ProductId::new(input.product_id), &merchant)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {}", input.product_id)))?;

    products
        .set_stock(product.id, &merchant, product.stock + input.quantity)
        .await?;

    Ok(Json(StatusResponse::SUCCESS))
}

/// `GET /sales/history` - the merchant's recent sales, ascending by date.
pub async fn history(
    State(state): State<AppState>,
    RequireMerchant(merchant): RequireMerchant,
) -> Result<Json<Vec<SaleRecord>>> {
    let records = SalesRepository::new(state.store()).history(&merchant).await?;
    Ok(Json(records))
}
