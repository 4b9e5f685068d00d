//! Demand forecast route handler.

use axum::{
    Json,
    extract::{Path, Query, State},
};

use raincheck_core::ProductId;

use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireMerchant;
use crate::models::WeeklyForecast;
use crate::routes::LocationQuery;
use crate::services::forecast;
use crate::services::weather::WeatherError;
use crate::state::AppState;

/// `GET /predict/{product_id}` - 5-day demand forecast for one product.
///
/// Responds 403 when the product is not owned by the merchant, 503 when no
/// demand model has been trained, and 502 when the weather upstream fails
/// or returns an empty forecast.
pub async fn show(
    State(state): State<AppState>,
    RequireMerchant(merchant): RequireMerchant,
    Path(product_id): Path<i64>,
    Query(location): Query<LocationQuery>,
) -> Result<Json<WeeklyForecast>> {
    let product_id = ProductId::new(product_id);

    let owned = ProductRepository::new(state.store())
        .get_owned(product_id, &merchant)
        .await?;
    if owned.is_none() {
        return Err(AppError::AccessDenied);
    }

    let model = state.model().current().ok_or(AppError::ModelUnavailable)?;

    let outlook = state.weather().weekly(location.coords()).await?;
    if outlook.days.is_empty() {
        return Err(AppError::Weather(WeatherError::EmptyForecast));
    }

    Ok(Json(WeeklyForecast {
        product_id,
        location: outlook.location,
        weekly_forecast: forecast::build_forecast(&model, product_id, &outlook.days),
    }))
}
