//! Forecast response types.
//!
//! Transient: produced fresh for every prediction request, never cached.

use serde::Serialize;

use raincheck_core::{Advisory, ProductId, WeatherCategory};

/// One forecast day: expected weather, predicted sales, and the advisory.
#[derive(Debug, Clone, Serialize)]
pub struct ForecastDay {
    /// Human-readable date label (e.g. "07 Aug").
    pub date: String,
    /// Expected weather category.
    pub weather: WeatherCategory,
    /// Predicted units sold.
    pub sales: u32,
    /// Restocking advisory derived from the prediction.
    pub advice: Advisory,
}

/// The 5-day forecast for one product.
#[derive(Debug, Clone, Serialize)]
pub struct WeeklyForecast {
    pub product_id: ProductId,
    /// Location name resolved by the weather API.
    pub location: String,
    pub weekly_forecast: Vec<ForecastDay>,
}
