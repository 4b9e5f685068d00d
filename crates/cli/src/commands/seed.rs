//! Seed a merchant with a synthetic, weather-correlated sales history.
//!
//! Generates one sale per product per day. Weather is drawn 40/30/30
//! (Clear/Rain/Cloudy) and quantities follow the demand profile the model
//! is expected to learn: cold products sell on clear days, warm products
//! sell in the rain, everything sells moderately under clouds.

use chrono::{Duration as ChronoDuration, Utc};
use rand::Rng;
use tracing::info;

use raincheck_core::{MerchantId, WeatherCategory};
use raincheck_server::config::StoreConfig;
use raincheck_server::db::{ProductRepository, SalesRepository, StoreClient};
use raincheck_server::models::{DEFAULT_PRODUCTS, NewSaleRecord, Product, ProductKind};

use super::UPSTREAM_TIMEOUT;

/// Rows per insert call; the store rejects oversized request bodies.
const INSERT_BATCH: usize = 500;

/// Seed `days` of history for one merchant.
///
/// Creates the starter catalog first if the merchant has no products yet.
///
/// # Errors
///
/// Returns an error if environment variables are missing or a store call
/// fails.
pub async fn run(merchant: &str, days: u32) -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let merchant = MerchantId::new(merchant);
    let store_config = StoreConfig::from_env()?;
    let client = StoreClient::new(&store_config, UPSTREAM_TIMEOUT)?;
    let products_repo = ProductRepository::new(&client);

    if !products_repo.exists_any(&merchant).await? {
        products_repo.insert_defaults(&merchant).await?;
        info!(merchant = %merchant, "created starter catalog");
    }

    let products = products_repo.list(&merchant).await?;
    info!(merchant = %merchant, products = products.len(), days, "generating history");

    let mut rng = rand::rng();
    let start = Utc::now().date_naive() - ChronoDuration::days(i64::from(days));
    let mut rows: Vec<NewSaleRecord> = Vec::with_capacity(products.len() * days as usize);

    for offset in 0..days {
        let date = start + ChronoDuration::days(i64::from(offset));
        let weather = roll_weather(&mut rng);

        for product in &products {
            rows.push(NewSaleRecord {
                merchant_id: merchant.clone(),
                product_id: product.id,
                quantity_sold: quantity_for(&mut rng, demand_profile(product), weather),
                date,
                recorded_weather: weather,
            });
        }
    }

    let sales_repo = SalesRepository::new(&client);
    for chunk in rows.chunks(INSERT_BATCH) {
        sales_repo.record_many(chunk).await?;
    }

    info!(rows = rows.len(), "seeding complete");
    Ok(())
}

/// Demand profile by catalog name; products added outside the starter
/// catalog seed as warm (the milder pattern).
fn demand_profile(product: &Product) -> ProductKind {
    DEFAULT_PRODUCTS
        .iter()
        .find(|d| d.name == product.name)
        .map_or(ProductKind::Warm, |d| d.kind)
}

/// Draw a day's weather: 40% Clear, 30% Rain, 30% Cloudy.
fn roll_weather(rng: &mut impl Rng) -> WeatherCategory {
    match rng.random_range(0..10) {
        0..=3 => WeatherCategory::Clear,
        4..=6 => WeatherCategory::Rain,
        _ => WeatherCategory::Cloudy,
    }
}

/// Draw a day's quantity for one product given the weather.
fn quantity_for(rng: &mut impl Rng, kind: ProductKind, weather: WeatherCategory) -> i64 {
    match (weather, kind) {
        (WeatherCategory::Rain, ProductKind::Warm) => rng.random_range(30..=50),
        (WeatherCategory::Rain, ProductKind::Cold) => rng.random_range(5..=15),
        (WeatherCategory::Clear, ProductKind::Cold) => rng.random_range(40..=60),
        (WeatherCategory::Clear, ProductKind::Warm) => rng.random_range(10..=20),
        (WeatherCategory::Cloudy, _) => rng.random_range(15..=30),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_quantities_stay_in_pattern_bounds() {
        let mut rng = rand::rng();
        for _ in 0..100 {
            let q = quantity_for(&mut rng, ProductKind::Cold, WeatherCategory::Clear);
            assert!((40..=60).contains(&q));
            let q = quantity_for(&mut rng, ProductKind::Warm, WeatherCategory::Rain);
            assert!((30..=50).contains(&q));
            let q = quantity_for(&mut rng, ProductKind::Cold, WeatherCategory::Cloudy);
            assert!((15..=30).contains(&q));
        }
    }

    #[test]
    fn test_weather_roll_covers_all_categories() {
        let mut rng = rand::rng();
        let mut seen = std::collections::HashSet::new();
        for _ in 0..1000 {
            seen.insert(roll_weather(&mut rng));
        }
        assert_eq!(seen.len(), 3);
    }
}
