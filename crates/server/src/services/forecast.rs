//! Forecast assembly.
//!
//! Combines the reduced weather outlook with one demand prediction per day
//! and attaches the restocking advisory.

use raincheck_core::{Advisory, ProductId};

use crate::models::ForecastDay;
use crate::services::demand::DemandModel;
use crate::services::weather::DailyOutlook;

/// Build the per-day forecast for one product from the daily outlook.
#[must_use]
pub fn build_forecast(
    model: &DemandModel,
    product: ProductId,
    days: &[DailyOutlook],
) -> Vec<ForecastDay> {
    days.iter()
        .map(|day| {
            let sales = model.predict(product, day.category);
            ForecastDay {
                date: day.label.clone(),
                weather: day.category,
                sales,
                advice: Advisory::for_quantity(sales),
            }
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use raincheck_core::WeatherCategory;
    use crate::services::demand::SaleSample;

    fn outlook(category: WeatherCategory) -> DailyOutlook {
        DailyOutlook {
            label: "07 Aug".to_owned(),
            category,
        }
    }

    fn sample(category: WeatherCategory, quantity: f64) -> SaleSample {
        SaleSample {
            product_id: 1,
            weather_code: category.code(),
            quantity,
        }
    }

    #[test]
    fn test_forecast_attaches_threshold_advisories() {
        // Per-category demand chosen to hit all three advisory bands.
        let model = DemandModel::fit(&[
            sample(WeatherCategory::Clear, 40.0),
            sample(WeatherCategory::Cloudy, 20.0),
            sample(WeatherCategory::Rain, 12.0),
        ])
        .unwrap();

        let days = vec![
            outlook(WeatherCategory::Clear),
            outlook(WeatherCategory::Cloudy),
            outlook(WeatherCategory::Rain),
        ];
        let forecast = build_forecast(&model, ProductId::new(1), &days);

        assert_eq!(forecast.len(), 3);
        assert_eq!(forecast[0].sales, 40);
        assert_eq!(forecast[0].advice, Advisory::RestockHigh);
        assert_eq!(forecast[1].advice, Advisory::Normal);
        assert_eq!(forecast[2].advice, Advisory::Reduce);
    }

    #[test]
    fn test_forecast_of_empty_outlook_is_empty() {
        let model = DemandModel::fit(&[sample(WeatherCategory::Clear, 10.0)]).unwrap();
        assert!(build_forecast(&model, ProductId::new(1), &[]).is_empty());
    }
}
