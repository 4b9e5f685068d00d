//! Sale log types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use raincheck_core::{MerchantId, ProductId, SaleId, WeatherCategory};

/// One recorded sale. Immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleRecord {
    /// Row ID assigned by the store.
    pub id: SaleId,
    /// Owning merchant.
    #[serde(rename = "user_id")]
    pub merchant_id: MerchantId,
    /// Product sold.
    pub product_id: ProductId,
    /// Units sold (positive).
    pub quantity_sold: i64,
    /// Calendar day of the sale.
    pub date: NaiveDate,
    /// Weather category observed when the sale was recorded.
    pub recorded_weather: WeatherCategory,
}

/// A sale row to insert (the store assigns the ID).
#[derive(Debug, Clone, Serialize)]
pub struct NewSaleRecord {
    #[serde(rename = "user_id")]
    pub merchant_id: MerchantId,
    pub product_id: ProductId,
    pub quantity_sold: i64,
    pub date: NaiveDate,
    pub recorded_weather: WeatherCategory,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_sale_record_decodes_legacy_weather_labels() {
        // Rows written by the previous system carry Indonesian labels.
        let json = serde_json::json!({
            "id": 12,
            "user_id": "m-1",
            "product_id": 3,
            "quantity_sold": 25,
            "date": "2026-07-14",
            "recorded_weather": "Hujan"
        });

        let record: SaleRecord = serde_json::from_value(json).unwrap();
        assert_eq!(record.recorded_weather, WeatherCategory::Rain);
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2026, 7, 14).unwrap());
    }

    #[test]
    fn test_new_sale_record_wire_shape() {
        let row = NewSaleRecord {
            merchant_id: MerchantId::new("m-1"),
            product_id: ProductId::new(2),
            quantity_sold: 5,
            date: NaiveDate::from_ymd_opt(2026, 8, 6).unwrap(),
            recorded_weather: WeatherCategory::Cloudy,
        };

        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["user_id"], "m-1");
        assert_eq!(json["date"], "2026-08-06");
        assert_eq!(json["recorded_weather"], "Cloudy");
    }
}
