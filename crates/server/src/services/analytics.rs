//! Month-to-date sales analytics.

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::models::{Product, SaleRecord};

/// Sentinel top product when the month has no sales.
const NO_TOP_PRODUCT: &str = "-";

/// The month-to-date summary for one merchant.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    /// Revenue in minor units: Σ(quantity sold × unit price).
    pub revenue: i64,
    /// Name of the best-selling product, "-" when there were no sales.
    pub top_product: String,
    /// Reserved for month-over-month growth; not computed yet.
    pub growth: i64,
}

/// Aggregate a merchant's sales from `month_start` onward.
///
/// Sales referencing a product missing from the catalog contribute zero
/// revenue and cannot become the top product. Quantity ties are broken by
/// the lowest product ID.
#[must_use]
pub fn summarize(sales: &[SaleRecord], products: &[Product], month_start: NaiveDate) -> Summary {
    let prices: HashMap<i64, &Product> = products.iter().map(|p| (p.id.as_i64(), p)).collect();

    let mut revenue: i64 = 0;
    let mut quantities: BTreeMap<i64, i64> = BTreeMap::new();

    for sale in sales.iter().filter(|s| s.date >= month_start) {
        let product = prices.get(&sale.product_id.as_i64());
        revenue += sale.quantity_sold * product.map_or(0, |p| p.price);
        if product.is_some() {
            *quantities.entry(sale.product_id.as_i64()).or_insert(0) += sale.quantity_sold;
        }
    }

    // BTreeMap iterates in ID order, so strictly-greater keeps the lowest
    // ID on ties.
    let mut top: Option<(i64, i64)> = None;
    for (&id, &quantity) in &quantities {
        if top.is_none_or(|(_, best)| quantity > best) {
            top = Some((id, quantity));
        }
    }

    let top_product = top
        .and_then(|(id, _)| prices.get(&id))
        .map_or_else(|| NO_TOP_PRODUCT.to_owned(), |p| p.name.clone());

    Summary {
        revenue,
        top_product,
        growth: 0,
    }
}

/// First day of the month containing `today`.
#[must_use]
pub fn month_start(today: NaiveDate) -> NaiveDate {
    today.with_day(1).unwrap_or(today)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use raincheck_core::{MerchantId, ProductId, SaleId, WeatherCategory};

    fn merchant() -> MerchantId {
        MerchantId::new("m-1")
    }

    fn product(id: i64, name: &str, price: i64) -> Product {
        Product {
            id: ProductId::new(id),
            merchant_id: merchant(),
            name: name.to_owned(),
            stock: 10,
            price,
        }
    }

    fn sale(id: i64, product_id: i64, quantity: i64, date: &str) -> SaleRecord {
        SaleRecord {
            id: SaleId::new(id),
            merchant_id: merchant(),
            product_id: ProductId::new(product_id),
            quantity_sold: quantity,
            date: date.parse().unwrap(),
            recorded_weather: WeatherCategory::Cloudy,
        }
    }

    #[test]
    fn test_empty_history_yields_sentinel() {
        let summary = summarize(&[], &[], "2026-08-01".parse().unwrap());
        assert_eq!(summary.revenue, 0);
        assert_eq!(summary.top_product, "-");
        assert_eq!(summary.growth, 0);
    }

    #[test]
    fn test_revenue_joins_on_price() {
        let products = vec![product(1, "Iced Sweet Tea", 5000), product(2, "Hot Coffee", 4000)];
        let sales = vec![
            sale(1, 1, 3, "2026-08-02"),
            sale(2, 2, 2, "2026-08-03"),
        ];

        let summary = summarize(&sales, &products, "2026-08-01".parse().unwrap());
        assert_eq!(summary.revenue, 3 * 5000 + 2 * 4000);
        assert_eq!(summary.top_product, "Iced Sweet Tea");
    }

    #[test]
    fn test_sales_before_month_start_are_excluded() {
        let products = vec![product(1, "Iced Sweet Tea", 5000)];
        let sales = vec![
            sale(1, 1, 100, "2026-07-31"),
            sale(2, 1, 2, "2026-08-01"),
        ];

        let summary = summarize(&sales, &products, "2026-08-01".parse().unwrap());
        assert_eq!(summary.revenue, 2 * 5000);
    }

    #[test]
    fn test_missing_product_contributes_nothing() {
        let products = vec![product(1, "Iced Sweet Tea", 5000)];
        let sales = vec![
            sale(1, 1, 1, "2026-08-02"),
            sale(2, 99, 500, "2026-08-02"),
        ];

        let summary = summarize(&sales, &products, "2026-08-01".parse().unwrap());
        assert_eq!(summary.revenue, 5000);
        assert_eq!(summary.top_product, "Iced Sweet Tea");
    }

    #[test]
    fn test_quantity_tie_breaks_to_lowest_id() {
        let products = vec![product(1, "Iced Sweet Tea", 100), product(2, "Hot Coffee", 100)];
        let sales = vec![
            sale(1, 2, 5, "2026-08-02"),
            sale(2, 1, 5, "2026-08-03"),
        ];

        let summary = summarize(&sales, &products, "2026-08-01".parse().unwrap());
        assert_eq!(summary.top_product, "Iced Sweet Tea");
    }

    #[test]
    fn test_month_start() {
        assert_eq!(
            month_start("2026-08-17".parse().unwrap()),
            "2026-08-01".parse::<NaiveDate>().unwrap()
        );
    }
}
