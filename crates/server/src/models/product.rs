//! Product catalog types.

use serde::{Deserialize, Serialize};

use raincheck_core::{MerchantId, ProductId};

/// A product owned by one merchant.
///
/// Stock and price are non-negative by invariant; price is an integer in
/// the currency's minor unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Row ID assigned by the store.
    pub id: ProductId,
    /// Owning merchant.
    #[serde(rename = "user_id")]
    pub merchant_id: MerchantId,
    /// Display name.
    pub name: String,
    /// Units currently on hand.
    pub stock: i64,
    /// Unit price in minor units.
    pub price: i64,
}

/// A product row to insert (the store assigns the ID).
#[derive(Debug, Clone, Serialize)]
pub struct NewProduct {
    #[serde(rename = "user_id")]
    pub merchant_id: MerchantId,
    pub name: String,
    pub stock: i64,
    pub price: i64,
}

/// Demand profile of a catalog product, used by the synthetic history
/// seeder: cold items sell on clear days, warm items sell in the rain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductKind {
    Cold,
    Warm,
}

/// A default catalog entry seeded for new merchants.
#[derive(Debug, Clone, Copy)]
pub struct DefaultProduct {
    pub name: &'static str,
    pub stock: i64,
    pub price: i64,
    pub kind: ProductKind,
}

/// The three-product starter catalog every merchant begins with.
pub const DEFAULT_PRODUCTS: [DefaultProduct; 3] = [
    DefaultProduct {
        name: "Iced Sweet Tea",
        stock: 50,
        price: 5000,
        kind: ProductKind::Cold,
    },
    DefaultProduct {
        name: "Egg Noodle Soup",
        stock: 30,
        price: 12000,
        kind: ProductKind::Warm,
    },
    DefaultProduct {
        name: "Hot Coffee",
        stock: 40,
        price: 4000,
        kind: ProductKind::Warm,
    },
];

impl DefaultProduct {
    /// Build the insertable row for a merchant.
    #[must_use]
    pub fn for_merchant(&self, merchant_id: &MerchantId) -> NewProduct {
        NewProduct {
            merchant_id: merchant_id.clone(),
            name: self.name.to_owned(),
            stock: self.stock,
            price: self.price,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_wire_field_names() {
        let product = Product {
            id: ProductId::new(1),
            merchant_id: MerchantId::new("m-1"),
            name: "Hot Coffee".to_owned(),
            stock: 40,
            price: 4000,
        };

        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["user_id"], "m-1");
        assert_eq!(json["stock"], 40);

        let back: Product = serde_json::from_value(json).unwrap();
        assert_eq!(back.merchant_id, product.merchant_id);
    }

    #[test]
    fn test_default_catalog() {
        let merchant = MerchantId::new("m-1");
        let rows: Vec<NewProduct> = DEFAULT_PRODUCTS
            .iter()
            .map(|p| p.for_merchant(&merchant))
            .collect();

        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.merchant_id == merchant));
        assert!(rows.iter().all(|r| r.stock >= 0 && r.price >= 0));
    }
}
