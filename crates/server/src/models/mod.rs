//! Domain types for the API.
//!
//! Row types double as wire types: field names match the stored table
//! columns (`user_id`, `quantity_sold`, `recorded_weather`) so the same
//! structs decode store rows and serialize API responses.

pub mod forecast;
pub mod product;
pub mod sale;

pub use forecast::{ForecastDay, WeeklyForecast};
pub use product::{DEFAULT_PRODUCTS, DefaultProduct, NewProduct, Product, ProductKind};
pub use sale::{NewSaleRecord, SaleRecord};
