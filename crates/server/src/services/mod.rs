//! Business services: weather upstream, demand model, forecasting,
//! analytics.

pub mod analytics;
pub mod demand;
pub mod forecast;
pub mod weather;
