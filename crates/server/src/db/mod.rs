//! Data access for the hosted data store.
//!
//! Raincheck persists nothing locally. All durable state lives in a hosted
//! tabular store (Supabase-style) consumed over its REST interface: tables
//! addressed by name, rows filtered by equality, ordered, and limited.
//!
//! ## Tables
//!
//! - `products` - per-merchant product catalog with current stock
//! - `sales_log` - append-only sale records with the weather at sale time
//!
//! Every row carries the owning merchant's id (`user_id` column); the
//! repositories scope all reads and writes by it.

pub mod client;
pub mod products;
pub mod sales;

use thiserror::Error;

pub use client::{StoreClient, TableQuery};
pub use products::ProductRepository;
pub use sales::SalesRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The HTTP call to the store failed (connect, timeout, body read).
    #[error("request error: {0}")]
    Upstream(#[from] reqwest::Error),

    /// The store answered with a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// A row in the store did not decode into its domain type.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate row).
    #[error("constraint violation: {0}")]
    Conflict(String),
}
