//! Request middleware and extractors.

pub mod auth;
pub mod request_id;

pub use auth::RequireMerchant;
