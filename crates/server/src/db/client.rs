//! REST client for the hosted data store.
//!
//! Speaks the PostgREST dialect: `GET /rest/v1/{table}` with `col=eq.value`
//! filters for reads, `POST` for inserts, `PATCH` for updates. The API key
//! is sent as both the `apikey` header and a bearer token.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::RepositoryError;
use crate::config::StoreConfig;

/// A filtered, ordered, limited read against one table.
///
/// Only the query shapes the store supports are expressible: equality
/// filters, a single order column, and a row limit.
#[derive(Debug, Clone, Default)]
pub struct TableQuery {
    filters: Vec<(String, String)>,
    order: Option<String>,
    limit: Option<u32>,
}

impl TableQuery {
    /// Create an unfiltered query.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an equality filter on a column.
    #[must_use]
    pub fn eq(mut self, column: &str, value: impl ToString) -> Self {
        self.filters
            .push((column.to_owned(), format!("eq.{}", value.to_string())));
        self
    }

    /// Order ascending by a column.
    #[must_use]
    pub fn order_asc(mut self, column: &str) -> Self {
        self.order = Some(format!("{column}.asc"));
        self
    }

    /// Limit the number of returned rows.
    #[must_use]
    pub const fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Render to request query parameters.
    fn params(&self) -> Vec<(String, String)> {
        let mut params = self.filters.clone();
        if let Some(order) = &self.order {
            params.push(("order".to_owned(), order.clone()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_owned(), limit.to_string()));
        }
        params
    }
}

/// Client for the hosted data store's REST interface.
#[derive(Debug, Clone)]
pub struct StoreClient {
    http: reqwest::Client,
    base_url: String,
}

impl StoreClient {
    /// Create a new data store client.
    ///
    /// # Errors
    ///
    /// Returns error if the API key is not a valid header value or the
    /// HTTP client fails to build.
    pub fn new(config: &StoreConfig, timeout: Duration) -> Result<Self, RepositoryError> {
        let mut headers = HeaderMap::new();

        let key = config.api_key.expose_secret();
        let api_key = HeaderValue::from_str(key).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid API key format: {e}"))
        })?;
        let bearer = HeaderValue::from_str(&format!("Bearer {key}")).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid API key format: {e}"))
        })?;
        headers.insert("apikey", api_key);
        headers.insert("Authorization", bearer);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: format!("{}/rest/v1", config.url.trim_end_matches('/')),
        })
    }

    /// Read rows from a table.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Api` on a non-success response and
    /// `RepositoryError::DataCorruption` if a row fails to decode.
    pub async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: TableQuery,
    ) -> Result<Vec<T>, RepositoryError> {
        let url = format!("{}/{table}", self.base_url);
        let response = self.http.get(&url).query(&query.params()).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(RepositoryError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| RepositoryError::DataCorruption(e.to_string()))
    }

    /// Insert rows into a table.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` on a duplicate row and
    /// `RepositoryError::Api` for other non-success responses.
    pub async fn insert<T: Serialize>(
        &self,
        table: &str,
        rows: &[T],
    ) -> Result<(), RepositoryError> {
        let url = format!("{}/{table}", self.base_url);
        let response = self
            .http
            .post(&url)
            .header("Prefer", "return=minimal")
            .json(rows)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            if status.as_u16() == 409 {
                return Err(RepositoryError::Conflict(message));
            }
            return Err(RepositoryError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }

    /// Update matching rows in a table, returning how many were touched.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Api` on a non-success response.
    pub async fn update(
        &self,
        table: &str,
        query: TableQuery,
        patch: &serde_json::Value,
    ) -> Result<u64, RepositoryError> {
        let url = format!("{}/{table}", self.base_url);
        let response = self
            .http
            .patch(&url)
            .query(&query.params())
            .header("Prefer", "return=representation")
            .json(patch)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(RepositoryError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let rows: Vec<serde_json::Value> = response
            .json()
            .await
            .map_err(|e| RepositoryError::DataCorruption(e.to_string()))?;
        Ok(rows.len() as u64)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_query_params_rendering() {
        let query = TableQuery::new()
            .eq("user_id", "m-1")
            .eq("id", 7)
            .order_asc("date")
            .limit(50);

        assert_eq!(
            query.params(),
            vec![
                ("user_id".to_owned(), "eq.m-1".to_owned()),
                ("id".to_owned(), "eq.7".to_owned()),
                ("order".to_owned(), "date.asc".to_owned()),
                ("limit".to_owned(), "50".to_owned()),
            ]
        );
    }

    #[test]
    fn test_empty_query_has_no_params() {
        assert!(TableQuery::new().params().is_empty());
    }
}
