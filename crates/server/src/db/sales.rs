//! Sales log repository.

use raincheck_core::MerchantId;

use super::{RepositoryError, StoreClient, TableQuery};
use crate::models::{NewSaleRecord, SaleRecord};

/// Table holding the append-only sales log.
const TABLE: &str = "sales_log";

/// How many rows the history endpoint returns at most.
pub const HISTORY_LIMIT: u32 = 50;

/// Repository for sale records.
pub struct SalesRepository<'a> {
    client: &'a StoreClient,
}

impl<'a> SalesRepository<'a> {
    /// Create a new sales repository.
    #[must_use]
    pub const fn new(client: &'a StoreClient) -> Self {
        Self { client }
    }

    /// Append one sale record.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the insert fails.
    pub async fn record(&self, sale: &NewSaleRecord) -> Result<(), RepositoryError> {
        self.client.insert(TABLE, std::slice::from_ref(sale)).await
    }

    /// Append many sale records in one call (used by the seeder).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the insert fails.
    pub async fn record_many(&self, sales: &[NewSaleRecord]) -> Result<(), RepositoryError> {
        self.client.insert(TABLE, sales).await
    }

    /// The merchant's sale history, ascending by date, capped at
    /// [`HISTORY_LIMIT`] rows.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store call fails.
    pub async fn history(&self, merchant: &MerchantId) -> Result<Vec<SaleRecord>, RepositoryError> {
        self.client
            .select(
                TABLE,
                TableQuery::new()
                    .eq("user_id", merchant)
                    .order_asc("date")
                    .limit(HISTORY_LIMIT),
            )
            .await
    }

    /// Every sale record for one merchant (training and analytics input).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store call fails.
    pub async fn all_for_merchant(
        &self,
        merchant: &MerchantId,
    ) -> Result<Vec<SaleRecord>, RepositoryError> {
        self.client
            .select(TABLE, TableQuery::new().eq("user_id", merchant))
            .await
    }

    /// The entire sales log across merchants (offline evaluation only).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store call fails.
    pub async fn all(&self) -> Result<Vec<SaleRecord>, RepositoryError> {
        self.client.select(TABLE, TableQuery::new()).await
    }
}
