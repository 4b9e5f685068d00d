//! Product repository.

use raincheck_core::{MerchantId, ProductId};

use super::{RepositoryError, StoreClient, TableQuery};
use crate::models::{DEFAULT_PRODUCTS, NewProduct, Product};

/// Table holding the per-merchant product catalog.
const TABLE: &str = "products";

/// Repository for product rows.
pub struct ProductRepository<'a> {
    client: &'a StoreClient,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(client: &'a StoreClient) -> Self {
        Self { client }
    }

    /// All products owned by a merchant, ordered by row ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store call fails.
    pub async fn list(&self, merchant: &MerchantId) -> Result<Vec<Product>, RepositoryError> {
        self.client
            .select(
                TABLE,
                TableQuery::new().eq("user_id", merchant).order_asc("id"),
            )
            .await
    }

    /// Fetch a product only if it is owned by the given merchant.
    ///
    /// Returns `None` when the product does not exist or belongs to another
    /// merchant - the store cannot distinguish the two, and neither should
    /// the response.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store call fails.
    pub async fn get_owned(
        &self,
        id: ProductId,
        merchant: &MerchantId,
    ) -> Result<Option<Product>, RepositoryError> {
        let rows: Vec<Product> = self
            .client
            .select(
                TABLE,
                TableQuery::new()
                    .eq("id", id)
                    .eq("user_id", merchant)
                    .limit(1),
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    /// Whether the merchant already has any products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store call fails.
    pub async fn exists_any(&self, merchant: &MerchantId) -> Result<bool, RepositoryError> {
        let rows: Vec<Product> = self
            .client
            .select(TABLE, TableQuery::new().eq("user_id", merchant).limit(1))
            .await?;
        Ok(!rows.is_empty())
    }

    /// Insert the default starter catalog for a merchant.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the insert fails.
    pub async fn insert_defaults(&self, merchant: &MerchantId) -> Result<(), RepositoryError> {
        let rows: Vec<NewProduct> = DEFAULT_PRODUCTS
            .iter()
            .map(|p| p.for_merchant(merchant))
            .collect();
        self.client.insert(TABLE, &rows).await
    }

    /// Set the stock level of an owned product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no row matched (product
    /// missing or owned by another merchant).
    pub async fn set_stock(
        &self,
        id: ProductId,
        merchant: &MerchantId,
        stock: i64,
    ) -> Result<(), RepositoryError> {
        let updated = self
            .client
            .update(
                TABLE,
                TableQuery::new().eq("id", id).eq("user_id", merchant),
                &serde_json::json!({ "stock": stock }),
            )
            .await?;

        if updated == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
