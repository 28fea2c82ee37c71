//! # Catalog Repository
//!
//! Document operations for the product catalog (`products.json`).
//!
//! ## Document Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  products.json                                                          │
//! │                                                                         │
//! │  {                                                                      │
//! │    "choc-bar-50g": { "key": "choc-bar-50g", "name": "...",             │
//! │                      "price_cents": 1000, "units_per_case": 144, ... }, │
//! │    "gummy-mix-200g": { ... }                                            │
//! │  }                                                                      │
//! │                                                                         │
//! │  Map keyed by business key; the entry's own `key` must match.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Admin mutations are read-modify-write over the whole document. Volumes
//! are small (a distributor catalog is hundreds of products, not millions),
//! so whole-document rewrites are the simple and correct choice.

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::Utc;
use tracing::debug;

use quotedesk_core::types::Product;
use quotedesk_core::validation::validate_product;

use crate::error::{StoreError, StoreResult};
use crate::store::{read_document, write_document};

/// Repository for product catalog operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = store.catalog();
///
/// let products = repo.load().await?;
/// repo.upsert(product).await?;
/// ```
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    data_dir: PathBuf,
}

impl CatalogRepository {
    /// Creates a new CatalogRepository rooted at the data directory.
    pub fn new(data_dir: PathBuf) -> Self {
        CatalogRepository { data_dir }
    }

    fn path(&self) -> PathBuf {
        self.data_dir.join("products.json")
    }

    /// Loads the whole catalog. Missing document reads as empty.
    pub async fn load(&self) -> StoreResult<BTreeMap<String, Product>> {
        read_document(&self.path()).await
    }

    /// Replaces the whole catalog document.
    pub async fn save(&self, products: &BTreeMap<String, Product>) -> StoreResult<()> {
        write_document(&self.path(), products).await
    }

    /// Lists active products in key order (what a product picker shows).
    pub async fn list_active(&self) -> StoreResult<Vec<Product>> {
        let products = self.load().await?;
        Ok(products.into_values().filter(|p| p.is_active).collect())
    }

    /// Gets a product by business key.
    pub async fn get(&self, key: &str) -> StoreResult<Product> {
        self.load()
            .await?
            .remove(key)
            .ok_or_else(|| StoreError::not_found("Product", key))
    }

    /// Inserts or updates a product.
    ///
    /// ## Behavior
    /// - New key: inserted with `created_at` = now
    /// - Existing key: updated, original `created_at` preserved
    /// - `updated_at` is stamped on every call
    /// - The product is validated before anything is written
    pub async fn upsert(&self, mut product: Product) -> StoreResult<()> {
        validate_product(&product)?;

        let mut products = self.load().await?;
        let now = Utc::now();
        product.updated_at = now;
        if let Some(existing) = products.get(&product.key) {
            product.created_at = existing.created_at;
        } else {
            product.created_at = now;
        }

        debug!(key = %product.key, "catalog upsert");
        products.insert(product.key.clone(), product);
        self.save(&products).await
    }

    /// Removes a product by key. Errors if the key is absent.
    ///
    /// Quotes holding the removed key keep pricing from their frozen
    /// snapshots; the engine reports the dangling link as a warning.
    pub async fn remove(&self, key: &str) -> StoreResult<()> {
        let mut products = self.load().await?;
        if products.remove(key).is_none() {
            return Err(StoreError::not_found("Product", key));
        }

        debug!(key = %key, "catalog remove");
        self.save(&products).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Store, StoreConfig};

    fn product(key: &str, price_cents: i64) -> Product {
        Product {
            key: key.to_string(),
            name: format!("Product {}", key),
            category: "candy".to_string(),
            price_cents,
            units_per_case: 144.0,
            display_boxes_per_case: 12.0,
            units_per_display_box: 12.0,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    async fn repo() -> CatalogRepository {
        Store::open(StoreConfig::temp()).await.unwrap().catalog()
    }

    #[tokio::test]
    async fn test_upsert_and_get_round_trip() {
        let repo = repo().await;
        repo.upsert(product("choc-bar", 1000)).await.unwrap();

        let loaded = repo.get("choc-bar").await.unwrap();
        assert_eq!(loaded.price_cents, 1000);
        assert_eq!(loaded.name, "Product choc-bar");
    }

    #[tokio::test]
    async fn test_upsert_preserves_created_at() {
        let repo = repo().await;
        repo.upsert(product("choc-bar", 1000)).await.unwrap();
        let first = repo.get("choc-bar").await.unwrap();

        repo.upsert(product("choc-bar", 1200)).await.unwrap();
        let second = repo.get("choc-bar").await.unwrap();

        assert_eq!(second.price_cents, 1200);
        assert_eq!(second.created_at, first.created_at);
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let repo = repo().await;
        assert!(matches!(
            repo.get("nope").await,
            Err(StoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_remove() {
        let repo = repo().await;
        repo.upsert(product("choc-bar", 1000)).await.unwrap();
        repo.remove("choc-bar").await.unwrap();

        assert!(repo.get("choc-bar").await.is_err());
        assert!(matches!(
            repo.remove("choc-bar").await,
            Err(StoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_invalid_product_rejected_before_write() {
        let repo = repo().await;
        let mut bad = product("choc-bar", 1000);
        bad.price_cents = -5;

        assert!(repo.upsert(bad).await.is_err());
        assert!(repo.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_active_filters_soft_deleted() {
        let repo = repo().await;
        repo.upsert(product("choc-bar", 1000)).await.unwrap();
        let mut retired = product("old-bar", 900);
        retired.is_active = false;
        repo.upsert(retired).await.unwrap();

        let active = repo.list_active().await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].key, "choc-bar");
    }
}
