//! # Store Management
//!
//! Data-directory configuration and the document read/write primitives
//! shared by every repository.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Document Store                                    │
//! │                                                                         │
//! │  Host Startup                                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreConfig::new(dir) ← Configure data directory                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Store::open(config).await ← Create directory, hand out repositories    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                            │
//! │  │            <data dir>/                  │                            │
//! │  │   products.json   ← catalog()           │                            │
//! │  │   tiers.json      ← pricing()           │                            │
//! │  │   shipping.json   ← shipping()          │                            │
//! │  │   session.json    ← session()           │                            │
//! │  └─────────────────────────────────────────┘                            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Atomic Replace
//! Every write goes to `<file>.tmp` first and is renamed over the target.
//! Rename is atomic on the filesystems we care about, so readers never see
//! a torn document.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use quotedesk_core::types::ReferenceData;
use quotedesk_core::validation::validate_reference_data;

use crate::error::{StoreError, StoreResult};
use crate::repository::catalog::CatalogRepository;
use crate::repository::pricing::PricingRepository;
use crate::repository::session::SessionRepository;
use crate::repository::shipping::ShippingRepository;

// =============================================================================
// Configuration
// =============================================================================

/// Store configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = StoreConfig::new("/var/lib/quotedesk").create_if_missing(true);
/// let store = Store::open(config).await?;
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Directory holding the JSON documents.
    pub data_dir: PathBuf,

    /// Create the directory on open if it doesn't exist.
    /// Default: true
    pub create_if_missing: bool,
}

impl StoreConfig {
    /// Creates a new store configuration with the given data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        StoreConfig {
            data_dir: data_dir.into(),
            create_if_missing: true,
        }
    }

    /// Sets whether to create the data directory on open.
    pub fn create_if_missing(mut self, create: bool) -> Self {
        self.create_if_missing = create;
        self
    }

    /// Creates a configuration pointing at a unique temporary directory
    /// (for testing). Each call gets an isolated directory.
    pub fn temp() -> Self {
        let dir = std::env::temp_dir().join(format!("quotedesk-test-{}", uuid::Uuid::new_v4()));
        StoreConfig::new(dir)
    }
}

// =============================================================================
// Store
// =============================================================================

/// Main store handle providing repository access.
///
/// ## Usage
/// ```rust,ignore
/// let store = Store::open(StoreConfig::new("./data")).await?;
///
/// let products = store.catalog().load().await?;
/// let reference = store.load_reference_data().await?;
/// ```
#[derive(Debug, Clone)]
pub struct Store {
    data_dir: PathBuf,
}

impl Store {
    /// Opens the store: ensures the data directory exists and returns a
    /// handle. Missing documents are not an error - they read as empty.
    pub async fn open(config: StoreConfig) -> StoreResult<Self> {
        if config.create_if_missing {
            tokio::fs::create_dir_all(&config.data_dir).await?;
        } else if !config.data_dir.is_dir() {
            return Err(StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("data directory {} does not exist", config.data_dir.display()),
            )));
        }

        info!(data_dir = %config.data_dir.display(), "document store opened");
        Ok(Store {
            data_dir: config.data_dir,
        })
    }

    /// The data directory this store reads and writes.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Returns the product catalog repository (`products.json`).
    pub fn catalog(&self) -> CatalogRepository {
        CatalogRepository::new(self.data_dir.clone())
    }

    /// Returns the pricing-tier repository (`tiers.json`).
    pub fn pricing(&self) -> PricingRepository {
        PricingRepository::new(self.data_dir.clone())
    }

    /// Returns the shipping-zone repository (`shipping.json`).
    pub fn shipping(&self) -> ShippingRepository {
        ShippingRepository::new(self.data_dir.clone())
    }

    /// Returns the session snapshot repository (`session.json`).
    pub fn session(&self) -> SessionRepository {
        SessionRepository::new(self.data_dir.clone())
    }

    /// Loads and normalizes the full reference-data set.
    ///
    /// All three documents are read, assembled, and run through core
    /// validation. Documents written through the repositories always pass;
    /// this catches hand-edited files before the engine sees them.
    pub async fn load_reference_data(&self) -> StoreResult<ReferenceData> {
        let products = self.catalog().load().await?;
        let tiers = self.pricing().load().await?;
        let shipping = self.shipping().load().await?;

        let reference = ReferenceData {
            products,
            tiers,
            zones: shipping.zones,
        };
        validate_reference_data(&reference)?;

        debug!(
            products = reference.products.len(),
            tiers = reference.tiers.len(),
            zones = reference.zones.len(),
            "reference data loaded"
        );
        Ok(reference)
    }
}

// =============================================================================
// Document Primitives (crate-internal)
// =============================================================================

/// Reads a JSON document, returning `T::default()` if the file is missing.
///
/// A file that exists but does not parse is a hard error: silently
/// replacing operator data with an empty document would be data loss.
pub(crate) async fn read_document<T>(path: &Path) -> StoreResult<T>
where
    T: DeserializeOwned + Default,
{
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "document missing, reading as empty");
            return Ok(T::default());
        }
        Err(e) => return Err(StoreError::Io(e)),
    };

    serde_json::from_slice(&bytes)
        .map_err(|e| StoreError::corrupt(path.display().to_string(), e.to_string()))
}

/// Writes a JSON document atomically: serialize, write `<path>.tmp`,
/// rename over the target.
pub(crate) async fn write_document<T>(path: &Path, value: &T) -> StoreResult<()>
where
    T: Serialize,
{
    let json = serde_json::to_vec_pretty(value)
        .map_err(|e| StoreError::corrupt(path.display().to_string(), e.to_string()))?;

    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, &json).await?;
    tokio::fs::rename(&tmp, path).await?;

    debug!(path = %path.display(), bytes = json.len(), "document written");
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_creates_directory() {
        let config = StoreConfig::temp();
        let dir = config.data_dir.clone();
        let store = Store::open(config).await.unwrap();

        assert!(dir.is_dir());
        assert_eq!(store.data_dir(), dir.as_path());
    }

    #[tokio::test]
    async fn test_open_without_create_fails_on_missing_dir() {
        let config = StoreConfig::temp().create_if_missing(false);
        assert!(Store::open(config).await.is_err());
    }

    #[tokio::test]
    async fn test_missing_documents_read_as_empty() {
        let store = Store::open(StoreConfig::temp()).await.unwrap();
        let reference = store.load_reference_data().await.unwrap();

        assert!(reference.products.is_empty());
        assert!(reference.tiers.is_empty());
        assert!(reference.zones.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_reference_document_is_an_error() {
        let store = Store::open(StoreConfig::temp()).await.unwrap();
        tokio::fs::write(store.data_dir().join("tiers.json"), b"{not json")
            .await
            .unwrap();

        assert!(matches!(
            store.load_reference_data().await,
            Err(StoreError::Corrupt { .. })
        ));
    }
}
