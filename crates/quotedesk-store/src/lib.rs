//! # quotedesk-store: Persistence Layer for QuoteDesk
//!
//! This crate provides disk persistence for the QuoteDesk system: the
//! reference-data documents an administrator edits, and the session
//! snapshot that lets a quote survive a restart.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        QuoteDesk Data Flow                              │
//! │                                                                         │
//! │  Command layer (add_line, upsert_product, ...)                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  quotedesk-store (THIS CRATE)                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐   │   │
//! │  │   │     Store     │    │  Repositories │    │  Documents   │   │   │
//! │  │   │  (store.rs)   │    │ (repository/) │    │   (JSON)     │   │   │
//! │  │   │               │    │               │    │              │   │   │
//! │  │   │ data dir      │◄───│ catalog       │    │ products.json│   │   │
//! │  │   │ atomic write  │    │ pricing       │    │ tiers.json   │   │   │
//! │  │   │ read-as-empty │    │ shipping      │    │ shipping.json│   │   │
//! │  │   │               │    │ session       │    │ session.json │   │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘   │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  <data dir>/ on local disk                                              │
//! │  (remote publication of these documents is an external collaborator,    │
//! │   out of scope here)                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`store`] - Store handle, configuration, document primitives
//! - [`repository`] - Repository implementations (catalog, pricing, ...)
//! - [`error`] - Store error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use quotedesk_store::{Store, StoreConfig};
//!
//! let store = Store::open(StoreConfig::new("./data")).await?;
//! let reference = store.load_reference_data().await?;
//! let snapshot = store.session().load().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod repository;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use store::{Store, StoreConfig};

// Repository re-exports for convenience
pub use repository::catalog::CatalogRepository;
pub use repository::pricing::PricingRepository;
pub use repository::session::{SessionRepository, SessionSnapshot};
pub use repository::shipping::{ShippingDocument, ShippingRepository};
