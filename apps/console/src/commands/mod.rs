//! # Commands Module
//!
//! All commands exposed to the presentation layer.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (exports)
//! ├── quote.rs    ◄─── Line-item mutations, zone/override, totals
//! └── admin.rs    ◄─── Reference-data CRUD (products, tiers, zones)
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Command Flow                                      │
//! │                                                                         │
//! │  Presentation layer (external)                                          │
//! │  ─────────────────────────────                                          │
//! │  a quantity cell loses focus with value "6"                             │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  update_line(&engine, &store, lineId, DisplayBoxes, "6").await          │
//! │         │                                                               │
//! │         ├── engine mutex: apply edit, derive quantities, recompute      │
//! │         ├── store: persist session snapshot (write-behind)              │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Quote { lines, totals, tier, warnings } ── re-render from this         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## State Injection
//! Each command declares only the state it needs:
//! ```rust,ignore
//! // Only reads the engine
//! fn get_quote(engine: &EngineState) -> Quote
//!
//! // Mutates the engine, persists the snapshot
//! async fn add_line(engine: &EngineState, store: &StoreState, ...) -> Quote
//!
//! // Admin: store first, then engine reload
//! async fn upsert_product(engine: &EngineState, store: &StoreState, ...)
//!     -> Result<Quote, ApiError>
//! ```

pub mod admin;
pub mod quote;
