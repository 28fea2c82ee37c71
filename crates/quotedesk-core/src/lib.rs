//! # quotedesk-core: Pure Business Logic for QuoteDesk
//!
//! This crate is the **heart** of QuoteDesk. It contains the quote
//! calculation and tiered-pricing engine as pure functions with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       QuoteDesk Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  Presentation Layer (external)                  │   │
//! │  │    Line-item grid ──► Totals panel ──► Admin screens            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ command layer (apps/console)           │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ quotedesk-core (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   quote   │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │  Engine   │  │   rules   │  │   │
//! │  │   │ Tier/Zone │  │   Rate    │  │ LineItem  │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO FILE SYSTEM • PURE FUNCTIONS        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              quotedesk-store (Persistence Layer)                │   │
//! │  │        JSON documents: catalog, tiers, shipping, session        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Reference-data types (Product, Tier, ShippingZone, Rate)
//! - [`money`] - Money type with integer arithmetic (no floating-point cents!)
//! - [`quote`] - The quote engine: line items and the calculation pipeline
//! - [`input`] - Form-field coercion (the presentation wire contract)
//! - [`validation`] - Reference-data invariants
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every calculation is deterministic - same input =
//!    same quote
//! 2. **No I/O**: Reference data is handed in already resolved; the engine
//!    never fetches anything
//! 3. **Integer Money**: Monetary values are cents (i64); quantities stay
//!    fractional (f64) because half a master case is a real order
//! 4. **Always a Number**: The calculation pipeline never raises; degraded
//!    input prices at zero and is reported on the quote's warning channel
//!
//! ## Example Usage
//!
//! ```rust
//! use quotedesk_core::quote::QuoteEngine;
//! use quotedesk_core::types::ReferenceData;
//!
//! let mut engine = QuoteEngine::new(ReferenceData::empty());
//! engine.add_line(None, None); // placeholder row, product chosen later
//!
//! let quote = engine.quote();
//! assert_eq!(quote.totals.total_cents, 0);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod input;
pub mod money;
pub mod quote;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use quotedesk_core::Money` instead of
// `use quotedesk_core::money::Money`

pub use error::{CoreError, CoreResult, ValidationError};
pub use input::LineField;
pub use money::Money;
pub use quote::{LineItem, Quote, QuoteEngine, QuoteTotals, QuoteWarning, TierSummary};
pub use types::{Product, Rate, ReferenceData, ShippingZone, Tier};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// The flat credit-card processing fee: 3% of (subtotal + shipping).
///
/// ## Why a constant?
/// The fee is not tiered and not operator-toggleable; quotes from every
/// host must agree to the cent. An ACH threshold exists only in the
/// quote-email collaborator, never in the calculation itself.
pub const CARD_FEE_RATE: Rate = Rate::from_bps(300);

/// Lower bound of the shipping-rate clamp window: 0.5% of subtotal.
///
/// ## Business Reason
/// Zone rates are admin-edited data. The clamp keeps one fat-fingered
/// decimal from producing a $0.02 or $500 shipping line on a real quote;
/// the engine warns when it actually bites.
pub const SHIPPING_RATE_MIN: Rate = Rate::from_bps(50);

/// Upper bound of the shipping-rate clamp window: 2.5% of subtotal.
pub const SHIPPING_RATE_MAX: Rate = Rate::from_bps(250);
