//! # Domain Types
//!
//! Reference-data types used throughout QuoteDesk.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Reference Data                                  │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Tier       │   │  ShippingZone   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  key (business) │   │  id             │   │  id             │       │
//! │  │  name           │   │  threshold      │   │  rate_bps       │       │
//! │  │  price_cents    │   │  discount_bps   │   │  fixed_cost     │       │
//! │  │  packing ratios │   │  is_default     │   │  states [..]    │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐                                                    │
//! │  │     Rate        │   Basis points (bps). 1 bp = 0.01%.                │
//! │  │  ─────────────  │   300 = the flat 3% credit-card fee.               │
//! │  │  bps (u32)      │   50..250 = the shipping clamp window.             │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All of this is immutable input to the quote engine: owned by the reference
//! data source (admin-edited JSON documents), read-only during calculation.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Rate
// =============================================================================

/// Percentage rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 100 bps = 1% (a typical shipping zone rate)
/// 300 bps = 3% (the credit-card fee)
///
/// Admin-edited documents store rates as a fraction of subtotal (0.01 = 1%);
/// [`Rate::from_fraction`] is the single conversion point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Rate(u32);

impl Rate {
    /// Creates a rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Rate(bps)
    }

    /// Creates a rate from a fraction of the base amount (0.01 = 1% = 100 bps).
    ///
    /// Non-finite or negative fractions collapse to zero, matching the
    /// coercion rules for every other numeric input in the pipeline.
    pub fn from_fraction(fraction: f64) -> Self {
        if !fraction.is_finite() || fraction <= 0.0 {
            return Rate(0);
        }
        Rate((fraction * 10_000.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a fraction of the base amount (for display only).
    #[inline]
    pub fn fraction(&self) -> f64 {
        self.0 as f64 / 10_000.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Clamps the rate into an inclusive window.
    ///
    /// Used by the shipping pipeline: a misconfigured zone rate is silently
    /// pulled into bounds rather than rejected, and the engine reports the
    /// adjustment through the quote's warning channel.
    #[inline]
    pub fn clamp(self, min: Rate, max: Rate) -> Rate {
        Rate(self.0.clamp(min.0, max.0))
    }

    /// Zero rate.
    #[inline]
    pub const fn zero() -> Self {
        Rate(0)
    }

    /// Checks if the rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for Rate {
    fn default() -> Self {
        Rate::zero()
    }
}

// =============================================================================
// Product
// =============================================================================

/// A catalog entry: one sellable product with its case/box/unit packing.
///
/// ## Packing Hierarchy
/// ```text
/// Master case ─► display boxes ─► individual units
///   1 case    =  12 boxes       =  144 units      (12 units per box)
/// ```
/// Ratios are f64 because derived quantities are fractional by design:
/// 6 display boxes of a 12-box case is 0.5 master cases, displayed with
/// 2-decimal rounding but never floored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Business key - unique identifier within the catalog.
    pub key: String,

    /// Display name shown on quotes.
    pub name: String,

    /// Category for catalog grouping (informational).
    pub category: String,

    /// Unit price in cents (smallest currency unit). Line totals are
    /// unit count × this price.
    pub price_cents: i64,

    /// Individual units in one master case.
    pub units_per_case: f64,

    /// Display boxes in one master case.
    pub display_boxes_per_case: f64,

    /// Individual units in one display box.
    pub units_per_display_box: f64,

    /// Whether product is active (soft delete).
    pub is_active: bool,

    /// When the product was created.
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the unit price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

// =============================================================================
// Tier
// =============================================================================

/// A volume-based pricing bracket.
///
/// The engine selects the tier with the greatest `threshold` not exceeding
/// the order's total master-case volume; if none qualifies, the tier marked
/// `is_default` wins. Exactly one tier must be default (enforced by
/// [`crate::validation::validate_reference_data`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tier {
    /// Unique identifier.
    pub id: String,

    /// Display name ("Wholesale", "Distributor", ...).
    pub name: String,

    /// Minimum qualifying volume, in master cases. Fractional volumes are
    /// compared against this without rounding.
    pub threshold: f64,

    /// Margin/discount percentage in basis points (informational on the
    /// selected tier - tier pricing is baked into catalog prices upstream).
    pub discount_bps: u32,

    /// Whether this tier is the fallback when no threshold qualifies.
    pub is_default: bool,
}

impl Tier {
    /// Returns the discount as a Rate.
    #[inline]
    pub fn discount(&self) -> Rate {
        Rate::from_bps(self.discount_bps)
    }
}

// =============================================================================
// Shipping Zone
// =============================================================================

/// A geographic grouping of U.S. states sharing a shipping rate.
///
/// ## Invariant
/// A state belongs to at most one zone, so [`ReferenceData::zone_for_state`]
/// is unambiguous. Enforced at validation time, not lookup time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingZone {
    /// Unique identifier.
    pub id: String,

    /// Display name ("West Coast", "Midwest", ...).
    pub name: String,

    /// Rate as a fraction of subtotal, in basis points (100 = 1%).
    /// Clamped into the shipping window at calculation time.
    pub rate_bps: u32,

    /// Optional fixed-cost floor in cents: shipping is never below this.
    pub fixed_cost_cents: Option<i64>,

    /// Two-letter state codes served by this zone.
    pub states: Vec<String>,
}

impl ShippingZone {
    /// Returns the configured rate.
    #[inline]
    pub fn rate(&self) -> Rate {
        Rate::from_bps(self.rate_bps)
    }

    /// Returns the fixed-cost floor, if configured.
    #[inline]
    pub fn fixed_cost(&self) -> Option<Money> {
        self.fixed_cost_cents.map(Money::from_cents)
    }
}

// =============================================================================
// Reference Data Aggregate
// =============================================================================

/// Everything the quote engine reads but never writes: the product catalog,
/// the tier table, and the shipping zones.
///
/// ## Ordering
/// - `products` is a BTreeMap keyed by business key (stable iteration for
///   listings).
/// - `tiers` is a Vec preserving declaration order: threshold ties resolve
///   to the LAST declared tier, so order is semantically meaningful.
/// - `zones` is a Vec; zone ids are unique (validated).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReferenceData {
    /// Product catalog, keyed by business key.
    pub products: BTreeMap<String, Product>,

    /// Pricing tiers in declaration order.
    pub tiers: Vec<Tier>,

    /// Shipping zones.
    pub zones: Vec<ShippingZone>,
}

impl ReferenceData {
    /// Creates an empty reference-data set (useful for tests and for an
    /// engine constructed before the documents have loaded).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Looks up a product by business key.
    pub fn product(&self, key: &str) -> Option<&Product> {
        self.products.get(key)
    }

    /// Looks up a shipping zone by id.
    pub fn zone(&self, id: &str) -> Option<&ShippingZone> {
        self.zones.iter().find(|z| z.id == id)
    }

    /// Looks up the zone serving a two-letter state code.
    ///
    /// Validated data guarantees at most one match; on degraded data the
    /// first declared zone wins.
    pub fn zone_for_state(&self, state: &str) -> Option<&ShippingZone> {
        self.zones
            .iter()
            .find(|z| z.states.iter().any(|s| s.eq_ignore_ascii_case(state)))
    }

    /// Returns the tier marked as default, if any.
    pub fn default_tier(&self) -> Option<&Tier> {
        self.tiers.iter().find(|t| t.is_default)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_from_bps() {
        let rate = Rate::from_bps(100);
        assert_eq!(rate.bps(), 100);
        assert!((rate.fraction() - 0.01).abs() < 1e-9);
        assert!((rate.percentage() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_rate_from_fraction() {
        assert_eq!(Rate::from_fraction(0.01).bps(), 100);
        assert_eq!(Rate::from_fraction(0.025).bps(), 250);
        assert_eq!(Rate::from_fraction(0.0).bps(), 0);
        assert_eq!(Rate::from_fraction(-0.5).bps(), 0);
        assert_eq!(Rate::from_fraction(f64::NAN).bps(), 0);
    }

    #[test]
    fn test_rate_clamp() {
        let min = Rate::from_bps(50);
        let max = Rate::from_bps(250);

        assert_eq!(Rate::from_bps(10).clamp(min, max).bps(), 50);
        assert_eq!(Rate::from_bps(100).clamp(min, max).bps(), 100);
        assert_eq!(Rate::from_bps(900).clamp(min, max).bps(), 250);
    }

    #[test]
    fn test_zone_for_state() {
        let data = ReferenceData {
            zones: vec![
                ShippingZone {
                    id: "west".to_string(),
                    name: "West Coast".to_string(),
                    rate_bps: 100,
                    fixed_cost_cents: None,
                    states: vec!["CA".to_string(), "OR".to_string(), "WA".to_string()],
                },
                ShippingZone {
                    id: "mountain".to_string(),
                    name: "Mountain".to_string(),
                    rate_bps: 150,
                    fixed_cost_cents: Some(2500),
                    states: vec!["CO".to_string(), "UT".to_string()],
                },
            ],
            ..ReferenceData::empty()
        };

        assert_eq!(data.zone_for_state("CA").unwrap().id, "west");
        assert_eq!(data.zone_for_state("ut").unwrap().id, "mountain");
        assert!(data.zone_for_state("TX").is_none());
    }

    #[test]
    fn test_default_tier_lookup() {
        let data = ReferenceData {
            tiers: vec![
                Tier {
                    id: "standard".to_string(),
                    name: "Standard".to_string(),
                    threshold: 0.0,
                    discount_bps: 0,
                    is_default: true,
                },
                Tier {
                    id: "wholesale".to_string(),
                    name: "Wholesale".to_string(),
                    threshold: 10.0,
                    discount_bps: 500,
                    is_default: false,
                },
            ],
            ..ReferenceData::empty()
        };

        assert_eq!(data.default_tier().unwrap().id, "standard");
    }
}
