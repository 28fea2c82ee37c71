//! # Quote Engine
//!
//! The calculation core: owns the line items and the reference data, and
//! derives every total deterministically from current state.
//!
//! ## Calculation Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      calculate_all()                                    │
//! │                                                                         │
//! │  line items ──► subtotal = Σ line.total                                 │
//! │       │                                                                 │
//! │       ├──► volume = Σ line.master_cases (fractional, not rounded)       │
//! │       │         │                                                       │
//! │       │         ▼                                                       │
//! │       │    tier = greatest threshold ≤ volume, else default             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  shipping:  override > 0 ──────────────────────► override               │
//! │             no zone ───────────────────────────► $0                     │
//! │             zone rate, clamped to [0.5%, 2.5%] ► max(rate×sub, floor)   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  card fee = (subtotal + shipping) × 3%                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  total = subtotal + shipping + fee                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Stale Totals Cannot Exist
//! The `Quote` aggregate is DERIVED state: it is computed on demand and never
//! cached inside the engine. Every mutation returns the freshly recomputed
//! quote, and `quote()` recomputes from scratch, so a caller can never
//! observe totals that predate a mutation.
//!
//! ## Degraded Input Never Raises
//! The pipeline favors availability over correctness-signaling: a dangling
//! product key prices at zero, garbage quantities coerce to zero, a missing
//! zone ships for free. Each such degradation is reported through the
//! quote's warning channel without changing the computed numbers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::input::{coerce_price, coerce_quantity, LineField};
use crate::money::Money;
use crate::types::{Product, ReferenceData, Tier};
use crate::{CARD_FEE_RATE, SHIPPING_RATE_MAX, SHIPPING_RATE_MIN};

// =============================================================================
// Packing Ratios
// =============================================================================

/// The three fixed ratios that make a line's quantity fields mutually
/// derivable. A line without a resolvable product has all-zero ratios, and
/// every derivation through a zero ratio yields zero.
#[derive(Debug, Clone, Copy, Default)]
struct PackingRatios {
    units_per_case: f64,
    display_boxes_per_case: f64,
    units_per_display_box: f64,
}

impl PackingRatios {
    fn of(product: &Product) -> Self {
        PackingRatios {
            units_per_case: product.units_per_case,
            display_boxes_per_case: product.display_boxes_per_case,
            units_per_display_box: product.units_per_display_box,
        }
    }
}

/// Division that treats a zero divisor as "quantity unknowable": yields 0.
fn ratio_div(numerator: f64, divisor: f64) -> f64 {
    if divisor == 0.0 {
        0.0
    } else {
        numerator / divisor
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One row of a quote.
///
/// ## Snapshot Pattern
/// `unit_price_cents` and `name` are frozen from the catalog at the moment
/// the product is linked (add time, or a later `productKey` edit). Catalog
/// edits do not retroactively change an open quote; only re-linking the
/// product re-reads the price.
///
/// ## Quantity Fields
/// `master_cases`, `display_boxes`, and `units` are mutually derivable
/// through the product's packing ratios. Exactly ONE of them is
/// authoritative per update; the other two are recomputed from it, never
/// averaged or reconciled against prior values. Master cases may be
/// fractional (6 display boxes of a 12-box case is 0.5 cases).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Opaque id, generated at creation (UUID v4).
    pub id: String,

    /// Catalog link. May be unset while the product is being chosen.
    pub product_key: Option<String>,

    /// Product name at link time (frozen). Empty for unassigned rows.
    pub name: String,

    /// Unit price in cents at link time (frozen, operator-overridable).
    pub unit_price_cents: i64,

    /// Quantity in master cases (may be fractional).
    pub master_cases: f64,

    /// Quantity in display boxes.
    pub display_boxes: f64,

    /// Fully-expanded individual unit count. Line totals always use this.
    pub units: f64,

    /// units × unit price, rounded half up to cents. Recomputed on every
    /// mutation.
    pub total_cents: i64,

    /// When this line was added to the quote.
    pub added_at: DateTime<Utc>,
}

impl LineItem {
    /// Creates an unassigned placeholder row (product still being chosen).
    fn unassigned(initial_cases: f64) -> Self {
        LineItem {
            id: Uuid::new_v4().to_string(),
            product_key: None,
            name: String::new(),
            unit_price_cents: 0,
            master_cases: initial_cases,
            display_boxes: 0.0,
            units: 0.0,
            total_cents: 0,
            added_at: Utc::now(),
        }
    }

    /// Creates a line from a catalog product, freezing price and name.
    fn from_product(product: &Product, initial_cases: f64) -> Self {
        let mut line = LineItem {
            id: Uuid::new_v4().to_string(),
            product_key: Some(product.key.clone()),
            name: product.name.clone(),
            unit_price_cents: product.price_cents,
            master_cases: initial_cases,
            display_boxes: initial_cases * product.display_boxes_per_case,
            units: initial_cases * product.units_per_case,
            total_cents: 0,
            added_at: Utc::now(),
        };
        line.recompute_total();
        line
    }

    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the line total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Re-establishes `total = units × unit price`.
    fn recompute_total(&mut self) {
        self.total_cents = Money::from_unit_quantity(self.unit_price(), self.units).cents();
    }

    /// Applies an authoritative quantity edit, deriving the other two
    /// quantity fields through the packing ratios.
    fn set_quantity(&mut self, field: LineField, qty: f64, packing: PackingRatios) {
        match field {
            LineField::MasterCases => {
                self.master_cases = qty;
                self.display_boxes = qty * packing.display_boxes_per_case;
                self.units = qty * packing.units_per_case;
            }
            LineField::DisplayBoxes => {
                self.display_boxes = qty;
                self.units = qty * packing.units_per_display_box;
                // Division, not floor: 6 boxes at 12 per case = 0.5 cases.
                self.master_cases = ratio_div(qty, packing.display_boxes_per_case);
            }
            LineField::Units => {
                self.units = qty;
                self.master_cases = ratio_div(qty, packing.units_per_case);
                self.display_boxes = ratio_div(qty, packing.units_per_display_box);
            }
            // Not quantity fields; handled by the engine.
            LineField::ProductKey | LineField::UnitPrice => {}
        }
        self.recompute_total();
    }
}

// =============================================================================
// Quote Aggregate
// =============================================================================

/// Derived totals for the whole quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteTotals {
    /// Σ line totals.
    pub subtotal_cents: i64,

    /// Zone-based, floored, clamped - or the manual override.
    pub shipping_cents: i64,

    /// Flat 3% of (subtotal + shipping).
    pub credit_card_fee_cents: i64,

    /// subtotal + shipping + fee.
    pub total_cents: i64,

    /// Σ line master cases (fractional; drives tier selection).
    pub total_volume_cases: f64,

    /// Number of line items.
    pub line_count: usize,
}

impl QuoteTotals {
    /// Returns the subtotal as Money.
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }

    /// Returns the shipping cost as Money.
    #[inline]
    pub fn shipping(&self) -> Money {
        Money::from_cents(self.shipping_cents)
    }

    /// Returns the credit-card fee as Money.
    #[inline]
    pub fn credit_card_fee(&self) -> Money {
        Money::from_cents(self.credit_card_fee_cents)
    }

    /// Returns the grand total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

/// The tier the current volume qualifies for (informational on the quote;
/// tier pricing is baked into catalog prices upstream).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierSummary {
    pub id: String,
    pub name: String,
    pub threshold: f64,
    pub discount_bps: u32,
}

impl From<&Tier> for TierSummary {
    fn from(tier: &Tier) -> Self {
        TierSummary {
            id: tier.id.clone(),
            name: tier.name.clone(),
            threshold: tier.threshold,
            discount_bps: tier.discount_bps,
        }
    }
}

/// Non-fatal degradations observed during calculation.
///
/// Warnings NEVER change the computed numbers - they exist so a host can
/// surface "this quote was computed from degraded inputs" without breaking
/// behavioral parity with the zero-fallback pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum QuoteWarning {
    /// A zone's configured rate fell outside the clamp window and was
    /// silently pulled into bounds.
    RateClamped {
        zone_id: String,
        configured_bps: u32,
        applied_bps: u32,
    },

    /// A line points at a product key that no longer exists in the catalog.
    /// The line's frozen snapshot still prices it; re-linking will zero it.
    MissingProduct { line_id: String, product_key: String },

    /// The active zone id has no match in the shipping table; shipping
    /// degraded to zero.
    UnknownShippingZone { zone_id: String },

    /// The tier table has no default tier and no threshold qualified.
    NoDefaultTier,
}

/// The quote aggregate: ordered line items plus every derived field.
///
/// Returned by [`QuoteEngine::quote`] and by every mutation; re-read by the
/// presentation layer after each call to refresh the display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Line items in insertion order (significant for display only).
    pub lines: Vec<LineItem>,

    /// All derived totals.
    pub totals: QuoteTotals,

    /// The tier selected by current volume, or none on degraded data.
    pub tier: Option<TierSummary>,

    /// Degradations observed during this calculation.
    pub warnings: Vec<QuoteWarning>,
}

// =============================================================================
// Quote Engine
// =============================================================================

/// Owns the line items and reference data; the single writer for both.
///
/// The presentation layer never mutates a line directly - only through these
/// operations. All operations are synchronous and complete within a single
/// call; the engine performs no I/O and is handed reference data already
/// resolved.
#[derive(Debug, Clone)]
pub struct QuoteEngine {
    reference: ReferenceData,
    lines: Vec<LineItem>,
    shipping_zone: Option<String>,
    shipping_override: Option<Money>,
}

impl QuoteEngine {
    /// Creates an engine over the given reference data, with no lines.
    pub fn new(reference: ReferenceData) -> Self {
        QuoteEngine {
            reference,
            lines: Vec::new(),
            shipping_zone: None,
            shipping_override: None,
        }
    }

    /// Replaces the reference data (admin-edited substitution).
    ///
    /// Existing lines keep their frozen snapshots until their product link
    /// is next edited.
    pub fn set_reference_data(&mut self, reference: ReferenceData) {
        self.reference = reference;
    }

    /// Read access to the reference data.
    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    /// The current line items, in insertion order.
    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    /// The active shipping zone id, if set.
    pub fn shipping_zone(&self) -> Option<&str> {
        self.shipping_zone.as_deref()
    }

    /// The manual shipping override, if set.
    pub fn shipping_override(&self) -> Option<Money> {
        self.shipping_override
    }

    /// Restores engine state from a persisted session snapshot.
    ///
    /// Line totals are re-derived rather than trusted: the snapshot is a
    /// convenience cache with an unstable schema, and `total = units ×
    /// unit price` must hold no matter what was on disk.
    pub fn restore(
        &mut self,
        mut lines: Vec<LineItem>,
        shipping_zone: Option<String>,
        shipping_override: Option<Money>,
    ) {
        for line in &mut lines {
            line.recompute_total();
        }
        self.lines = lines;
        self.shipping_zone = shipping_zone;
        self.shipping_override = shipping_override;
    }

    // -------------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------------

    /// Adds a line item, snapshotting price and name from the catalog.
    ///
    /// ## Arguments
    /// * `product_key` - catalog key, or None for an unassigned placeholder
    ///   row (the operator picks the product afterwards)
    /// * `initial_cases` - starting quantity in master cases (default 1)
    ///
    /// ## Guarantees
    /// Does not mutate any other line item. The returned clone is the new
    /// row; read [`QuoteEngine::quote`] for the recomputed aggregate.
    pub fn add_line(&mut self, product_key: Option<&str>, initial_cases: Option<f64>) -> LineItem {
        let cases = initial_cases.unwrap_or(1.0);

        let line = match product_key {
            None => LineItem::unassigned(cases),
            Some(key) => match self.reference.product(key) {
                Some(product) => LineItem::from_product(product, cases),
                None => {
                    // Dangling key: keep the link, price at zero. The
                    // warning channel reports it on every calculation.
                    warn!(product_key = %key, "add_line: product key not in catalog");
                    let mut line = LineItem::unassigned(cases);
                    line.product_key = Some(key.to_string());
                    line
                }
            },
        };

        debug!(line_id = %line.id, product_key = ?line.product_key, "line added");
        self.lines.push(line.clone());
        line
    }

    /// Applies a single-field edit from the presentation layer.
    ///
    /// `raw_value` is the untouched form-field string; numeric fields are
    /// coerced (parse failure → 0). An unknown `line_id` is a logged no-op,
    /// matching the always-produce-a-number contract.
    pub fn update_line(&mut self, line_id: &str, field: LineField, raw_value: &str) -> Quote {
        let Some(idx) = self.lines.iter().position(|l| l.id == line_id) else {
            warn!(line_id = %line_id, field = field.as_str(), "update for unknown line ignored");
            return self.calculate_all();
        };

        match field {
            LineField::ProductKey => self.relink_product(idx, raw_value),
            LineField::UnitPrice => {
                let line = &mut self.lines[idx];
                line.unit_price_cents = coerce_price(raw_value).cents();
                line.recompute_total();
            }
            LineField::MasterCases | LineField::DisplayBoxes | LineField::Units => {
                let qty = coerce_quantity(raw_value);
                let packing = self.packing_for(idx);
                self.lines[idx].set_quantity(field, qty, packing);
            }
        }

        self.calculate_all()
    }

    /// Removes a line by id. No-op if absent; other lines' ids and order
    /// are unaffected.
    pub fn remove_line(&mut self, line_id: &str) -> Quote {
        let before = self.lines.len();
        self.lines.retain(|l| l.id != line_id);
        if self.lines.len() == before {
            debug!(line_id = %line_id, "remove for unknown line ignored");
        }
        self.calculate_all()
    }

    /// Clears all line items (quote reset).
    pub fn clear_lines(&mut self) -> Quote {
        self.lines.clear();
        self.calculate_all()
    }

    /// Sets or clears the active shipping zone.
    pub fn set_shipping_zone(&mut self, zone_id: Option<&str>) -> Quote {
        self.shipping_zone = zone_id.map(str::to_string);
        self.calculate_all()
    }

    /// Sets or clears the manual shipping override.
    ///
    /// Only a positive override short-circuits zone logic; zero and
    /// negative amounts are stored but ignored by the pipeline.
    pub fn set_shipping_override(&mut self, amount: Option<Money>) -> Quote {
        self.shipping_override = amount;
        self.calculate_all()
    }

    // -------------------------------------------------------------------------
    // Calculation
    // -------------------------------------------------------------------------

    /// The single recomputation entrypoint.
    ///
    /// Idempotent and side-effect-free on line items: calling it twice with
    /// no intervening mutation yields identical quotes.
    pub fn calculate_all(&self) -> Quote {
        let mut warnings = Vec::new();

        // Dangling product links degrade silently; report them.
        for line in &self.lines {
            if let Some(key) = &line.product_key {
                if self.reference.product(key).is_none() {
                    warnings.push(QuoteWarning::MissingProduct {
                        line_id: line.id.clone(),
                        product_key: key.clone(),
                    });
                }
            }
        }

        let subtotal: Money = self.lines.iter().map(LineItem::total).sum();
        let total_volume_cases: f64 = self.lines.iter().map(|l| l.master_cases).sum();

        let tier = self.select_tier(total_volume_cases, &mut warnings);
        let shipping = self.shipping_cost(subtotal, &mut warnings);
        let credit_card_fee = (subtotal + shipping).apply_rate(CARD_FEE_RATE);
        let total = subtotal + shipping + credit_card_fee;

        Quote {
            lines: self.lines.clone(),
            totals: QuoteTotals {
                subtotal_cents: subtotal.cents(),
                shipping_cents: shipping.cents(),
                credit_card_fee_cents: credit_card_fee.cents(),
                total_cents: total.cents(),
                total_volume_cases,
                line_count: self.lines.len(),
            },
            tier: tier.map(TierSummary::from),
            warnings,
        }
    }

    /// Convenience alias: the current quote, freshly computed.
    #[inline]
    pub fn quote(&self) -> Quote {
        self.calculate_all()
    }

    /// Selects the tier with the greatest threshold not exceeding the
    /// order's volume; falls back to the default tier.
    ///
    /// Threshold ties resolve to the LAST declared tier - declaration order
    /// is preserved in the tier table, so this is deterministic.
    fn select_tier(&self, volume_cases: f64, warnings: &mut Vec<QuoteWarning>) -> Option<&Tier> {
        let mut selected: Option<&Tier> = None;
        for tier in &self.reference.tiers {
            if tier.threshold <= volume_cases
                && selected.map_or(true, |best| tier.threshold >= best.threshold)
            {
                selected = Some(tier);
            }
        }

        let fallback = selected.or_else(|| self.reference.default_tier());
        if fallback.is_none() && !self.reference.tiers.is_empty() {
            warnings.push(QuoteWarning::NoDefaultTier);
        }
        fallback
    }

    /// Shipping cost: manual override wins outright, then zone-based with
    /// the rate clamped into the shipping window and floored by the zone's
    /// fixed cost.
    fn shipping_cost(&self, subtotal: Money, warnings: &mut Vec<QuoteWarning>) -> Money {
        if let Some(amount) = self.shipping_override {
            if amount.is_positive() {
                return amount;
            }
        }

        let Some(zone_id) = self.shipping_zone.as_deref() else {
            return Money::zero();
        };

        let Some(zone) = self.reference.zone(zone_id) else {
            warnings.push(QuoteWarning::UnknownShippingZone {
                zone_id: zone_id.to_string(),
            });
            return Money::zero();
        };

        // The clamp silently overrides misconfigured reference data instead
        // of rejecting it; the warning channel records when it bit.
        let configured = zone.rate();
        let applied = configured.clamp(SHIPPING_RATE_MIN, SHIPPING_RATE_MAX);
        if applied != configured {
            warnings.push(QuoteWarning::RateClamped {
                zone_id: zone_id.to_string(),
                configured_bps: configured.bps(),
                applied_bps: applied.bps(),
            });
        }

        let rate_based = subtotal.apply_rate(applied);
        match zone.fixed_cost() {
            Some(floor) => rate_based.max(floor),
            None => rate_based,
        }
    }

    /// Packing ratios for the line's current product link (all-zero when
    /// the link is unset or dangling).
    fn packing_for(&self, idx: usize) -> PackingRatios {
        self.lines[idx]
            .product_key
            .as_deref()
            .and_then(|key| self.reference.product(key))
            .map(PackingRatios::of)
            .unwrap_or_default()
    }

    /// Re-links a line to a (different) product, re-snapshotting price and
    /// name and re-deriving quantities from the master-case count against
    /// the new packing ratios.
    fn relink_product(&mut self, idx: usize, raw_key: &str) {
        let key = raw_key.trim();

        if key.is_empty() {
            let line = &mut self.lines[idx];
            line.product_key = None;
            line.name.clear();
            line.unit_price_cents = 0;
            let cases = line.master_cases;
            line.set_quantity(LineField::MasterCases, cases, PackingRatios::default());
            return;
        }

        let product = self.reference.product(key).cloned();
        let line = &mut self.lines[idx];
        line.product_key = Some(key.to_string());

        match product {
            Some(p) => {
                line.name = p.name.clone();
                line.unit_price_cents = p.price_cents;
                let cases = line.master_cases;
                line.set_quantity(LineField::MasterCases, cases, PackingRatios::of(&p));
            }
            None => {
                warn!(product_key = %key, "relink to unknown product; line prices at zero");
                line.name.clear();
                line.unit_price_cents = 0;
                let cases = line.master_cases;
                line.set_quantity(LineField::MasterCases, cases, PackingRatios::default());
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ShippingZone;

    fn test_product(key: &str, name: &str, price_cents: i64, upc: f64, dbpc: f64, updb: f64) -> Product {
        Product {
            key: key.to_string(),
            name: name.to_string(),
            category: "candy".to_string(),
            price_cents,
            units_per_case: upc,
            display_boxes_per_case: dbpc,
            units_per_display_box: updb,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn tier(id: &str, threshold: f64, discount_bps: u32, is_default: bool) -> Tier {
        Tier {
            id: id.to_string(),
            name: id.to_string(),
            threshold,
            discount_bps,
            is_default,
        }
    }

    fn zone(id: &str, rate_bps: u32, fixed_cost_cents: Option<i64>, states: &[&str]) -> ShippingZone {
        ShippingZone {
            id: id.to_string(),
            name: id.to_string(),
            rate_bps,
            fixed_cost_cents,
            states: states.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Catalog anchored on a $10.00-a-unit product packed 144 to a case,
    /// 12 boxes of 12.
    fn test_reference() -> ReferenceData {
        let mut products = std::collections::BTreeMap::new();
        for p in [
            test_product("choc-bar", "Chocolate Bar 50g", 1000, 144.0, 12.0, 12.0),
            test_product("gummy-mix", "Gummy Mix 200g", 250, 24.0, 6.0, 4.0),
        ] {
            products.insert(p.key.clone(), p);
        }

        ReferenceData {
            products,
            tiers: vec![
                tier("standard", 0.0, 0, true),
                tier("wholesale", 10.0, 500, false),
                tier("distributor", 25.0, 1000, false),
            ],
            zones: vec![
                zone("west", 100, None, &["CA", "OR", "WA"]),
                zone("east-low", 10, Some(2500), &["NY", "NJ"]),
                zone("premium", 900, None, &["AK", "HI"]),
            ],
        }
    }

    fn engine() -> QuoteEngine {
        QuoteEngine::new(test_reference())
    }

    // -------------------------------------------------------------------------
    // Worked scenarios
    // -------------------------------------------------------------------------

    #[test]
    fn test_two_cases_no_shipping() {
        let mut e = engine();
        let line = e.add_line(Some("choc-bar"), Some(2.0));

        assert_eq!(line.units, 288.0);
        assert_eq!(line.total_cents, 288_000); // $2880.00

        let q = e.quote();
        assert_eq!(q.totals.subtotal_cents, 288_000);
        assert_eq!(q.totals.shipping_cents, 0);
        assert_eq!(q.totals.credit_card_fee_cents, 8640); // $86.40
        assert_eq!(q.totals.total_cents, 296_640); // $2966.40
    }

    #[test]
    fn test_two_cases_with_one_percent_zone() {
        let mut e = engine();
        e.add_line(Some("choc-bar"), Some(2.0));
        let q = e.set_shipping_zone(Some("west"));

        assert_eq!(q.totals.shipping_cents, 2880); // 1% of $2880
        // (2880.00 + 28.80) × 3% = 87.264 → $87.26
        assert_eq!(q.totals.credit_card_fee_cents, 8726);
        assert_eq!(q.totals.total_cents, 299_606); // $2996.06
    }

    #[test]
    fn test_manual_override_wins() {
        let mut e = engine();
        e.add_line(Some("choc-bar"), Some(2.0));
        e.set_shipping_zone(Some("west"));
        let q = e.set_shipping_override(Some(Money::from_cents(5000)));

        assert_eq!(q.totals.shipping_cents, 5000); // $50.00 flat
    }

    #[test]
    fn test_zero_override_falls_through_to_zone() {
        let mut e = engine();
        e.add_line(Some("choc-bar"), Some(2.0));
        e.set_shipping_zone(Some("west"));
        let q = e.set_shipping_override(Some(Money::zero()));

        assert_eq!(q.totals.shipping_cents, 2880);
    }

    #[test]
    fn test_removing_only_line_zeroes_everything() {
        let mut e = engine();
        let line = e.add_line(Some("choc-bar"), Some(2.0));
        let q = e.remove_line(&line.id);

        assert_eq!(q.totals.subtotal_cents, 0);
        assert_eq!(q.totals.shipping_cents, 0);
        assert_eq!(q.totals.credit_card_fee_cents, 0);
        assert_eq!(q.totals.total_cents, 0);
        assert_eq!(q.totals.line_count, 0);
    }

    // -------------------------------------------------------------------------
    // Quantity derivation
    // -------------------------------------------------------------------------

    #[test]
    fn test_display_boxes_derive_fractional_cases() {
        let mut e = engine();
        let line = e.add_line(Some("choc-bar"), None);
        let q = e.update_line(&line.id, LineField::DisplayBoxes, "6");

        let l = &q.lines[0];
        assert_eq!(l.display_boxes, 6.0);
        assert_eq!(l.units, 72.0); // 6 boxes × 12 per box
        assert_eq!(l.master_cases, 0.5); // division, not floor
        assert_eq!(l.total_cents, 72_000);
    }

    #[test]
    fn test_units_derive_cases_and_boxes() {
        let mut e = engine();
        let line = e.add_line(Some("choc-bar"), None);
        let q = e.update_line(&line.id, LineField::Units, "288");

        let l = &q.lines[0];
        assert_eq!(l.units, 288.0);
        assert_eq!(l.master_cases, 2.0);
        assert_eq!(l.display_boxes, 24.0);
    }

    #[test]
    fn test_master_cases_identity() {
        let mut e = engine();
        let line = e.add_line(Some("choc-bar"), None);
        let q = e.update_line(&line.id, LineField::MasterCases, "3.5");

        let l = &q.lines[0];
        assert!((l.units - l.master_cases * 144.0).abs() < 1e-9);
        assert!((l.display_boxes - l.master_cases * 12.0).abs() < 1e-9);
        assert_eq!(l.total_cents, 504_000); // 504 units × $10.00
    }

    #[test]
    fn test_garbage_quantity_coerces_to_zero() {
        let mut e = engine();
        let line = e.add_line(Some("choc-bar"), Some(2.0));
        let q = e.update_line(&line.id, LineField::MasterCases, "lots");

        assert_eq!(q.lines[0].units, 0.0);
        assert_eq!(q.totals.subtotal_cents, 0);
    }

    #[test]
    fn test_unit_price_override() {
        let mut e = engine();
        let line = e.add_line(Some("choc-bar"), Some(1.0));
        let q = e.update_line(&line.id, LineField::UnitPrice, "9.50");

        assert_eq!(q.lines[0].unit_price_cents, 950);
        assert_eq!(q.lines[0].total_cents, 136_800); // 144 × $9.50
    }

    #[test]
    fn test_product_relink_resnapshots_price_and_ratios() {
        let mut e = engine();
        let line = e.add_line(Some("choc-bar"), Some(2.0));
        let q = e.update_line(&line.id, LineField::ProductKey, "gummy-mix");

        let l = &q.lines[0];
        assert_eq!(l.unit_price_cents, 250);
        assert_eq!(l.name, "Gummy Mix 200g");
        assert_eq!(l.master_cases, 2.0); // case count kept
        assert_eq!(l.units, 48.0); // re-derived: 2 × 24
        assert_eq!(l.display_boxes, 12.0); // 2 × 6
        assert_eq!(l.total_cents, 12_000);
    }

    #[test]
    fn test_relink_to_empty_unsets_product() {
        let mut e = engine();
        let line = e.add_line(Some("choc-bar"), Some(2.0));
        let q = e.update_line(&line.id, LineField::ProductKey, "");

        let l = &q.lines[0];
        assert!(l.product_key.is_none());
        assert_eq!(l.unit_price_cents, 0);
        assert_eq!(l.total_cents, 0);
        assert_eq!(l.master_cases, 2.0); // quantity intent preserved
    }

    #[test]
    fn test_update_unknown_line_is_noop() {
        let mut e = engine();
        e.add_line(Some("choc-bar"), Some(2.0));
        let before = e.quote();
        let after = e.update_line("no-such-id", LineField::MasterCases, "99");

        assert_eq!(before, after);
    }

    // -------------------------------------------------------------------------
    // Aggregation
    // -------------------------------------------------------------------------

    #[test]
    fn test_subtotal_additivity_on_remove() {
        let mut e = engine();
        e.add_line(Some("choc-bar"), Some(2.0));
        let gummy = e.add_line(Some("gummy-mix"), Some(1.0));

        let before = e.quote();
        let removed_total = before.lines[1].total_cents;
        let after = e.remove_line(&gummy.id);

        assert_eq!(
            after.totals.subtotal_cents,
            before.totals.subtotal_cents - removed_total
        );
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut e = engine();
        let a = e.add_line(Some("choc-bar"), Some(1.0));
        let b = e.add_line(None, None);
        let c = e.add_line(Some("gummy-mix"), Some(1.0));

        let q = e.quote();
        assert_eq!(
            q.lines.iter().map(|l| l.id.as_str()).collect::<Vec<_>>(),
            vec![a.id.as_str(), b.id.as_str(), c.id.as_str()]
        );
    }

    #[test]
    fn test_unassigned_placeholder_row() {
        let mut e = engine();
        let line = e.add_line(None, None);

        assert!(line.product_key.is_none());
        assert_eq!(line.master_cases, 1.0); // default quantity
        assert_eq!(line.total_cents, 0);
        assert!(e.quote().warnings.is_empty()); // unassigned is not dangling
    }

    #[test]
    fn test_idempotent_calculation() {
        let mut e = engine();
        e.add_line(Some("choc-bar"), Some(2.0));
        e.set_shipping_zone(Some("west"));

        assert_eq!(e.calculate_all(), e.calculate_all());
    }

    #[test]
    fn test_clear_lines() {
        let mut e = engine();
        e.add_line(Some("choc-bar"), Some(2.0));
        e.add_line(Some("gummy-mix"), Some(1.0));
        let q = e.clear_lines();

        assert!(q.lines.is_empty());
        assert_eq!(q.totals.total_cents, 0);
    }

    // -------------------------------------------------------------------------
    // Tier selection
    // -------------------------------------------------------------------------

    #[test]
    fn test_tier_default_when_below_all_thresholds() {
        // Tier table where even the default has a nonzero threshold.
        let mut reference = test_reference();
        reference.tiers = vec![
            tier("base", 5.0, 0, true),
            tier("wholesale", 10.0, 500, false),
        ];
        let mut e = QuoteEngine::new(reference);
        e.add_line(Some("choc-bar"), Some(2.0)); // 2 cases < 5

        assert_eq!(e.quote().tier.unwrap().id, "base");
    }

    #[test]
    fn test_tier_highest_qualifying_threshold() {
        let mut e = engine();
        e.add_line(Some("choc-bar"), Some(12.0));

        assert_eq!(e.quote().tier.unwrap().id, "wholesale");

        let id = e.lines()[0].id.clone();
        e.update_line(&id, LineField::MasterCases, "30");
        assert_eq!(e.quote().tier.unwrap().id, "distributor");
    }

    #[test]
    fn test_tier_fractional_volume_not_rounded() {
        let mut e = engine();
        e.add_line(Some("choc-bar"), Some(9.6));

        // 9.6 < 10: wholesale must NOT be selected by rounding up.
        assert_eq!(e.quote().tier.unwrap().id, "standard");
    }

    #[test]
    fn test_tier_monotonic_in_volume() {
        let mut e = engine();
        let line = e.add_line(Some("choc-bar"), Some(1.0));

        let mut last_threshold = f64::NEG_INFINITY;
        for cases in ["1", "5", "10", "20", "25", "100"] {
            let q = e.update_line(&line.id, LineField::MasterCases, cases);
            let threshold = q.tier.unwrap().threshold;
            assert!(threshold >= last_threshold);
            last_threshold = threshold;
        }
    }

    #[test]
    fn test_tier_tie_last_declared_wins() {
        let mut reference = test_reference();
        reference.tiers = vec![
            tier("standard", 0.0, 0, true),
            tier("partner-a", 10.0, 500, false),
            tier("partner-b", 10.0, 750, false),
        ];
        let mut e = QuoteEngine::new(reference);
        e.add_line(Some("choc-bar"), Some(10.0));

        assert_eq!(e.quote().tier.unwrap().id, "partner-b");
    }

    #[test]
    fn test_no_default_tier_warning() {
        let mut reference = test_reference();
        reference.tiers = vec![tier("wholesale", 10.0, 500, false)];
        let mut e = QuoteEngine::new(reference);
        e.add_line(Some("choc-bar"), Some(2.0)); // below threshold, no default

        let q = e.quote();
        assert!(q.tier.is_none());
        assert!(q.warnings.contains(&QuoteWarning::NoDefaultTier));
    }

    // -------------------------------------------------------------------------
    // Shipping
    // -------------------------------------------------------------------------

    #[test]
    fn test_rate_clamped_low_with_warning() {
        let mut e = engine();
        e.add_line(Some("choc-bar"), Some(100.0)); // big subtotal, floor moot
        let q = e.set_shipping_zone(Some("east-low"));

        // Configured 10 bps clamps up to 50 bps (0.5%).
        let subtotal = q.totals.subtotal_cents as f64;
        let effective = q.totals.shipping_cents as f64 / subtotal;
        assert!((effective - 0.005).abs() < 1e-6);
        assert!(q.warnings.iter().any(|w| matches!(
            w,
            QuoteWarning::RateClamped { configured_bps: 10, applied_bps: 50, .. }
        )));
    }

    #[test]
    fn test_rate_clamped_high_with_warning() {
        let mut e = engine();
        e.add_line(Some("choc-bar"), Some(2.0));
        let q = e.set_shipping_zone(Some("premium"));

        // Configured 900 bps clamps down to 250 bps (2.5%).
        assert_eq!(q.totals.shipping_cents, 7200); // 2.5% of $2880
        assert!(q.warnings.iter().any(|w| matches!(
            w,
            QuoteWarning::RateClamped { configured_bps: 900, applied_bps: 250, .. }
        )));
    }

    #[test]
    fn test_in_window_rate_not_clamped_no_warning() {
        let mut e = engine();
        e.add_line(Some("choc-bar"), Some(2.0));
        let q = e.set_shipping_zone(Some("west"));

        assert!(!q
            .warnings
            .iter()
            .any(|w| matches!(w, QuoteWarning::RateClamped { .. })));
    }

    #[test]
    fn test_fixed_cost_floor() {
        let mut e = engine();
        e.add_line(Some("gummy-mix"), Some(1.0)); // $60.00 subtotal
        let q = e.set_shipping_zone(Some("east-low"));

        // 0.5% of $60.00 is $0.30; the $25.00 floor wins.
        assert_eq!(q.totals.shipping_cents, 2500);
    }

    #[test]
    fn test_unknown_zone_ships_free_with_warning() {
        let mut e = engine();
        e.add_line(Some("choc-bar"), Some(2.0));
        let q = e.set_shipping_zone(Some("atlantis"));

        assert_eq!(q.totals.shipping_cents, 0);
        assert!(q.warnings.iter().any(|w| matches!(
            w,
            QuoteWarning::UnknownShippingZone { zone_id } if zone_id == "atlantis"
        )));
    }

    #[test]
    fn test_clearing_zone_zeroes_shipping() {
        let mut e = engine();
        e.add_line(Some("choc-bar"), Some(2.0));
        e.set_shipping_zone(Some("west"));
        let q = e.set_shipping_zone(None);

        assert_eq!(q.totals.shipping_cents, 0);
    }

    // -------------------------------------------------------------------------
    // Degraded reference data
    // -------------------------------------------------------------------------

    #[test]
    fn test_dangling_product_key_warns_and_prices_zero() {
        let mut e = engine();
        let line = e.add_line(Some("discontinued"), Some(2.0));
        let q = e.quote();

        assert_eq!(q.lines[0].total_cents, 0);
        assert!(q.warnings.iter().any(|w| matches!(
            w,
            QuoteWarning::MissingProduct { line_id, .. } if *line_id == line.id
        )));
    }

    #[test]
    fn test_catalog_edit_does_not_touch_frozen_snapshot() {
        let mut e = engine();
        e.add_line(Some("choc-bar"), Some(2.0));

        // Reprice the product in a fresh reference-data set.
        let mut reference = test_reference();
        reference.products.get_mut("choc-bar").unwrap().price_cents = 9999;
        e.set_reference_data(reference);

        // Snapshot unchanged until the line's product link is re-edited.
        assert_eq!(e.quote().lines[0].unit_price_cents, 1000);
    }

    #[test]
    fn test_restore_rederives_totals() {
        let mut e = engine();
        let added = e.add_line(Some("choc-bar"), Some(2.0));

        let mut stale = added.clone();
        stale.total_cents = 1; // corrupt cached total on disk

        let mut restored = engine();
        restored.restore(vec![stale], Some("west".to_string()), None);

        let q = restored.quote();
        assert_eq!(q.lines[0].total_cents, 288_000);
        assert_eq!(q.totals.shipping_cents, 2880);
    }
}
