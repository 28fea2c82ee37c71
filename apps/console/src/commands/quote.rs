//! # Quote Commands
//!
//! The line-item mutation API consumed by the presentation layer.
//!
//! ## Quote Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Quote Lifecycle                                      │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────────┐                     │
//! │  │  Empty   │────►│  Lines   │────►│  Zone/fees   │────► (sent out by   │
//! │  │  Quote   │     │  edited  │     │  applied     │       the email     │
//! │  └──────────┘     └──────────┘     └──────────────┘       collaborator) │
//! │        ▲               │                                                │
//! │        │          add_line                                              │
//! │        │          update_line                                           │
//! │        │          remove_line                                           │
//! │        │               │                                                │
//! │        └── clear_quote ┘                                                │
//! │                                                                         │
//! │  EVERY command returns the freshly recomputed Quote, and every          │
//! │  mutating command persists the session snapshot before returning -      │
//! │  a restart resumes exactly where the operator left off.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Why These Commands Never Error
//! The calculation pipeline always produces a number; degraded input shows
//! up on `quote.warnings`, not as an Err. The snapshot write is a
//! write-behind cache: if the disk is full the mutation still happened, so
//! the failure is logged and the quote returned anyway.

use tracing::{debug, warn};

use quotedesk_core::input::{coerce_price, LineField};
use quotedesk_core::quote::Quote;

use crate::state::{EngineState, StoreState};

/// Gets the current quote (read-only, freshly computed).
pub fn get_quote(engine: &EngineState) -> Quote {
    debug!("get_quote command");
    engine.with_engine(|e| e.quote())
}

/// Adds a line item to the quote.
///
/// ## Behavior
/// - `product_key` None: unassigned placeholder row
/// - Price and name are "frozen" at time of adding (catalog edits won't
///   change the line until it is re-linked)
/// - `initial_cases` defaults to 1 master case
///
/// ## Returns
/// Updated quote; the new line is the last element of `quote.lines`.
pub async fn add_line(
    engine: &EngineState,
    store: &StoreState,
    product_key: Option<String>,
    initial_cases: Option<f64>,
) -> Quote {
    debug!(product_key = ?product_key, initial_cases = ?initial_cases, "add_line command");

    let quote = engine.with_engine_mut(|e| {
        e.add_line(product_key.as_deref(), initial_cases);
        e.quote()
    });

    persist_session(engine, store).await;
    quote
}

/// Applies a single-field edit to a line.
///
/// ## Arguments
/// * `line_id` - The line's opaque id (unknown ids are a logged no-op)
/// * `field` - Which field was edited (`masterCases`, `unitPrice`, ...)
/// * `value` - The raw form-field string; coercion happens in the engine
pub async fn update_line(
    engine: &EngineState,
    store: &StoreState,
    line_id: String,
    field: LineField,
    value: String,
) -> Quote {
    debug!(line_id = %line_id, field = field.as_str(), value = %value, "update_line command");

    let quote = engine.with_engine_mut(|e| e.update_line(&line_id, field, &value));
    persist_session(engine, store).await;
    quote
}

/// Removes a line from the quote.
pub async fn remove_line(engine: &EngineState, store: &StoreState, line_id: String) -> Quote {
    debug!(line_id = %line_id, "remove_line command");

    let quote = engine.with_engine_mut(|e| e.remove_line(&line_id));
    persist_session(engine, store).await;
    quote
}

/// Clears the whole quote (all lines; zone and override stay).
pub async fn clear_quote(engine: &EngineState, store: &StoreState) -> Quote {
    debug!("clear_quote command");

    let quote = engine.with_engine_mut(|e| e.clear_lines());
    persist_session(engine, store).await;
    quote
}

/// Sets or clears the active shipping zone.
pub async fn set_shipping_zone(
    engine: &EngineState,
    store: &StoreState,
    zone_id: Option<String>,
) -> Quote {
    debug!(zone_id = ?zone_id, "set_shipping_zone command");

    let quote = engine.with_engine_mut(|e| e.set_shipping_zone(zone_id.as_deref()));
    persist_session(engine, store).await;
    quote
}

/// Sets or clears the manual shipping override.
///
/// ## Arguments
/// * `raw_amount` - The raw dollar string from the override field, or None
///   to clear. Garbage coerces to $0.00, which the pipeline ignores.
pub async fn set_shipping_override(
    engine: &EngineState,
    store: &StoreState,
    raw_amount: Option<String>,
) -> Quote {
    debug!(raw_amount = ?raw_amount, "set_shipping_override command");

    let amount = raw_amount.as_deref().map(coerce_price);
    let quote = engine.with_engine_mut(|e| e.set_shipping_override(amount));
    persist_session(engine, store).await;
    quote
}

/// Writes the session snapshot after a mutation (write-behind).
///
/// Failure is logged, never propagated: the snapshot is a convenience
/// cache and the mutation itself already happened in memory.
async fn persist_session(engine: &EngineState, store: &StoreState) {
    let snapshot = engine.snapshot();
    if let Err(e) = store.inner().session().save(snapshot).await {
        warn!(error = %e, "failed to persist session snapshot");
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use quotedesk_core::quote::QuoteEngine;
    use quotedesk_core::types::{Product, ReferenceData, ShippingZone, Tier};
    use quotedesk_store::{Store, StoreConfig};
    use std::collections::BTreeMap;

    fn reference() -> ReferenceData {
        let mut products = BTreeMap::new();
        products.insert(
            "choc-bar".to_string(),
            Product {
                key: "choc-bar".to_string(),
                name: "Chocolate Bar 50g".to_string(),
                category: "candy".to_string(),
                price_cents: 1000,
                units_per_case: 144.0,
                display_boxes_per_case: 12.0,
                units_per_display_box: 12.0,
                is_active: true,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
        );
        ReferenceData {
            products,
            tiers: vec![Tier {
                id: "standard".to_string(),
                name: "Standard".to_string(),
                threshold: 0.0,
                discount_bps: 0,
                is_default: true,
            }],
            zones: vec![ShippingZone {
                id: "west".to_string(),
                name: "West Coast".to_string(),
                rate_bps: 100,
                fixed_cost_cents: None,
                states: vec!["CA".to_string()],
            }],
        }
    }

    async fn harness() -> (EngineState, StoreState) {
        let store = Store::open(StoreConfig::temp()).await.unwrap();
        let engine = EngineState::new(QuoteEngine::new(reference()));
        (engine, StoreState::new(store))
    }

    #[tokio::test]
    async fn test_add_line_computes_and_persists() {
        let (engine, store) = harness().await;

        let quote = add_line(&engine, &store, Some("choc-bar".to_string()), Some(2.0)).await;
        assert_eq!(quote.totals.subtotal_cents, 288_000);
        assert_eq!(quote.totals.total_cents, 296_640);

        // Snapshot written after the mutation.
        let snapshot = store.inner().session().load().await.unwrap().unwrap();
        assert_eq!(snapshot.line_items.len(), 1);
    }

    #[tokio::test]
    async fn test_full_edit_round_trip() {
        let (engine, store) = harness().await;

        let quote = add_line(&engine, &store, Some("choc-bar".to_string()), None).await;
        let line_id = quote.lines[0].id.clone();

        let quote = update_line(
            &engine,
            &store,
            line_id.clone(),
            LineField::DisplayBoxes,
            "6".to_string(),
        )
        .await;
        assert_eq!(quote.lines[0].master_cases, 0.5);

        let quote = remove_line(&engine, &store, line_id).await;
        assert_eq!(quote.totals.total_cents, 0);
    }

    #[tokio::test]
    async fn test_shipping_zone_and_override() {
        let (engine, store) = harness().await;
        add_line(&engine, &store, Some("choc-bar".to_string()), Some(2.0)).await;

        let quote = set_shipping_zone(&engine, &store, Some("west".to_string())).await;
        assert_eq!(quote.totals.shipping_cents, 2880);

        let quote = set_shipping_override(&engine, &store, Some("50.00".to_string())).await;
        assert_eq!(quote.totals.shipping_cents, 5000);

        let quote = set_shipping_override(&engine, &store, None).await;
        assert_eq!(quote.totals.shipping_cents, 2880);
    }

    #[tokio::test]
    async fn test_session_continuity_across_restart() {
        let (engine, store) = harness().await;
        add_line(&engine, &store, Some("choc-bar".to_string()), Some(2.0)).await;
        set_shipping_zone(&engine, &store, Some("west".to_string())).await;

        // "Restart": a fresh engine restored from the persisted snapshot.
        let restored = EngineState::new(QuoteEngine::new(reference()));
        let snapshot = store.inner().session().load().await.unwrap().unwrap();
        restored.restore(snapshot);

        let quote = get_quote(&restored);
        assert_eq!(quote.totals.subtotal_cents, 288_000);
        assert_eq!(quote.totals.shipping_cents, 2880);
    }

    #[tokio::test]
    async fn test_clear_quote_keeps_zone() {
        let (engine, store) = harness().await;
        add_line(&engine, &store, Some("choc-bar".to_string()), Some(2.0)).await;
        set_shipping_zone(&engine, &store, Some("west".to_string())).await;

        let quote = clear_quote(&engine, &store).await;
        assert!(quote.lines.is_empty());
        assert_eq!(quote.totals.total_cents, 0);

        // Zone selection survives a quote reset.
        engine.with_engine(|e| assert_eq!(e.shipping_zone(), Some("west")));
    }
}
