//! # Admin Commands
//!
//! Reference-data administration: the CRUD surface behind the admin screens.
//!
//! ## Mutation Protocol
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  Reference-Data Mutation Flow                           │
//! │                                                                         │
//! │  upsert_product(product)                                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  1. Validate (core validators - reject before anything is written)      │
//! │  2. Persist (store repository, atomic document replace)                 │
//! │  3. Reload reference data into the engine                               │
//! │  4. Return the recomputed quote (totals/warnings may have changed)      │
//! │                                                                         │
//! │  Open quotes keep their frozen price snapshots (step 3 does not         │
//! │  reprice existing lines) - but a dangling-product warning appears or    │
//! │  clears immediately, and zone/tier changes take effect on the spot.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::debug;

use quotedesk_core::quote::Quote;
use quotedesk_core::types::{Product, ShippingZone, Tier};
use quotedesk_store::ShippingDocument;

use crate::error::ApiError;
use crate::state::{EngineState, StoreState};

// =============================================================================
// Products
// =============================================================================

/// Lists the whole catalog, including soft-deleted products (the admin
/// screen shows them; the product picker uses `list_active`).
pub async fn list_products(store: &StoreState) -> Result<Vec<Product>, ApiError> {
    debug!("list_products command");
    let products = store.inner().catalog().load().await?;
    Ok(products.into_values().collect())
}

/// Lists active products only (what the quote screen's picker offers).
pub async fn list_active_products(store: &StoreState) -> Result<Vec<Product>, ApiError> {
    debug!("list_active_products command");
    Ok(store.inner().catalog().list_active().await?)
}

/// Inserts or updates a catalog product.
pub async fn upsert_product(
    engine: &EngineState,
    store: &StoreState,
    product: Product,
) -> Result<Quote, ApiError> {
    debug!(key = %product.key, "upsert_product command");
    store.inner().catalog().upsert(product).await?;
    reload_reference(engine, store).await
}

/// Removes a catalog product. Lines holding the key keep their frozen
/// snapshots and gain a dangling-product warning.
pub async fn remove_product(
    engine: &EngineState,
    store: &StoreState,
    key: String,
) -> Result<Quote, ApiError> {
    debug!(key = %key, "remove_product command");
    store.inner().catalog().remove(&key).await?;
    reload_reference(engine, store).await
}

// =============================================================================
// Tiers
// =============================================================================

/// Lists the tier table in declaration order.
pub async fn list_tiers(store: &StoreState) -> Result<Vec<Tier>, ApiError> {
    debug!("list_tiers command");
    Ok(store.inner().pricing().load().await?)
}

/// Inserts or updates a pricing tier (single-default invariant maintained
/// by the repository).
pub async fn upsert_tier(
    engine: &EngineState,
    store: &StoreState,
    tier: Tier,
) -> Result<Quote, ApiError> {
    debug!(id = %tier.id, "upsert_tier command");
    store.inner().pricing().upsert(tier).await?;
    reload_reference(engine, store).await
}

/// Removes a pricing tier.
pub async fn remove_tier(
    engine: &EngineState,
    store: &StoreState,
    id: String,
) -> Result<Quote, ApiError> {
    debug!(id = %id, "remove_tier command");
    store.inner().pricing().remove(&id).await?;
    reload_reference(engine, store).await
}

// =============================================================================
// Shipping Zones
// =============================================================================

/// Lists the shipping document (zones plus the flat state list).
pub async fn list_zones(store: &StoreState) -> Result<ShippingDocument, ApiError> {
    debug!("list_zones command");
    Ok(store.inner().shipping().load().await?)
}

/// Inserts or updates a shipping zone (unambiguous state ownership
/// enforced by the repository).
pub async fn upsert_zone(
    engine: &EngineState,
    store: &StoreState,
    zone: ShippingZone,
) -> Result<Quote, ApiError> {
    debug!(id = %zone.id, "upsert_zone command");
    store.inner().shipping().upsert_zone(zone).await?;
    reload_reference(engine, store).await
}

/// Removes a shipping zone. A session pointing at it degrades to free
/// shipping with an `UnknownShippingZone` warning.
pub async fn remove_zone(
    engine: &EngineState,
    store: &StoreState,
    id: String,
) -> Result<Quote, ApiError> {
    debug!(id = %id, "remove_zone command");
    store.inner().shipping().remove_zone(&id).await?;
    reload_reference(engine, store).await
}

// =============================================================================
// Shared
// =============================================================================

/// Reloads validated reference data into the engine and returns the
/// recomputed quote.
async fn reload_reference(engine: &EngineState, store: &StoreState) -> Result<Quote, ApiError> {
    let reference = store.inner().load_reference_data().await?;
    Ok(engine.with_engine_mut(|e| {
        e.set_reference_data(reference);
        e.quote()
    }))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::quote::{add_line, update_line};
    use crate::error::ErrorCode;
    use chrono::Utc;
    use quotedesk_core::input::LineField;
    use quotedesk_core::quote::{QuoteEngine, QuoteWarning};
    use quotedesk_core::types::ReferenceData;
    use quotedesk_store::{Store, StoreConfig};

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

    fn tier(id: &str, threshold: f64, is_default: bool) -> Tier {
        Tier {
            id: id.to_string(),
            name: id.to_string(),
            threshold,
            discount_bps: 0,
            is_default,
        }
    }

    async fn harness() -> (EngineState, StoreState) {
        let store = Store::open(StoreConfig::temp()).await.unwrap();
        let engine = EngineState::new(QuoteEngine::new(ReferenceData::empty()));
        (engine, StoreState::new(store))
    }

    #[tokio::test]
    async fn test_upserted_product_usable_in_quote() {
        let (engine, store) = harness().await;
        upsert_product(&engine, &store, product("choc-bar", 1000))
            .await
            .unwrap();

        let quote = add_line(&engine, &store, Some("choc-bar".to_string()), Some(2.0)).await;
        assert_eq!(quote.totals.subtotal_cents, 288_000);
        assert!(quote.warnings.is_empty());
    }

    #[tokio::test]
    async fn test_remove_product_leaves_dangling_warning() {
        let (engine, store) = harness().await;
        upsert_product(&engine, &store, product("choc-bar", 1000))
            .await
            .unwrap();
        add_line(&engine, &store, Some("choc-bar".to_string()), Some(2.0)).await;

        let quote = remove_product(&engine, &store, "choc-bar".to_string())
            .await
            .unwrap();

        // Frozen snapshot still prices the line; the link is flagged.
        assert_eq!(quote.totals.subtotal_cents, 288_000);
        assert!(quote
            .warnings
            .iter()
            .any(|w| matches!(w, QuoteWarning::MissingProduct { .. })));
    }

    #[tokio::test]
    async fn test_catalog_edit_applies_on_relink_only() {
        let (engine, store) = harness().await;
        upsert_product(&engine, &store, product("choc-bar", 1000))
            .await
            .unwrap();
        let quote = add_line(&engine, &store, Some("choc-bar".to_string()), Some(1.0)).await;
        let line_id = quote.lines[0].id.clone();

        let quote = upsert_product(&engine, &store, product("choc-bar", 1200))
            .await
            .unwrap();
        assert_eq!(quote.lines[0].unit_price_cents, 1000); // frozen

        let quote = update_line(
            &engine,
            &store,
            line_id,
            LineField::ProductKey,
            "choc-bar".to_string(),
        )
        .await;
        assert_eq!(quote.lines[0].unit_price_cents, 1200); // re-snapshotted
    }

    #[tokio::test]
    async fn test_tier_upsert_takes_effect_immediately() {
        let (engine, store) = harness().await;
        upsert_product(&engine, &store, product("choc-bar", 1000))
            .await
            .unwrap();
        upsert_tier(&engine, &store, tier("standard", 0.0, true))
            .await
            .unwrap();
        add_line(&engine, &store, Some("choc-bar".to_string()), Some(12.0)).await;

        let quote = upsert_tier(&engine, &store, tier("wholesale", 10.0, false))
            .await
            .unwrap();
        assert_eq!(quote.tier.unwrap().id, "wholesale");
    }

    #[tokio::test]
    async fn test_invalid_product_maps_to_validation_error() {
        let (engine, store) = harness().await;
        let mut bad = product("choc-bar", 1000);
        bad.price_cents = -1;

        let err = upsert_product(&engine, &store, bad).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_remove_missing_zone_maps_to_not_found() {
        let (engine, store) = harness().await;
        let err = remove_zone(&engine, &store, "atlantis".to_string())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_zone_removal_degrades_session_to_free_shipping() {
        let (engine, store) = harness().await;
        upsert_product(&engine, &store, product("choc-bar", 1000))
            .await
            .unwrap();
        upsert_zone(
            &engine,
            &store,
            ShippingZone {
                id: "west".to_string(),
                name: "West Coast".to_string(),
                rate_bps: 100,
                fixed_cost_cents: None,
                states: vec!["CA".to_string()],
            },
        )
        .await
        .unwrap();

        add_line(&engine, &store, Some("choc-bar".to_string()), Some(2.0)).await;
        crate::commands::quote::set_shipping_zone(&engine, &store, Some("west".to_string())).await;

        let quote = remove_zone(&engine, &store, "west".to_string()).await.unwrap();
        assert_eq!(quote.totals.shipping_cents, 0);
        assert!(quote
            .warnings
            .iter()
            .any(|w| matches!(w, QuoteWarning::UnknownShippingZone { .. })));
    }
}
