//! # Shipping Repository
//!
//! Document operations for shipping zones (`shipping.json`).
//!
//! ## Document Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  shipping.json                                                          │
//! │                                                                         │
//! │  {                                                                      │
//! │    "zones": [                                                           │
//! │      { "id": "west", "name": "West Coast", "rate_bps": 100,             │
//! │        "fixed_cost_cents": null, "states": ["CA", "OR", "WA"] },        │
//! │      ...                                                                │
//! │    ],                                                                   │
//! │    "states": ["AL", "AK", ..., "WY"]                                    │
//! │  }                                                                      │
//! │                                                                         │
//! │  `states` is the flat list the presentation layer offers in its         │
//! │  state picker - including states no zone serves yet.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The state → zone lookup must be unambiguous (a state in at most one
//! zone); mutations run whole-table validation before writing.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;

use quotedesk_core::types::{ReferenceData, ShippingZone};
use quotedesk_core::validation::{validate_reference_data, validate_zone};

use crate::error::{StoreError, StoreResult};
use crate::store::{read_document, write_document};

/// The shipping document: zones plus the flat state list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShippingDocument {
    /// Shipping zones in declaration order.
    pub zones: Vec<ShippingZone>,

    /// All selectable state codes (picker population, superset of the
    /// states any zone serves).
    #[serde(default)]
    pub states: Vec<String>,
}

/// Repository for shipping-zone operations.
#[derive(Debug, Clone)]
pub struct ShippingRepository {
    data_dir: PathBuf,
}

impl ShippingRepository {
    /// Creates a new ShippingRepository rooted at the data directory.
    pub fn new(data_dir: PathBuf) -> Self {
        ShippingRepository { data_dir }
    }

    fn path(&self) -> PathBuf {
        self.data_dir.join("shipping.json")
    }

    /// Loads the shipping document. Missing document reads as empty.
    pub async fn load(&self) -> StoreResult<ShippingDocument> {
        read_document(&self.path()).await
    }

    /// Replaces the whole shipping document.
    pub async fn save(&self, document: &ShippingDocument) -> StoreResult<()> {
        write_document(&self.path(), document).await
    }

    /// Gets a zone by id.
    pub async fn get(&self, id: &str) -> StoreResult<ShippingZone> {
        self.load()
            .await?
            .zones
            .into_iter()
            .find(|z| z.id == id)
            .ok_or_else(|| StoreError::not_found("Shipping zone", id))
    }

    /// Inserts or updates a zone.
    ///
    /// Whole-table validation runs before the write, so a zone claiming a
    /// state another zone already serves is rejected with the document
    /// untouched.
    pub async fn upsert_zone(&self, zone: ShippingZone) -> StoreResult<()> {
        validate_zone(&zone)?;

        let mut document = self.load().await?;
        match document.zones.iter_mut().find(|z| z.id == zone.id) {
            Some(existing) => *existing = zone.clone(),
            None => document.zones.push(zone.clone()),
        }

        Self::check_zones(&document.zones)?;
        debug!(id = %zone.id, states = zone.states.len(), "zone upsert");
        self.save(&document).await
    }

    /// Removes a zone by id. Errors if absent.
    ///
    /// A session whose active zone was removed degrades to free shipping
    /// with an `UnknownShippingZone` warning - removal is never blocked.
    pub async fn remove_zone(&self, id: &str) -> StoreResult<()> {
        let mut document = self.load().await?;
        let before = document.zones.len();
        document.zones.retain(|z| z.id != id);
        if document.zones.len() == before {
            return Err(StoreError::not_found("Shipping zone", id));
        }

        debug!(id = %id, "zone remove");
        self.save(&document).await
    }

    /// Replaces the flat state list.
    pub async fn set_states(&self, states: Vec<String>) -> StoreResult<()> {
        let mut document = self.load().await?;
        document.states = states;
        self.save(&document).await
    }

    /// Validates zone-table invariants (id uniqueness, unambiguous state
    /// ownership) without touching the other documents.
    fn check_zones(zones: &[ShippingZone]) -> StoreResult<()> {
        let probe = ReferenceData {
            zones: zones.to_vec(),
            ..ReferenceData::empty()
        };
        validate_reference_data(&probe)?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Store, StoreConfig};

    fn zone(id: &str, rate_bps: u32, states: &[&str]) -> ShippingZone {
        ShippingZone {
            id: id.to_string(),
            name: id.to_string(),
            rate_bps,
            fixed_cost_cents: None,
            states: states.iter().map(|s| s.to_string()).collect(),
        }
    }

    async fn repo() -> ShippingRepository {
        Store::open(StoreConfig::temp()).await.unwrap().shipping()
    }

    #[tokio::test]
    async fn test_upsert_and_get_round_trip() {
        let repo = repo().await;
        repo.upsert_zone(zone("west", 100, &["CA", "OR"])).await.unwrap();

        let loaded = repo.get("west").await.unwrap();
        assert_eq!(loaded.rate_bps, 100);
        assert_eq!(loaded.states, vec!["CA", "OR"]);
    }

    #[tokio::test]
    async fn test_state_conflict_rejected_without_write() {
        let repo = repo().await;
        repo.upsert_zone(zone("west", 100, &["CA", "OR"])).await.unwrap();

        let err = repo.upsert_zone(zone("pacific", 150, &["CA"])).await;
        assert!(matches!(err, Err(StoreError::Validation(_))));

        // Document unchanged on rejection.
        assert!(repo.get("pacific").await.is_err());
    }

    #[tokio::test]
    async fn test_zone_can_reclaim_its_own_states_on_update() {
        let repo = repo().await;
        repo.upsert_zone(zone("west", 100, &["CA", "OR"])).await.unwrap();
        repo.upsert_zone(zone("west", 120, &["CA", "OR", "WA"]))
            .await
            .unwrap();

        assert_eq!(repo.get("west").await.unwrap().rate_bps, 120);
    }

    #[tokio::test]
    async fn test_remove_zone() {
        let repo = repo().await;
        repo.upsert_zone(zone("west", 100, &["CA"])).await.unwrap();
        repo.remove_zone("west").await.unwrap();

        assert!(repo.get("west").await.is_err());
        assert!(matches!(
            repo.remove_zone("west").await,
            Err(StoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_states_list_survives_zone_edits() {
        let repo = repo().await;
        repo.set_states(vec!["CA".to_string(), "TX".to_string()])
            .await
            .unwrap();
        repo.upsert_zone(zone("west", 100, &["CA"])).await.unwrap();

        let document = repo.load().await.unwrap();
        assert_eq!(document.states, vec!["CA", "TX"]);
    }
}
