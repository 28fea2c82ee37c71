//! # Pricing Repository
//!
//! Document operations for the tier table (`tiers.json`).
//!
//! ## Declaration Order Matters
//! The document is an ARRAY, not a map: tier threshold ties resolve to the
//! last-declared tier, so the on-disk order is semantically meaningful and
//! must survive round trips. Upserts edit in place; new tiers append.
//!
//! ## The Single-Default Invariant
//! Exactly one tier is the default (the fallback when no threshold
//! qualifies). This repository maintains it on write:
//!
//! - upserting a tier with `is_default = true` clears the flag on every
//!   other tier (admin intent: "make this the default"),
//! - any mutation that would leave the table with zero defaults is
//!   rejected before writing.

use std::path::PathBuf;

use tracing::debug;

use quotedesk_core::types::{ReferenceData, Tier};
use quotedesk_core::validation::{validate_reference_data, validate_tier};

use crate::error::{StoreError, StoreResult};
use crate::store::{read_document, write_document};

/// Repository for pricing-tier operations.
#[derive(Debug, Clone)]
pub struct PricingRepository {
    data_dir: PathBuf,
}

impl PricingRepository {
    /// Creates a new PricingRepository rooted at the data directory.
    pub fn new(data_dir: PathBuf) -> Self {
        PricingRepository { data_dir }
    }

    fn path(&self) -> PathBuf {
        self.data_dir.join("tiers.json")
    }

    /// Loads the tier table in declaration order. Missing document reads
    /// as empty.
    pub async fn load(&self) -> StoreResult<Vec<Tier>> {
        read_document(&self.path()).await
    }

    /// Replaces the whole tier document.
    pub async fn save(&self, tiers: &[Tier]) -> StoreResult<()> {
        write_document(&self.path(), &tiers.to_vec()).await
    }

    /// Gets a tier by id.
    pub async fn get(&self, id: &str) -> StoreResult<Tier> {
        self.load()
            .await?
            .into_iter()
            .find(|t| t.id == id)
            .ok_or_else(|| StoreError::not_found("Tier", id))
    }

    /// Inserts or updates a tier, maintaining the single-default invariant.
    pub async fn upsert(&self, tier: Tier) -> StoreResult<()> {
        validate_tier(&tier)?;

        let mut tiers = self.load().await?;

        if tier.is_default {
            for existing in &mut tiers {
                existing.is_default = false;
            }
        }

        match tiers.iter_mut().find(|t| t.id == tier.id) {
            Some(existing) => *existing = tier.clone(),
            None => tiers.push(tier.clone()),
        }

        Self::check_table(&tiers)?;
        debug!(id = %tier.id, is_default = tier.is_default, "tier upsert");
        self.save(&tiers).await
    }

    /// Removes a tier by id. Errors if absent, and refuses to remove the
    /// default tier while other tiers remain (reassign the default first).
    pub async fn remove(&self, id: &str) -> StoreResult<()> {
        let mut tiers = self.load().await?;
        let before = tiers.len();
        tiers.retain(|t| t.id != id);
        if tiers.len() == before {
            return Err(StoreError::not_found("Tier", id));
        }

        Self::check_table(&tiers)?;
        debug!(id = %id, "tier remove");
        self.save(&tiers).await
    }

    /// Validates the whole table through core normalization (id uniqueness,
    /// default count) without touching the other documents.
    fn check_table(tiers: &[Tier]) -> StoreResult<()> {
        let probe = ReferenceData {
            tiers: tiers.to_vec(),
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

    fn tier(id: &str, threshold: f64, is_default: bool) -> Tier {
        Tier {
            id: id.to_string(),
            name: id.to_string(),
            threshold,
            discount_bps: 500,
            is_default,
        }
    }

    async fn repo() -> PricingRepository {
        Store::open(StoreConfig::temp()).await.unwrap().pricing()
    }

    #[tokio::test]
    async fn test_upsert_preserves_declaration_order() {
        let repo = repo().await;
        repo.upsert(tier("standard", 0.0, true)).await.unwrap();
        repo.upsert(tier("wholesale", 10.0, false)).await.unwrap();
        repo.upsert(tier("distributor", 25.0, false)).await.unwrap();

        // In-place edit must not reorder.
        repo.upsert(tier("wholesale", 12.0, false)).await.unwrap();

        let ids: Vec<String> = repo.load().await.unwrap().into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["standard", "wholesale", "distributor"]);
    }

    #[tokio::test]
    async fn test_new_default_clears_previous() {
        let repo = repo().await;
        repo.upsert(tier("standard", 0.0, true)).await.unwrap();
        repo.upsert(tier("wholesale", 10.0, true)).await.unwrap();

        let tiers = repo.load().await.unwrap();
        let defaults: Vec<&str> = tiers
            .iter()
            .filter(|t| t.is_default)
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(defaults, vec!["wholesale"]);
    }

    #[tokio::test]
    async fn test_demoting_only_default_rejected() {
        let repo = repo().await;
        repo.upsert(tier("standard", 0.0, true)).await.unwrap();
        repo.upsert(tier("wholesale", 10.0, false)).await.unwrap();

        let err = repo.upsert(tier("standard", 0.0, false)).await;
        assert!(matches!(err, Err(StoreError::Validation(_))));

        // Document unchanged on rejection.
        assert!(repo.get("standard").await.unwrap().is_default);
    }

    #[tokio::test]
    async fn test_removing_default_with_others_rejected() {
        let repo = repo().await;
        repo.upsert(tier("standard", 0.0, true)).await.unwrap();
        repo.upsert(tier("wholesale", 10.0, false)).await.unwrap();

        assert!(matches!(
            repo.remove("standard").await,
            Err(StoreError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_removing_last_tier_allowed() {
        let repo = repo().await;
        repo.upsert(tier("standard", 0.0, true)).await.unwrap();
        repo.remove("standard").await.unwrap();

        assert!(repo.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_remove_missing_is_not_found() {
        let repo = repo().await;
        assert!(matches!(
            repo.remove("nope").await,
            Err(StoreError::NotFound { .. })
        ));
    }
}
