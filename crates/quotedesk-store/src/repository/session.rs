//! # Session Repository
//!
//! The session snapshot cache (`session.json`).
//!
//! ## Convenience Cache, Not Source of Truth
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Session Snapshot Lifecycle                          │
//! │                                                                         │
//! │  every mutating command ──► save(snapshot)    (write-behind)            │
//! │                                                                         │
//! │  host startup ──► load() ──► Some(snapshot) ──► engine.restore(...)     │
//! │                        │                                                │
//! │                        └──► None (missing OR corrupt) ──► fresh quote   │
//! │                                                                         │
//! │  A corrupt snapshot is DISCARDED with a warning, never an error:        │
//! │  losing an in-progress quote beats refusing to start. The schema is     │
//! │  unstable by design - no migration logic, no versioning.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use quotedesk_core::quote::LineItem;

use crate::error::{StoreError, StoreResult};
use crate::store::write_document;

/// A persisted snapshot of the in-progress quote session.
///
/// Field names are camelCase on disk - this mirrors what the presentation
/// layer round-trips, and the schema is unstable: readers must tolerate
/// missing fields (serde defaults) and writers may add fields freely.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionSnapshot {
    /// The quote's line items, in insertion order.
    pub line_items: Vec<LineItem>,

    /// The active shipping zone id, if one was selected.
    pub current_shipping_zone: Option<String>,

    /// Manual shipping override in cents, if one was entered.
    pub shipping_override_cents: Option<i64>,

    /// Whether the session had unlocked the admin screens. Inert data to
    /// the engine; carried for the presentation layer only.
    pub is_admin: bool,

    /// When this snapshot was written.
    pub saved_at: DateTime<Utc>,
}

/// Repository for the session snapshot.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    data_dir: PathBuf,
}

impl SessionRepository {
    /// Creates a new SessionRepository rooted at the data directory.
    pub fn new(data_dir: PathBuf) -> Self {
        SessionRepository { data_dir }
    }

    fn path(&self) -> PathBuf {
        self.data_dir.join("session.json")
    }

    /// Loads the snapshot. Missing file → None. Corrupt file → WARN + None
    /// (the cache is expendable; startup must not fail over it).
    pub async fn load(&self) -> StoreResult<Option<SessionSnapshot>> {
        let path = self.path();
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("no session snapshot, starting fresh");
                return Ok(None);
            }
            Err(e) => return Err(StoreError::Io(e)),
        };

        match serde_json::from_slice(&bytes) {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "discarding corrupt session snapshot");
                Ok(None)
            }
        }
    }

    /// Writes the snapshot, stamping `saved_at`.
    pub async fn save(&self, mut snapshot: SessionSnapshot) -> StoreResult<()> {
        snapshot.saved_at = Utc::now();
        write_document(&self.path(), &snapshot).await
    }

    /// Deletes the snapshot (quote cleared / session reset). Missing file
    /// is fine.
    pub async fn clear(&self) -> StoreResult<()> {
        match tokio::fs::remove_file(self.path()).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Io(e)),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Store, StoreConfig};
    use quotedesk_core::quote::QuoteEngine;
    use quotedesk_core::types::ReferenceData;

    async fn repo() -> SessionRepository {
        Store::open(StoreConfig::temp()).await.unwrap().session()
    }

    #[tokio::test]
    async fn test_missing_snapshot_is_none() {
        let repo = repo().await;
        assert!(repo.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_snapshot_round_trip() {
        let repo = repo().await;

        let mut engine = QuoteEngine::new(ReferenceData::empty());
        engine.add_line(None, Some(2.0));

        repo.save(SessionSnapshot {
            line_items: engine.lines().to_vec(),
            current_shipping_zone: Some("west".to_string()),
            shipping_override_cents: None,
            is_admin: true,
            saved_at: Utc::now(),
        })
        .await
        .unwrap();

        let loaded = repo.load().await.unwrap().unwrap();
        assert_eq!(loaded.line_items.len(), 1);
        assert_eq!(loaded.line_items[0].master_cases, 2.0);
        assert_eq!(loaded.current_shipping_zone.as_deref(), Some("west"));
        assert!(loaded.is_admin);
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_discarded() {
        let repo = repo().await;
        tokio::fs::write(repo.path(), b"{\"lineItems\": 42}")
            .await
            .unwrap();

        assert!(repo.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_clear_is_idempotent() {
        let repo = repo().await;
        repo.save(SessionSnapshot::default()).await.unwrap();

        repo.clear().await.unwrap();
        repo.clear().await.unwrap();
        assert!(repo.load().await.unwrap().is_none());
    }
}
