//! # Store Error Types
//!
//! Error types for document persistence.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  I/O error (std::io::Error) / parse error (serde_json::Error)          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← Adds context and categorization            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (in console host) ← Serialized for the presentation layer    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use quotedesk_core::ValidationError;
use thiserror::Error;

/// Document persistence errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Entity not found in its document.
    ///
    /// ## When This Occurs
    /// - Admin edits a product/tier/zone that was removed meanwhile
    /// - A stale id arrives from the presentation layer
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Underlying file I/O failed (permissions, disk full, missing dir).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A document exists but does not parse as its expected shape.
    ///
    /// ## When This Occurs
    /// - Hand-edited JSON with a typo
    /// - A partially-written file from a crash predating atomic replace
    #[error("Corrupt document {path}: {reason}")]
    Corrupt { path: String, reason: String },

    /// Admin-edited data violates a reference-data invariant
    /// (two default tiers, a state in two zones, ...).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl StoreError {
    /// Creates a NotFound error for a given entity type and id.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Creates a Corrupt error for a document path.
    pub fn corrupt(path: impl Into<String>, reason: impl Into<String>) -> Self {
        StoreError::Corrupt {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = StoreError::not_found("Product", "choc-bar");
        assert_eq!(err.to_string(), "Product not found: choc-bar");

        let err = StoreError::corrupt("tiers.json", "expected array");
        assert_eq!(err.to_string(), "Corrupt document tiers.json: expected array");
    }

    #[test]
    fn test_validation_converts() {
        let verr = ValidationError::DefaultTierCount { count: 2 };
        let err: StoreError = verr.into();
        assert!(matches!(err, StoreError::Validation(_)));
    }
}
