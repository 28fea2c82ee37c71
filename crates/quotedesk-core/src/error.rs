//! # Error Types
//!
//! Domain-specific error types for quotedesk-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  quotedesk-core errors (this file)                                      │
//! │  ├── CoreError        - General domain errors                           │
//! │  └── ValidationError  - Reference-data / input validation failures      │
//! │                                                                         │
//! │  quotedesk-store errors (separate crate)                                │
//! │  └── StoreError       - Document read/write failures                    │
//! │                                                                         │
//! │  Console host errors (in app)                                           │
//! │  └── ApiError         - What the presentation layer sees (serialized)   │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → StoreError → ApiError → Frontend   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Where Errors Do NOT Flow
//! The calculation pipeline itself ([`crate::quote`]) never returns these.
//! Degraded input (a dangling product key, a garbage quantity string) is
//! coerced to zero and surfaced through the quote's warning channel; a quote
//! is always a number. Errors exist for the ADMIN boundary: reference-data
//! edits are validated before they are persisted.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations at the administration
/// boundary. They should be caught and translated to user-facing messages.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product cannot be found in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Tier cannot be found in the tier table.
    #[error("Tier not found: {0}")]
    TierNotFound(String),

    /// Shipping zone cannot be found.
    #[error("Shipping zone not found: {0}")]
    ZoneNotFound(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Reference-data and input validation errors.
///
/// These errors occur when admin-edited data doesn't meet the invariants the
/// quote engine relies on. Used for early validation before persistence.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be zero or positive.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// Invalid format (e.g., malformed state code).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., duplicate product key).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },

    /// The tier table must mark exactly one tier as default.
    #[error("Tier table must have exactly one default tier, found {count}")]
    DefaultTierCount { count: usize },

    /// A state code is claimed by more than one shipping zone.
    #[error("State {state} belongs to zones '{first}' and '{second}'")]
    StateInMultipleZones {
        state: String,
        first: String,
        second: String,
    },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::ProductNotFound("choc-bar-12".to_string());
        assert_eq!(err.to_string(), "Product not found: choc-bar-12");

        let err = ValidationError::StateInMultipleZones {
            state: "CA".to_string(),
            first: "west".to_string(),
            second: "pacific".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "State CA belongs to zones 'west' and 'pacific'"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "key".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
