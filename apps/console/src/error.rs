//! # API Error Type
//!
//! Unified error type for the command layer.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in QuoteDesk                              │
//! │                                                                         │
//! │  Presentation Layer            Rust Backend                             │
//! │  ──────────────────            ────────────                             │
//! │                                                                         │
//! │  upsert_product({...})                                                  │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │  Store Error? ──── StoreError::NotFound ──────────┐             │  │
//! │  │         │                                         ▼             │  │
//! │  │  Validation? ───── CoreError::Validation ───── ApiError ───────►│  │
//! │  │         │                                                        │  │
//! │  │  Success ───────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  Quote COMMANDS never error: the calculation pipeline always            │
//! │  produces a number. ApiError exists for the admin boundary, where       │
//! │  bad reference data must be rejected before it is persisted.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;

use quotedesk_core::CoreError;
use quotedesk_store::StoreError;

/// API error returned from admin commands.
///
/// ## Serialization
/// This is what the presentation layer receives when a command fails:
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Product not found: choc-bar-50g"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Document read/write failed
    StoreError,

    /// Internal error
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts store errors to API errors.
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            StoreError::Validation(e) => ApiError::validation(e.to_string()),
            StoreError::Corrupt { path, reason } => {
                tracing::error!(path = %path, reason = %reason, "corrupt document");
                ApiError::new(ErrorCode::StoreError, format!("Corrupt document: {}", path))
            }
            StoreError::Io(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Store I/O failed: {}", e);
                ApiError::new(ErrorCode::StoreError, "Store operation failed")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(key) => ApiError::not_found("Product", &key),
            CoreError::TierNotFound(id) => ApiError::not_found("Tier", &id),
            CoreError::ZoneNotFound(id) => ApiError::not_found("Shipping zone", &id),
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}
