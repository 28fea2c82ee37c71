//! # Validation Module
//!
//! Reference-data validation for QuoteDesk.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Admin command layer                                           │
//! │  ├── Field validators (this module)                                     │
//! │  └── Immediate operator feedback                                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Whole-document normalization (this module)                    │
//! │  ├── validate_reference_data() before anything is persisted or          │
//! │  │   handed to the engine                                               │
//! │  └── Guards the invariants the engine RELIES on but never checks:       │
//! │      exactly one default tier, unambiguous state → zone lookup          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: The engine itself                                             │
//! │  └── NO validation. Degraded data that slips through prices at zero     │
//! │      and shows up on the warning channel; the pipeline never raises.    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! One deliberate asymmetry: a zone rate OUTSIDE the shipping clamp window
//! is valid data. The clamp is a calculation-time safety bound with its own
//! warning, not a validation failure - rejecting it here would change
//! behavior for documents the original system accepted.

use crate::error::ValidationError;
use crate::types::{Product, ReferenceData, ShippingZone, Tier};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a product business key.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 50 characters
/// - Only alphanumeric characters, hyphens, underscores
///
/// ## Example
/// ```rust
/// use quotedesk_core::validation::validate_product_key;
///
/// assert!(validate_product_key("choc-bar-50g").is_ok());
/// assert!(validate_product_key("").is_err());
/// ```
pub fn validate_product_key(key: &str) -> ValidationResult<()> {
    let key = key.trim();

    if key.is_empty() {
        return Err(ValidationError::Required {
            field: "key".to_string(),
        });
    }

    if key.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "key".to_string(),
            max: 50,
        });
    }

    if !key
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "key".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a display name (products, tiers, zones).
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 200 characters
pub fn validate_display_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a price in cents.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (placeholder/sample items)
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: "price".to_string(),
        });
    }

    Ok(())
}

/// Validates a packing ratio (units per case, boxes per case, ...).
///
/// ## Rules
/// - Must be finite and non-negative
/// - Zero is allowed: it means "this breakdown doesn't apply" and every
///   quantity derived through it is zero
pub fn validate_packing_ratio(field: &str, ratio: f64) -> ValidationResult<()> {
    if !ratio.is_finite() || ratio < 0.0 {
        return Err(ValidationError::MustBeNonNegative {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a tier threshold (master cases).
pub fn validate_threshold(threshold: f64) -> ValidationResult<()> {
    if !threshold.is_finite() || threshold < 0.0 {
        return Err(ValidationError::MustBeNonNegative {
            field: "threshold".to_string(),
        });
    }

    Ok(())
}

/// Validates a discount/margin in basis points.
///
/// ## Rules
/// - Must be between 0 and 10000 (0% to 100%)
pub fn validate_discount_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10_000 {
        return Err(ValidationError::OutOfRange {
            field: "discount".to_string(),
            min: 0,
            max: 10_000,
        });
    }

    Ok(())
}

/// Validates a zone rate in basis points.
///
/// ## Rules
/// - Must be between 0 and 10000
/// - Values outside the shipping clamp window [50, 250] are LEGAL here;
///   the clamp is applied (and warned about) at calculation time
pub fn validate_zone_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10_000 {
        return Err(ValidationError::OutOfRange {
            field: "rate".to_string(),
            min: 0,
            max: 10_000,
        });
    }

    Ok(())
}

/// Validates a two-letter U.S. state code.
///
/// ## Example
/// ```rust
/// use quotedesk_core::validation::validate_state_code;
///
/// assert!(validate_state_code("CA").is_ok());
/// assert!(validate_state_code("Cal").is_err());
/// assert!(validate_state_code("c1").is_err());
/// ```
pub fn validate_state_code(code: &str) -> ValidationResult<()> {
    let code = code.trim();

    if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ValidationError::InvalidFormat {
            field: "state".to_string(),
            reason: "must be a two-letter state code".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Entity Validators
// =============================================================================

/// Validates one product before it enters the catalog.
pub fn validate_product(product: &Product) -> ValidationResult<()> {
    validate_product_key(&product.key)?;
    validate_display_name(&product.name)?;
    validate_price_cents(product.price_cents)?;
    validate_packing_ratio("units_per_case", product.units_per_case)?;
    validate_packing_ratio("display_boxes_per_case", product.display_boxes_per_case)?;
    validate_packing_ratio("units_per_display_box", product.units_per_display_box)?;
    Ok(())
}

/// Validates one tier before it enters the tier table.
pub fn validate_tier(tier: &Tier) -> ValidationResult<()> {
    if tier.id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }
    validate_display_name(&tier.name)?;
    validate_threshold(tier.threshold)?;
    validate_discount_bps(tier.discount_bps)?;
    Ok(())
}

/// Validates one shipping zone before it enters the shipping table.
pub fn validate_zone(zone: &ShippingZone) -> ValidationResult<()> {
    if zone.id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }
    validate_display_name(&zone.name)?;
    validate_zone_rate_bps(zone.rate_bps)?;
    if let Some(cents) = zone.fixed_cost_cents {
        if cents < 0 {
            return Err(ValidationError::MustBeNonNegative {
                field: "fixed_cost".to_string(),
            });
        }
    }
    for state in &zone.states {
        validate_state_code(state)?;
    }
    Ok(())
}

// =============================================================================
// Whole-Document Normalization
// =============================================================================

/// Validates a complete reference-data set against the invariants the quote
/// engine relies on.
///
/// This is the single normalization point: documents loaded from disk and
/// admin edits both pass through here before the engine sees them. It
/// replaces ad-hoc per-call-site defaulting with one defined set of rules:
///
/// - every entity individually valid (see entity validators),
/// - product keys unique (map-keyed, checked key == entry.key),
/// - tier ids and zone ids unique,
/// - EXACTLY one default tier,
/// - each state code in at most one zone.
pub fn validate_reference_data(data: &ReferenceData) -> ValidationResult<()> {
    for (key, product) in &data.products {
        validate_product(product)?;
        if key != &product.key {
            return Err(ValidationError::InvalidFormat {
                field: "key".to_string(),
                reason: format!("map key '{}' does not match product key '{}'", key, product.key),
            });
        }
    }

    let mut tier_ids = std::collections::HashSet::new();
    for tier in &data.tiers {
        validate_tier(tier)?;
        if !tier_ids.insert(tier.id.as_str()) {
            return Err(ValidationError::Duplicate {
                field: "tier id".to_string(),
                value: tier.id.clone(),
            });
        }
    }

    let default_count = data.tiers.iter().filter(|t| t.is_default).count();
    if !data.tiers.is_empty() && default_count != 1 {
        return Err(ValidationError::DefaultTierCount {
            count: default_count,
        });
    }

    let mut zone_ids = std::collections::HashSet::new();
    let mut state_owner: std::collections::HashMap<String, &str> = std::collections::HashMap::new();
    for zone in &data.zones {
        validate_zone(zone)?;
        if !zone_ids.insert(zone.id.as_str()) {
            return Err(ValidationError::Duplicate {
                field: "zone id".to_string(),
                value: zone.id.clone(),
            });
        }
        for state in &zone.states {
            let normalized = state.trim().to_ascii_uppercase();
            if let Some(first) = state_owner.insert(normalized.clone(), zone.id.as_str()) {
                return Err(ValidationError::StateInMultipleZones {
                    state: normalized,
                    first: first.to_string(),
                    second: zone.id.clone(),
                });
            }
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
