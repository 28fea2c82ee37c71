//! # Input Coercion
//!
//! The wire contract between presentation-layer form fields and the quote
//! engine.
//!
//! ## Coercion Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Form Field → Engine Value                            │
//! │                                                                         │
//! │  Form input (string)        Coercion              Engine value          │
//! │  ───────────────────        ────────              ────────────          │
//! │  "2"                   ──►  float parse      ──►  2.0                   │
//! │  "  0.5 "              ──►  trim + parse     ──►  0.5                   │
//! │  "abc"                 ──►  parse fails      ──►  0.0                   │
//! │  ""                    ──►  parse fails      ──►  0.0                   │
//! │  "NaN" / "inf"         ──►  non-finite       ──►  0.0                   │
//! │  "-3"                  ──►  kept as-is       ──►  -3.0                  │
//! │                                                                         │
//! │  Coercion NEVER fails. A quote is always a number, even one computed    │
//! │  from degraded inputs. Hosts wanting stricter behavior read the         │
//! │  quote's warning channel; the numbers do not change.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Line Field
// =============================================================================

/// The editable fields of a quote line.
///
/// Serialized names are the literal field names the presentation layer sends
/// (`masterCases`, not `master_cases`) - this enum IS the wire contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LineField {
    /// Link the line to a (different) catalog product.
    ProductKey,
    /// Quantity in master cases - the other two quantities are derived.
    MasterCases,
    /// Quantity in display boxes - the other two quantities are derived.
    DisplayBoxes,
    /// Quantity in individual units - the other two quantities are derived.
    Units,
    /// Manual unit-price override (dollars).
    UnitPrice,
}

impl LineField {
    /// Parses a wire field name. Returns None for unknown names so callers
    /// can log-and-ignore rather than fail.
    pub fn parse(name: &str) -> Option<LineField> {
        match name {
            "productKey" => Some(LineField::ProductKey),
            "masterCases" => Some(LineField::MasterCases),
            "displayBoxes" => Some(LineField::DisplayBoxes),
            "units" => Some(LineField::Units),
            "unitPrice" => Some(LineField::UnitPrice),
            _ => None,
        }
    }

    /// Returns the wire name of the field.
    pub fn as_str(&self) -> &'static str {
        match self {
            LineField::ProductKey => "productKey",
            LineField::MasterCases => "masterCases",
            LineField::DisplayBoxes => "displayBoxes",
            LineField::Units => "units",
            LineField::UnitPrice => "unitPrice",
        }
    }
}

// =============================================================================
// Coercion Functions
// =============================================================================

/// Coerces a raw quantity string to f64.
///
/// Parse failures, NaN, and infinities all collapse to 0.0. Negative values
/// pass through unchanged - the pipeline does not reject them, and a
/// negative quantity simply produces a negative line total.
pub fn coerce_quantity(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// Coerces a raw dollar-amount string to Money (cents, rounded half up).
///
/// Shares the failure behavior of [`coerce_quantity`]: anything that does
/// not parse to a finite float is zero dollars.
pub fn coerce_price(raw: &str) -> Money {
    Money::from_dollars(coerce_quantity(raw))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_quantity_valid() {
        assert_eq!(coerce_quantity("2"), 2.0);
        assert_eq!(coerce_quantity("0.5"), 0.5);
        assert_eq!(coerce_quantity("  6 "), 6.0);
        assert_eq!(coerce_quantity("-3"), -3.0);
    }

    #[test]
    fn test_coerce_quantity_garbage() {
        assert_eq!(coerce_quantity(""), 0.0);
        assert_eq!(coerce_quantity("abc"), 0.0);
        assert_eq!(coerce_quantity("12abc"), 0.0);
        assert_eq!(coerce_quantity("NaN"), 0.0);
        assert_eq!(coerce_quantity("inf"), 0.0);
        assert_eq!(coerce_quantity("-inf"), 0.0);
    }

    #[test]
    fn test_coerce_price() {
        assert_eq!(coerce_price("10.00").cents(), 1000);
        assert_eq!(coerce_price("10.995").cents(), 1100);
        assert_eq!(coerce_price("garbage").cents(), 0);
        assert_eq!(coerce_price("").cents(), 0);
    }

    #[test]
    fn test_line_field_parse_round_trip() {
        for field in [
            LineField::ProductKey,
            LineField::MasterCases,
            LineField::DisplayBoxes,
            LineField::Units,
            LineField::UnitPrice,
        ] {
            assert_eq!(LineField::parse(field.as_str()), Some(field));
        }
        assert_eq!(LineField::parse("master_cases"), None);
        assert_eq!(LineField::parse(""), None);
    }

    #[test]
    fn test_line_field_serde_names() {
        let json = serde_json::to_string(&LineField::MasterCases).unwrap();
        assert_eq!(json, "\"masterCases\"");

        let parsed: LineField = serde_json::from_str("\"unitPrice\"").unwrap();
        assert_eq!(parsed, LineField::UnitPrice);
    }
}
