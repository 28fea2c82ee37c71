//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  In a quote with a dozen line items, a shipping percentage, and a       │
//! │  card fee percentage, those errors stack up and the grand total on      │
//! │  the PDF no longer matches the sum of its parts.                        │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    Quantities stay fractional (0.5 master cases is real), but every     │
//! │    monetary value is rounded to whole cents at a DEFINED point, with    │
//! │    a DEFINED rule: round half up on the cents digit.                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use quotedesk_core::money::Money;
//!
//! // Create from cents (preferred)
//! let price = Money::from_cents(1099); // $10.99
//!
//! // Arithmetic operations
//! let total = price + Money::from_cents(500); // $15.99
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};

use crate::types::Rate;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents for USD).
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values (a negative quantity produces a
///   negative line total; the pipeline never rejects degraded input)
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
///
/// ## Where Money Flows
/// ```text
/// Product.price_cents ──► LineItem.unit_price_cents ──► LineItem.total_cents
///                                                              │
///     Quote.subtotal ◄── Σ line totals ◄──────────────────────┘
///          │
///          ├──► shipping (zone rate × subtotal, clamped)
///          ├──► credit-card fee (3% of subtotal + shipping)
///          └──► grand total
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use quotedesk_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units (dollars and cents).
    ///
    /// ## Note
    /// For negative amounts, only the major unit should be negative.
    /// `from_major_minor(-5, 50)` = -$5.50, not -$4.50
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Converts a dollar amount to Money, rounding half up to whole cents.
    ///
    /// This is the ONLY float-to-Money conversion in the crate. It exists
    /// because operator-facing inputs (price overrides, shipping overrides)
    /// arrive as dollar strings and are coerced through f64.
    ///
    /// Non-finite input maps to zero, matching the coercion rules in
    /// [`crate::input`].
    pub fn from_dollars(dollars: f64) -> Self {
        if !dollars.is_finite() {
            return Money::zero();
        }
        Money((dollars * 100.0).round() as i64)
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Applies a percentage rate, rounding half up on the cents digit.
    ///
    /// ## Rounding Rule
    /// ```text
    /// ┌─────────────────────────────────────────────────────────────────────┐
    /// │  ROUND HALF UP (on the cents digit)                                 │
    /// │                                                                     │
    /// │  $2908.80 × 3% = $87.264  → $87.26                                  │
    /// │  $10.00   × 8.255% = $0.8255 → $0.83                                │
    /// │                                                                     │
    /// │  Shipping and the credit-card fee share this exact rule, so the     │
    /// │  quote a customer sees is reproducible to the cent.                 │
    /// └─────────────────────────────────────────────────────────────────────┘
    /// ```
    ///
    /// ## Implementation
    /// Integer math in i128: `(cents × bps + 5000) / 10000`
    /// The +5000 provides the half-up rounding (5000/10000 = 0.5).
    ///
    /// ## Example
    /// ```rust
    /// use quotedesk_core::money::Money;
    /// use quotedesk_core::types::Rate;
    ///
    /// let base = Money::from_cents(290_880); // $2908.80
    /// let fee = base.apply_rate(Rate::from_bps(300)); // 3%
    /// assert_eq!(fee.cents(), 8726); // $87.26
    /// ```
    pub fn apply_rate(&self, rate: Rate) -> Money {
        // i128 prevents overflow on large amounts
        let cents = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_cents(cents as i64)
    }

    /// Computes a line total from a unit price and a possibly-fractional
    /// unit count, rounding half up to whole cents.
    ///
    /// Quantities are fractional by design: 6 display boxes of a 12-per-case
    /// product is 0.5 master cases, and a unit count derived from that stays
    /// fractional all the way through the pipeline.
    ///
    /// ## Example
    /// ```rust
    /// use quotedesk_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(1000); // $10.00
    /// let total = Money::from_unit_quantity(unit_price, 288.0);
    /// assert_eq!(total.cents(), 288_000); // $2880.00
    /// ```
    pub fn from_unit_quantity(unit_price: Money, units: f64) -> Money {
        if !units.is_finite() {
            return Money::zero();
        }
        Money((unit_price.0 as f64 * units).round() as i64)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for logs and debugging. Host-side display goes through
/// the host's currency formatting so symbols/decimals stay configurable.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Addition of two Money values.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

/// Addition assignment (+=).
impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Subtraction of two Money values.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Summation over an iterator of Money (subtotal = line totals summed).
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
