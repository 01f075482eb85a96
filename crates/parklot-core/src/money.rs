//! # Money Module
//!
//! Provides the `Money` type for parking fees.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Every tariff value is a whole number of currency units:               │
//! │    CAR  30.00 base, 10.00 per extra hour                               │
//! │    BIKE 20.00 base,  5.00 per extra hour                               │
//! │                                                                         │
//! │  Stored as integer minor units (1 unit = 100) the fee is exact, and    │
//! │  the two-decimal rendering happens only at presentation time.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use parklot_core::money::Money;
//!
//! let base = Money::from_major(30);
//! let extra = Money::from_major(10);
//! let fee = base + extra * 1;
//!
//! assert_eq!(fee.cents(), 4000);
//! assert_eq!(fee.to_string(), "40.00");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit.
///
/// ## Design Decisions
/// - **i64 (signed)**: matches SQLite INTEGER storage
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **No currency**: one lot, one implicit currency
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    ///
    /// ## Example
    /// ```rust
    /// use parklot_core::money::Money;
    ///
    /// let fee = Money::from_cents(2500);
    /// assert_eq!(fee.major(), 25);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from whole currency units.
    #[inline]
    pub const fn from_major(major: i64) -> Self {
        Money(major * 100)
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-unit portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor-unit portion (always 0-99).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
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

    /// Returns the value as a floating point number of major units.
    ///
    /// ## Note
    /// Only for JSON rendering (`"amount": 40.0`). Never compute with it.
    #[inline]
    pub fn to_major_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Renders two decimals without a currency symbol (`40.00`).
///
/// The CLI adds its own `Rs.` prefix.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Multiplication by a number of hours.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, hours: i64) -> Self {
        Money(self.0 * hours)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
