//! # Money Module
//!
//! Provides the `Money` type for handling prices and discount amounts.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Stacking 10% + 20% on 19.99 in floats drifts by fractions of a cent,  │
//! │  and the drift differs depending on summation order.                   │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    Each discount amount is rounded to the cent once, then summed.      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use kardex_core::money::Money;
//!
//! let price = Money::from_cents(1999); // 19.99
//! let ten_percent = price.percentage(1000); // 1000 bps = 10%
//! assert_eq!(ten_percent.cents(), 200);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use ts_rs::TS;

/// Basis points in 100%.
pub const BPS_PER_UNIT: i64 = 10_000;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents).
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  base price ──► resolve_discount ──┬──► discount_applied                │
/// │                                    └──► final_price                     │
/// │                                                                         │
/// │  FixedAmount discount value ──► Money::from_cents                       │
/// │  Percentage discount value  ──► base.percentage(bps)                    │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use kardex_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
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

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Computes `bps / 10000` of this amount, rounded half-up to the cent.
    ///
    /// ## Implementation
    /// Integer math: `(amount * bps + 5000) / 10000`, widened to i128 so
    /// large amounts cannot overflow.
    ///
    /// ## Example
    /// ```rust
    /// use kardex_core::money::Money;
    ///
    /// let base = Money::from_cents(10000); // 100.00
    /// assert_eq!(base.percentage(1000).cents(), 1000);   // 10%
    /// assert_eq!(base.percentage(10000).cents(), 10000); // 100%
    ///
    /// // 12.5% of 0.99 = 0.12375 → 0.12
    /// assert_eq!(Money::from_cents(99).percentage(1250).cents(), 12);
    /// ```
    pub fn percentage(&self, bps: i64) -> Money {
        let half = (BPS_PER_UNIT / 2) as i128;
        let amount = (self.0 as i128 * bps as i128 + half) / BPS_PER_UNIT as i128;
        Money(amount as i64)
    }

    /// Subtraction that never goes below zero.
    ///
    /// ## Example
    /// ```rust
    /// use kardex_core::money::Money;
    ///
    /// let price = Money::from_cents(500);
    /// assert_eq!(price.saturating_sub(Money::from_cents(800)), Money::zero());
    /// ```
    #[inline]
    pub fn saturating_sub(self, other: Money) -> Money {
        Money(self.0.saturating_sub(other.0).max(0))
    }

    /// Addition that stops at `i64::MAX` cents instead of wrapping.
    #[inline]
    pub fn saturating_add(self, other: Money) -> Money {
        Money(self.0.saturating_add(other.0))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug-oriented display. The admin UI formats amounts itself.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}${}.{:02}", sign, self.major().abs(), self.minor())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Saturating, like [`Money::saturating_add`].
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Money::saturating_add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.minor(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "$10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "$5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
        assert_eq!(format!("{}", Money::zero()), "$0.00");
    }

    #[test]
    fn test_sum() {
        let total: Money = [100, 250, 650]
            .into_iter()
            .map(Money::from_cents)
            .sum();
        assert_eq!(total.cents(), 1000);
    }

    #[test]
    fn test_sum_saturates() {
        let total: Money = [i64::MAX, i64::MAX, 1]
            .into_iter()
            .map(Money::from_cents)
            .sum();
        assert_eq!(total.cents(), i64::MAX);
        assert_eq!(
            Money::from_cents(i64::MAX).saturating_add(Money::from_cents(1)).cents(),
            i64::MAX
        );
    }

    #[test]
    fn test_percentage_rounding() {
        // 8.25% of 10.00 = 0.825 → 0.83 (half-up)
        assert_eq!(Money::from_cents(1000).percentage(825).cents(), 83);
        // 33.33% of 1.00 = 0.3333 → 0.33
        assert_eq!(Money::from_cents(100).percentage(3333).cents(), 33);
        assert_eq!(Money::from_cents(0).percentage(5000).cents(), 0);
    }

    #[test]
    fn test_percentage_large_amount_does_not_overflow() {
        let big = Money::from_cents(i64::MAX / 2);
        let all = big.percentage(BPS_PER_UNIT);
        assert_eq!(all, big);
    }

    #[test]
    fn test_saturating_sub() {
        let a = Money::from_cents(700);
        assert_eq!(a.saturating_sub(Money::from_cents(300)).cents(), 400);
        assert_eq!(a.saturating_sub(Money::from_cents(700)).cents(), 0);
        assert_eq!(a.saturating_sub(Money::from_cents(900)).cents(), 0);
        assert_eq!(Money::from_cents(-5).saturating_sub(Money::from_cents(i64::MAX)).cents(), 0);
    }

    #[test]
    fn test_zero_and_checks() {
        assert!(Money::zero().is_zero());
        assert!(Money::from_cents(1).is_positive());
        assert!(Money::from_cents(-1).is_negative());
    }
}
