//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │    89000 × 0.95 in f64 = 84549.99999999999  ❌ WRONG!                  │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units + basis points                      │
//! │    89000 × 9500 / 10000 = 84550 exactly                                │
//! │    Remainders are rounded once, by an explicit policy                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rounding Policy
//! Discount-adjusted amounts use **round half to even** (bankers' rounding)
//! on the exact rational result. The currency's minor unit is whatever the
//! deployment counts in: cents for USD, whole taka for the demo dataset.
//!
//! ## Usage
//! ```rust
//! use branchboard_core::money::Money;
//!
//! let price = Money::from_minor(1099);
//! let line = price.checked_multiply_quantity(3).unwrap();
//! assert_eq!(line.minor(), 3297);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};
use ts_rs::TS;

use crate::types::DiscountRate;
use crate::MAX_DISCOUNT_BPS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit.
///
/// Signed so that differences (e.g. amount mismatches) stay representable;
/// stored amounts are validated non-negative before they enter the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    #[inline]
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.0
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

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Multiplies money by a quantity, returning `None` on overflow.
    ///
    /// ## Example
    /// ```rust
    /// use branchboard_core::money::Money;
    ///
    /// let unit_price = Money::from_minor(120_000);
    /// assert_eq!(unit_price.checked_multiply_quantity(2), Some(Money::from_minor(240_000)));
    /// assert_eq!(Money::from_minor(i64::MAX).checked_multiply_quantity(2), None);
    /// ```
    #[inline]
    pub fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        self.0.checked_mul(qty).map(Money)
    }

    /// Checked addition, returning `None` on overflow.
    #[inline]
    pub fn checked_add(&self, other: Money) -> Option<Self> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Applies a percentage discount and returns what remains to be paid.
    ///
    /// ## Formula
    /// `amount × (10000 − bps) / 10000`, rounded half to even.
    ///
    /// ## Example
    /// ```rust
    /// use branchboard_core::money::Money;
    /// use branchboard_core::types::DiscountRate;
    ///
    /// let total = Money::from_minor(89_000);
    /// let discounted = total.apply_discount(DiscountRate::from_percent(5));
    /// assert_eq!(discounted.minor(), 84_550);
    /// ```
    ///
    /// ## Rounding
    /// ```text
    /// 25 at 10% off = 22.5  → 22   (half goes to even)
    /// 35 at 10% off = 31.5  → 32   (half goes to even)
    /// 17 at  5% off = 16.15 → 16   (below half, down)
    /// ```
    pub fn apply_discount(&self, rate: DiscountRate) -> Money {
        // bps is clamped so that a corrupt rate never yields a negative payable
        let keep_bps = (MAX_DISCOUNT_BPS - rate.bps().min(MAX_DISCOUNT_BPS)) as i128;
        let numerator = self.0 as i128 * keep_bps;
        let rounded = div_round_half_even(numerator, MAX_DISCOUNT_BPS as i128);
        // |result| <= |self| because keep_bps <= 10000, so this cannot truncate
        Money(rounded as i64)
    }
}

/// Integer division rounding half to even.
///
/// `divisor` must be positive. Works for negative numerators: the quotient
/// is floored first, so the remainder is always in `[0, divisor)`.
fn div_round_half_even(numerator: i128, divisor: i128) -> i128 {
    let quotient = numerator.div_euclid(divisor);
    let remainder = numerator.rem_euclid(divisor);
    let twice = remainder * 2;

    if twice > divisor || (twice == divisor && quotient % 2 != 0) {
        quotient + 1
    } else {
        quotient
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows raw minor units.
///
/// Currency symbols and decimal placement belong to the presentation config
/// (`StoreConfig::format_currency` in branchboard-store).
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
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

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
