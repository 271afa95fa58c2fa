//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Decimal Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A cart that re-adds 19.99 a hundred times drifts by fractions of a    │
//! │  cent, and the drift shows up as "21.599999999" on the checkout page.  │
//! │                                                                         │
//! │  OUR SOLUTION: rust_decimal                                             │
//! │    Every amount is a base-10 decimal. 10.00 × 20% is exactly 2.00.     │
//! │    Rounding happens ONCE, at display time, to two fraction digits.     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use platter_core::money::Money;
//!
//! // Create from cents (exact)
//! let price = Money::from_cents(1099); // 10.99
//!
//! // Arithmetic operations
//! let doubled = price * 2;                       // 21.98
//! let total = price + Money::from_cents(500);    // 15.99
//! assert_eq!(total.to_string(), "$15.99");
//! # let _ = doubled;
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use ts_rs::TS;

use crate::types::TaxRate;

/// Number of fraction digits shown to the user.
pub const DISPLAY_DECIMALS: u32 = 2;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value as an exact decimal.
///
/// ## Design Decisions
/// - **Signed**: a fixed discount larger than the base price yields a
///   negative unit price; that value must be representable.
/// - **Unrounded**: arithmetic keeps full precision. [`Money::rounded`] and
///   `Display` are the only places that round.
/// - **Transparent serde**: serialized as the decimal string, e.g. `"10.99"`.
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Product.price ──► discounted_unit_price ──► CartLineItem.unit_price    │
/// │                                                    │                    │
/// │  ExtraOption.price ────────────────────────────────┤                    │
/// │                                                    ▼                    │
/// │                                              line_total                 │
/// │                                                    │                    │
/// │  subtotal ──► tax ──► total                        │                    │
/// │      ▲                                             │                    │
/// │      └─────────────────────────────────────────────┘                    │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[serde(transparent)]
#[ts(export)]
pub struct Money(#[ts(type = "string")] Decimal);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use platter_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.to_string(), "$10.99");
    /// ```
    #[inline]
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, DISPLAY_DECIMALS))
    }

    /// Creates a Money value from major and minor units.
    ///
    /// For negative amounts only the major unit should be negative:
    /// `from_major_minor(-5, 50)` is -5.50.
    pub fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money::from_cents(major * 100 - minor)
        } else {
            Money::from_cents(major * 100 + minor)
        }
    }

    /// Wraps an already-computed decimal amount.
    #[inline]
    pub const fn from_decimal(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Returns the exact, unrounded amount.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Returns the absolute value.
    #[inline]
    pub fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Returns `self`, or zero if `self` is negative.
    ///
    /// ```rust
    /// use platter_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(-150).non_negative(), Money::zero());
    /// assert_eq!(Money::from_cents(150).non_negative(), Money::from_cents(150));
    /// ```
    #[inline]
    pub fn non_negative(self) -> Self {
        self.max(Money::zero())
    }

    /// Rounds to two fraction digits, half away from zero.
    ///
    /// ```rust
    /// use platter_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let third = Money::from_decimal(Decimal::new(10, 0) / Decimal::new(3, 0));
    /// assert_eq!(third.rounded(), Money::from_cents(333));
    /// ```
    pub fn rounded(&self) -> Self {
        self.rounded_to(DISPLAY_DECIMALS)
    }

    /// Rounds to `decimals` fraction digits, half away from zero, and pads
    /// the scale so `5` renders as `5.00`.
    pub fn rounded_to(&self, decimals: u32) -> Self {
        let mut rounded = self
            .0
            .round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(decimals);
        Money(rounded)
    }

    /// Calculates tax at the given rate without rounding.
    ///
    /// ## Example
    /// ```rust
    /// use platter_core::money::Money;
    /// use platter_core::types::TaxRate;
    ///
    /// let subtotal = Money::from_cents(2000); // 20.00
    /// let tax = subtotal.calculate_tax(TaxRate::from_bps(800)); // 8%
    /// assert_eq!(tax, Money::from_cents(160));
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        Money(self.0 * rate.as_fraction())
    }

    /// Returns `percentage`% of this amount (`amount × pct / 100`).
    pub fn percentage_of(&self, percentage: Decimal) -> Money {
        Money(self.0 * percentage / Decimal::ONE_HUNDRED)
    }

    /// Multiplies money by a quantity.
    ///
    /// ```rust
    /// use platter_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299);
    /// assert_eq!(unit_price.multiply_quantity(3), Money::from_cents(897));
    /// ```
    #[inline]
    pub fn multiply_quantity(&self, qty: u32) -> Self {
        Money(self.0 * Decimal::from(qty))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Human-readable form, rounded to two fraction digits.
///
/// Currency symbols other than `$` are applied by the client config's
/// `format_currency`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self.rounded();
        let sign = if rounded.is_negative() { "-" } else { "" };
        write!(f, "{}${}", sign, rounded.0.abs())
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Money(amount)
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

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

/// Multiplication by a quantity.
impl Mul<u32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: u32) -> Self {
        self.multiply_quantity(qty)
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
