//! # Pricing
//!
//! Pure functions that derive every amount the checkout screen shows.
//!
//! ## Calculation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Totals Calculation                              │
//! │                                                                         │
//! │  Line 1: (unit 8.00 + extras 2.00) × 2  = 20.00                        │
//! │  Line 2: (unit 5.00 + extras 0.00) × 1  =  5.00                        │
//! │  ─────────────────────────────────────────────                          │
//! │  Subtotal:                                 25.00                        │
//! │  Tax (8%):                                  2.00                        │
//! │  ═════════════════════════════════════════════                          │
//! │  Total:                                    27.00                        │
//! │                                                                         │
//! │  Savings: Σ max(0, original − unit) × qty                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here is stored. Totals are recomputed from the cart each time and
//! all arithmetic is exact; round with [`Money::rounded`] when displaying.

use serde::Serialize;
use ts_rs::TS;

use crate::cart::{Cart, CartLineItem};
use crate::discount::{Discount, DiscountKind};
use crate::money::Money;
use crate::types::TaxRate;

// =============================================================================
// Unit Prices
// =============================================================================

/// Price of one unit after `discount`.
///
/// ## Formula
/// - Percentage: `base − base × pct / 100`
/// - Fixed: `base − fixed_value`
///
/// The result is not clamped: a fixed value above the base price gives a
/// negative unit price. Callers that need a floor use
/// [`Money::non_negative`].
///
/// ```rust
/// use platter_core::discount::Discount;
/// use platter_core::money::Money;
/// use platter_core::pricing::discounted_unit_price;
/// use platter_core::types::DeliveryMode;
///
/// let d = Discount::fixed("D1", "P1", Money::from_cents(300), DeliveryMode::Pickup);
/// assert_eq!(discounted_unit_price(Money::from_cents(1000), &d), Money::from_cents(700));
/// ```
pub fn discounted_unit_price(base: Money, discount: &Discount) -> Money {
    match discount.kind {
        DiscountKind::Percentage(pct) => base - base.percentage_of(pct),
        DiscountKind::Fixed(value) => base - value,
    }
}

// =============================================================================
// Line & Cart Totals
// =============================================================================

/// Sum of the selected extras' prices for one unit. Unpriced options count
/// as zero.
pub fn extras_price(item: &CartLineItem) -> Money {
    item.selected_extras
        .values()
        .map(|option| option.price_or_zero())
        .sum()
}

/// `(unit_price + extras) × quantity`.
pub fn line_total(item: &CartLineItem) -> Money {
    (item.unit_price + extras_price(item)) * item.quantity
}

/// Sum of all line totals.
pub fn subtotal(cart: &Cart) -> Money {
    cart.items().iter().map(line_total).sum()
}

/// `subtotal × rate`.
pub fn tax(subtotal: Money, rate: TaxRate) -> Money {
    subtotal.calculate_tax(rate)
}

/// `subtotal + tax`.
pub fn total(cart: &Cart, rate: TaxRate) -> Money {
    let sub = subtotal(cart);
    sub + tax(sub, rate)
}

/// What the discount saved on one line: `max(0, original − unit) × qty`.
///
/// Lines without an applied discount save nothing.
pub fn line_savings(item: &CartLineItem) -> Money {
    match &item.discount {
        Some(applied) => (applied.original_price - item.unit_price).non_negative() * item.quantity,
        None => Money::zero(),
    }
}

/// Sum of [`line_savings`] over the cart.
pub fn savings(cart: &Cart) -> Money {
    cart.items().iter().map(line_savings).sum()
}

// =============================================================================
// Cart Totals Summary
// =============================================================================

/// Everything the cart footer shows, computed in one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartTotals {
    pub item_count: u32,
    #[ts(type = "number")]
    pub total_quantity: u64,
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
    pub savings: Money,
    pub tax_rate_bps: u32,
}

impl CartTotals {
    /// Computes totals for `cart` at `rate`.
    pub fn compute(cart: &Cart, rate: TaxRate) -> Self {
        let subtotal = subtotal(cart);
        let tax = tax(subtotal, rate);
        CartTotals {
            item_count: u32::try_from(cart.item_count()).unwrap_or(u32::MAX),
            total_quantity: cart.total_quantity(),
            subtotal,
            tax,
            total: subtotal + tax,
            savings: savings(cart),
            tax_rate_bps: rate.bps(),
        }
    }

    /// Same totals rounded for display.
    pub fn rounded(&self) -> Self {
        CartTotals {
            subtotal: self.subtotal.rounded(),
            tax: self.tax.rounded(),
            total: self.total.rounded(),
            savings: self.savings.rounded(),
            ..*self
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
