//! # Domain Types
//!
//! Shared domain types: tax rate, delivery mode, products and their extras.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │   ExtraGroup    │   │  ExtraOption    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │──►│  id             │──►│  name           │       │
//! │  │  name           │   │  required       │   │  price?         │       │
//! │  │  price          │   │  options        │   └─────────────────┘       │
//! │  │  extras         │   └─────────────────┘                              │
//! │  └─────────────────┘                                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────────────┐                      │
//! │  │    TaxRate      │   │     DeliveryMode        │                      │
//! │  │  bps (u32)      │   │  0 OrderIn (dine-in)    │                      │
//! │  │  800 = 8%       │   │  1 Pickup               │                      │
//! │  └─────────────────┘   │  2 Delivery             │                      │
//! │                        └─────────────────────────┘                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000, so 800 bps = 8%. Integer storage keeps
/// the configured rate exact; [`TaxRate::as_fraction`] turns it into the
/// decimal multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage, e.g. `8.25` → 825 bps.
    ///
    /// Returns `None` for negative or unrepresentable percentages.
    pub fn from_percentage(pct: Decimal) -> Option<Self> {
        if pct < Decimal::ZERO {
            return None;
        }
        pct.checked_mul(Decimal::ONE_HUNDRED)?
            .round()
            .to_u32()
            .map(TaxRate)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (800 bps → 8).
    pub fn percentage(&self) -> Decimal {
        Decimal::new(i64::from(self.0), 2)
    }

    /// Returns the multiplier applied to an amount (800 bps → 0.08).
    pub fn as_fraction(&self) -> Decimal {
        Decimal::new(i64::from(self.0), 4)
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        crate::DEFAULT_TAX_RATE
    }
}

// =============================================================================
// Delivery Mode
// =============================================================================

/// How an order reaches the customer.
///
/// ## Canonical Wire Mapping
/// The backend sends this as a number. The mapping is closed:
///
/// | wire | variant    |
/// |------|------------|
/// | 0    | `OrderIn`  (dine-in) |
/// | 1    | `Pickup`   |
/// | 2    | `Delivery` |
///
/// Any other number fails to convert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum DeliveryMode {
    /// Eat at the shop (a.k.a. dine-in).
    OrderIn,
    /// Customer collects the order.
    Pickup,
    /// Courier brings the order.
    Delivery,
}

impl DeliveryMode {
    /// All modes, in wire order.
    pub const ALL: [DeliveryMode; 3] = [
        DeliveryMode::OrderIn,
        DeliveryMode::Pickup,
        DeliveryMode::Delivery,
    ];

    /// Returns the wire code.
    #[inline]
    pub const fn code(self) -> u8 {
        match self {
            DeliveryMode::OrderIn => 0,
            DeliveryMode::Pickup => 1,
            DeliveryMode::Delivery => 2,
        }
    }

    /// Maps a wire code to a mode; `None` outside the closed mapping.
    #[inline]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(DeliveryMode::OrderIn),
            1 => Some(DeliveryMode::Pickup),
            2 => Some(DeliveryMode::Delivery),
            _ => None,
        }
    }
}

impl TryFrom<u8> for DeliveryMode {
    type Error = ValidationError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        DeliveryMode::from_code(code).ok_or_else(|| ValidationError::OutOfRange {
            field: "deliveryMode".to_string(),
            min: 0,
            max: 2,
        })
    }
}

impl From<DeliveryMode> for u8 {
    fn from(mode: DeliveryMode) -> Self {
        mode.code()
    }
}

impl fmt::Display for DeliveryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryMode::OrderIn => write!(f, "order-in"),
            DeliveryMode::Pickup => write!(f, "pickup"),
            DeliveryMode::Delivery => write!(f, "delivery"),
        }
    }
}

// =============================================================================
// Extras
// =============================================================================

/// One selectable option inside an extra group, e.g. "Large" for +1.50.
///
/// ## Absent Prices
/// `price` is `None` when the backend omits it. That is a distinct state
/// from an explicit zero: two options only match when both prices are
/// absent or both are equal. Pricing treats `None` as zero through
/// [`ExtraOption::price_or_zero`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ExtraOption {
    pub name: String,
    #[serde(default)]
    pub price: Option<Money>,
}

impl ExtraOption {
    /// Creates a priced option.
    pub fn new(name: impl Into<String>, price: Money) -> Self {
        ExtraOption {
            name: name.into(),
            price: Some(price),
        }
    }

    /// Creates an option whose price was not supplied.
    pub fn unpriced(name: impl Into<String>) -> Self {
        ExtraOption {
            name: name.into(),
            price: None,
        }
    }

    /// Price used in arithmetic: an absent price counts as zero.
    #[inline]
    pub fn price_or_zero(&self) -> Money {
        self.price.unwrap_or_default()
    }
}

/// The customer's choices for a product: extra-group id → chosen option.
///
/// Ordered by group id so snapshots serialize deterministically.
pub type SelectedExtras = BTreeMap<String, ExtraOption>;

/// A group of options offered on a product ("Size", "Sauce", ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ExtraGroup {
    pub id: String,
    pub name: String,
    /// The customer must pick an option before adding to cart.
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub options: Vec<ExtraOption>,
}

impl ExtraGroup {
    /// Finds an option in this group by name.
    pub fn option(&self, name: &str) -> Option<&ExtraOption> {
        self.options.iter().find(|o| o.name == name)
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product as returned by the backend.
///
/// Display fields are opaque: the core never validates them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    pub id: String,
    #[serde(default)]
    pub shop_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Undiscounted unit price.
    pub price: Money,
    #[serde(default)]
    pub extras: Vec<ExtraGroup>,
}

impl Product {
    /// Looks up an extra group by id.
    pub fn extra_group(&self, group_id: &str) -> Option<&ExtraGroup> {
        self.extras.iter().find(|g| g.id == group_id)
    }

    /// Groups the customer must choose from.
    pub fn required_groups(&self) -> impl Iterator<Item = &ExtraGroup> {
        self.extras.iter().filter(|g| g.required)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_rate_from_bps() {
        let rate = TaxRate::from_bps(800);
        assert_eq!(rate.bps(), 800);
        assert_eq!(rate.percentage(), Decimal::new(8, 0));
        assert_eq!(rate.as_fraction(), Decimal::new(8, 2));
    }

    #[test]
    fn test_tax_rate_from_percentage() {
        assert_eq!(
            TaxRate::from_percentage(Decimal::new(825, 2)),
            Some(TaxRate::from_bps(825))
        );
        assert_eq!(TaxRate::from_percentage(Decimal::new(-1, 0)), None);
    }

    #[test]
    fn test_tax_rate_from_small_negative_percentage() {
        // -0.004% rounds to zero bps but is still negative input.
        assert_eq!(TaxRate::from_percentage(Decimal::new(-4, 3)), None);
        assert_eq!(TaxRate::from_percentage(Decimal::ZERO), Some(TaxRate::zero()));
        assert_eq!(TaxRate::from_percentage(Decimal::MAX), None);
    }

    #[test]
    fn test_tax_rate_default_is_eight_percent() {
        assert_eq!(TaxRate::default().bps(), 800);
    }

    #[test]
    fn test_delivery_mode_closed_mapping() {
        assert_eq!(DeliveryMode::from_code(0), Some(DeliveryMode::OrderIn));
        assert_eq!(DeliveryMode::from_code(1), Some(DeliveryMode::Pickup));
        assert_eq!(DeliveryMode::from_code(2), Some(DeliveryMode::Delivery));
        assert_eq!(DeliveryMode::from_code(3), None);
        assert!(DeliveryMode::try_from(255).is_err());

        for mode in DeliveryMode::ALL {
            assert_eq!(DeliveryMode::from_code(mode.code()), Some(mode));
        }
    }

    #[test]
    fn test_delivery_mode_serializes_as_number() {
        assert_eq!(serde_json::to_string(&DeliveryMode::Pickup).unwrap(), "1");
        let mode: DeliveryMode = serde_json::from_str("2").unwrap();
        assert_eq!(mode, DeliveryMode::Delivery);
        assert!(serde_json::from_str::<DeliveryMode>("7").is_err());
    }

    #[test]
    fn test_extra_option_absent_price_is_zero_in_arithmetic() {
        let option = ExtraOption::unpriced("No onions");
        assert_eq!(option.price, None);
        assert_eq!(option.price_or_zero(), Money::zero());
    }

    #[test]
    fn test_product_deserializes_from_backend_json() {
        let json = r#"{
            "id": "P1",
            "name": "Margherita",
            "price": 10.5,
            "extras": [
                { "id": "size", "name": "Size", "required": true,
                  "options": [ { "name": "Large", "price": "2.00" }, { "name": "Small" } ] }
            ]
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();

        assert_eq!(product.price, Money::from_cents(1050));
        assert_eq!(product.required_groups().count(), 1);
        let size = product.extra_group("size").unwrap();
        assert_eq!(size.option("Large").unwrap().price, Some(Money::from_cents(200)));
        assert_eq!(size.option("Small").unwrap().price, None);
    }
}
