//! # Cart
//!
//! The authoritative list of cart lines and the four operations that mutate
//! it.
//!
//! ## Cart Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  UI Event               Operation                 Effect                │
//! │  ────────               ─────────                 ──────                │
//! │                                                                         │
//! │  "Add to cart" ───────► add_to_cart(item) ──┬──► same product + equal  │
//! │                                              │    extras: qty += n      │
//! │                                              └──► otherwise: push line  │
//! │                                                                         │
//! │  "+" on a line ───────► increment_quantity ─────► qty += 1              │
//! │                                                                         │
//! │  "−" on a line ───────► decrement_quantity ──┬──► qty > 1: qty -= 1    │
//! │                                              └──► qty == 1: remove      │
//! │                                                                         │
//! │  Checkout / "Clear" ──► clear_cart ─────────────► items.clear()         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - No two lines share a product id AND extras-equal selections
//! - Every line has quantity >= 1
//!
//! Totals are not stored here; see [`crate::pricing`].

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::discount::Discount;
use crate::extras::extras_equal;
use crate::money::Money;
use crate::pricing::discounted_unit_price;
use crate::types::{Product, SelectedExtras};

// =============================================================================
// Line Items
// =============================================================================

/// Discount that was applied when a line was added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AppliedDiscount {
    pub discount_id: String,
    /// Unit price before the discount; the line's `unit_price` is the price
    /// after it.
    pub original_price: Money,
}

fn new_line_id() -> String {
    Uuid::new_v4().to_string()
}

/// One row in the cart.
///
/// ## Design Notes
/// - `unit_price` is frozen when the line is created and already includes
///   any discount. Later price changes on the backend don't move it.
/// - `discount` replaces a loose `discountApplied` flag + optional id: the
///   flag is [`CartLineItem::discount_applied`].
/// - `line_id` is a render key for the UI. Identity for merging is
///   `product_id` + extras, never `line_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartLineItem {
    #[serde(default = "new_line_id")]
    pub line_id: String,
    pub product_id: String,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub unit_price: Money,
    pub quantity: u32,
    #[serde(default)]
    pub selected_extras: SelectedExtras,
    #[serde(default)]
    pub discount: Option<AppliedDiscount>,
}

impl CartLineItem {
    /// Creates a candidate line with no extras and no discount.
    pub fn new(
        product_id: impl Into<String>,
        name: impl Into<String>,
        unit_price: Money,
        quantity: u32,
    ) -> Self {
        CartLineItem {
            line_id: new_line_id(),
            product_id: product_id.into(),
            name: name.into(),
            image: None,
            description: None,
            unit_price,
            quantity,
            selected_extras: SelectedExtras::new(),
            discount: None,
        }
    }

    /// Builds a candidate line from a backend product.
    ///
    /// ## Price Freezing
    /// When a discount is supplied its price is applied now: `unit_price`
    /// becomes the discounted price and the undiscounted one is kept in
    /// [`AppliedDiscount::original_price`] for savings reporting. The caller
    /// decides which discount (if any) is eligible; see
    /// [`crate::eligibility`].
    pub fn from_product(
        product: &Product,
        quantity: u32,
        selected_extras: SelectedExtras,
        discount: Option<&Discount>,
    ) -> Self {
        let (unit_price, applied) = match discount {
            Some(d) => (
                discounted_unit_price(product.price, d),
                Some(AppliedDiscount {
                    discount_id: d.id.clone(),
                    original_price: product.price,
                }),
            ),
            None => (product.price, None),
        };

        CartLineItem {
            line_id: new_line_id(),
            product_id: product.id.clone(),
            name: product.name.clone(),
            image: product.image.clone(),
            description: product.description.clone(),
            unit_price,
            quantity,
            selected_extras,
            discount: applied,
        }
    }

    /// Replaces the extras selection.
    pub fn with_extras(mut self, selected_extras: SelectedExtras) -> Self {
        self.selected_extras = selected_extras;
        self
    }

    /// Records a discount applied at add time.
    pub fn with_discount(mut self, discount_id: impl Into<String>, original_price: Money) -> Self {
        self.discount = Some(AppliedDiscount {
            discount_id: discount_id.into(),
            original_price,
        });
        self
    }

    /// True when a discount was applied at add time.
    #[inline]
    pub fn discount_applied(&self) -> bool {
        self.discount.is_some()
    }

    /// Id of the applied discount, if any.
    pub fn discount_id(&self) -> Option<&str> {
        self.discount.as_ref().map(|d| d.discount_id.as_str())
    }

    /// True when `other` would merge into this line.
    pub fn same_line_as(&self, other: &CartLineItem) -> bool {
        self.product_id == other.product_id
            && extras_equal(Some(&self.selected_extras), Some(&other.selected_extras))
    }
}

// =============================================================================
// Change Reporting
// =============================================================================

/// What a cart operation did.
///
/// Returned by every mutation so the dispatch layer can log the transition
/// and skip notifying observers when nothing changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartChange {
    /// A new line was pushed at `index`.
    Appended { index: usize },
    /// An existing line absorbed the candidate; `quantity` is the new total.
    Merged { index: usize, quantity: u32 },
    /// Quantity went up by one.
    Incremented { index: usize, quantity: u32 },
    /// Quantity went down by one.
    Decremented { index: usize, quantity: u32 },
    /// A line with quantity 1 was decremented away.
    Removed { index: usize },
    /// All lines were dropped.
    Cleared { removed: usize },
    /// Nothing matched; the cart is untouched.
    Unchanged,
}

impl CartChange {
    /// True if the cart contents differ after the operation.
    pub fn is_modified(&self) -> bool {
        match self {
            CartChange::Unchanged => false,
            CartChange::Cleared { removed } => *removed > 0,
            _ => true,
        }
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart.
///
/// Insertion order is kept for display only; pricing doesn't depend on it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Cart {
    items: Vec<CartLineItem>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart::default()
    }

    /// Read-only view of the lines.
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Consumes the cart, returning its lines.
    pub fn into_items(self) -> Vec<CartLineItem> {
        self.items
    }

    /// Adds a candidate line, merging it into an equal line if one exists.
    ///
    /// ## Behavior
    /// - Same `product_id` and [`extras_equal`] selections: the existing
    ///   line's quantity grows by `item.quantity`. Its price, extras and
    ///   discount stay as they were.
    /// - Otherwise the candidate is appended as given.
    /// - A candidate with quantity 0 is ignored so no line ever has
    ///   quantity 0.
    ///
    /// Never fails. Whether required extras were chosen is the caller's
    /// concern.
    pub fn add_to_cart(&mut self, item: CartLineItem) -> CartChange {
        if item.quantity == 0 {
            return CartChange::Unchanged;
        }

        if let Some((index, line)) = self
            .items
            .iter_mut()
            .enumerate()
            .find(|(_, line)| line.same_line_as(&item))
        {
            line.quantity = line.quantity.saturating_add(item.quantity);
            return CartChange::Merged {
                index,
                quantity: line.quantity,
            };
        }

        self.items.push(item);
        CartChange::Appended {
            index: self.items.len() - 1,
        }
    }

    /// Adds one to the first line for `product_id`. No-op if absent.
    pub fn increment_quantity(&mut self, product_id: &str) -> CartChange {
        match self.position(product_id) {
            Some(index) => {
                let line = &mut self.items[index];
                line.quantity = line.quantity.saturating_add(1);
                CartChange::Incremented {
                    index,
                    quantity: line.quantity,
                }
            }
            None => CartChange::Unchanged,
        }
    }

    /// Takes one from the first line for `product_id`, removing the line
    /// when it reaches zero. No-op if absent.
    pub fn decrement_quantity(&mut self, product_id: &str) -> CartChange {
        let Some(index) = self.position(product_id) else {
            return CartChange::Unchanged;
        };

        let line = &mut self.items[index];
        if line.quantity > 1 {
            line.quantity -= 1;
            CartChange::Decremented {
                index,
                quantity: line.quantity,
            }
        } else {
            self.items.remove(index);
            CartChange::Removed { index }
        }
    }

    /// Empties the cart unconditionally.
    pub fn clear_cart(&mut self) -> CartChange {
        let removed = self.items.len();
        self.items.clear();
        CartChange::Cleared { removed }
    }

    /// First line for `product_id`.
    pub fn find(&self, product_id: &str) -> Option<&CartLineItem> {
        self.items.iter().find(|line| line.product_id == product_id)
    }

    /// Number of lines.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Sum of quantities over all lines (the badge on the cart icon).
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn position(&self, product_id: &str) -> Option<usize> {
        self.items
            .iter()
            .position(|line| line.product_id == product_id)
    }
}

impl From<Vec<CartLineItem>> for Cart {
    /// Builds a cart by replaying `add_to_cart`, so the merge invariant
    /// holds even for untrusted input.
    fn from(items: Vec<CartLineItem>) -> Self {
        let mut cart = Cart::new();
        for item in items {
            cart.add_to_cart(item);
        }
        cart
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DeliveryMode, ExtraOption};
    use rust_decimal::Decimal;

    fn item(product_id: &str, qty: u32) -> CartLineItem {
        CartLineItem::new(product_id, format!("Product {}", product_id), Money::from_cents(1000), qty)
    }

    fn large() -> SelectedExtras {
        let mut extras = SelectedExtras::new();
        extras.insert("size".to_string(), ExtraOption::new("Large", Money::from_cents(200)));
        extras
    }

    fn small() -> SelectedExtras {
        let mut extras = SelectedExtras::new();
        extras.insert("size".to_string(), ExtraOption::new("Small", Money::zero()));
        extras
    }

    #[test]
    fn test_add_same_product_and_extras_merges_quantities() {
        let mut cart = Cart::new();

        assert_eq!(cart.add_to_cart(item("P1", 2).with_extras(large())), CartChange::Appended { index: 0 });
        assert_eq!(
            cart.add_to_cart(item("P1", 3).with_extras(large())),
            CartChange::Merged { index: 0, quantity: 5 }
        );
        cart.add_to_cart(item("P1", 1).with_extras(large()));

        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.items()[0].quantity, 6);
    }

    #[test]
    fn test_merge_keeps_existing_price_and_line_id() {
        let mut cart = Cart::new();
        let first = item("P1", 1);
        let first_id = first.line_id.clone();
        cart.add_to_cart(first);

        let mut repriced = item("P1", 1);
        repriced.unit_price = Money::from_cents(1);
        cart.add_to_cart(repriced);

        assert_eq!(cart.items()[0].unit_price, Money::from_cents(1000));
        assert_eq!(cart.items()[0].line_id, first_id);
    }

    #[test]
    fn test_add_same_product_different_extras_appends() {
        let mut cart = Cart::new();

        cart.add_to_cart(item("P1", 1).with_extras(large()));
        cart.add_to_cart(item("P1", 1).with_extras(small()));
        cart.add_to_cart(item("P1", 1));
        cart.add_to_cart(item("P1", 2).with_extras(small()));

        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.items()[0].quantity, 1);
        assert_eq!(cart.items()[1].quantity, 3);
        assert_eq!(cart.items()[2].quantity, 1);
    }

    #[test]
    fn test_add_zero_quantity_is_ignored() {
        let mut cart = Cart::new();
        assert_eq!(cart.add_to_cart(item("P1", 0)), CartChange::Unchanged);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_increment() {
        let mut cart = Cart::new();
        cart.add_to_cart(item("P1", 2));

        assert_eq!(
            cart.increment_quantity("P1"),
            CartChange::Incremented { index: 0, quantity: 3 }
        );
        assert_eq!(cart.increment_quantity("missing"), CartChange::Unchanged);
        assert_eq!(cart.total_quantity(), 3);
    }

    #[test]
    fn test_increment_targets_first_line_only() {
        let mut cart = Cart::new();
        cart.add_to_cart(item("P1", 1).with_extras(large()));
        cart.add_to_cart(item("P1", 1).with_extras(small()));

        cart.increment_quantity("P1");

        assert_eq!(cart.items()[0].quantity, 2);
        assert_eq!(cart.items()[1].quantity, 1);
    }

    #[test]
    fn test_decrement_reduces_then_removes() {
        let mut cart = Cart::new();
        cart.add_to_cart(item("P1", 2));
        cart.add_to_cart(item("P2", 1));

        assert_eq!(
            cart.decrement_quantity("P1"),
            CartChange::Decremented { index: 0, quantity: 1 }
        );
        assert_eq!(cart.decrement_quantity("P1"), CartChange::Removed { index: 0 });
        assert!(cart.find("P1").is_none());
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_decrement_absent_is_noop() {
        let mut cart = Cart::new();
        cart.add_to_cart(item("P1", 1));
        let before = cart.clone();

        assert_eq!(cart.decrement_quantity("P9"), CartChange::Unchanged);
        assert_eq!(cart, before);
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        cart.add_to_cart(item("P1", 2));
        cart.add_to_cart(item("P2", 1));

        let change = cart.clear_cart();
        assert_eq!(change, CartChange::Cleared { removed: 2 });
        assert!(change.is_modified());
        assert!(cart.is_empty());

        let again = cart.clear_cart();
        assert!(!again.is_modified());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_quantity_saturates() {
        let mut cart = Cart::new();
        cart.add_to_cart(item("P1", u32::MAX));
        cart.add_to_cart(item("P1", 5));
        cart.increment_quantity("P1");
        assert_eq!(cart.items()[0].quantity, u32::MAX);
    }

    #[test]
    fn test_from_product_applies_discount() {
        let product = Product {
            id: "P1".to_string(),
            shop_id: None,
            name: "Burger".to_string(),
            image: Some("burger.png".to_string()),
            description: None,
            price: Money::from_cents(1000),
            extras: Vec::new(),
        };
        let discount = Discount::percentage("D1", "P1", Decimal::new(20, 0), DeliveryMode::Pickup);

        let line = CartLineItem::from_product(&product, 2, SelectedExtras::new(), Some(&discount));
        assert_eq!(line.unit_price, Money::from_cents(800));
        assert!(line.discount_applied());
        assert_eq!(line.discount_id(), Some("D1"));
        assert_eq!(line.discount.as_ref().unwrap().original_price, Money::from_cents(1000));
        assert_eq!(line.image.as_deref(), Some("burger.png"));

        let plain = CartLineItem::from_product(&product, 1, SelectedExtras::new(), None);
        assert_eq!(plain.unit_price, Money::from_cents(1000));
        assert!(!plain.discount_applied());
    }

    #[test]
    fn test_from_vec_restores_merge_invariant() {
        let cart = Cart::from(vec![item("P1", 1), item("P1", 2), item("P2", 1)]);
        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.find("P1").unwrap().quantity, 3);
    }

    #[test]
    fn test_snapshot_json_shape() {
        let mut cart = Cart::new();
        cart.add_to_cart(item("P1", 2).with_extras(large()));

        let json = serde_json::to_value(&cart).unwrap();
        let line = &json["items"][0];
        assert_eq!(line["productId"], "P1");
        assert_eq!(line["unitPrice"], "10.00");
        assert_eq!(line["quantity"], 2);
        assert_eq!(line["selectedExtras"]["size"]["name"], "Large");
        assert!(line["discount"].is_null());

        let back: Cart = serde_json::from_value(json).unwrap();
        assert_eq!(back, cart);
    }

    #[test]
    fn test_snapshot_without_line_id_gets_one() {
        let json = r#"{"items":[{"productId":"P1","name":"x","unitPrice":"1.00","quantity":1}]}"#;
        let cart: Cart = serde_json::from_str(json).unwrap();
        assert!(!cart.items()[0].line_id.is_empty());
    }
}
