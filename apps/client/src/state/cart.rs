//! # Cart State
//!
//! The single, observable owner of the live cart.
//!
//! ## Dispatch & Notification
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart State Operations                                │
//! │                                                                         │
//! │  Command                 CartState                 Observers            │
//! │  ───────                 ─────────                 ─────────            │
//! │                                                                         │
//! │  add_to_cart ──────────► dispatch(|c| c.add_to_cart(item))              │
//! │                              │                                          │
//! │                              ├─ CartChange::Unchanged ──► (silent)      │
//! │                              │                                          │
//! │                              └─ anything else ──────────► UI re-render │
//! │                                                           persistence  │
//! │                                                           worker saves │
//! │                                                                         │
//! │  Every mutation runs inside watch::Sender::send_if_modified, so it is  │
//! │  applied atomically and observers see each committed cart.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tokio::sync::watch;
use tracing::debug;

use platter_core::{Cart, CartChange, CartLineItem};

/// Observable cart container.
///
/// Cloning a `watch::Receiver` from [`CartState::subscribe`] is how the UI
/// and the persistence worker follow the cart.
#[derive(Debug)]
pub struct CartState {
    tx: watch::Sender<Cart>,
}

impl Default for CartState {
    fn default() -> Self {
        CartState::new(Cart::new())
    }
}

impl CartState {
    /// Wraps an initial (usually rehydrated) cart.
    pub fn new(initial: Cart) -> Self {
        let (tx, _rx) = watch::channel(initial);
        CartState { tx }
    }

    /// Subscribes to committed cart changes.
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.tx.subscribe()
    }

    /// Copy of the current cart.
    pub fn snapshot(&self) -> Cart {
        self.tx.borrow().clone()
    }

    /// Reads the current cart without cloning it.
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        f(&self.tx.borrow())
    }

    /// Applies one operation; observers are notified only if it changed
    /// the cart.
    pub fn dispatch<F>(&self, op: F) -> CartChange
    where
        F: FnOnce(&mut Cart) -> CartChange,
    {
        let mut change = CartChange::Unchanged;
        self.tx.send_if_modified(|cart| {
            change = op(cart);
            change.is_modified()
        });
        debug!(?change, "Cart operation applied");
        change
    }

    /// See [`Cart::add_to_cart`].
    pub fn add_to_cart(&self, item: CartLineItem) -> CartChange {
        self.dispatch(|cart| cart.add_to_cart(item))
    }

    /// See [`Cart::increment_quantity`].
    pub fn increment_quantity(&self, product_id: &str) -> CartChange {
        self.dispatch(|cart| cart.increment_quantity(product_id))
    }

    /// See [`Cart::decrement_quantity`].
    pub fn decrement_quantity(&self, product_id: &str) -> CartChange {
        self.dispatch(|cart| cart.decrement_quantity(product_id))
    }

    /// See [`Cart::clear_cart`].
    pub fn clear_cart(&self) -> CartChange {
        self.dispatch(|cart| cart.clear_cart())
    }

    /// Empties the cart and returns what it held, in one step.
    ///
    /// Used by checkout so no add can slip in between reading the lines and
    /// clearing them.
    pub fn take(&self) -> Cart {
        let mut taken = Cart::new();
        self.tx.send_if_modified(|cart| {
            if cart.is_empty() {
                return false;
            }
            taken = std::mem::take(cart);
            true
        });
        debug!(lines = taken.item_count(), "Cart taken");
        taken
    }

    /// Replaces the whole cart (rehydration after startup).
    pub fn replace(&self, cart: Cart) {
        self.tx.send_replace(cart);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use platter_core::Money;

    fn item(product_id: &str, qty: u32) -> CartLineItem {
        CartLineItem::new(product_id, product_id, Money::from_cents(500), qty)
    }

    #[tokio::test]
    async fn test_observers_see_modifications() {
        let state = CartState::default();
        let mut rx = state.subscribe();

        state.add_to_cart(item("P1", 1));
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().item_count(), 1);

        state.increment_quantity("P1");
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().items()[0].quantity, 2);
    }

    #[test]
    fn test_noops_do_not_notify() {
        let state = CartState::default();
        let rx = state.subscribe();

        assert_eq!(state.increment_quantity("missing"), CartChange::Unchanged);
        assert_eq!(state.decrement_quantity("missing"), CartChange::Unchanged);
        assert_eq!(state.add_to_cart(item("P1", 0)), CartChange::Unchanged);
        assert_eq!(state.clear_cart(), CartChange::Cleared { removed: 0 });

        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_take_empties_and_returns_lines() {
        let state = CartState::default();
        let rx = state.subscribe();
        assert!(state.take().is_empty());
        assert!(!rx.has_changed().unwrap());

        state.add_to_cart(item("P1", 3));
        let taken = state.take();
        assert_eq!(taken.total_quantity(), 3);
        assert!(state.snapshot().is_empty());
    }

    #[test]
    fn test_snapshot_and_replace() {
        let state = CartState::default();
        state.add_to_cart(item("P1", 2));
        assert_eq!(state.with_cart(|c| c.total_quantity()), 2);

        let snapshot = state.snapshot();
        state.clear_cart();
        assert!(state.snapshot().is_empty());

        state.replace(snapshot);
        assert_eq!(state.with_cart(|c| c.total_quantity()), 2);
    }
}
