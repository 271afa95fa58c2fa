//! # Cart Persistence
//!
//! Rehydrates the cart at startup and writes a snapshot after every change.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Startup                                                               │
//! │    rehydrate(carts) ──► Ok(Some(cart)) ──► CartState::new(cart)        │
//! │                     ├─► Ok(None)       ──► empty cart                  │
//! │                     └─► Err(corrupt)   ──► warn!, empty cart           │
//! │                                                                         │
//! │  Running                                                               │
//! │    ┌────────────────────────────────────────────────────────────────┐  │
//! │    │  PersistenceWorker::run                                        │  │
//! │    │  loop select! {                                                │  │
//! │    │    cart_rx.changed()  ──► carts.save(latest)  (warn! on error) │  │
//! │    │    shutdown_rx.recv() ──► flush pending, stop                  │  │
//! │    │  }                                                             │  │
//! │    └────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A failed write is logged and retried with the next change; it never
//! rolls back the in-memory cart.

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use platter_core::Cart;
use platter_db::CartRepository;

/// Loads the saved cart, falling back to an empty one.
///
/// Unreadable snapshots are logged and discarded rather than blocking
/// startup.
pub async fn rehydrate(carts: &CartRepository) -> Cart {
    match carts.load().await {
        Ok(Some(cart)) => cart,
        Ok(None) => Cart::new(),
        Err(e) => {
            warn!(error = %e, namespace = %carts.namespace(), "Discarding unreadable cart snapshot");
            Cart::new()
        }
    }
}

/// Handle for controlling a running [`PersistenceWorker`].
#[derive(Debug)]
pub struct PersistenceHandle {
    shutdown_tx: mpsc::Sender<()>,
    task: JoinHandle<()>,
}

impl PersistenceHandle {
    /// Flushes any pending change and waits for the worker to stop.
    pub async fn shutdown(self) {
        if self.shutdown_tx.send(()).await.is_err() {
            debug!("Persistence worker already stopped");
        }
        if let Err(e) = self.task.await {
            error!(error = %e, "Persistence worker panicked");
        }
    }
}

/// Background task saving the cart after each committed change.
pub struct PersistenceWorker {
    carts: CartRepository,
    cart_rx: watch::Receiver<Cart>,
    shutdown_rx: mpsc::Receiver<()>,
}

impl PersistenceWorker {
    /// Spawns the worker on the current tokio runtime.
    pub fn spawn(carts: CartRepository, cart_rx: watch::Receiver<Cart>) -> PersistenceHandle {
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
        let worker = PersistenceWorker {
            carts,
            cart_rx,
            shutdown_rx,
        };
        let task = tokio::spawn(worker.run());
        PersistenceHandle { shutdown_tx, task }
    }

    async fn run(mut self) {
        info!(namespace = %self.carts.namespace(), "Cart persistence worker starting");

        loop {
            tokio::select! {
                changed = self.cart_rx.changed() => {
                    if changed.is_err() {
                        debug!("Cart state dropped");
                        break;
                    }
                    self.save_latest().await;
                }

                _ = self.shutdown_rx.recv() => {
                    if self.cart_rx.has_changed().unwrap_or(false) {
                        self.save_latest().await;
                    }
                    break;
                }
            }
        }

        info!("Cart persistence worker stopped");
    }

    async fn save_latest(&mut self) {
        let cart = self.cart_rx.borrow_and_update().clone();
        if let Err(e) = self.carts.save(&cart).await {
            warn!(error = %e, lines = cart.item_count(), "Failed to persist cart");
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::CartState;
    use platter_core::{CartLineItem, Money};
    use platter_db::{Database, DbConfig, CART_KEY, CART_NAMESPACE};

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_rehydrate_empty_store() {
        let db = db().await;
        assert!(rehydrate(&db.carts()).await.is_empty());
    }

    #[tokio::test]
    async fn test_rehydrate_corrupt_snapshot_gives_empty_cart() {
        let db = db().await;
        db.kv().put(CART_NAMESPACE, CART_KEY, "garbage").await.unwrap();
        assert!(rehydrate(&db.carts()).await.is_empty());
    }

    #[tokio::test]
    async fn test_worker_persists_changes_and_flushes_on_shutdown() {
        let db = db().await;
        let state = CartState::default();
        let handle = PersistenceWorker::spawn(db.carts(), state.subscribe());

        state.add_to_cart(CartLineItem::new("P1", "Burger", Money::from_cents(1000), 2));
        state.add_to_cart(CartLineItem::new("P2", "Fries", Money::from_cents(300), 1));
        state.decrement_quantity("P2");
        handle.shutdown().await;

        let restored = rehydrate(&db.carts()).await;
        assert_eq!(restored, state.snapshot());
        assert_eq!(restored.item_count(), 1);
    }

    #[tokio::test]
    async fn test_cleared_cart_is_persisted_empty() {
        let db = db().await;
        let state = CartState::default();
        let handle = PersistenceWorker::spawn(db.carts(), state.subscribe());

        state.add_to_cart(CartLineItem::new("P1", "Burger", Money::from_cents(1000), 1));
        state.clear_cart();
        handle.shutdown().await;

        assert_eq!(db.carts().load().await.unwrap(), Some(Cart::new()));
    }
}
