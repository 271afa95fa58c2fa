//! # Cart Snapshot Repository
//!
//! Saves and restores the whole cart as one JSON document.
//!
//! ## Snapshot Format
//! ```text
//! kv_store
//! ┌──────────────┬─────────┬──────────────────────────────────────────────┐
//! │ namespace    │ key     │ value                                        │
//! ├──────────────┼─────────┼──────────────────────────────────────────────┤
//! │ persist:cart │ current │ {"version":1,                                │
//! │              │         │  "savedAt":"2026-03-01T12:00:00Z",           │
//! │              │         │  "cart":{"items":[{"productId":"P1",...}]}}  │
//! └──────────────┴─────────┴──────────────────────────────────────────────┘
//! ```
//!
//! A snapshot that fails to parse, carries a version this build doesn't
//! know, or holds a line with out-of-range amounts loads as
//! [`DbError::Corrupt`]. The caller decides what to do with
//! it; the client falls back to an empty cart.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use platter_core::validation::validate_line_item;
use platter_core::Cart;

use crate::error::{DbError, DbResult};
use crate::repository::kv::KvRepository;

/// Namespace holding cart snapshots.
pub const CART_NAMESPACE: &str = "persist:cart";

/// Key of the live cart inside [`CART_NAMESPACE`].
pub const CART_KEY: &str = "current";

/// Snapshot layout version written by this build.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Envelope stored under the cart key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    pub cart: Cart,
}

impl CartSnapshot {
    /// Wraps `cart` at the current version, stamped now.
    pub fn new(cart: Cart) -> Self {
        CartSnapshot {
            version: SNAPSHOT_VERSION,
            saved_at: Utc::now(),
            cart,
        }
    }
}

/// Repository for cart snapshots.
#[derive(Debug, Clone)]
pub struct CartRepository {
    kv: KvRepository,
    namespace: String,
}

impl CartRepository {
    /// Creates a repository writing to [`CART_NAMESPACE`].
    pub fn new(kv: KvRepository) -> Self {
        CartRepository {
            kv,
            namespace: CART_NAMESPACE.to_string(),
        }
    }

    /// Uses a different namespace (one store per signed-in profile, tests).
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Namespace this repository writes to.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Writes `cart` as the current snapshot.
    pub async fn save(&self, cart: &Cart) -> DbResult<()> {
        let snapshot = CartSnapshot::new(cart.clone());
        let json = serde_json::to_string(&snapshot)
            .map_err(|e| DbError::corrupt(&self.namespace, CART_KEY, e))?;

        self.kv.put(&self.namespace, CART_KEY, &json).await?;

        debug!(
            namespace = %self.namespace,
            lines = cart.item_count(),
            "Cart snapshot saved"
        );
        Ok(())
    }

    /// Loads the current snapshot.
    ///
    /// ## Returns
    /// * `Ok(None)` - nothing saved yet
    /// * `Ok(Some(cart))` - restored cart; lines are replayed through
    ///   `add_to_cart` so duplicate or zero-quantity lines can't survive
    /// * `Err(DbError::Corrupt)` - unreadable or unknown-version snapshot
    pub async fn load(&self) -> DbResult<Option<Cart>> {
        let Some(json) = self.kv.get(&self.namespace, CART_KEY).await? else {
            debug!(namespace = %self.namespace, "No cart snapshot");
            return Ok(None);
        };

        let snapshot: CartSnapshot = serde_json::from_str(&json)
            .map_err(|e| DbError::corrupt(&self.namespace, CART_KEY, e))?;

        if snapshot.version != SNAPSHOT_VERSION {
            return Err(DbError::corrupt(
                &self.namespace,
                CART_KEY,
                format!("unsupported snapshot version {}", snapshot.version),
            ));
        }

        let items = snapshot.cart.into_items();
        if let Err(e) = items.iter().try_for_each(validate_line_item) {
            return Err(DbError::corrupt(&self.namespace, CART_KEY, e));
        }

        let cart = Cart::from(items);
        info!(
            namespace = %self.namespace,
            lines = cart.item_count(),
            saved_at = %snapshot.saved_at,
            "Cart snapshot loaded"
        );
        Ok(Some(cart))
    }

    /// Deletes the current snapshot.
    pub async fn clear(&self) -> DbResult<()> {
        self.kv.delete(&self.namespace, CART_KEY).await?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
