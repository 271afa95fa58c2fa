//! # Platter Client Library
//!
//! Root service the mobile shell embeds: configuration, logging, the
//! observable cart and its persistence, and the command functions.
//!
//! ## Module Organization
//! ```text
//! platter_client/
//! ├── lib.rs          ◄─── You are here (startup & shutdown)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── config.rs   ◄─── ClientConfig (env > TOML > defaults)
//! │   ├── cart.rs     ◄─── CartState (watch channel)
//! │   ├── db.rs       ◄─── Database state wrapper
//! │   └── persist.rs  ◄─── Rehydration + persistence worker
//! ├── commands/
//! │   ├── cart.rs     ◄─── get / add / increment / decrement / clear
//! │   ├── checkout.rs ◄─── confirm_checkout
//! │   └── discount.rs ◄─── parse records, list active discounts
//! └── error.rs        ◄─── API error type for commands
//! ```

pub mod commands;
pub mod error;
pub mod state;

use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use platter_db::{Database, DbConfig};

use error::ApiResult;
use state::{rehydrate, CartState, ClientConfig, DbState, PersistenceHandle, PersistenceWorker};

/// Default log filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,platter=debug,sqlx=warn";

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=platter_core=trace` - Trace one crate only
/// - Default: [`DEFAULT_LOG_FILTER`]
///
/// Calling it again (or after the host installed its own subscriber) is a
/// no-op.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_err()
    {
        debug!("Tracing subscriber already installed");
    }
}

/// A running client.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Client Startup                                    │
/// │                                                                         │
/// │  1. Load ClientConfig ────────────────────────────────────────────────► │
/// │     • PLATTER_* env > client.toml > defaults                            │
/// │                                                                         │
/// │  2. Open Database ────────────────────────────────────────────────────► │
/// │     • <data dir>/platter.db, WAL, migrations                            │
/// │                                                                         │
/// │  3. Rehydrate Cart ───────────────────────────────────────────────────► │
/// │     • snapshot under `persist:cart`/`current`, or empty                 │
/// │                                                                         │
/// │  4. Spawn Persistence Worker ─────────────────────────────────────────► │
/// │     • saves after every committed cart change                           │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub struct Client {
    config: ClientConfig,
    db: DbState,
    cart: CartState,
    persistence: PersistenceHandle,
}

impl Client {
    /// Opens the configured database and starts the client.
    pub async fn start(config: ClientConfig) -> ApiResult<Self> {
        let db_path = config.resolve_database_path()?;
        info!(?db_path, "Database path determined");

        let db = Database::new(DbConfig::new(db_path)).await?;
        Ok(Self::start_with_database(config, db).await)
    }

    /// Starts the client on an already-open database.
    pub async fn start_with_database(config: ClientConfig, db: Database) -> Self {
        let db = DbState::new(db, &config.storage_namespace);

        let cart = CartState::new(rehydrate(db.carts()).await);
        info!(
            lines = cart.with_cart(|c| c.item_count()),
            "Cart rehydrated"
        );

        let persistence = PersistenceWorker::spawn(db.carts().clone(), cart.subscribe());

        Client {
            config,
            db,
            cart,
            persistence,
        }
    }

    /// The loaded configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The live cart.
    pub fn cart(&self) -> &CartState {
        &self.cart
    }

    /// Database access.
    pub fn db(&self) -> &DbState {
        &self.db
    }

    /// Flushes the cart and closes the database.
    pub async fn shutdown(self) {
        info!("Shutting down client");
        self.persistence.shutdown().await;
        self.db.inner().close().await;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use platter_core::{CartLineItem, Money};

    #[tokio::test]
    async fn test_cart_survives_restart() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let client = Client::start_with_database(ClientConfig::default(), db.clone()).await;
        assert!(client.cart().snapshot().is_empty());
        client
            .cart()
            .add_to_cart(CartLineItem::new("P1", "Burger", Money::from_cents(1000), 2));
        let before = client.cart().snapshot();
        // Stop the worker without closing the shared in-memory pool.
        client.persistence.shutdown().await;

        let restarted = Client::start_with_database(ClientConfig::default(), db).await;
        assert_eq!(restarted.cart().snapshot(), before);
        restarted.shutdown().await;
    }

    #[tokio::test]
    async fn test_namespace_comes_from_config() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let config = ClientConfig {
            storage_namespace: "persist:cart:guest".to_string(),
            ..ClientConfig::default()
        };

        let client = Client::start_with_database(config, db.clone()).await;
        client
            .cart()
            .add_to_cart(CartLineItem::new("P1", "Burger", Money::from_cents(1000), 1));
        client.persistence.shutdown().await;

        assert!(db.carts().load().await.unwrap().is_none());
        assert_eq!(
            db.kv().keys("persist:cart:guest").await.unwrap(),
            vec!["current".to_string()]
        );
    }

    #[test]
    fn test_init_tracing_twice_is_harmless() {
        init_tracing();
        init_tracing();
    }
}
