//! # State Module
//!
//! Long-lived state owned by the client.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────────┐  ┌──────────────────┐          │
//! │  │   DbState    │  │    CartState     │  │   ClientConfig   │          │
//! │  │              │  │                  │  │                  │          │
//! │  │  Database    │  │  watch::Sender<  │  │  tax_rate_bps    │          │
//! │  │  (SQLite     │  │    Cart          │  │  currency        │          │
//! │  │   pool)      │  │  >               │  │  database_path   │          │
//! │  └──────┬───────┘  └────────┬─────────┘  └──────────────────┘          │
//! │         │                   │ subscribe()                               │
//! │         │                   ▼                                           │
//! │         │          ┌──────────────────┐                                 │
//! │         └─────────►│PersistenceWorker │  saves after each change        │
//! │                    └──────────────────┘                                 │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • DbState: Database has internal connection pool (thread-safe)        │
//! │  • CartState: every mutation runs inside the watch sender's lock       │
//! │  • ClientConfig: read-only after initialization                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cart;
mod config;
mod db;
mod persist;

pub use cart::CartState;
pub use config::{ClientConfig, ConfigError, ConfigResult};
pub use db::DbState;
pub use persist::{rehydrate, PersistenceHandle, PersistenceWorker};
