//! # Repository Module
//!
//! Storage repositories for the Platter client.
//!
//! ## Layering
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CartState persistence worker                                          │
//! │       │  db.carts().save(&cart)                                        │
//! │       ▼                                                                 │
//! │  CartRepository      ← snapshot envelope, version check, repair        │
//! │       │  kv.put("persist:cart", "current", json)                       │
//! │       ▼                                                                 │
//! │  KvRepository        ← namespaced upsert / get / delete / keys         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite kv_store table                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`KvRepository`](kv::KvRepository) - Raw namespaced key-value access
//! - [`CartRepository`](cart::CartRepository) - Cart snapshot save/load/clear

pub mod cart;
pub mod kv;
