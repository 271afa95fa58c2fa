//! # Database State
//!
//! Wraps the database handle together with the cart repository the client
//! writes to.

use platter_db::{CartRepository, Database};

/// Database handle plus the configured cart snapshot repository.
#[derive(Debug, Clone)]
pub struct DbState {
    db: Database,
    carts: CartRepository,
}

impl DbState {
    /// Creates a DbState writing cart snapshots under `namespace`.
    pub fn new(db: Database, namespace: &str) -> Self {
        let carts = db.carts().with_namespace(namespace);
        DbState { db, carts }
    }

    /// Returns a reference to the inner Database.
    pub fn inner(&self) -> &Database {
        &self.db
    }

    /// Cart snapshot repository for the configured namespace.
    pub fn carts(&self) -> &CartRepository {
        &self.carts
    }
}
