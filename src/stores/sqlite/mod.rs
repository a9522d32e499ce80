//! Contains the SQLite implementations of the stores and a convenience
//! function for building a [ReconciliationEngine] on top of them.

mod aggregate;
mod transaction;
mod user;

pub use aggregate::SQLiteAggregateStore;
pub use transaction::SQLiteTransactionStore;
pub use user::SQLiteUserStore;

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{Error, db::initialize, reconcile::ReconciliationEngine};

/// An alias for a [ReconciliationEngine] that uses SQLite for every store.
pub type SQLiteEngine =
    ReconciliationEngine<SQLiteTransactionStore, SQLiteUserStore, SQLiteAggregateStore>;

/// Creates a [ReconciliationEngine] whose stores share the SQLite `db_connection`.
///
/// This function will modify the database by adding the tables for the domain
/// models to the database.
///
/// `local_timezone` should be a valid, canonical timezone name, e.g. "Pacific/Auckland".
///
/// # Errors
/// Returns an error if the database cannot be initialized.
pub fn create_engine(db_connection: Connection, local_timezone: &str) -> Result<SQLiteEngine, Error> {
    initialize(&db_connection)?;

    let connection = Arc::new(Mutex::new(db_connection));

    Ok(ReconciliationEngine::new(
        SQLiteTransactionStore::new(connection.clone()),
        SQLiteUserStore::new(connection.clone()),
        SQLiteAggregateStore::new(connection),
        local_timezone,
    ))
}
