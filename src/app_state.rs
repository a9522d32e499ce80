//! Implements a struct that holds the state of the REST server.

use std::sync::Arc;

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::{
    Error,
    stores::sqlite::{SQLiteEngine, create_engine},
};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The engine that owns the stores and keeps derived figures consistent.
    pub engine: Arc<SQLiteEngine>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "Pacific/Auckland".
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(db_connection: Connection, local_timezone: &str) -> Result<Self, Error> {
        let engine = create_engine(db_connection, local_timezone)?;

        Ok(Self {
            engine: Arc::new(engine),
        })
    }
}

impl FromRef<AppState> for Arc<SQLiteEngine> {
    fn from_ref(state: &AppState) -> Self {
        state.engine.clone()
    }
}

/// Run `f` against the engine on tokio's blocking thread pool.
///
/// Engine calls wait on per-user and database `std::sync::Mutex`es for as
/// long as another request's rebuild takes, so they must not run on an
/// async worker thread.
///
/// # Errors
/// Returns [Error::BlockingTaskFailed] if the task panicked, otherwise
/// whatever `f` returns.
pub async fn run_blocking<T, F>(engine: Arc<SQLiteEngine>, f: F) -> Result<T, Error>
where
    F: FnOnce(&SQLiteEngine) -> Result<T, Error> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || f(&engine))
        .await
        .map_err(|error| Error::BlockingTaskFailed(error.to_string()))?
}
