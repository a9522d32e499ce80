//! Implements a SQLite backed transaction store.
use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row};

use crate::{
    Error,
    database_id::TransactionId,
    db::{CreateTable, MapRow},
    models::{Transaction, TransactionBuilder, UserID, YearMonth},
    stores::TransactionStore,
};

/// Stores transactions in a SQLite database.
///
/// Note that because a transaction depends on the [User](crate::models::User)
/// model, the user table must be set up in the database.
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransactionStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl TransactionStore for SQLiteTransactionStore {
    /// Create a new transaction in the database.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `user_id` does not refer to a valid user,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn create(&self, builder: TransactionBuilder) -> Result<Transaction, Error> {
        let connection = self
            .connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;

        let transaction = connection
            .prepare(
                "INSERT INTO \"transaction\" (user_id, date, amount, category, recipient, type)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 RETURNING id, user_id, date, amount, category, recipient, type",
            )?
            .query_row(
                (
                    builder.user_id.as_i64(),
                    builder.date,
                    builder.amount,
                    &builder.category,
                    &builder.recipient,
                    builder.transaction_type,
                ),
                Self::map_row,
            )
            .map_err(|error| match error {
                // The client tried to add a transaction for a non-existent user.
                rusqlite::Error::SqliteFailure(
                    rusqlite::ffi::Error {
                        code: _,
                        extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                    },
                    _,
                ) => Error::NotFound,
                error => error.into(),
            })?;

        Ok(transaction)
    }

    /// Retrieve a transaction in the database by its `id`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a valid transaction,
    /// - or [Error::SqlError] there is some other SQL error.
    fn get(&self, id: TransactionId) -> Result<Transaction, Error> {
        let transaction = self
            .connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?
            .prepare(
                "SELECT id, user_id, date, amount, category, recipient, type
                 FROM \"transaction\" WHERE id = :id",
            )?
            .query_row(&[(":id", &id)], Self::map_row)?;

        Ok(transaction)
    }

    fn delete(&self, id: TransactionId) -> Result<(), Error> {
        let rows_affected = self
            .connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?
            .execute(
                "DELETE FROM \"transaction\" WHERE id = :id",
                &[(":id", &id)],
            )?;

        match rows_affected {
            0 => Err(Error::DeleteMissingTransaction),
            _ => Ok(()),
        }
    }

    fn get_by_user(&self, user_id: UserID) -> Result<Vec<Transaction>, Error> {
        self.connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?
            .prepare(
                "SELECT id, user_id, date, amount, category, recipient, type
                 FROM \"transaction\" WHERE user_id = :user_id
                 ORDER BY date ASC, id ASC",
            )?
            .query_map(&[(":user_id", &user_id.as_i64())], Self::map_row)?
            .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
            .collect()
    }

    fn get_by_user_month(
        &self,
        user_id: UserID,
        year_month: YearMonth,
    ) -> Result<Vec<Transaction>, Error> {
        self.connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?
            .prepare(
                "SELECT id, user_id, date, amount, category, recipient, type
                 FROM \"transaction\"
                 WHERE user_id = ?1 AND strftime('%Y-%m', date) = ?2
                 ORDER BY date ASC, id ASC",
            )?
            .query_map((user_id.as_i64(), year_month.to_string()), Self::map_row)?
            .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
            .collect()
    }
}

impl CreateTable for SQLiteTransactionStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS \"transaction\" (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    user_id INTEGER NOT NULL,
                    date TEXT NOT NULL,
                    amount REAL NOT NULL CHECK(amount > 0),
                    category TEXT NOT NULL,
                    recipient TEXT NOT NULL,
                    type TEXT NOT NULL CHECK(type IN ('income', 'expense')),
                    FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                    )",
            (),
        )?;

        // Reconciliation always reads one user's transactions in date order.
        connection.execute(
            "CREATE INDEX IF NOT EXISTS idx_transaction_user_date ON \"transaction\"(user_id, date);",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteTransactionStore {
    type ReturnType = Transaction;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let id = row.get(offset)?;
        let raw_user_id = row.get(offset + 1)?;
        let date = row.get(offset + 2)?;
        let amount = row.get(offset + 3)?;
        let category = row.get(offset + 4)?;
        let recipient = row.get(offset + 5)?;
        let transaction_type = row.get(offset + 6)?;

        Ok(Transaction {
            id,
            user_id: UserID::new(raw_user_id),
            date,
            amount,
            category,
            recipient,
            transaction_type,
        })
    }
}
