//! Implements a SQLite backed store for monthly aggregates.
use std::sync::{Arc, Mutex};

use rusqlite::{Connection, OptionalExtension, Row};

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{MonthlyAggregate, UserID, YearMonth},
    stores::AggregateStore,
};

/// Create, overwrite and retrieve monthly aggregates.
#[derive(Debug, Clone)]
pub struct SQLiteAggregateStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteAggregateStore {
    /// Create a new store from the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl CreateTable for SQLiteAggregateStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS monthly_aggregate (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL,
                year INTEGER NOT NULL,
                month INTEGER NOT NULL CHECK(month BETWEEN 1 AND 12),
                total_income REAL NOT NULL,
                total_expense REAL NOT NULL,
                total_savings REAL NOT NULL,
                net_worth_snapshot REAL NOT NULL,
                UNIQUE(user_id, year, month),
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
            )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteAggregateStore {
    type ReturnType = MonthlyAggregate;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let raw_user_id = row.get(offset)?;

        Ok(MonthlyAggregate {
            user_id: UserID::new(raw_user_id),
            year: row.get(offset + 1)?,
            month: row.get(offset + 2)?,
            total_income: row.get(offset + 3)?,
            total_expense: row.get(offset + 4)?,
            total_savings: row.get(offset + 5)?,
            net_worth_snapshot: row.get(offset + 6)?,
        })
    }
}

impl AggregateStore for SQLiteAggregateStore {
    fn get(
        &self,
        user_id: UserID,
        year_month: YearMonth,
    ) -> Result<Option<MonthlyAggregate>, Error> {
        let aggregate = self
            .connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?
            .prepare(
                "SELECT user_id, year, month, total_income, total_expense, total_savings, net_worth_snapshot
                 FROM monthly_aggregate
                 WHERE user_id = ?1 AND year = ?2 AND month = ?3",
            )?
            .query_row(
                (user_id.as_i64(), year_month.year, year_month.month),
                Self::map_row,
            )
            .optional()?;

        Ok(aggregate)
    }

    fn get_by_user(&self, user_id: UserID) -> Result<Vec<MonthlyAggregate>, Error> {
        self.connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?
            .prepare(
                "SELECT user_id, year, month, total_income, total_expense, total_savings, net_worth_snapshot
                 FROM monthly_aggregate
                 WHERE user_id = :user_id
                 ORDER BY year ASC, month ASC",
            )?
            .query_map(&[(":user_id", &user_id.as_i64())], Self::map_row)?
            .map(|maybe_aggregate| maybe_aggregate.map_err(|error| error.into()))
            .collect()
    }

    /// Insert the aggregate or overwrite the four derived fields of the
    /// existing row for the same user and month.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if the aggregate's user does not exist, or
    /// [Error::SqlError] if there is some other SQL error.
    fn upsert(&self, aggregate: &MonthlyAggregate) -> Result<(), Error> {
        self.connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?
            .execute(
                "INSERT INTO monthly_aggregate
                    (user_id, year, month, total_income, total_expense, total_savings, net_worth_snapshot)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 ON CONFLICT(user_id, year, month) DO UPDATE SET
                    total_income = excluded.total_income,
                    total_expense = excluded.total_expense,
                    total_savings = excluded.total_savings,
                    net_worth_snapshot = excluded.net_worth_snapshot",
                (
                    aggregate.user_id.as_i64(),
                    aggregate.year,
                    aggregate.month,
                    aggregate.total_income,
                    aggregate.total_expense,
                    aggregate.total_savings,
                    aggregate.net_worth_snapshot,
                ),
            )
            .map_err(|error| match error {
                rusqlite::Error::SqliteFailure(
                    rusqlite::ffi::Error {
                        code: _,
                        extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                    },
                    _,
                ) => Error::NotFound,
                error => error.into(),
            })?;

        Ok(())
    }
}

#[cfg(test)]
mod sqlite_aggregate_store_tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;

    use crate::{
        Error,
        db::initialize,
        models::{MonthlyAggregate, User, UserID, UserName, YearMonth},
        stores::{AggregateStore, UserStore, sqlite::SQLiteUserStore},
    };

    use super::SQLiteAggregateStore;

    fn get_test_store() -> (SQLiteAggregateStore, User) {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let connection = Arc::new(Mutex::new(connection));
        let user = SQLiteUserStore::new(connection.clone())
            .create(UserName::new("Test").unwrap())
            .unwrap();

        (SQLiteAggregateStore::new(connection), user)
    }

    #[test]
    fn get_returns_none_for_missing_month() {
        let (store, user) = get_test_store();

        assert_eq!(store.get(user.id, YearMonth::new(2025, 5)), Ok(None));
    }

    #[test]
    fn can_insert_aggregate() {
        let (store, user) = get_test_store();
        let want = MonthlyAggregate::new(user.id, YearMonth::new(2025, 5), 100.0, 40.0);

        store.upsert(&want).unwrap();

        assert_eq!(store.get(user.id, YearMonth::new(2025, 5)), Ok(Some(want)));
    }

    #[test]
    fn upsert_overwrites_existing_month() {
        let (store, user) = get_test_store();
        let month = YearMonth::new(2025, 5);
        store
            .upsert(&MonthlyAggregate::new(user.id, month, 100.0, 40.0))
            .unwrap();
        let want = MonthlyAggregate::new(user.id, month, 10.0, 70.0);

        store.upsert(&want).unwrap();

        let all = store.get_by_user(user.id).unwrap();
        assert_eq!(all, vec![want], "want one overwritten row, got {all:?}");
    }

    #[test]
    fn get_by_user_is_chronological() {
        let (store, user) = get_test_store();
        let months = [
            YearMonth::new(2025, 2),
            YearMonth::new(2024, 12),
            YearMonth::new(2025, 1),
        ];
        for month in months {
            store
                .upsert(&MonthlyAggregate::empty(user.id, month))
                .unwrap();
        }

        let got: Vec<_> = store
            .get_by_user(user.id)
            .unwrap()
            .iter()
            .map(MonthlyAggregate::year_month)
            .collect();

        assert_eq!(
            got,
            vec![
                YearMonth::new(2024, 12),
                YearMonth::new(2025, 1),
                YearMonth::new(2025, 2),
            ]
        );
    }

    #[test]
    fn upsert_fails_for_missing_user() {
        let (store, _) = get_test_store();

        let result = store.upsert(&MonthlyAggregate::empty(
            UserID::new(999),
            YearMonth::new(2025, 1),
        ));

        assert_eq!(result, Err(Error::NotFound));
    }
}
