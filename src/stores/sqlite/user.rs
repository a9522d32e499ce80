//! Implements a SQLite backed user store.
use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row};

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{User, UserID, UserName},
    stores::UserStore,
};

/// Stores users and their net worth in a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteUserStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteUserStore {
    /// Create a new user store.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl UserStore for SQLiteUserStore {
    /// Create and insert a new user into the database.
    ///
    /// # Errors
    ///
    /// Returns a [Error::DatabaseLockError] if the connection lock is poisoned
    /// or [Error::SqlError] if an SQL related error occurred.
    fn create(&self, name: UserName) -> Result<User, Error> {
        let user = self
            .connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?
            .prepare(
                "INSERT INTO user (name, net_worth) VALUES (?1, 0.0)
                 RETURNING id, name, net_worth",
            )?
            .query_row((name.as_ref(),), Self::map_row)?;

        Ok(user)
    }

    /// Get the user from the database that has the specified `id`.
    ///
    /// # Errors
    ///
    /// Returns a [Error::NotFound] error if there is no user with the specified
    /// ID or [Error::SqlError] if there are SQL related errors.
    fn get(&self, id: UserID) -> Result<User, Error> {
        let user = self
            .connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?
            .prepare("SELECT id, name, net_worth FROM user WHERE id = :id")?
            .query_row(&[(":id", &id.as_i64())], Self::map_row)?;

        Ok(user)
    }

    fn update_name(&self, id: UserID, name: UserName) -> Result<User, Error> {
        let user = self
            .connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?
            .prepare(
                "UPDATE user SET name = ?1 WHERE id = ?2
                 RETURNING id, name, net_worth",
            )?
            .query_row((name.as_ref(), id.as_i64()), Self::map_row)?;

        Ok(user)
    }

    fn set_net_worth(&self, id: UserID, net_worth: f64) -> Result<(), Error> {
        let rows_affected = self
            .connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?
            .execute(
                "UPDATE user SET net_worth = ?1 WHERE id = ?2",
                (net_worth, id.as_i64()),
            )?;

        match rows_affected {
            0 => Err(Error::NotFound),
            _ => Ok(()),
        }
    }

    fn delete(&self, id: UserID) -> Result<(), Error> {
        let rows_affected = self
            .connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?
            .execute("DELETE FROM user WHERE id = ?1", (id.as_i64(),))?;

        match rows_affected {
            0 => Err(Error::NotFound),
            _ => Ok(()),
        }
    }
}

impl CreateTable for SQLiteUserStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS user (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    name TEXT NOT NULL,
                    net_worth REAL NOT NULL DEFAULT 0.0
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteUserStore {
    type ReturnType = User;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let raw_id = row.get(offset)?;
        let raw_name: String = row.get(offset + 1)?;
        let net_worth = row.get(offset + 2)?;

        Ok(User {
            id: UserID::new(raw_id),
            name: UserName::new_unchecked(&raw_name),
            net_worth,
        })
    }
}

#[cfg(test)]
mod user_tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;

    use crate::{
        Error,
        db::initialize,
        models::{UserID, UserName},
    };

    use super::{SQLiteUserStore, UserStore};

    fn get_store() -> SQLiteUserStore {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        SQLiteUserStore::new(Arc::new(Mutex::new(conn)))
    }

    #[test]
    fn insert_user_succeeds() {
        let store = get_store();
        let name = UserName::new("Ada").unwrap();

        let inserted_user = store.create(name.clone()).unwrap();

        assert!(inserted_user.id.as_i64() > 0);
        assert_eq!(inserted_user.name, name);
        assert_eq!(inserted_user.net_worth, 0.0);
    }

    #[test]
    fn get_user_fails_with_non_existent_id() {
        let store = get_store();

        assert_eq!(store.get(UserID::new(42)), Err(Error::NotFound));
    }

    #[test]
    fn get_user_succeeds_with_existing_id() {
        let store = get_store();
        let test_user = store.create(UserName::new("Ada").unwrap()).unwrap();

        let retrieved_user = store.get(test_user.id).unwrap();

        assert_eq!(retrieved_user, test_user);
    }

    #[test]
    fn update_name_changes_only_the_name() {
        let store = get_store();
        let user = store.create(UserName::new("Ada").unwrap()).unwrap();
        store.set_net_worth(user.id, 12.5).unwrap();

        let updated = store
            .update_name(user.id, UserName::new("Grace").unwrap())
            .unwrap();

        assert_eq!(updated.name.as_ref(), "Grace");
        assert_eq!(updated.net_worth, 12.5);
    }

    #[test]
    fn update_name_fails_with_non_existent_id() {
        let store = get_store();

        let result = store.update_name(UserID::new(42), UserName::new("Grace").unwrap());

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn set_net_worth_overwrites_value() {
        let store = get_store();
        let user = store.create(UserName::new("Ada").unwrap()).unwrap();

        store.set_net_worth(user.id, 100.0).unwrap();
        store.set_net_worth(user.id, -25.0).unwrap();

        assert_eq!(store.get(user.id).unwrap().net_worth, -25.0);
    }

    #[test]
    fn set_net_worth_fails_with_non_existent_id() {
        let store = get_store();

        assert_eq!(
            store.set_net_worth(UserID::new(42), 1.0),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn delete_removes_user() {
        let store = get_store();
        let user = store.create(UserName::new("Ada").unwrap()).unwrap();

        store.delete(user.id).unwrap();

        assert_eq!(store.get(user.id), Err(Error::NotFound));
        assert_eq!(store.delete(user.id), Err(Error::NotFound));
    }

    #[test]
    fn deleted_user_id_is_not_reused() {
        let store = get_store();
        let deleted = store.create(UserName::new("Ada").unwrap()).unwrap();
        store.delete(deleted.id).unwrap();

        let created = store.create(UserName::new("Grace").unwrap()).unwrap();

        assert!(
            created.id.as_i64() > deleted.id.as_i64(),
            "want a fresh ID after {}, got {}",
            deleted.id,
            created.id
        );
    }
}
