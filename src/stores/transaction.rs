//! Defines the transaction store trait.

use crate::{
    Error,
    database_id::TransactionId,
    models::{Transaction, TransactionBuilder, UserID, YearMonth},
};

/// Handles the creation, retrieval and deletion of transactions.
pub trait TransactionStore {
    /// Create a new transaction in the store and return it with its assigned ID.
    fn create(&self, builder: TransactionBuilder) -> Result<Transaction, Error>;

    /// Retrieve a transaction from the store.
    fn get(&self, id: TransactionId) -> Result<Transaction, Error>;

    /// Delete a transaction from the store.
    ///
    /// Implementers should return [Error::DeleteMissingTransaction] if there
    /// is no transaction with the ID `id`.
    fn delete(&self, id: TransactionId) -> Result<(), Error>;

    /// Retrieve all of a user's transactions, ordered by date ascending.
    fn get_by_user(&self, user_id: UserID) -> Result<Vec<Transaction>, Error>;

    /// Retrieve a user's transactions dated within `year_month`, ordered by date ascending.
    fn get_by_user_month(
        &self,
        user_id: UserID,
        year_month: YearMonth,
    ) -> Result<Vec<Transaction>, Error>;
}
