//! The entry points that mutate a user's transactions and rebuild their derived figures.

use std::collections::HashMap;

use time::Date;

use crate::{
    Error,
    database_id::TransactionId,
    models::{
        MonthlyAggregate, MonthlySummary, Transaction, TransactionBuilder, User, UserID, UserName,
        YearMonth,
    },
    reconcile::{UserLocks, derive_monthly_aggregates, net_worth},
    stores::{AggregateStore, TransactionStore, UserStore},
    timezone::get_local_date,
};

/// Keeps each user's net worth and monthly aggregates consistent with their transactions.
///
/// The engine holds no derived state of its own. After every mutation it
/// reloads the owning user's full transaction history and rebuilds from it,
/// so deleting any historical transaction ripples through every later month.
#[derive(Debug)]
pub struct ReconciliationEngine<T, U, A> {
    transaction_store: T,
    user_store: U,
    aggregate_store: A,
    user_locks: UserLocks,
    local_timezone: String,
}

impl<T, U, A> ReconciliationEngine<T, U, A>
where
    T: TransactionStore,
    U: UserStore,
    A: AggregateStore,
{
    /// Create an engine over the given stores.
    ///
    /// `local_timezone` should be a valid, canonical timezone name, e.g.
    /// "Pacific/Auckland". It decides what "today" and the current month are.
    pub fn new(
        transaction_store: T,
        user_store: U,
        aggregate_store: A,
        local_timezone: &str,
    ) -> Self {
        Self {
            transaction_store,
            user_store,
            aggregate_store,
            user_locks: UserLocks::new(),
            local_timezone: local_timezone.to_owned(),
        }
    }

    /// The store holding the transaction log.
    pub fn transaction_store(&self) -> &T {
        &self.transaction_store
    }

    /// The store holding users and their net worth.
    pub fn user_store(&self) -> &U {
        &self.user_store
    }

    /// The store holding monthly aggregates.
    pub fn aggregate_store(&self) -> &A {
        &self.aggregate_store
    }

    /// Today's date in the engine's timezone.
    ///
    /// # Errors
    /// Returns [Error::InvalidTimezone] if the configured timezone is unknown.
    pub fn today(&self) -> Result<Date, Error> {
        get_local_date(&self.local_timezone)
    }

    /// Create a user and seed the row for the current month.
    pub fn register_user(&self, name: UserName) -> Result<User, Error> {
        let today = self.today()?;
        let user = self.user_store.create(name)?;
        tracing::info!("Created user {}", user.id);

        self.reconcile(user.id, today)?;

        self.user_store.get(user.id)
    }

    /// Delete a user together with their transactions and aggregates.
    pub fn delete_user(&self, user_id: UserID) -> Result<(), Error> {
        self.user_locks
            .with_lock(user_id, || self.user_store.delete(user_id))?;
        self.user_locks.forget(user_id);
        tracing::info!("Deleted user {user_id}");

        Ok(())
    }

    /// Store a new transaction and rebuild its owner's derived figures.
    ///
    /// # Errors
    /// Returns:
    /// - [Error::InvalidAmount] or [Error::FutureDate] if the transaction is invalid,
    /// - [Error::NotFound] if the owning user does not exist, in which case nothing is written,
    /// - or any error from the stores.
    pub fn on_transaction_created(
        &self,
        builder: TransactionBuilder,
    ) -> Result<Transaction, Error> {
        let today = self.today()?;
        self.record_transaction(builder, today)
    }

    /// Delete a transaction and rebuild its owner's derived figures.
    ///
    /// Returns the deleted transaction.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if there is no transaction with the ID
    /// `transaction_id`, or any error from the stores.
    pub fn on_transaction_deleted(
        &self,
        transaction_id: TransactionId,
    ) -> Result<Transaction, Error> {
        let today = self.today()?;
        self.remove_transaction(transaction_id, today)
    }

    /// [Self::on_transaction_created] with an explicit date for "today".
    pub fn record_transaction(
        &self,
        builder: TransactionBuilder,
        today: Date,
    ) -> Result<Transaction, Error> {
        let builder = builder.validate(today)?;
        let user_id = builder.user_id;

        self.user_locks.with_lock(user_id, || {
            self.user_store.get(user_id)?;

            let transaction = self.transaction_store.create(builder)?;
            tracing::info!(
                "Created transaction {} for user {user_id}: {} {} on {}",
                transaction.id,
                transaction.transaction_type,
                transaction.amount,
                transaction.date
            );

            self.reconcile_locked(user_id, today)?;

            Ok(transaction)
        })
    }

    /// [Self::on_transaction_deleted] with an explicit date for "today".
    pub fn remove_transaction(
        &self,
        transaction_id: TransactionId,
        today: Date,
    ) -> Result<Transaction, Error> {
        let transaction = self.transaction_store.get(transaction_id)?;
        let user_id = transaction.user_id;

        self.user_locks.with_lock(user_id, || {
            self.transaction_store.delete(transaction_id)?;
            tracing::info!("Deleted transaction {transaction_id} for user {user_id}");

            self.reconcile_locked(user_id, today)
        })?;

        Ok(transaction)
    }

    /// Rebuild a user's net worth and monthly aggregates from their transactions.
    ///
    /// `today` decides the current month, whose row is always created.
    /// Returns every aggregate for the user in chronological order.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if the user does not exist, in which case
    /// nothing is written. Store errors are returned as is; aggregates for
    /// months processed before the failure keep their new values and the
    /// next rebuild recomputes the rest.
    pub fn reconcile(&self, user_id: UserID, today: Date) -> Result<Vec<MonthlyAggregate>, Error> {
        self.user_locks
            .with_lock(user_id, || self.reconcile_locked(user_id, today))
    }

    /// The body of [Self::reconcile]. The caller must hold the user's lock.
    fn reconcile_locked(
        &self,
        user_id: UserID,
        today: Date,
    ) -> Result<Vec<MonthlyAggregate>, Error> {
        self.user_store.get(user_id)?;

        let transactions = self.transaction_store.get_by_user(user_id)?;
        self.user_store
            .set_net_worth(user_id, net_worth(&transactions))?;

        let existing = self.aggregate_store.get_by_user(user_id)?;
        let existing_by_month: HashMap<YearMonth, &MonthlyAggregate> = existing
            .iter()
            .map(|aggregate| (aggregate.year_month(), aggregate))
            .collect();

        let aggregates = derive_monthly_aggregates(
            user_id,
            &transactions,
            existing_by_month.keys().copied(),
            YearMonth::from(today),
        );

        let mut rows_written = 0;
        for aggregate in &aggregates {
            if existing_by_month.get(&aggregate.year_month()) != Some(&aggregate) {
                self.aggregate_store.upsert(aggregate)?;
                rows_written += 1;
            }
        }

        tracing::debug!(
            "Reconciled user {user_id}: {} transactions, {} months, {rows_written} rows written",
            transactions.len(),
            aggregates.len()
        );

        Ok(aggregates)
    }

    /// Get the current month's aggregate along with the previous month's and the user.
    ///
    /// If the current month has no row yet, e.g. because no transaction has
    /// been recorded since the month started, the user is reconciled first.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if the user does not exist, or
    /// [Error::InconsistentState] if the current month is still missing after
    /// reconciling.
    pub fn monthly_summary(&self, user_id: UserID, today: Date) -> Result<MonthlySummary, Error> {
        let current_month = YearMonth::from(today);

        let current = match self.aggregate_store.get(user_id, current_month)? {
            Some(current) => current,
            None => {
                self.reconcile(user_id, today)?;
                self.aggregate_store
                    .get(user_id, current_month)?
                    .ok_or_else(|| {
                        Error::InconsistentState(format!(
                            "no aggregate for user {user_id} in {current_month} after reconciling"
                        ))
                    })?
            }
        };

        let previous = self
            .aggregate_store
            .get(user_id, current_month.previous())?;
        let user = self.user_store.get(user_id)?;

        Ok(MonthlySummary {
            current,
            previous,
            user,
        })
    }
}
