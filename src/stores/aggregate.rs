//! Defines the store for monthly aggregates.

use crate::{
    Error,
    models::{MonthlyAggregate, UserID, YearMonth},
};

/// Handles the persistence of [MonthlyAggregate] rows, keyed by user and month.
pub trait AggregateStore {
    /// Get the aggregate for `user_id` in `year_month`, if one exists.
    fn get(
        &self,
        user_id: UserID,
        year_month: YearMonth,
    ) -> Result<Option<MonthlyAggregate>, Error>;

    /// Get all of a user's aggregates, ordered chronologically.
    fn get_by_user(&self, user_id: UserID) -> Result<Vec<MonthlyAggregate>, Error>;

    /// Insert `aggregate`, or overwrite the existing row for the same user and month.
    fn upsert(&self, aggregate: &MonthlyAggregate) -> Result<(), Error>;
}
