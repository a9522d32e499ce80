//! This module defines the domain data types.

mod aggregate;
mod transaction;
mod user;

pub use aggregate::{MonthlyAggregate, MonthlySummary, YearMonth};
pub use transaction::{Transaction, TransactionBuilder, TransactionType};
pub use user::{User, UserID, UserName};
