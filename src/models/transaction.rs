//! Defines the `Transaction` type, the event log that every derived figure is computed from.

use std::fmt::Display;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{Error, database_id::TransactionId, models::UserID};

/// Whether a transaction earned or spent money.
///
/// The type alone decides whether the amount is added to or subtracted from a
/// user's totals. Amounts are always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money coming in, e.g. salary.
    Income,
    /// Money going out, e.g. rent.
    Expense,
}

impl TransactionType {
    /// The name used for the type in the database and JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(FromSqlError::Other(
                format!("unknown transaction type \"{other}\"").into(),
            )),
        }
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// Transactions are never edited, only created and deleted.
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The user that owns the transaction.
    pub user_id: UserID,
    /// When the transaction happened.
    pub date: Date,
    /// The amount of money spent or earned, always greater than zero.
    pub amount: f64,
    /// A free text label, e.g. "Groceries".
    pub category: String,
    /// Who paid or was paid.
    pub recipient: String,
    /// Whether the money was earned or spent.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(
        user_id: UserID,
        amount: f64,
        date: Date,
        transaction_type: TransactionType,
    ) -> TransactionBuilder {
        TransactionBuilder {
            user_id,
            amount,
            date,
            category: String::new(),
            recipient: String::new(),
            transaction_type,
        }
    }

    /// The amount with the sign implied by the transaction type: positive for
    /// income and negative for expenses.
    pub fn signed_amount(&self) -> f64 {
        match self.transaction_type {
            TransactionType::Income => self.amount,
            TransactionType::Expense => -self.amount,
        }
    }
}

/// A builder for creating [Transaction] instances.
///
/// # Examples
///
/// ```ignore
/// use time::macros::date;
///
/// let builder = Transaction::build(user_id, 45.99, date!(2025 - 01 - 15), TransactionType::Expense)
///     .category("Coffee")
///     .recipient("Starbucks");
/// ```
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// The user that owns the transaction.
    pub user_id: UserID,
    /// The amount of money, must be greater than zero.
    pub amount: f64,
    /// The date when the transaction occurred, must not be in the future.
    pub date: Date,
    /// A free text label, e.g. "Groceries".
    pub category: String,
    /// Who paid or was paid.
    pub recipient: String,
    /// Whether the money was earned or spent.
    pub transaction_type: TransactionType,
}

impl TransactionBuilder {
    /// Set the category for the transaction.
    pub fn category(mut self, category: &str) -> Self {
        category.clone_into(&mut self.category);
        self
    }

    /// Set the recipient for the transaction.
    pub fn recipient(mut self, recipient: &str) -> Self {
        recipient.clone_into(&mut self.recipient);
        self
    }

    /// Check that the transaction can be stored.
    ///
    /// # Errors
    /// Returns:
    /// - [Error::InvalidAmount] if the amount is not a finite number greater than zero,
    /// - or [Error::FutureDate] if the date is later than `today`.
    pub fn validate(self, today: Date) -> Result<Self, Error> {
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(Error::InvalidAmount(self.amount));
        }

        if self.date > today {
            return Err(Error::FutureDate(self.date));
        }

        Ok(self)
    }

    /// Create the transaction with the ID assigned by a store.
    pub fn finalise(self, id: TransactionId) -> Transaction {
        Transaction {
            id,
            user_id: self.user_id,
            date: self.date,
            amount: self.amount,
            category: self.category,
            recipient: self.recipient,
            transaction_type: self.transaction_type,
        }
    }
}
