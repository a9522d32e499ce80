//! Per-month summaries of a user's transactions.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use time::Date;

use crate::models::{User, UserID};

/// A calendar month, ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    /// The calendar year, e.g. 2025.
    pub year: i32,
    /// The month of the year, from 1 (January) to 12 (December).
    pub month: u8,
}

impl YearMonth {
    /// Create a new year-month pair. `month` should be in the range 1..=12.
    pub fn new(year: i32, month: u8) -> Self {
        debug_assert!((1..=12).contains(&month), "month {month} is out of range");
        Self { year, month }
    }

    /// The month before this one.
    pub fn previous(self) -> Self {
        if self.month == 1 {
            Self::new(self.year - 1, 12)
        } else {
            Self::new(self.year, self.month - 1)
        }
    }

    /// The month after this one.
    pub fn next(self) -> Self {
        if self.month == 12 {
            Self::new(self.year + 1, 1)
        } else {
            Self::new(self.year, self.month + 1)
        }
    }
}

impl From<Date> for YearMonth {
    fn from(date: Date) -> Self {
        Self::new(date.year(), date.month().into())
    }
}

/// Formats as `YYYY-MM`, the same prefix SQLite uses for stored dates.
impl Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// The derived income, expense and savings figures for one user in one month.
///
/// Rows are never authoritative, they can always be rebuilt from the user's
/// transactions. At most one row exists per `(user_id, year, month)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyAggregate {
    /// The user the figures belong to.
    pub user_id: UserID,
    /// The calendar year.
    pub year: i32,
    /// The month of the year, from 1 to 12.
    pub month: u8,
    /// The income dated in this month plus the previous month's savings.
    pub total_income: f64,
    /// The expenses dated in this month.
    pub total_expense: f64,
    /// `total_income - total_expense`, negative when the month ran a deficit.
    pub total_savings: f64,
    /// The savings figure reported for this month.
    ///
    /// This is a per-month figure equal to `total_savings` and is distinct from
    /// [User::net_worth], which covers the user's whole history.
    pub net_worth_snapshot: f64,
}

impl MonthlyAggregate {
    /// Create an aggregate from the month's income pool and expenses.
    ///
    /// `total_income` must already include any overflow carried in from the
    /// previous month.
    pub fn new(
        user_id: UserID,
        year_month: YearMonth,
        total_income: f64,
        total_expense: f64,
    ) -> Self {
        let total_savings = total_income - total_expense;

        Self {
            user_id,
            year: year_month.year,
            month: year_month.month,
            total_income,
            total_expense,
            total_savings,
            net_worth_snapshot: total_savings,
        }
    }

    /// An aggregate with all totals set to zero.
    pub fn empty(user_id: UserID, year_month: YearMonth) -> Self {
        Self::new(user_id, year_month, 0.0, 0.0)
    }

    /// The month this aggregate covers.
    pub fn year_month(&self) -> YearMonth {
        YearMonth::new(self.year, self.month)
    }
}

/// The current month's aggregate together with the previous month's and the
/// user's details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    /// The aggregate for the current calendar month.
    pub current: MonthlyAggregate,
    /// The aggregate for the month before, if the user has one.
    pub previous: Option<MonthlyAggregate>,
    /// The user the aggregates belong to.
    pub user: User,
}
