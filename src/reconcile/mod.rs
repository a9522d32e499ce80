//! The monthly reconciliation engine.
//!
//! Every figure derived from a user's transactions (their net worth and one
//! [MonthlyAggregate](crate::models::MonthlyAggregate) per month) is rebuilt
//! from the user's complete transaction history after each mutation, instead
//! of being adjusted by deltas. A rebuild costs O(months + transactions) per
//! mutation: the per-month sums are computed in a single pass and then folded
//! forward month by month.
//!
//! The monthly fold carries each month's savings into the next month's income
//! pool ("overflow"), so a month depends on every month before it. For that
//! reason a user's rebuild runs start to finish under that user's lock, see
//! [UserLocks]. Rebuilds for different users run independently.

mod engine;
mod locks;
mod monthly;
mod net_worth;

pub use engine::ReconciliationEngine;
pub use locks::UserLocks;
pub use monthly::{MonthTotals, derive_monthly_aggregates, monthly_totals};
pub use net_worth::net_worth;
