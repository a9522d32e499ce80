//! Derives monthly aggregates from a user's transactions.

use std::{
    collections::{BTreeMap, BTreeSet},
    iter,
};

use crate::models::{MonthlyAggregate, Transaction, TransactionType, UserID, YearMonth};

/// The income and expenses dated within a single month.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct MonthTotals {
    /// The sum of income amounts.
    pub income: f64,
    /// The sum of expense amounts.
    pub expense: f64,
}

/// Sums income and expenses per month in a single pass over `transactions`.
pub fn monthly_totals(transactions: &[Transaction]) -> BTreeMap<YearMonth, MonthTotals> {
    let mut totals: BTreeMap<YearMonth, MonthTotals> = BTreeMap::new();

    for transaction in transactions {
        let month_totals = totals.entry(YearMonth::from(transaction.date)).or_default();

        match transaction.transaction_type {
            TransactionType::Income => month_totals.income += transaction.amount,
            TransactionType::Expense => month_totals.expense += transaction.amount,
        }
    }

    totals
}

/// Rebuild a user's monthly aggregates, carrying savings forward month to month.
///
/// The months covered are the union of `existing_months` (months that already
/// have a row and must keep one), every month with at least one transaction,
/// and `current_month`. They are processed in one chronological pass: each
/// month's income pool is its own income plus the previous month's savings,
/// which may be negative. A month without transactions passes the carried
/// savings through unchanged.
///
/// Transactions that belong to a user other than `user_id` are ignored.
///
/// Returns one aggregate per month in chronological order.
pub fn derive_monthly_aggregates(
    user_id: UserID,
    transactions: &[Transaction],
    existing_months: impl IntoIterator<Item = YearMonth>,
    current_month: YearMonth,
) -> Vec<MonthlyAggregate> {
    let own_transactions: Vec<Transaction> = transactions
        .iter()
        .filter(|transaction| transaction.user_id == user_id)
        .cloned()
        .collect();
    let totals = monthly_totals(&own_transactions);

    let months: BTreeSet<YearMonth> = existing_months
        .into_iter()
        .chain(totals.keys().copied())
        .chain(iter::once(current_month))
        .collect();

    let mut overflow = 0.0;

    months
        .into_iter()
        .map(|month| {
            let month_totals = totals.get(&month).copied().unwrap_or_default();
            let aggregate = MonthlyAggregate::new(
                user_id,
                month,
                month_totals.income + overflow,
                month_totals.expense,
            );
            overflow = aggregate.total_savings;

            aggregate
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use time::{Date, macros::date};

    use crate::models::{MonthlyAggregate, Transaction, TransactionType, UserID, YearMonth};

    use super::{MonthTotals, derive_monthly_aggregates, monthly_totals};

    const USER: UserID = UserID::new(1);
    const NO_ROWS: [YearMonth; 0] = [];

    fn income(amount: f64, date: Date) -> Transaction {
        Transaction::build(USER, amount, date, TransactionType::Income).finalise(0)
    }

    fn expense(amount: f64, date: Date) -> Transaction {
        Transaction::build(USER, amount, date, TransactionType::Expense).finalise(0)
    }

    fn savings(aggregates: &[MonthlyAggregate]) -> Vec<f64> {
        aggregates
            .iter()
            .map(|aggregate| aggregate.total_savings)
            .collect()
    }

    #[test]
    fn monthly_totals_groups_by_month() {
        let transactions = [
            income(100.0, date!(2025 - 01 - 01)),
            expense(30.0, date!(2025 - 01 - 31)),
            expense(5.0, date!(2025 - 01 - 15)),
            income(20.0, date!(2025 - 02 - 01)),
        ];

        let totals = monthly_totals(&transactions);

        assert_eq!(
            totals.get(&YearMonth::new(2025, 1)),
            Some(&MonthTotals {
                income: 100.0,
                expense: 35.0
            })
        );
        assert_eq!(
            totals.get(&YearMonth::new(2025, 2)),
            Some(&MonthTotals {
                income: 20.0,
                expense: 0.0
            })
        );
        assert_eq!(totals.len(), 2);
    }

    #[test]
    fn overflow_propagates_forward() {
        let transactions = [
            income(100.0, date!(2025 - 01 - 05)),
            expense(40.0, date!(2025 - 01 - 20)),
            income(100.0, date!(2025 - 02 - 05)),
            expense(200.0, date!(2025 - 02 - 20)),
            income(100.0, date!(2025 - 03 - 05)),
        ];

        let aggregates =
            derive_monthly_aggregates(USER, &transactions, NO_ROWS, YearMonth::new(2025, 3));

        // February's expenses exceed its income plus January's savings, and
        // March absorbs the deficit.
        assert_eq!(savings(&aggregates), vec![60.0, -40.0, 60.0]);
        assert_eq!(aggregates[1].total_income, 160.0);
        assert_eq!(aggregates[2].total_income, 60.0);
        assert_eq!(aggregates[2].total_expense, 0.0);
    }

    #[test]
    fn snapshot_equals_savings_for_every_month() {
        let transactions = [
            income(10.0, date!(2025 - 01 - 05)),
            expense(25.0, date!(2025 - 02 - 05)),
        ];

        let aggregates =
            derive_monthly_aggregates(USER, &transactions, NO_ROWS, YearMonth::new(2025, 2));

        for aggregate in aggregates {
            assert_eq!(aggregate.net_worth_snapshot, aggregate.total_savings);
        }
    }

    #[test]
    fn current_month_is_seeded_without_transactions() {
        let aggregates = derive_monthly_aggregates(USER, &[], NO_ROWS, YearMonth::new(2025, 6));

        assert_eq!(
            aggregates,
            vec![MonthlyAggregate::empty(USER, YearMonth::new(2025, 6))]
        );
    }

    #[test]
    fn existing_month_without_transactions_carries_overflow() {
        let transactions = [
            income(50.0, date!(2025 - 01 - 05)),
            expense(20.0, date!(2025 - 03 - 05)),
        ];

        let aggregates = derive_monthly_aggregates(
            USER,
            &transactions,
            [YearMonth::new(2025, 2)],
            YearMonth::new(2025, 3),
        );

        assert_eq!(aggregates.len(), 3);
        assert_eq!(aggregates[1].year_month(), YearMonth::new(2025, 2));
        assert_eq!(aggregates[1].total_income, 50.0);
        assert_eq!(aggregates[1].total_expense, 0.0);
        assert_eq!(savings(&aggregates), vec![50.0, 50.0, 30.0]);
    }

    #[test]
    fn new_month_between_existing_months_joins_the_chain() {
        // January and March already have rows, February only has a transaction.
        let transactions = [
            income(100.0, date!(2025 - 01 - 05)),
            expense(70.0, date!(2025 - 02 - 05)),
            income(10.0, date!(2025 - 03 - 05)),
        ];

        let aggregates = derive_monthly_aggregates(
            USER,
            &transactions,
            [YearMonth::new(2025, 1), YearMonth::new(2025, 3)],
            YearMonth::new(2025, 3),
        );

        assert_eq!(savings(&aggregates), vec![100.0, 30.0, 40.0]);
    }

    #[test]
    fn gaps_between_months_are_not_filled() {
        let transactions = [
            income(10.0, date!(2024 - 11 - 05)),
            income(10.0, date!(2025 - 02 - 05)),
        ];

        let aggregates =
            derive_monthly_aggregates(USER, &transactions, NO_ROWS, YearMonth::new(2025, 2));

        let months: Vec<_> = aggregates.iter().map(MonthlyAggregate::year_month).collect();
        assert_eq!(
            months,
            vec![YearMonth::new(2024, 11), YearMonth::new(2025, 2)]
        );
        assert_eq!(savings(&aggregates), vec![10.0, 20.0]);
    }

    #[test]
    fn ignores_other_users_transactions() {
        let other_user = UserID::new(2);
        let transactions = [
            income(10.0, date!(2025 - 01 - 05)),
            Transaction::build(other_user, 99.0, date!(2025 - 01 - 06), TransactionType::Income)
                .finalise(1),
        ];

        let aggregates =
            derive_monthly_aggregates(USER, &transactions, NO_ROWS, YearMonth::new(2025, 1));

        assert_eq!(savings(&aggregates), vec![10.0]);
    }

    #[test]
    fn is_deterministic() {
        let transactions = [
            income(0.1, date!(2025 - 01 - 05)),
            expense(0.2, date!(2025 - 01 - 06)),
            income(0.3, date!(2025 - 02 - 05)),
        ];

        let first = derive_monthly_aggregates(USER, &transactions, NO_ROWS, YearMonth::new(2025, 2));
        let second = derive_monthly_aggregates(USER, &transactions, NO_ROWS, YearMonth::new(2025, 2));

        assert_eq!(first, second);
    }
}
