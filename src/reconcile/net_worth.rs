//! Net worth as a fold over a user's transactions.

use crate::models::Transaction;

/// The sum of all income minus the sum of all expenses in `transactions`.
///
/// The order of `transactions` does not matter.
pub fn net_worth(transactions: &[Transaction]) -> f64 {
    transactions.iter().map(Transaction::signed_amount).sum()
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::models::{Transaction, TransactionType, UserID};

    use super::net_worth;

    fn transaction(amount: f64, transaction_type: TransactionType) -> Transaction {
        Transaction::build(UserID::new(1), amount, date!(2025 - 01 - 01), transaction_type)
            .finalise(0)
    }

    #[test]
    fn empty_history_is_zero() {
        assert_eq!(net_worth(&[]), 0.0);
    }

    #[test]
    fn income_adds_and_expense_subtracts() {
        let transactions = [
            transaction(100.0, TransactionType::Income),
            transaction(40.5, TransactionType::Expense),
            transaction(0.25, TransactionType::Income),
        ];

        assert_eq!(net_worth(&transactions), 59.75);
    }

    #[test]
    fn order_does_not_matter() {
        let mut transactions = vec![
            transaction(250.0, TransactionType::Income),
            transaction(12.5, TransactionType::Expense),
            transaction(300.0, TransactionType::Expense),
            transaction(75.25, TransactionType::Income),
        ];
        let want = net_worth(&transactions);

        transactions.reverse();
        assert_eq!(net_worth(&transactions), want);

        transactions.swap(0, 2);
        assert_eq!(net_worth(&transactions), want);
        assert_eq!(want, 12.75);
    }
}
