use serde::{Deserialize, Serialize};

use super::{Cents, Kind, Transaction, TransactionFilter};

/// Income, expense and balance over a set of transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Totals {
    pub income: Cents,
    pub expenses: Cents,
    pub balance: Cents,
}

impl Totals {
    /// Whether the balance is zero or above.
    pub fn is_positive(&self) -> bool {
        self.balance >= 0
    }
}

/// Compute totals from a list of transactions.
/// Balance = sum of income - sum of expenses. Sums saturate at the `i64` limits.
pub fn totals(transactions: &[Transaction]) -> Totals {
    let (income, expenses) =
        transactions
            .iter()
            .fold((0 as Cents, 0 as Cents), |(income, expenses), tx| match tx.kind() {
                Kind::Income => (income.saturating_add(tx.amount()), expenses),
                Kind::Expense => (income, expenses.saturating_add(tx.amount())),
            });

    Totals {
        income,
        expenses,
        balance: income.saturating_sub(expenses),
    }
}

/// Keep the transactions accepted by `filter`, in input order.
pub fn filter(transactions: &[Transaction], filter: &TransactionFilter) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|tx| filter.matches(tx))
        .cloned()
        .collect()
}

/// Most recent first. The sort is stable, so equal timestamps keep their
/// relative order.
pub fn sorted_descending_by_date(mut transactions: Vec<Transaction>) -> Vec<Transaction> {
    transactions.sort_by(|a, b| b.timestamp().cmp(&a.timestamp()));
    transactions
}

/// Filter then sort, the order in which listings are built.
pub fn filtered_view(transactions: &[Transaction], by: &TransactionFilter) -> Vec<Transaction> {
    sorted_descending_by_date(filter(transactions, by))
}
