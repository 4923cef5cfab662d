use serde::Serialize;

use crate::domain::{Totals, Transaction, TransactionFilter, TransactionId};

/// What the presentation layer renders after every change: totals over the
/// whole ledger and the filtered listing, newest first.
#[derive(Debug, Clone, Serialize)]
pub struct LedgerView {
    pub totals: Totals,
    pub transactions: Vec<Transaction>,
    #[serde(skip)]
    pub filter: TransactionFilter,
}

impl LedgerView {
    /// True when nothing matches the active filter.
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

/// A destructive operation awaiting the user's confirmation. Produced by
/// [`LedgerStore::plan_delete`](super::LedgerStore::plan_delete) and
/// [`LedgerStore::plan_clear`](super::LedgerStore::plan_clear); carried out
/// by [`LedgerStore::apply`](super::LedgerStore::apply).
#[must_use = "a removal does nothing until it is applied"]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Removal {
    One(Transaction),
    All { count: usize },
}

impl Removal {
    /// Question to put to the user before applying.
    pub fn prompt(&self) -> String {
        match self {
            Removal::One(tx) => format!(
                "Are you sure you want to delete this transaction? ({})",
                tx.description()
            ),
            Removal::All { .. } => {
                "Are you sure you want to delete ALL transactions? This cannot be undone."
                    .to_string()
            }
        }
    }

    /// Number of transactions that would be removed.
    pub fn count(&self) -> usize {
        match self {
            Removal::One(_) => 1,
            Removal::All { count } => *count,
        }
    }

    pub fn target(&self) -> Option<TransactionId> {
        match self {
            Removal::One(tx) => Some(tx.id()),
            Removal::All { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::{Category, Kind};

    #[test]
    fn test_removal_prompts() {
        let tx = Transaction::new(7, "Rent", 1500, Kind::Expense, Category::Bills, Utc::now())
            .unwrap();
        let one = Removal::One(tx);
        assert_eq!(one.count(), 1);
        assert_eq!(one.target(), Some(7));
        assert!(one.prompt().contains("Rent"));

        let all = Removal::All { count: 3 };
        assert_eq!(all.count(), 3);
        assert_eq!(all.target(), None);
        assert!(all.prompt().contains("ALL"));
    }
}
