use std::collections::HashSet;
use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::domain::{
    Category, Cents, Kind, Transaction, TransactionFilter, TransactionId, filtered_view, totals,
};
use crate::storage::Repository;

use super::{LedgerError, LedgerView, Removal};

/// Key under which the transaction list is persisted.
pub const DEFAULT_STORAGE_KEY: &str = "transactions";

/// Outcome of merging externally supplied transactions into the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MergeOutcome {
    pub imported: usize,
    pub skipped: usize,
}

/// Owner of the ledger. Holds the ordered transaction list in memory and
/// writes the whole list back to storage after every change.
///
/// Mutations take `&mut self`, so a store has exactly one writer at a time.
pub struct LedgerStore {
    repo: Repository,
    key: String,
    transactions: Vec<Transaction>,
}

impl LedgerStore {
    /// Open (or create) the ledger database at the given path and load it.
    pub async fn open(database_path: impl AsRef<Path>) -> Result<Self, LedgerError> {
        let repo = Repository::init_file(database_path).await?;
        Ok(Self::with_repository(repo, DEFAULT_STORAGE_KEY).await)
    }

    /// Build a store over an initialized repository, loading whatever is
    /// stored under `key`.
    pub async fn with_repository(repo: Repository, key: impl Into<String>) -> Self {
        let mut store = Self {
            repo,
            key: key.into(),
            transactions: Vec::new(),
        };
        store.transactions = store.load().await;
        store
    }

    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    // ========================
    // Read access
    // ========================

    /// Transactions in insertion order.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn get(&self, id: TransactionId) -> Option<&Transaction> {
        self.transactions.iter().find(|tx| tx.id() == id)
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Totals over the whole ledger plus the filtered listing, newest first.
    pub fn view(&self, filter: &TransactionFilter) -> LedgerView {
        LedgerView {
            totals: totals(&self.transactions),
            transactions: filtered_view(&self.transactions, filter),
            filter: filter.clone(),
        }
    }

    // ========================
    // Persistence
    // ========================

    /// Read the persisted transactions. Missing, unreadable or malformed
    /// state yields an empty list; this never fails.
    pub async fn load(&self) -> Vec<Transaction> {
        let raw = match self.repo.get(&self.key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key = %self.key, "No stored transactions, starting empty");
                return Vec::new();
            }
            Err(err) => {
                let error = format!("{err:#}");
                warn!(key = %self.key, %error, "Could not read stored transactions, starting empty");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<Transaction>>(&raw) {
            Ok(transactions) => {
                let transactions = dedup_ids(transactions);
                debug!(key = %self.key, count = transactions.len(), "Loaded transactions");
                transactions
            }
            Err(err) => {
                warn!(key = %self.key, error = %err, "Stored transactions are malformed, starting empty");
                Vec::new()
            }
        }
    }

    /// Replace the in-memory list with the persisted one. Returns the new size.
    pub async fn reload(&mut self) -> usize {
        self.transactions = self.load().await;
        self.transactions.len()
    }

    /// Write the full ordered list to storage.
    pub async fn save(&self) -> Result<(), LedgerError> {
        let json = serde_json::to_string(&self.transactions)
            .map_err(|err| LedgerError::PersistenceWrite(err.into()))?;
        self.repo
            .put(&self.key, &json)
            .await
            .map_err(LedgerError::PersistenceWrite)
    }

    // ========================
    // Mutations
    // ========================

    /// Record a new transaction stamped with the current time.
    pub async fn add(
        &mut self,
        description: &str,
        amount: Cents,
        kind: Kind,
        category: Category,
    ) -> Result<Transaction, LedgerError> {
        self.add_at(description, amount, kind, category, Utc::now())
            .await
    }

    /// Record a new transaction with an explicit creation time.
    pub async fn add_at(
        &mut self,
        description: &str,
        amount: Cents,
        kind: Kind,
        category: Category,
        timestamp: DateTime<Utc>,
    ) -> Result<Transaction, LedgerError> {
        let id = self.next_id(timestamp)?;
        let transaction = Transaction::new(id, description, amount, kind, category, timestamp)?;

        self.transactions.push(transaction.clone());
        if let Err(err) = self.save().await {
            self.transactions.pop();
            return Err(err);
        }

        debug!(
            id,
            kind = %transaction.kind(),
            category = %transaction.category(),
            amount = transaction.amount(),
            "Added transaction"
        );
        Ok(transaction)
    }

    /// Remove the transaction with `id`. Absent ids are not an error.
    pub async fn delete(&mut self, id: TransactionId) -> Result<Option<Transaction>, LedgerError> {
        let position = self.transactions.iter().position(|tx| tx.id() == id);
        let removed = position.map(|index| self.transactions.remove(index));

        if let Err(err) = self.save().await {
            if let (Some(index), Some(tx)) = (position, removed) {
                self.transactions.insert(index, tx);
            }
            return Err(err);
        }

        match &removed {
            Some(_) => debug!(id, "Deleted transaction"),
            None => debug!(id, "Delete requested for unknown transaction"),
        }
        Ok(removed)
    }

    /// Remove every transaction. Returns how many were removed.
    pub async fn clear(&mut self) -> Result<usize, LedgerError> {
        let previous = std::mem::take(&mut self.transactions);

        if let Err(err) = self.save().await {
            self.transactions = previous;
            return Err(err);
        }

        info!(count = previous.len(), "Cleared all transactions");
        Ok(previous.len())
    }

    // ========================
    // Confirmation handshake
    // ========================

    /// Describe the deletion of `id` for confirmation. `None` if no such transaction.
    pub fn plan_delete(&self, id: TransactionId) -> Option<Removal> {
        self.get(id).cloned().map(Removal::One)
    }

    /// Describe clearing the ledger for confirmation.
    pub fn plan_clear(&self) -> Removal {
        Removal::All {
            count: self.transactions.len(),
        }
    }

    /// Carry out a confirmed removal. Returns the number of transactions removed.
    pub async fn apply(&mut self, removal: Removal) -> Result<usize, LedgerError> {
        match removal {
            Removal::One(tx) => Ok(self.delete(tx.id()).await?.map_or(0, |_| 1)),
            Removal::All { .. } => self.clear().await,
        }
    }

    // ========================
    // Import
    // ========================

    /// Append transactions built elsewhere, skipping ids already present.
    /// Writes once at the end; nothing is written on a dry run.
    pub async fn merge(
        &mut self,
        incoming: Vec<Transaction>,
        dry_run: bool,
    ) -> Result<MergeOutcome, LedgerError> {
        let mut seen: HashSet<TransactionId> = self.transactions.iter().map(Transaction::id).collect();
        let original_len = self.transactions.len();
        let mut outcome = MergeOutcome::default();

        for tx in incoming {
            if seen.insert(tx.id()) {
                self.transactions.push(tx);
                outcome.imported += 1;
            } else {
                outcome.skipped += 1;
            }
        }

        if dry_run || outcome.imported == 0 {
            self.transactions.truncate(original_len);
            return Ok(outcome);
        }

        if let Err(err) = self.save().await {
            self.transactions.truncate(original_len);
            return Err(err);
        }

        info!(
            imported = outcome.imported,
            skipped = outcome.skipped,
            "Merged transactions"
        );
        Ok(outcome)
    }

    /// Next id: the creation time in milliseconds, bumped past the highest
    /// existing id so rapid adds never collide.
    fn next_id(&self, timestamp: DateTime<Utc>) -> Result<TransactionId, LedgerError> {
        let candidate = timestamp.timestamp_millis();
        match self.transactions.iter().map(Transaction::id).max() {
            Some(highest) if highest >= candidate => highest
                .checked_add(1)
                .ok_or(LedgerError::IdsExhausted(highest)),
            _ => Ok(candidate),
        }
    }
}

/// Keep the first occurrence of each id.
fn dedup_ids(transactions: Vec<Transaction>) -> Vec<Transaction> {
    let total = transactions.len();
    let mut seen = HashSet::with_capacity(total);
    let unique: Vec<Transaction> = transactions
        .into_iter()
        .filter(|tx| seen.insert(tx.id()))
        .collect();

    if unique.len() != total {
        warn!(
            dropped = total - unique.len(),
            "Stored transactions contained duplicate ids"
        );
    }
    unique
}
