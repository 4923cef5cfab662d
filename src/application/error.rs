use thiserror::Error;

use crate::domain::{TransactionId, ValidationError};

#[derive(Error, Debug)]
pub enum LedgerError {
    /// Input rejected before anything was changed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The in-memory change could not be written out and was rolled back.
    #[error("Failed to save transactions: {0:#}")]
    PersistenceWrite(anyhow::Error),

    /// The highest stored id leaves no room for another one.
    #[error("No transaction id available after {0}")]
    IdsExhausted(TransactionId),

    #[error("Storage error: {0:#}")]
    Storage(#[from] anyhow::Error),
}

impl LedgerError {
    pub fn is_validation(&self) -> bool {
        matches!(self, LedgerError::Validation(_))
    }
}
