use anyhow::{Context, Result};
use serde_json::Value;
use std::io::Read;

use crate::application::LedgerStore;
use crate::domain::Transaction;

/// Result of an import operation
#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    pub imported: usize,
    pub skipped: usize,
    pub errors: Vec<ImportError>,
}

/// A record that could not be imported
#[derive(Debug, Clone)]
pub struct ImportError {
    /// Zero-based position of the record in the input array
    pub index: usize,
    pub error: String,
}

/// Options for import operations
#[derive(Debug, Clone, Copy, Default)]
pub struct ImportOptions {
    pub dry_run: bool,
}

/// Parse a JSON document holding transactions: either a bare array (the
/// browser ledger's stored format) or an exported snapshot object with a
/// `transactions` array. Invalid records are reported, not fatal.
pub fn parse_transactions<R: Read>(reader: R) -> Result<(Vec<Transaction>, Vec<ImportError>)> {
    let document: Value = serde_json::from_reader(reader).context("Input is not valid JSON")?;

    let records = match document {
        Value::Array(records) => records,
        Value::Object(mut object) => match object.remove("transactions") {
            Some(Value::Array(records)) => records,
            _ => anyhow::bail!("Expected a 'transactions' array in the JSON object"),
        },
        Value::Null => Vec::new(),
        _ => anyhow::bail!("Expected a JSON array of transactions"),
    };

    let mut transactions = Vec::with_capacity(records.len());
    let mut errors = Vec::new();

    for (index, record) in records.into_iter().enumerate() {
        match serde_json::from_value::<Transaction>(record) {
            Ok(tx) => transactions.push(tx),
            Err(err) => errors.push(ImportError {
                index,
                error: err.to_string(),
            }),
        }
    }

    Ok((transactions, errors))
}

/// Loads transaction files into a ledger store
pub struct Importer<'a> {
    store: &'a mut LedgerStore,
}

impl<'a> Importer<'a> {
    pub fn new(store: &'a mut LedgerStore) -> Self {
        Self { store }
    }

    /// Import transactions from JSON. Records whose id is already in the
    /// ledger are skipped.
    pub async fn import_json<R: Read>(
        &mut self,
        reader: R,
        options: ImportOptions,
    ) -> Result<ImportResult> {
        let (transactions, errors) = parse_transactions(reader)?;
        let outcome = self.store.merge(transactions, options.dry_run).await?;

        Ok(ImportResult {
            imported: outcome.imported,
            skipped: outcome.skipped,
            errors,
        })
    }
}
