use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::application::LedgerView;
use crate::domain::{Totals, Transaction, display_category, format_cents};

/// Ledger snapshot for JSON export. `transactions` can be fed back to import.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub totals: Totals,
    pub transactions: Vec<Transaction>,
}

/// Writes a ledger view out in interchange formats.
pub struct Exporter<'a> {
    view: &'a LedgerView,
}

impl<'a> Exporter<'a> {
    pub fn new(view: &'a LedgerView) -> Self {
        Self { view }
    }

    /// Export the listed transactions as CSV, newest first.
    pub fn export_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record([
            "id",
            "timestamp",
            "kind",
            "category",
            "category_label",
            "description",
            "amount",
        ])?;

        for tx in &self.view.transactions {
            csv_writer.write_record([
                tx.id().to_string(),
                tx.timestamp().to_rfc3339(),
                tx.kind().to_string(),
                tx.category().to_string(),
                display_category(tx.category()),
                tx.description().to_string(),
                format_cents(tx.amount()),
            ])?;
        }

        csv_writer.flush()?;
        Ok(self.view.transactions.len())
    }

    /// Export totals and the listed transactions as a pretty-printed JSON snapshot.
    pub fn export_json<W: Write>(&self, mut writer: W) -> Result<LedgerSnapshot> {
        let snapshot = LedgerSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            totals: self.view.totals,
            transactions: self.view.transactions.clone(),
        };

        serde_json::to_writer_pretty(&mut writer, &snapshot)?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::domain::{Category, Kind, TransactionFilter, filtered_view, totals};

    fn view() -> LedgerView {
        let at = |h| Utc.with_ymd_and_hms(2024, 2, 1, h, 0, 0).unwrap();
        let transactions = vec![
            Transaction::new(1, "Salary", 5_000_000, Kind::Income, Category::Salary, at(9)).unwrap(),
            Transaction::new(2, "Lunch, office", 25_050, Kind::Expense, Category::Food, at(13))
                .unwrap(),
        ];
        let filter = TransactionFilter::default();
        LedgerView {
            totals: totals(&transactions),
            transactions: filtered_view(&transactions, &filter),
            filter,
        }
    }

    #[test]
    fn test_export_csv() {
        let view = view();
        let mut out = Vec::new();
        let count = Exporter::new(&view).export_csv(&mut out).unwrap();
        assert_eq!(count, 2);

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "id,timestamp,kind,category,category_label,description,amount"
        );
        assert_eq!(
            lines[1],
            "2,2024-02-01T13:00:00+00:00,expense,food,Food & Dining,\"Lunch, office\",250.50"
        );
        assert!(lines[2].starts_with("1,"));
    }

    #[test]
    fn test_export_json_snapshot() {
        let view = view();
        let mut out = Vec::new();
        let snapshot = Exporter::new(&view).export_json(&mut out).unwrap();
        assert_eq!(snapshot.totals.balance, 5_000_000 - 25_050);

        let parsed: LedgerSnapshot = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed.transactions, view.transactions);
        assert_eq!(parsed.totals, view.totals);
    }
}
