// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use pocketbook::{Category, Kind, LedgerStore};
use tempfile::TempDir;

/// Helper to create a store backed by a temporary database
pub async fn test_store() -> Result<(LedgerStore, TempDir)> {
    let temp_dir = TempDir::new()?;
    let store = LedgerStore::open(&db_path(&temp_dir)).await?;
    Ok((store, temp_dir))
}

/// Open a second store over the same database, as a restart would
pub async fn reopen(temp_dir: &TempDir) -> Result<LedgerStore> {
    Ok(LedgerStore::open(&db_path(temp_dir)).await?)
}

pub fn db_path(temp_dir: &TempDir) -> String {
    temp_dir.path().join("test.db").to_str().unwrap().to_string()
}

/// Helper to parse a date string into DateTime<Utc> at noon
pub fn parse_date(date_str: &str) -> DateTime<Utc> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
        .and_utc()
}

/// Test fixture: a month with salary and a few expenses
pub struct SampleMonth;

impl SampleMonth {
    pub async fn record(store: &mut LedgerStore) -> Result<()> {
        store
            .add_at("Salary", 5_000_000, Kind::Income, Category::Salary, parse_date("2024-03-01"))
            .await?;
        store
            .add_at("Groceries", 120_000, Kind::Expense, Category::Food, parse_date("2024-03-03"))
            .await?;
        store
            .add_at("Metro card", 50_000, Kind::Expense, Category::Transport, parse_date("2024-03-02"))
            .await?;
        store
            .add_at("Electricity", 230_000, Kind::Expense, Category::Bills, parse_date("2024-03-10"))
            .await?;
        store
            .add_at("Freelance", 800_000, Kind::Income, Category::Other, parse_date("2024-03-15"))
            .await?;
        Ok(())
    }
}
