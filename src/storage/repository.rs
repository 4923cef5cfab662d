use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};

use super::MIGRATION_001_INITIAL;

/// Key-value persistence backed by a single SQLite table.
/// Each key holds one serialized document; writes replace it whole.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database URL (e.g. `sqlite:ledger.db` or `sqlite::memory:`).
    /// Creates the database file if it doesn't exist.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("Invalid database URL: {}", database_url))?;
        Self::connect_with(options).await
    }

    /// Connect to the SQLite database file at `path`, creating it if needed.
    pub async fn connect_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::connect_with(SqliteConnectOptions::new().filename(path)).await
    }

    async fn connect_with(options: SqliteConnectOptions) -> Result<Self> {
        // One writer; a single long-lived connection also keeps in-memory databases alive.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options.create_if_missing(true))
            .await
            .context("Failed to connect to database")?;

        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;

        Ok(())
    }

    /// Initialize a database (connect + migrate). Safe to call on an existing one.
    pub async fn init(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    /// Initialize the database file at `path` (connect + migrate).
    pub async fn init_file(path: impl AsRef<Path>) -> Result<Self> {
        let repo = Self::connect_file(path).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    /// Read the value stored under `key`.
    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        let row = sqlx::query("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("Failed to read key '{}'", key))?;

        Ok(row.map(|row| row.get("value")))
    }

    /// Store `value` under `key`, replacing any previous value.
    pub async fn put(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .with_context(|| format!("Failed to write key '{}'", key))?;

        Ok(())
    }

    /// Close the underlying pool, flushing pending work.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_repo() -> Repository {
        Repository::init("sqlite::memory:").await.unwrap()
    }

    #[tokio::test]
    async fn test_get_missing_key() {
        let repo = memory_repo().await;
        assert_eq!(repo.get("transactions").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_put_replaces_value() {
        let repo = memory_repo().await;
        repo.put("transactions", "[]").await.unwrap();
        repo.put("transactions", "[1]").await.unwrap();

        assert_eq!(
            repo.get("transactions").await.unwrap().as_deref(),
            Some("[1]")
        );
    }

    #[tokio::test]
    async fn test_file_database_persists() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("with space.db");

        let repo = Repository::init_file(&path).await.unwrap();
        repo.put("k", "v").await.unwrap();
        repo.close().await;

        let reopened = Repository::init_file(&path).await.unwrap();
        assert_eq!(reopened.get("k").await.unwrap().as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn test_migrate_is_idempotent() {
        let repo = memory_repo().await;
        repo.put("k", "v").await.unwrap();
        repo.migrate().await.unwrap();
        assert_eq!(repo.get("k").await.unwrap().as_deref(), Some("v"));
    }
}
