//! Durable key-value substrate backing the TTL cache.

use anyhow::Result;
use sqlx::{migrate::MigrateDatabase, Row, Sqlite, SqlitePool};
use std::sync::Arc;

// Cache database kept next to the app; safe to delete at any time.
const CACHE_DB_URL: &str = "sqlite:ledger_cache.db";

/// SQLite-backed key-value store. Values are opaque strings; expiry and
/// serialization live one layer up in [`crate::cache::TtlCache`].
#[derive(Clone)]
pub struct CacheStore {
    pool: Arc<SqlitePool>,
}

impl CacheStore {
    /// Open (and create if needed) the store at the given sqlite URL.
    pub async fn open(url: &str) -> Result<Self> {
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            Sqlite::create_database(url).await?;
        }

        let pool = SqlitePool::connect(url).await?;
        Self::setup_schema(&pool).await?;

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// Open the standard on-disk cache store.
    pub async fn open_default() -> Result<Self> {
        Self::open(CACHE_DB_URL).await
    }

    /// Open a uniquely named in-memory store, one per test.
    #[cfg(test)]
    pub async fn open_test() -> Result<Self> {
        let test_id = uuid::Uuid::new_v4().to_string();
        let url = format!("file:cachedb_{}?mode=memory&cache=shared", test_id);
        Self::open(&url).await
    }

    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS cache_entries (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Store an entry, overwriting any existing value for the same key.
    pub async fn put(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query("INSERT OR REPLACE INTO cache_entries (key, value) VALUES (?, ?)")
            .bind(key)
            .bind(value)
            .execute(&*self.pool)
            .await?;
        Ok(())
    }

    /// Retrieve an entry by key.
    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        let row = sqlx::query("SELECT value FROM cache_entries WHERE key = ?")
            .bind(key)
            .fetch_optional(&*self.pool)
            .await?;

        Ok(row.map(|r| r.get("value")))
    }

    /// Delete an entry; returns whether a row was removed.
    pub async fn delete(&self, key: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM cache_entries WHERE key = ?")
            .bind(key)
            .execute(&*self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove every entry in the store.
    pub async fn clear(&self) -> Result<()> {
        sqlx::query("DELETE FROM cache_entries")
            .execute(&*self.pool)
            .await?;
        Ok(())
    }

    /// List all stored keys.
    pub async fn keys(&self) -> Result<Vec<String>> {
        let rows = sqlx::query("SELECT key FROM cache_entries")
            .fetch_all(&*self.pool)
            .await?;
        Ok(rows.iter().map(|row| row.get("key")).collect())
    }
}
