use std::path::Path;

use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::OptionalExtension;
use tracing::debug;

use crate::error::StorageError;
use crate::storage::KeyValueStore;

pub type DbPool = r2d2::Pool<SqliteConnectionManager>;

/// Key-value medium backed by a single SQLite table.
#[derive(Clone)]
pub struct SqliteStorage {
    pool: DbPool,
}

impl SqliteStorage {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "opening sqlite storage");
        let manager = SqliteConnectionManager::file(path);
        Self::with_pool(r2d2::Pool::new(manager)?)
    }

    /// Private in-memory database. The pool is capped at one connection
    /// because every `:memory:` connection is a separate database.
    pub fn in_memory() -> Result<Self, StorageError> {
        let pool = r2d2::Pool::builder()
            .max_size(1)
            .build(SqliteConnectionManager::memory())?;
        Self::with_pool(pool)
    }

    pub fn with_pool(pool: DbPool) -> Result<Self, StorageError> {
        run_migrations(&pool)?;
        Ok(Self { pool })
    }
}

fn run_migrations(pool: &DbPool) -> Result<(), StorageError> {
    let conn = pool.get()?;

    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS kv (
            key         TEXT PRIMARY KEY,
            value       TEXT NOT NULL,
            updated_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );
        ",
    )?;

    Ok(())
}

impl KeyValueStore for SqliteStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let conn = self.pool.get()?;
        let value = conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            rusqlite::params![key, value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let conn = self.pool.get()?;
        conn.execute("DELETE FROM kv WHERE key = ?1", [key])?;
        Ok(())
    }
}
