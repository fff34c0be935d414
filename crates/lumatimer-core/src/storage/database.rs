//! SQLite-backed key-value store.
//!
//! All records live in a single `kv` table at
//! `~/.config/lumatimer/lumatimer.db` unless configured otherwise.

use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

use super::{data_dir, AppConfig, KeyValueStore};
use crate::error::{Result, StorageError};

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open the store named by `config.storage.database` inside the data directory.
    ///
    /// # Errors
    /// Returns an error if the data directory or database cannot be opened.
    pub fn open(config: &AppConfig) -> Result<Self> {
        let path = data_dir()?.join(&config.storage.database);
        Ok(Self::open_path(&path)?)
    }

    /// Open (or create) the store at an explicit path.
    pub fn open_path(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path).map_err(|source| StorageError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    /// Open an in-memory store.
    pub fn open_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }
}
