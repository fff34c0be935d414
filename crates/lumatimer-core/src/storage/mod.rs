//! Persistence for the four LumaTimer records.
//!
//! Every record is a single value under a fixed key in a [`KeyValueStore`].
//! Settings, tasks and stats are JSON documents; the theme is a bare string.

mod config;
pub mod database;
mod memory;

pub use config::{AppConfig, LoggingConfig, NotificationsConfig, StorageConfig};
pub use database::SqliteStore;
pub use memory::MemoryStore;

use serde::de::DeserializeOwned;
use std::path::PathBuf;

use crate::error::{Result, StorageError};

pub const SETTINGS_KEY: &str = "lumatimer.settings";
pub const TASKS_KEY: &str = "lumatimer.tasks";
pub const STATS_KEY: &str = "lumatimer.stats";
pub const THEME_KEY: &str = "lumatimer.theme";

/// Opaque string key-value persistence.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Returns the data directory, creating it if needed.
///
/// `LUMATIMER_DATA_DIR` overrides the location. Otherwise this is
/// `~/.config/lumatimer[-dev]/`, with `LUMATIMER_ENV=dev` selecting the
/// development directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("LUMATIMER_DATA_DIR") {
        Some(custom) => PathBuf::from(custom),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("LUMATIMER_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("lumatimer-dev")
            } else {
                base_dir.join("lumatimer")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Read and decode the JSON record stored under `key`.
///
/// Returns `None` when the record is absent, unreadable or malformed. The
/// latter two are logged; callers fall back to defaults for that record only.
pub(crate) fn load_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = load_raw(store, key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, error = %e, "malformed record, using defaults");
            None
        }
    }
}

/// Read the raw string stored under `key`, logging read failures.
pub(crate) fn load_raw(store: &dyn KeyValueStore, key: &str) -> Option<String> {
    match store.get(key) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to read record, using defaults");
            None
        }
    }
}

pub(crate) fn save_json<T: serde::Serialize + ?Sized>(
    store: &mut dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<()> {
    let json = serde_json::to_string(value)?;
    store.set(key, &json)?;
    tracing::debug!(key, "record saved");
    Ok(())
}
