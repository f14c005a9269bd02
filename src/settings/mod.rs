//! Settings module - key/value preferences in SQLite
//!
//! Everything is stored as strings; `prefs` layers typed load/save helpers on
//! top and falls back to defaults for missing or malformed values.

pub mod prefs;

use std::collections::HashMap;
use std::path::Path;

use rusqlite::{Connection, OptionalExtension, params};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Settings database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Settings encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SettingsError>;

/// String key/value store owned by the application shell
pub trait SettingsStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn delete(&mut self, key: &str) -> Result<()>;
}

/// Settings persisted in a SQLite file
pub struct SqliteSettings {
    conn: Connection,
}

impl SqliteSettings {
    /// Open or create the settings database
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    pub fn in_memory() -> Result<Self> {
        let store = Self {
            conn: Connection::open_in_memory()?,
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }
}

impl SettingsStore for SqliteSettings {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO settings (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM settings WHERE key = ?1", params![key])?;
        Ok(())
    }
}

/// Settings held in memory, for tests and throwaway sessions
#[derive(Debug, Clone, Default)]
pub struct MemorySettings {
    values: HashMap<String, String>,
}

impl SettingsStore for MemorySettings {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        self.values.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise_store(store: &mut impl SettingsStore) {
        assert_eq!(store.get("theme").unwrap(), None);

        store.set("theme", "neon").unwrap();
        assert_eq!(store.get("theme").unwrap().as_deref(), Some("neon"));

        store.set("theme", "ice").unwrap();
        assert_eq!(store.get("theme").unwrap().as_deref(), Some("ice"));

        store.delete("theme").unwrap();
        assert_eq!(store.get("theme").unwrap(), None);
        store.delete("theme").unwrap();
    }

    #[test]
    fn test_memory_store() {
        exercise_store(&mut MemorySettings::default());
    }

    #[test]
    fn test_sqlite_store_in_memory() {
        exercise_store(&mut SqliteSettings::in_memory().unwrap());
    }

    #[test]
    fn test_sqlite_store_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("forge.db");
        {
            let mut store = SqliteSettings::open(&path).unwrap();
            store.set("coach_auto", "60").unwrap();
        }
        let store = SqliteSettings::open(&path).unwrap();
        assert_eq!(store.get("coach_auto").unwrap().as_deref(), Some("60"));
    }
}
