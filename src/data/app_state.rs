//! App state data access object (key-value store)

use chrono::Utc;
use rusqlite::params;
use serde_json::Value;

use super::database::SharedConnection;
use super::storage::{StateStorage, StorageError};

/// Data access object for app state (key-value store)
#[derive(Clone)]
pub struct AppStateStore {
    conn: SharedConnection,
}

impl AppStateStore {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    /// Set a raw value (insert or update)
    pub fn set_raw(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO app_state (key, value, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = ?3",
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    /// Get a raw value by key
    pub fn get_raw(&self, key: &str) -> Result<Option<String>, StorageError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare("SELECT value FROM app_state WHERE key = ?1")?;
        let mut rows = stmt.query(params![key])?;

        if let Some(row) = rows.next()? {
            Ok(Some(row.get(0)?))
        } else {
            Ok(None)
        }
    }

    /// Delete a key
    pub fn delete(&self, key: &str) -> Result<(), StorageError> {
        let conn = self.conn.lock();
        conn.execute("DELETE FROM app_state WHERE key = ?1", params![key])?;
        Ok(())
    }

    /// Clear all state
    pub fn clear_all(&self) -> Result<(), StorageError> {
        let conn = self.conn.lock();
        conn.execute("DELETE FROM app_state", [])?;
        Ok(())
    }
}

impl StateStorage for AppStateStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        match self.get_raw(key)? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|source| StorageError::Json {
                    key: key.to_string(),
                    source,
                }),
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &Value) -> Result<(), StorageError> {
        self.set_raw(key, &value.to_string())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.delete(key)
    }
}
