//! Key-value storage for persisted shell state
//!
//! Shell state is stored as JSON values under fixed keys. The SQLite-backed
//! [`AppStateStore`](super::AppStateStore) is used at runtime; [`MemoryStorage`]
//! backs tests and ephemeral sessions.

use std::collections::HashMap;

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Storage key for the open tabs and active path
pub const TABS_STORAGE_KEY: &str = "vscode-tabs-store";

/// Storage key for the explorer file tree
pub const FILE_TREE_STORAGE_KEY: &str = "ide-file-tree";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Invalid JSON for key {key}: {source}")]
    Json {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// JSON key-value storage collaborator
pub trait StateStorage: Send + Sync {
    /// Read the value stored under `key`
    fn get(&self, key: &str) -> Result<Option<Value>, StorageError>;

    /// Insert or replace the value stored under `key`
    fn set(&self, key: &str, value: &Value) -> Result<(), StorageError>;

    /// Remove `key`; missing keys are not an error
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Read and deserialize a typed value
pub fn load_json<T: DeserializeOwned>(
    storage: &dyn StateStorage,
    key: &str,
) -> Result<Option<T>, StorageError> {
    match storage.get(key)? {
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(|source| StorageError::Json {
                key: key.to_string(),
                source,
            }),
        None => Ok(None),
    }
}

/// Serialize and store a typed value
pub fn save_json<T: Serialize>(
    storage: &dyn StateStorage,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let value = serde_json::to_value(value).map_err(|source| StorageError::Json {
        key: key.to_string(),
        source,
    })?;
    storage.set(key, &value)
}

/// In-process storage with no durability
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: Mutex<HashMap<String, Value>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        Ok(self.values.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &Value) -> Result<(), StorageError> {
        self.values.lock().insert(key.to_string(), value.clone());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.values.lock().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        count: u32,
    }

    #[test]
    fn test_memory_round_trip() {
        let storage = MemoryStorage::new();
        let sample = Sample {
            name: "tabs".into(),
            count: 3,
        };

        save_json(&storage, "sample", &sample).unwrap();
        let loaded: Option<Sample> = load_json(&storage, "sample").unwrap();
        assert_eq!(loaded, Some(sample));
    }

    #[test]
    fn test_load_missing_key() {
        let storage = MemoryStorage::new();
        let loaded: Option<Sample> = load_json(&storage, "missing").unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_load_wrong_shape_is_error() {
        let storage = MemoryStorage::new();
        storage
            .set("sample", &serde_json::json!({ "unexpected": true }))
            .unwrap();

        let result: Result<Option<Sample>, _> = load_json(&storage, "sample");
        assert!(matches!(result, Err(StorageError::Json { .. })));
    }

    #[test]
    fn test_remove() {
        let storage = MemoryStorage::new();
        storage.set("key", &serde_json::json!(1)).unwrap();
        storage.remove("key").unwrap();
        storage.remove("key").unwrap();
        assert!(storage.get("key").unwrap().is_none());
    }
}
