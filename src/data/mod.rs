//! Data persistence layer
//!
//! This module provides SQLite-backed key-value storage for shell state.

mod app_state;
mod database;
mod migrations;
mod storage;

pub use app_state::AppStateStore;
pub use database::{Database, DatabaseError, SharedConnection};
pub use storage::{
    load_json, save_json, MemoryStorage, StateStorage, StorageError, FILE_TREE_STORAGE_KEY,
    TABS_STORAGE_KEY,
};
