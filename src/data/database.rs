//! SQLite file holding persisted shell state

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use rusqlite::Connection;
use thiserror::Error;

use super::migrations;

/// Connection handle shared by the stores
pub type SharedConnection = Arc<Mutex<Connection>>;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Failed to create {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The shell's state database, migrated on open
#[derive(Clone)]
pub struct Database {
    conn: SharedConnection,
    path: PathBuf,
}

impl Database {
    /// Open `path`, creating it and its directory if needed
    pub fn open(path: PathBuf) -> Result<Self, DatabaseError> {
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|source| DatabaseError::CreateDir {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let mut conn = Connection::open(&path)?;
        migrations::run_migrations(&mut conn)?;
        tracing::debug!(path = %path.display(), "State database ready");

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path,
        })
    }

    /// `editor-shell.db` in the data directory
    pub fn open_default() -> Result<Self, DatabaseError> {
        Self::open(crate::util::database_path())
    }

    pub fn connection(&self) -> SharedConnection {
        self.conn.clone()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Highest applied migration version, 0 for none
    pub fn schema_version(&self) -> Result<i64, DatabaseError> {
        let conn = self.conn.lock();
        let version = conn.query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )?;
        Ok(version)
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").field("path", &self.path).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::migrations::{table_exists, MIGRATIONS};
    use tempfile::tempdir;

    #[test]
    fn test_open_creates_missing_directories() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("state").join("editor-shell.db");

        let db = Database::open(db_path.clone()).unwrap();
        assert!(db_path.exists());
        assert_eq!(db.path(), db_path.as_path());
    }

    #[test]
    fn test_open_applies_every_migration() {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("editor-shell.db")).unwrap();

        let latest = MIGRATIONS.last().map(|m| m.version).unwrap_or(0);
        assert_eq!(db.schema_version().unwrap(), latest);
        assert!(table_exists(&db.connection().lock(), "app_state").unwrap());
    }

    #[test]
    fn test_reopen_keeps_schema_version() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("editor-shell.db");
        let first = Database::open(path.clone()).unwrap().schema_version().unwrap();
        let second = Database::open(path).unwrap().schema_version().unwrap();
        assert_eq!(first, second);
    }
}
