//! Where editor-shell keeps its files.
//!
//! Everything lives under one data directory, `~/.editor-shell` unless
//! `--data-dir` overrides it:
//!
//! ```text
//! <data_dir>/config.toml
//! <data_dir>/editor-shell.db
//! <data_dir>/logs/editor-shell.log
//! ```

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

const DATA_DIR_NAME: &str = ".editor-shell";

static DATA_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Fix the data directory for the rest of the process.
///
/// The first call wins; later calls are logged and ignored.
pub fn init_data_dir(custom_path: Option<PathBuf>) {
    let path = custom_path.unwrap_or_else(default_data_dir);
    if let Err(ignored) = DATA_DIR.set(path) {
        tracing::debug!(
            ignored = %ignored.display(),
            current = %data_dir().display(),
            "Data directory already set"
        );
    }
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(DATA_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(DATA_DIR_NAME))
}

pub fn data_dir() -> PathBuf {
    DATA_DIR.get().cloned().unwrap_or_else(default_data_dir)
}

pub fn database_path() -> PathBuf {
    database_path_in(&data_dir())
}

pub fn logs_dir() -> PathBuf {
    data_dir().join("logs")
}

pub fn log_file_path() -> PathBuf {
    logs_dir().join("editor-shell.log")
}

pub fn config_path() -> PathBuf {
    data_dir().join("config.toml")
}

fn database_path_in(dir: &Path) -> PathBuf {
    dir.join("editor-shell.db")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_dir_name() {
        assert!(default_data_dir().ends_with(DATA_DIR_NAME));
    }

    #[test]
    fn test_files_share_the_data_dir() {
        let dir = data_dir();
        assert_eq!(database_path(), dir.join("editor-shell.db"));
        assert_eq!(config_path(), dir.join("config.toml"));
        assert_eq!(log_file_path(), dir.join("logs").join("editor-shell.log"));
        assert_eq!(
            database_path_in(Path::new("/tmp/x")),
            PathBuf::from("/tmp/x/editor-shell.db")
        );
    }
}
