//! ThesisTracker - thesis to-do lists kept in a single JSON file.
//!
//! This library provides the core functionality for the `tt` CLI tool:
//! the project/task model, the JSON document store, per-machine
//! configuration, sync-conflict detection and to-do list export.

pub mod action_log;
pub mod cli;
pub mod commands;
pub mod config;
pub mod export;
pub mod models;
pub mod quotes;
pub mod storage;

use std::path::PathBuf;

/// Test utilities for isolated test environments.
#[cfg(test)]
pub(crate) mod test_utils {
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    use crate::storage::Storage;

    /// Test environment with an isolated data file and config directory.
    pub struct TestEnv {
        /// Folder holding the data file (stands in for a synced folder)
        pub sync_dir: TempDir,
        /// Isolated config directory
        pub config_dir: TempDir,
    }

    impl TestEnv {
        pub fn new() -> Self {
            Self {
                sync_dir: TempDir::new().unwrap(),
                config_dir: TempDir::new().unwrap(),
            }
        }

        /// Path of the data file inside the sync folder.
        pub fn data_file(&self) -> PathBuf {
            self.sync_dir.path().join("ThesisTracker.json")
        }

        pub fn config_path(&self) -> &Path {
            self.config_dir.path()
        }

        /// Open (creating if needed) the data file for this environment.
        pub fn open_storage(&self) -> Storage {
            Storage::open(&self.data_file()).unwrap()
        }
    }

    impl Default for TestEnv {
        fn default() -> Self {
            Self::new()
        }
    }
}

/// Library-level error type for ThesisTracker operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("No project file selected: run `tt file new <path>` or `tt file open <path>` first")]
    NoDataFile,

    #[error("Project file already exists: {}", .0.display())]
    DataFileExists(PathBuf),

    #[error("Project file not found: {}", .0.display())]
    DataFileMissing(PathBuf),

    #[error("Unsupported document version {0} (expected <= {})", storage::DOCUMENT_VERSION)]
    UnsupportedVersion(u32),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid ID format: {0}")]
    InvalidId(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for ThesisTracker operations.
pub type Result<T> = std::result::Result<T, Error>;
