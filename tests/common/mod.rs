//! Common test utilities for ThesisTracker integration tests.
//!
//! Provides `TestEnv` for isolated test environments that don't touch the
//! user's real config directory or project files.

#![allow(dead_code)]

use assert_cmd::Command;
use std::path::{Path, PathBuf};
pub use tempfile::TempDir;

/// A test environment with isolated storage.
///
/// Each `TestEnv` creates two temporary directories:
/// - `sync_dir`: Stands in for a Dropbox/iCloud folder holding the project file
/// - `config_dir`: Holds config.kdl and action.log (via `TT_CONFIG_DIR`)
///
/// The `tt()` method returns a `Command` that sets `TT_CONFIG_DIR`
/// per-invocation, making tests parallel-safe.
pub struct TestEnv {
    pub sync_dir: TempDir,
    pub config_dir: TempDir,
}

impl TestEnv {
    /// Create a new test environment with isolated directories.
    pub fn new() -> Self {
        Self {
            sync_dir: TempDir::new().unwrap(),
            config_dir: TempDir::new().unwrap(),
        }
    }

    /// Create a new test environment with an empty project file opened.
    pub fn init() -> Self {
        let env = Self::new();
        env.tt()
            .args(["file", "new"])
            .arg(env.data_file())
            .assert()
            .success();
        env
    }

    /// Get a Command for the tt binary with an isolated config directory.
    pub fn tt(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_tt"));
        cmd.current_dir(self.sync_dir.path());
        cmd.env("TT_CONFIG_DIR", self.config_dir.path());
        cmd.env_remove("TT_DATA_FILE");
        cmd.env_remove("RUST_LOG");
        cmd
    }

    /// Path of the project file inside the sync folder.
    pub fn data_file(&self) -> PathBuf {
        self.sync_dir.path().join("ThesisTracker.json")
    }

    pub fn sync_path(&self) -> &Path {
        self.sync_dir.path()
    }

    pub fn config_path(&self) -> &Path {
        self.config_dir.path()
    }

    /// Run a command expected to succeed and parse its JSON output.
    pub fn json(&self, args: &[&str]) -> serde_json::Value {
        let output = self.tt().args(args).output().unwrap();
        assert!(
            output.status.success(),
            "tt {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        serde_json::from_slice(&output.stdout).unwrap()
    }

    /// Add a project and return its ID.
    pub fn add_project(&self, name: &str) -> String {
        self.json(&["project", "add", name])["id"]
            .as_str()
            .unwrap()
            .to_string()
    }

    /// Add a task (optionally with a due date) and return its ID.
    pub fn add_task(&self, title: &str, due: Option<&str>) -> String {
        let mut args = vec!["task", "add", title];
        if let Some(due) = due {
            args.extend(["--due", due]);
        }
        self.json(&args)["task"]["id"]
            .as_str()
            .unwrap()
            .to_string()
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
