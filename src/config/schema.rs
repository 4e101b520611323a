//! KDL schema for config.kdl.
//!
//! This module provides:
//! - The `TrackerConfig` struct representing the KDL schema
//! - Serialization/deserialization to/from KDL format
//! - Loading and saving in the config directory
//! - Recent-files bookkeeping

use crate::{Error, Result};
use kdl::{KdlDocument, KdlEntry, KdlNode, KdlValue};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Config file name inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.kdl";

/// Environment variable overriding the config directory.
pub const CONFIG_DIR_ENV: &str = "TT_CONFIG_DIR";

/// Number of entries kept in the recent-files list.
pub const MAX_RECENT: usize = 8;

/// Output format preference for CLI commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON output (default, machine-readable)
    #[default]
    Json,
    /// Human-readable output
    Human,
}

impl OutputFormat {
    /// Parse from string, case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(OutputFormat::Json),
            "human" => Some(OutputFormat::Human),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Human => "human",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-machine settings stored in config.kdl.
///
/// The project file itself may be synced between machines; this file is
/// not, since it records local paths.
///
/// # KDL Schema
///
/// ```kdl
/// data-file "/Users/me/Dropbox/ThesisTracker.json"
/// recent "/Users/me/Dropbox/ThesisTracker.json" "/Users/me/old.json"
/// active-project "Chapter 3"
/// output-format "human"  // or "json"
/// action-log #true
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Project file opened by default
    pub data_file: Option<PathBuf>,

    /// Recently opened project files, most recent first
    pub recent: Vec<PathBuf>,

    /// Project that receives new tasks when none is named
    pub active_project: Option<String>,

    /// Default output format for CLI commands
    pub output_format: Option<OutputFormat>,

    /// Whether to append to action.log (default: enabled)
    pub action_log: Option<bool>,
}

fn first_string(doc: &KdlDocument, name: &str) -> Option<String> {
    doc.get(name)
        .and_then(|node| node.entries().first())
        .and_then(|entry| entry.value().as_string())
        .map(str::to_string)
}

fn string_node(name: &str, value: &str) -> KdlNode {
    let mut node = KdlNode::new(name);
    node.push(KdlEntry::new(KdlValue::String(value.to_string())));
    node
}

impl TrackerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse config from a KDL document. Unknown nodes are ignored.
    pub fn from_kdl(doc: &KdlDocument) -> Self {
        let mut config = Self::new();

        config.data_file = first_string(doc, "data-file").map(PathBuf::from);

        if let Some(node) = doc.get("recent") {
            config.recent = node
                .entries()
                .iter()
                .filter(|e| e.name().is_none())
                .filter_map(|e| e.value().as_string())
                .map(PathBuf::from)
                .take(MAX_RECENT)
                .collect();
        }

        config.active_project = first_string(doc, "active-project");
        config.output_format = first_string(doc, "output-format").and_then(|s| OutputFormat::parse(&s));

        config.action_log = doc
            .get("action-log")
            .and_then(|node| node.entries().first())
            .and_then(|entry| entry.value().as_bool());

        config
    }

    /// Convert config to a KDL document.
    pub fn to_kdl(&self) -> KdlDocument {
        let mut doc = KdlDocument::new();

        if let Some(ref path) = self.data_file {
            doc.nodes_mut()
                .push(string_node("data-file", &path.to_string_lossy()));
        }

        if !self.recent.is_empty() {
            let mut node = KdlNode::new("recent");
            for path in &self.recent {
                node.push(KdlEntry::new(KdlValue::String(
                    path.to_string_lossy().to_string(),
                )));
            }
            doc.nodes_mut().push(node);
        }

        if let Some(ref project) = self.active_project {
            doc.nodes_mut().push(string_node("active-project", project));
        }

        if let Some(format) = self.output_format {
            doc.nodes_mut()
                .push(string_node("output-format", format.as_str()));
        }

        if let Some(enabled) = self.action_log {
            let mut node = KdlNode::new("action-log");
            node.push(KdlEntry::new(KdlValue::Bool(enabled)));
            doc.nodes_mut().push(node);
        }

        doc
    }

    /// Path of config.kdl inside `dir`.
    pub fn path_in(dir: &Path) -> PathBuf {
        dir.join(CONFIG_FILE_NAME)
    }

    /// Load config.kdl from `dir`.
    ///
    /// A missing file gives the defaults. So does an unparseable one: a
    /// broken preferences file should not lock the user out of their tasks.
    pub fn load(dir: &Path) -> Self {
        let path = Self::path_in(dir);
        match Self::read(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable config");
                Self::default()
            }
        }
    }

    /// Strict variant of [`TrackerConfig::load`] that reports parse errors.
    pub fn read(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let doc: KdlDocument = content.parse().map_err(|e| {
            Error::Config(format!("Failed to parse KDL in {}: {}", path.display(), e))
        })?;
        Ok(Self::from_kdl(&doc))
    }

    /// Write config.kdl into `dir`, creating the directory if needed.
    pub fn save(&self, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir)?;
        let path = Self::path_in(dir);
        let mut doc = self.to_kdl();
        doc.autoformat();
        fs::write(&path, doc.to_string())?;
        tracing::debug!(path = %path.display(), "saved config");
        Ok(())
    }

    /// Make `path` the current project file and put it first in `recent`.
    pub fn remember_file(&mut self, path: &Path) {
        self.data_file = Some(path.to_path_buf());
        self.recent.retain(|p| p != path);
        self.recent.insert(0, path.to_path_buf());
        self.recent.truncate(MAX_RECENT);
    }

    /// Whether action logging is on (defaults to enabled).
    pub fn action_log_enabled(&self) -> bool {
        self.action_log.unwrap_or(true)
    }
}

/// Directory holding config.kdl and action.log.
///
/// `TT_CONFIG_DIR` wins; otherwise the platform config dir
/// (`~/.config/thesis-tracker`, `~/Library/Application Support/thesis-tracker`).
pub fn config_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
        if !dir.is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    dirs::config_dir()
        .map(|d| d.join("thesis-tracker"))
        .ok_or_else(|| Error::Other("Could not determine config directory".to_string()))
}
