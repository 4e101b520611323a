//! Precedence resolution for the settings a command runs with.
//!
//! ## Project file precedence (highest to lowest)
//!
//! 1. `--file` CLI flag
//! 2. `TT_DATA_FILE` environment variable
//! 3. `data-file` in config.kdl
//!
//! ## Output format precedence (highest to lowest)
//!
//! 1. `-H/--human` CLI flag
//! 2. `output-format` in config.kdl
//! 3. Built-in default (JSON)

use crate::config::{OutputFormat, TrackerConfig};
use crate::{Error, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Environment variable naming the project file.
pub const DATA_FILE_ENV: &str = "TT_DATA_FILE";

/// Tracks where a resolved value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSource {
    /// Value from CLI flag
    CliFlag,
    /// Value from environment variable
    EnvVar(String),
    /// Value from config.kdl
    Config,
    /// Built-in default value
    Default,
}

impl std::fmt::Display for ValueSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueSource::CliFlag => write!(f, "cli"),
            ValueSource::EnvVar(name) => write!(f, "env:{}", name),
            ValueSource::Config => write!(f, "config"),
            ValueSource::Default => write!(f, "default"),
        }
    }
}

impl Serialize for ValueSource {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A resolved value with its source.
#[derive(Debug, Clone, Serialize)]
pub struct Resolved<T> {
    /// The resolved value
    pub value: T,
    /// Where the value came from
    pub source: ValueSource,
}

impl<T> Resolved<T> {
    pub fn new(value: T, source: ValueSource) -> Self {
        Self { value, source }
    }
}

/// Resolve the project file to operate on.
///
/// Returns `NoDataFile` when nothing names one.
pub fn resolve_data_file(flag: Option<&Path>, config: &TrackerConfig) -> Result<Resolved<PathBuf>> {
    let env_value = std::env::var(DATA_FILE_ENV).ok().filter(|v| !v.is_empty());
    resolve_data_file_from(flag, env_value.as_deref(), config)
}

/// [`resolve_data_file`] with the environment passed in explicitly.
pub fn resolve_data_file_from(
    flag: Option<&Path>,
    env_value: Option<&str>,
    config: &TrackerConfig,
) -> Result<Resolved<PathBuf>> {
    if let Some(path) = flag {
        return Ok(Resolved::new(path.to_path_buf(), ValueSource::CliFlag));
    }
    if let Some(path) = env_value {
        return Ok(Resolved::new(
            PathBuf::from(path),
            ValueSource::EnvVar(DATA_FILE_ENV.to_string()),
        ));
    }
    if let Some(ref path) = config.data_file {
        return Ok(Resolved::new(path.clone(), ValueSource::Config));
    }
    Err(Error::NoDataFile)
}

/// Resolve the output format.
pub fn resolve_output_format(human_flag: bool, config: &TrackerConfig) -> Resolved<OutputFormat> {
    if human_flag {
        Resolved::new(OutputFormat::Human, ValueSource::CliFlag)
    } else if let Some(format) = config.output_format {
        Resolved::new(format, ValueSource::Config)
    } else {
        Resolved::new(OutputFormat::default(), ValueSource::Default)
    }
}
