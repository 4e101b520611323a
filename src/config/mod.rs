//! Configuration for ThesisTracker.
//!
//! ## config.kdl - Per-machine settings
//!
//! Located at `$TT_CONFIG_DIR/config.kdl`, or in the platform config
//! directory (`~/.config/thesis-tracker/config.kdl` on Linux,
//! `~/Library/Application Support/thesis-tracker/config.kdl` on macOS).
//!
//! Contains:
//! - `data-file` - Project file opened by default
//! - `recent` - Recently opened project files
//! - `active-project` - Project that receives new tasks by default
//! - `output-format` - "json" or "human"
//! - `action-log` - Whether commands are recorded in action.log
//!
//! The project file itself is meant to live in a synced folder; this file
//! records local paths and is never synced.
//!
//! Use the [`resolver`] module for precedence resolution.

pub mod resolver;
pub mod schema;

pub use resolver::{
    DATA_FILE_ENV, Resolved, ValueSource, resolve_data_file, resolve_data_file_from,
    resolve_output_format,
};
pub use schema::{
    CONFIG_DIR_ENV, CONFIG_FILE_NAME, MAX_RECENT, OutputFormat, TrackerConfig, config_dir,
};
