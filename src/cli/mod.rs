//! CLI argument definitions for ThesisTracker.

use crate::export::ExportFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// ThesisTracker - thesis to-do lists in a single synced JSON file.
///
/// Start with `tt file new ~/Dropbox/ThesisTracker.json`, then
/// `tt project add "Chapter 1"` and `tt task add "Write outline" -d tomorrow`.
#[derive(Parser, Debug)]
#[command(name = "tt")]
#[command(author, version, about = "Track thesis-writing tasks across projects", long_about = None)]
pub struct Cli {
    /// Output in human-readable format instead of JSON
    #[arg(short = 'H', long = "human", global = true)]
    pub human_readable: bool,

    /// Project file to use instead of the configured one.
    /// Can also be set via the TT_DATA_FILE environment variable.
    #[arg(short = 'f', long = "file", global = true)]
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the current project file and a summary of its contents (start here!)
    Status,

    /// Project file management (create, open, recent)
    File {
        #[command(subcommand)]
        command: FileCommands,
    },

    /// Project management commands
    Project {
        #[command(subcommand)]
        command: ProjectCommands,
    },

    /// Task management commands
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },

    /// Show the active or completed view
    View {
        #[command(subcommand)]
        command: ViewCommands,
    },

    /// Export a to-do list for some or all projects
    Export {
        /// Output file path
        output: PathBuf,

        /// Project to include (ID or name, repeatable; default: all)
        #[arg(short, long = "project")]
        project: Vec<String>,

        /// Also list completed tasks
        #[arg(long)]
        include_completed: bool,

        /// Output format
        #[arg(long, value_enum, default_value_t = ExportFormat::Text)]
        format: ExportFormat,
    },

    /// Check the project file and look for sync-conflict copies
    Doctor,
}

/// Project file subcommands
#[derive(Subcommand, Debug)]
pub enum FileCommands {
    /// Create a new, empty project file and make it current
    New {
        /// Where to create the file (e.g. inside a Dropbox/iCloud folder)
        path: PathBuf,
    },

    /// Open an existing project file and make it current
    Open {
        /// Path to the project file
        path: PathBuf,

        /// Create an empty project file if none exists at the path
        #[arg(long)]
        create: bool,
    },

    /// List recently opened project files
    Recent,

    /// Show which project file is in use and why
    Show,
}

/// Project subcommands
#[derive(Subcommand, Debug)]
pub enum ProjectCommands {
    /// Create a new project
    Add {
        /// Project name
        name: String,
    },

    /// List projects with task counts
    List,

    /// Rename a project
    Rename {
        /// Project ID or current name
        project: String,

        /// New name
        name: String,
    },

    /// Delete a project and all of its tasks
    Delete {
        /// Project ID or name
        project: String,
    },

    /// Select the project that receives new tasks by default
    Select {
        /// Project ID or name
        project: String,
    },
}

/// Task subcommands
#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// Add a task
    Add {
        /// Task title
        title: String,

        /// Project ID or name (default: the selected project)
        #[arg(short, long)]
        project: Option<String>,

        /// Due date (YYYY-MM-DD, "today" or "tomorrow")
        #[arg(short, long)]
        due: Option<String>,
    },

    /// Change a task's title or due date
    Edit {
        /// Task ID (e.g., tt-a1b2)
        id: String,

        /// New title
        #[arg(short, long)]
        title: Option<String>,

        /// New due date (YYYY-MM-DD, "today" or "tomorrow")
        #[arg(short, long, conflicts_with = "no_due")]
        due: Option<String>,

        /// Remove the due date
        #[arg(long)]
        no_due: bool,
    },

    /// Mark a task completed
    Done {
        /// Task ID
        id: String,
    },

    /// Move a completed task back to active
    Reopen {
        /// Task ID
        id: String,
    },

    /// Delete a task
    Delete {
        /// Task ID
        id: String,
    },

    /// Move a task to another project
    Move {
        /// Task ID
        id: String,

        /// Target project ID or name
        project: String,
    },
}

/// View subcommands
#[derive(Subcommand, Debug)]
pub enum ViewCommands {
    /// Incomplete tasks, per project, earliest due first
    Active,

    /// Finished tasks, per project
    Completed,
}
