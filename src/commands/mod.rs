//! Command implementations for the `tt` CLI.
//!
//! This module contains the business logic for each CLI command.
//! Commands are organized by area:
//! - `file` - Create, open and list project files
//! - `project` - Project CRUD and selection
//! - `task` - Task CRUD and status changes
//! - `view` - Active/completed views and export
//!
//! Every command that changes the board loads the whole project file,
//! applies one change and rewrites the whole file before returning.

mod file;
mod project;
mod task;
mod view;

pub use file::{FileResult, FileShowResult, RecentEntry, RecentResult, file_new, file_open, file_recent, file_show};
pub use project::{
    ProjectDeleted, ProjectList, ProjectRenamed, ProjectResult, ProjectSummary, project_add,
    project_delete, project_list, project_rename, project_select,
};
pub use task::{TaskDeleted, TaskResult, task_add, task_delete, task_done, task_edit, task_move, task_reopen};
pub use view::{ExportResult, ViewResult, export, view};

use crate::config::{Resolved, TrackerConfig, config_dir, resolve_data_file};
use crate::models::{Board, Project, TaskStatus};
use crate::quotes;
use crate::storage::{self, Storage};
use crate::{Error, Result};
use chrono::{Local, NaiveDate};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Command results that can be serialized to JSON or formatted for humans.
pub trait Output {
    /// Serialize to JSON string.
    fn to_json(&self) -> String;

    /// Format for human-readable output.
    fn to_human(&self) -> String;
}

/// Serialize a result, falling back to an error object instead of panicking.
pub(crate) fn json_line<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|e| serde_json::json!({ "error": e.to_string() }).to_string())
}

/// Everything a command needs besides its own arguments.
#[derive(Debug, Clone)]
pub struct Context {
    /// Directory holding config.kdl and action.log
    pub config_dir: PathBuf,
    /// Loaded config.kdl
    pub config: TrackerConfig,
    /// `--file` flag, if given
    pub file_flag: Option<PathBuf>,
}

impl Context {
    /// Build a context from the environment (`TT_CONFIG_DIR` or the platform default).
    pub fn load(file_flag: Option<PathBuf>) -> Result<Self> {
        Ok(Self::with_config_dir(config_dir()?, file_flag))
    }

    /// Build a context around an explicit config directory.
    pub fn with_config_dir(config_dir: PathBuf, file_flag: Option<PathBuf>) -> Self {
        let config = TrackerConfig::load(&config_dir);
        Self {
            config_dir,
            config,
            file_flag,
        }
    }

    /// Resolve which project file to use.
    pub fn data_file(&self) -> Result<Resolved<PathBuf>> {
        resolve_data_file(self.file_flag.as_deref(), &self.config)
    }

    /// Open the resolved project file, which must exist.
    pub fn open_storage(&self) -> Result<Storage> {
        let resolved = self.data_file()?;
        Storage::open_existing(&resolved.value)
    }

    pub fn save_config(&self) -> Result<()> {
        self.config.save(&self.config_dir)
    }

    /// The selected project, if it still exists on `board`.
    pub fn selected_project<'a>(&self, board: &'a Board) -> Option<&'a Project> {
        self.config
            .active_project
            .as_deref()
            .and_then(|key| board.find_project(key).ok())
    }

    /// Project that receives a new task: the named one, else the selected
    /// one, else the first project.
    fn target_project<'a>(&self, board: &'a Board, explicit: Option<&str>) -> Result<&'a Project> {
        if let Some(key) = explicit {
            return board.find_project(key);
        }
        self.selected_project(board)
            .or_else(|| board.projects.first())
            .ok_or_else(|| Error::InvalidInput("No projects yet: create a project first".to_string()))
    }
}

/// Today's date in local time.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn parse_optional_due(raw: Option<&str>) -> Result<Option<NaiveDate>> {
    raw.map(|s| storage::parse_due_date(s, today())).transpose()
}

fn display_paths(paths: &[PathBuf]) -> Vec<String> {
    paths.iter().map(|p| p.display().to_string()).collect()
}

fn conflict_warning(conflicts: &[String]) -> String {
    let mut out = format!(
        "Warning: {} possible sync-conflict cop{} found next to the project file:",
        conflicts.len(),
        if conflicts.len() == 1 { "y" } else { "ies" }
    );
    for c in conflicts {
        out.push_str(&format!("\n  {}", c));
    }
    out.push_str("\nPick the right one with `tt file open <path>`.");
    out
}

// === Status ===

#[derive(Serialize)]
pub struct StatusResult {
    pub file: String,
    pub source: String,
    pub projects: usize,
    pub active_tasks: usize,
    pub completed_tasks: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_project: Option<String>,
    pub conflicts: Vec<String>,
    pub version: String,
    pub commit: String,
    pub built: String,
    #[serde(skip)]
    quote: &'static str,
}

impl Output for StatusResult {
    fn to_json(&self) -> String {
        json_line(self)
    }

    fn to_human(&self) -> String {
        let mut lines = vec![
            format!("Project file: {} ({})", self.file, self.source),
            format!(
                "{} project{}, {} active task{}, {} completed",
                self.projects,
                if self.projects == 1 { "" } else { "s" },
                self.active_tasks,
                if self.active_tasks == 1 { "" } else { "s" },
                self.completed_tasks
            ),
        ];
        if let Some(ref name) = self.selected_project {
            lines.push(format!("Selected project: {}", name));
        }
        if !self.conflicts.is_empty() {
            lines.push(conflict_warning(&self.conflicts));
        }
        lines.push(String::new());
        lines.push(self.quote.to_string());
        lines.join("\n")
    }
}

/// Summarize the current project file.
pub fn status(ctx: &Context) -> Result<StatusResult> {
    let resolved = ctx.data_file()?;
    let storage = Storage::open_existing(&resolved.value)?;
    let board = &storage.board;

    let count = |status: TaskStatus| -> usize { board.projects.iter().map(|p| p.count(status)).sum() };

    Ok(StatusResult {
        file: storage.path().display().to_string(),
        source: resolved.source.to_string(),
        projects: board.projects.len(),
        active_tasks: count(TaskStatus::Active),
        completed_tasks: count(TaskStatus::Completed),
        selected_project: ctx.selected_project(board).map(|p| p.name.clone()),
        conflicts: display_paths(&storage.conflict_candidates()),
        version: env!("CARGO_PKG_VERSION").to_string(),
        commit: env!("TT_GIT_COMMIT").to_string(),
        built: env!("TT_BUILD_TIMESTAMP").to_string(),
        quote: quotes::random(),
    })
}

// === Doctor ===

#[derive(Serialize)]
pub struct DoctorResult {
    pub file: String,
    pub healthy: bool,
    pub issues: Vec<String>,
    pub conflicts: Vec<String>,
}

impl Output for DoctorResult {
    fn to_json(&self) -> String {
        json_line(self)
    }

    fn to_human(&self) -> String {
        let mut lines = vec![format!("Project file: {}", self.file)];
        if self.issues.is_empty() && self.conflicts.is_empty() {
            lines.push("No problems found.".to_string());
        }
        for issue in &self.issues {
            lines.push(format!("Problem: {}", issue));
        }
        if !self.conflicts.is_empty() {
            lines.push(conflict_warning(&self.conflicts));
        }
        lines.join("\n")
    }
}

/// Check that the project file loads cleanly and look for conflict copies.
///
/// Load failures are reported as issues rather than returned as errors,
/// since diagnosing them is the point of the command.
pub fn doctor(ctx: &Context) -> Result<DoctorResult> {
    let resolved = ctx.data_file()?;
    let path = storage::resolve_user_path(&resolved.value)?;
    let mut issues = Vec::new();

    match Storage::open_existing(&path) {
        Ok(storage) => {
            let mut seen = std::collections::HashSet::new();
            for project in &storage.board.projects {
                if !seen.insert(project.name.as_str()) {
                    issues.push(format!(
                        "Several projects are named '{}'; refer to them by ID",
                        project.name
                    ));
                }
            }
            if let Some(key) = ctx.config.active_project.as_deref() {
                if storage.board.find_project(key).is_err() {
                    issues.push(format!(
                        "Selected project '{}' is not in this file; the first project is used instead",
                        key
                    ));
                }
            }
        }
        Err(e) => issues.push(e.to_string()),
    }

    let conflicts = display_paths(&storage::conflict_candidates(&path));
    tracing::debug!(issues = issues.len(), conflicts = conflicts.len(), "doctor finished");

    Ok(DoctorResult {
        file: path.display().to_string(),
        healthy: issues.is_empty() && conflicts.is_empty(),
        issues,
        conflicts,
    })
}

/// Ensure the path given for a new file has a `.json` extension.
fn require_json_extension(path: &Path) -> Result<()> {
    match path.extension() {
        Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(()),
        _ => Err(Error::InvalidInput(format!(
            "Project files must end in .json: {}",
            path.display()
        ))),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::test_utils::TestEnv;

    /// A context pointing at a fresh project file in `env`.
    pub fn context_with_file(env: &TestEnv) -> Context {
        let mut ctx = Context::with_config_dir(env.config_path().to_path_buf(), None);
        file_new(&mut ctx, &env.data_file()).unwrap();
        ctx
    }
}
