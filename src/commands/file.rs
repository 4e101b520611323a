//! Project file commands: new, open, recent, show.

use super::{Context, Output, display_paths, json_line, require_json_extension};
use crate::Result;
use crate::storage::{self, Storage};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Serialize)]
pub struct FileResult {
    pub path: String,
    pub created: bool,
    pub projects: usize,
    pub tasks: usize,
    pub conflicts: Vec<String>,
}

impl Output for FileResult {
    fn to_json(&self) -> String {
        json_line(self)
    }

    fn to_human(&self) -> String {
        let mut out = if self.created {
            format!("Created project file {}", self.path)
        } else {
            format!(
                "Opened project file {} ({} project{}, {} task{})",
                self.path,
                self.projects,
                if self.projects == 1 { "" } else { "s" },
                self.tasks,
                if self.tasks == 1 { "" } else { "s" }
            )
        };
        if !self.conflicts.is_empty() {
            out.push('\n');
            out.push_str(&super::conflict_warning(&self.conflicts));
        }
        out
    }
}

/// Make `storage` the current project file and report on it.
fn remember(ctx: &mut Context, storage: &Storage, created: bool) -> Result<FileResult> {
    ctx.config.remember_file(storage.path());
    // A selection from another file means nothing here.
    if ctx.selected_project(&storage.board).is_none() {
        ctx.config.active_project = storage.board.projects.first().map(|p| p.id.clone());
    }
    ctx.save_config()?;

    Ok(FileResult {
        path: storage.path().display().to_string(),
        created,
        projects: storage.board.projects.len(),
        tasks: storage.board.task_count(),
        conflicts: display_paths(&storage.conflict_candidates()),
    })
}

/// A folder stands for the default file name inside it.
fn file_in(path: &Path) -> PathBuf {
    let path = storage::expand_home(path);
    if path.is_dir() {
        path.join(storage::DEFAULT_FILE_NAME)
    } else {
        path
    }
}

/// Create a new, empty project file and make it current.
pub fn file_new(ctx: &mut Context, path: &Path) -> Result<FileResult> {
    let path = file_in(path);
    require_json_extension(&path)?;
    let storage = Storage::create(&path)?;
    remember(ctx, &storage, true)
}

/// Open a project file and make it current.
///
/// With `create`, a missing file is created instead of reported.
pub fn file_open(ctx: &mut Context, path: &Path, create: bool) -> Result<FileResult> {
    let path = file_in(path);
    let existed = storage::resolve_user_path(&path)?.exists();
    let storage = if create {
        require_json_extension(&path)?;
        Storage::open(&path)?
    } else {
        Storage::open_existing(&path)?
    };
    tracing::info!(path = %storage.path().display(), "opened project file");
    remember(ctx, &storage, !existed)
}

#[derive(Serialize)]
pub struct RecentEntry {
    pub path: String,
    pub exists: bool,
    pub current: bool,
}

#[derive(Serialize)]
pub struct RecentResult {
    pub count: usize,
    pub files: Vec<RecentEntry>,
}

impl Output for RecentResult {
    fn to_json(&self) -> String {
        json_line(self)
    }

    fn to_human(&self) -> String {
        if self.files.is_empty() {
            return "No recent project files.".to_string();
        }
        let mut lines = vec![format!("{} recent project file(s):", self.count)];
        for entry in &self.files {
            let marker = if entry.current { "*" } else { " " };
            let missing = if entry.exists { "" } else { " (missing)" };
            lines.push(format!("{} {}{}", marker, entry.path, missing));
        }
        lines.join("\n")
    }
}

/// List recently opened project files, most recent first.
pub fn file_recent(ctx: &Context) -> Result<RecentResult> {
    let files: Vec<RecentEntry> = ctx
        .config
        .recent
        .iter()
        .map(|p| RecentEntry {
            path: p.display().to_string(),
            exists: p.exists(),
            current: ctx.config.data_file.as_deref() == Some(p.as_path()),
        })
        .collect();
    Ok(RecentResult {
        count: files.len(),
        files,
    })
}

#[derive(Serialize)]
pub struct FileShowResult {
    pub path: String,
    pub source: String,
    pub exists: bool,
}

impl Output for FileShowResult {
    fn to_json(&self) -> String {
        json_line(self)
    }

    fn to_human(&self) -> String {
        let missing = if self.exists { "" } else { " (missing)" };
        format!("{}{} (from {})", self.path, missing, self.source)
    }
}

/// Show which project file is in use and where that choice came from.
pub fn file_show(ctx: &Context) -> Result<FileShowResult> {
    let resolved = ctx.data_file()?;
    let path = storage::resolve_user_path(&resolved.value)?;
    Ok(FileShowResult {
        exists: path.exists(),
        path: path.display().to_string(),
        source: resolved.source.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::super::test_support::context_with_file;
    use super::*;
    use crate::Error;
    use crate::commands::project_add;
    use crate::config::TrackerConfig;
    use crate::test_utils::TestEnv;

    #[test]
    fn test_file_new_remembers_file() {
        let env = TestEnv::new();
        let ctx = context_with_file(&env);

        let config = TrackerConfig::load(env.config_path());
        let expected = env.data_file().canonicalize().unwrap();
        assert_eq!(config.data_file.as_deref(), Some(expected.as_path()));
        assert_eq!(config.recent, vec![expected]);
        assert_eq!(file_show(&ctx).unwrap().source, "config");
    }

    #[test]
    fn test_file_new_refuses_existing() {
        let env = TestEnv::new();
        let mut ctx = context_with_file(&env);
        assert!(matches!(
            file_new(&mut ctx, &env.data_file()),
            Err(Error::DataFileExists(_))
        ));
    }

    #[test]
    fn test_file_new_requires_json() {
        let env = TestEnv::new();
        let mut ctx = Context::with_config_dir(env.config_path().to_path_buf(), None);
        let path = env.sync_dir.path().join("tasks.txt");
        assert!(matches!(file_new(&mut ctx, &path), Err(Error::InvalidInput(_))));
        assert!(!path.exists());
    }

    #[test]
    fn test_file_open_missing_and_create() {
        let env = TestEnv::new();
        let mut ctx = Context::with_config_dir(env.config_path().to_path_buf(), None);
        let path = env.sync_dir.path().join("Other.json");

        assert!(matches!(
            file_open(&mut ctx, &path, false),
            Err(Error::DataFileMissing(_))
        ));
        let result = file_open(&mut ctx, &path, true).unwrap();
        assert!(result.created);
        assert!(path.exists());

        let again = file_open(&mut ctx, &path, false).unwrap();
        assert!(!again.created);
    }

    #[test]
    fn test_switching_files_resets_selection() {
        let env = TestEnv::new();
        let mut ctx = context_with_file(&env);
        project_add(&mut ctx, "Thesis").unwrap();
        assert!(ctx.config.active_project.is_some());

        let other = env.sync_dir.path().join("Other.json");
        file_new(&mut ctx, &other).unwrap();
        assert_eq!(ctx.config.active_project, None);

        let recent = file_recent(&ctx).unwrap();
        assert_eq!(recent.count, 2);
        assert!(recent.files[0].current);
        assert!(recent.files[0].path.ends_with("Other.json"));
        assert!(!recent.files[1].current);
    }

    #[test]
    fn test_file_new_in_folder_uses_default_name() {
        let env = TestEnv::new();
        let mut ctx = Context::with_config_dir(env.config_path().to_path_buf(), None);

        let result = file_new(&mut ctx, env.sync_dir.path()).unwrap();
        assert!(result.path.ends_with("ThesisTracker.json"));
        assert!(env.data_file().exists());
    }

    #[test]
    fn test_file_show_prefers_flag() {
        let env = TestEnv::new();
        let mut ctx = context_with_file(&env);
        ctx.file_flag = Some(env.sync_dir.path().join("Elsewhere.json"));

        let shown = file_show(&ctx).unwrap();
        assert_eq!(shown.source, "cli");
        assert!(!shown.exists);
    }
}
