//! Storage layer for ThesisTracker data.
//!
//! All projects and tasks live in one JSON document at a user-chosen path,
//! usually inside a Dropbox/iCloud folder so it syncs between machines.
//! The document is read fully into memory on open and rewritten fully on
//! every save; there is no partial or incremental persistence.
//!
//! Saves go through a temp file in the same directory that is then renamed
//! over the target, so a crash mid-save never leaves a truncated document.

pub mod document;

pub use document::StoredDocument;

use crate::models::{Board, PROJECT_ID_PREFIX, TASK_ID_PREFIX};
use crate::{Error, Result};
use chrono::NaiveDate;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Newest document version this build reads and the one it writes.
pub const DOCUMENT_VERSION: u32 = 1;

/// Suggested file name for a new project file.
pub const DEFAULT_FILE_NAME: &str = "ThesisTracker.json";

/// Mode for a project file written where none existed (unix only).
#[cfg(unix)]
const NEW_FILE_MODE: u32 = 0o644;

/// Markers sync services put in the names of conflicting copies.
const CONFLICT_MARKERS: [&str; 3] = ["conflict", "conflicted copy", "duplicate"];

/// An open project file and the board loaded from it.
#[derive(Debug)]
pub struct Storage {
    path: PathBuf,
    pub board: Board,
}

impl Storage {
    /// Open the project file at `path`, creating an empty one if it is missing.
    pub fn open(path: &Path) -> Result<Self> {
        let path = resolve_user_path(path)?;
        if path.exists() {
            Self::load(path)
        } else {
            Self::create_at(path)
        }
    }

    /// Create a new, empty project file. Fails if the file already exists.
    pub fn create(path: &Path) -> Result<Self> {
        let path = resolve_user_path(path)?;
        if path.exists() {
            return Err(Error::DataFileExists(path));
        }
        Self::create_at(path)
    }

    /// Open a project file that must already exist.
    pub fn open_existing(path: &Path) -> Result<Self> {
        let path = resolve_user_path(path)?;
        if !path.exists() {
            return Err(Error::DataFileMissing(path));
        }
        Self::load(path)
    }

    fn create_at(path: PathBuf) -> Result<Self> {
        let storage = Self {
            path,
            board: Board::new(),
        };
        storage.save()?;
        tracing::info!(path = %storage.path.display(), "created project file");
        Ok(storage)
    }

    fn load(path: PathBuf) -> Result<Self> {
        let content = fs::read_to_string(&path)?;
        let doc: StoredDocument = serde_json::from_str(&content)?;
        let decoded = doc.into_board()?;

        let storage = Self {
            path,
            board: decoded.board,
        };

        // IDs have to be stable between invocations, so write them back now
        // rather than on the next mutating command.
        if decoded.ids_assigned {
            tracing::info!(path = %storage.path.display(), "assigning IDs to project file");
            storage.save()?;
        }

        tracing::debug!(
            path = %storage.path.display(),
            projects = storage.board.projects.len(),
            tasks = storage.board.task_count(),
            "loaded project file"
        );
        Ok(storage)
    }

    /// Path of the project file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rewrite the whole document.
    pub fn save(&self) -> Result<()> {
        write_document(&self.path, &self.board)
    }

    /// Sync-conflict copies sitting next to this project file.
    pub fn conflict_candidates(&self) -> Vec<PathBuf> {
        conflict_candidates(&self.path)
    }
}

/// Serialize `board` and atomically replace the file at `path`.
pub fn write_document(path: &Path, board: &Board) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let json = serde_json::to_string_pretty(&StoredDocument::from_board(board))?;

    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(json.as_bytes())?;
    tmp.as_file().sync_all()?;

    // Temp files are 0600. Keep the mode of the file being replaced, and give
    // a new file the usual 0644 so sync clients and other users can read it.
    if let Ok(meta) = fs::metadata(path) {
        let _ = fs::set_permissions(tmp.path(), meta.permissions());
    } else {
        set_new_file_mode(tmp.path())?;
    }

    tmp.persist(path).map_err(|e| Error::Io(e.error))?;
    tracing::debug!(path = %path.display(), bytes = json.len(), "saved project file");
    Ok(())
}

#[cfg(unix)]
fn set_new_file_mode(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(NEW_FILE_MODE))?;
    Ok(())
}

#[cfg(not(unix))]
fn set_new_file_mode(_path: &Path) -> Result<()> {
    Ok(())
}

/// Expand `~` and make `path` absolute.
///
/// The file itself does not need to exist, but when it does, symlinks are
/// resolved so the recent-files list never holds two spellings of one file.
pub fn resolve_user_path(path: &Path) -> Result<PathBuf> {
    let expanded = expand_home(path);
    let absolute = if expanded.is_absolute() {
        expanded
    } else {
        std::env::current_dir()?.join(expanded)
    };

    if absolute.exists() {
        return Ok(absolute.canonicalize()?);
    }

    match (absolute.parent(), absolute.file_name()) {
        (Some(parent), Some(name)) if parent.exists() => Ok(parent.canonicalize()?.join(name)),
        _ => Ok(absolute),
    }
}

/// Expand ~ in path to home directory.
pub fn expand_home(path: &Path) -> PathBuf {
    if let Ok(stripped) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    path.to_path_buf()
}

/// Find likely sync-conflict duplicates of `data_file` in its folder.
///
/// A candidate is another `*.json` file whose lowercase name contains the
/// data file's lowercase stem and a conflict marker. Unreadable folders
/// yield no candidates.
pub fn conflict_candidates(data_file: &Path) -> Vec<PathBuf> {
    let Some(folder) = data_file.parent() else {
        return Vec::new();
    };
    let stem = data_file
        .file_stem()
        .map(|s| s.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    let entries = match fs::read_dir(folder) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!(folder = %folder.display(), error = %e, "skipping conflict scan");
            return Vec::new();
        }
    };

    let mut hits: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.as_path() != data_file)
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .filter(|p| {
            let name = p
                .file_name()
                .map(|n| n.to_string_lossy().to_lowercase())
                .unwrap_or_default();
            name.contains(&stem) && CONFLICT_MARKERS.iter().any(|m| name.contains(m))
        })
        .collect();
    hits.sort();
    hits
}

/// Generate a unique ID for a project or task.
///
/// Format: `<prefix>-<4 hex chars>`
/// - Project prefix: "tp"
/// - Task prefix: "tt"
pub fn generate_id(prefix: &str, seed: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(seed.as_bytes());
    hasher.update(
        chrono::Utc::now()
            .timestamp_nanos_opt()
            .unwrap_or(0)
            .to_le_bytes(),
    );
    let hash = hasher.finalize();
    let hash_hex = format!("{:x}", hash);
    format!("{}-{}", prefix, &hash_hex[..4])
}

/// Validate that an ID matches the expected format.
pub fn validate_id(id: &str, prefix: &str) -> Result<()> {
    if !id.starts_with(&format!("{}-", prefix)) {
        return Err(Error::InvalidId(format!(
            "ID must start with '{}-', got: {}",
            prefix, id
        )));
    }

    let suffix = &id[prefix.len() + 1..];
    if suffix.len() != 4 || !suffix.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(Error::InvalidId(format!(
            "ID suffix must be 4 hex characters, got: {}",
            suffix
        )));
    }

    Ok(())
}

/// Validate a task ID (tt-xxxx format).
pub fn validate_task_id(id: &str) -> Result<()> {
    validate_id(id, TASK_ID_PREFIX)
}

/// Validate a project ID (tp-xxxx format).
pub fn validate_project_id(id: &str) -> Result<()> {
    validate_id(id, PROJECT_ID_PREFIX)
}

/// Parse a due date given on the command line.
///
/// Accepts `YYYY-MM-DD`, `today` and `tomorrow` (relative to `today`).
pub fn parse_due_date(s: &str, today: NaiveDate) -> Result<NaiveDate> {
    match s.trim().to_lowercase().as_str() {
        "today" => Ok(today),
        "tomorrow" => today
            .succ_opt()
            .ok_or_else(|| Error::InvalidInput("Date out of range".to_string())),
        other => NaiveDate::parse_from_str(other, "%Y-%m-%d").map_err(|_| {
            Error::InvalidInput(format!(
                "Invalid date '{}': expected YYYY-MM-DD, 'today' or 'tomorrow'",
                s
            ))
        }),
    }
}
