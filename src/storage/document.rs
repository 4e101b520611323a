//! On-disk JSON document format.
//!
//! The reader is lenient: it accepts files written by older releases, which
//! carry no IDs and may omit fields, and fills in the same defaults those
//! releases used. The writer always emits every field.

use crate::models::{Board, PROJECT_ID_PREFIX, Project, TASK_ID_PREFIX, Task, TaskStatus};
use crate::storage::{DOCUMENT_VERSION, validate_id};
use crate::{Error, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

const UNTITLED_PROJECT: &str = "Untitled";
const UNTITLED_TASK: &str = "Untitled Task";
const DATE_FORMAT: &str = "%Y-%m-%d";

fn default_version() -> u32 {
    DOCUMENT_VERSION
}

/// Top-level document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredDocument {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    pub projects: Vec<StoredProject>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredProject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub tasks: Vec<StoredTask>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredTask {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default)]
    pub title: Option<String>,

    /// ISO date; null or empty means no due date
    #[serde(default)]
    pub due_date: Option<String>,

    #[serde(default)]
    pub completed: bool,

    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Result of decoding a document.
#[derive(Debug)]
pub struct Decoded {
    pub board: Board,
    /// IDs were missing, malformed or duplicated and had to be assigned
    pub ids_assigned: bool,
}

impl StoredDocument {
    /// Capture the full board.
    pub fn from_board(board: &Board) -> Self {
        Self {
            version: DOCUMENT_VERSION,
            projects: board
                .projects
                .iter()
                .map(|p| StoredProject {
                    id: Some(p.id.clone()),
                    name: Some(p.name.clone()),
                    tasks: p
                        .tasks
                        .iter()
                        .map(|t| StoredTask {
                            id: Some(t.id.clone()),
                            title: Some(t.title.clone()),
                            due_date: t.due_date.map(|d| d.format(DATE_FORMAT).to_string()),
                            completed: t.is_completed(),
                            completed_at: t.completed_at,
                        })
                        .collect(),
                })
                .collect(),
        }
    }

    /// Rebuild the in-memory board.
    pub fn into_board(self) -> Result<Decoded> {
        if self.version > DOCUMENT_VERSION {
            return Err(Error::UnsupportedVersion(self.version));
        }

        let mut board = Board::new();
        let mut ids_assigned = false;

        for stored in self.projects {
            let name = stored
                .name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| UNTITLED_PROJECT.to_string());
            let id = match usable_id(&board, stored.id, PROJECT_ID_PREFIX) {
                Some(id) => id,
                None => {
                    ids_assigned = true;
                    board.fresh_id(PROJECT_ID_PREFIX, &name)
                }
            };
            board.projects.push(Project::new(id, name));
            let project_idx = board.projects.len() - 1;

            for stored_task in stored.tasks {
                let title = stored_task
                    .title
                    .as_deref()
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .unwrap_or(UNTITLED_TASK)
                    .to_string();
                let due_date = parse_stored_date(stored_task.due_date.as_deref(), &title)?;
                let id = match usable_id(&board, stored_task.id, TASK_ID_PREFIX) {
                    Some(id) => id,
                    None => {
                        ids_assigned = true;
                        board.fresh_id(TASK_ID_PREFIX, &title)
                    }
                };

                let mut task = Task::new(id, title, due_date);
                if stored_task.completed {
                    task.status = TaskStatus::Completed;
                    task.completed_at = stored_task.completed_at;
                }
                board.projects[project_idx].tasks.push(task);
            }
        }

        Ok(Decoded {
            board,
            ids_assigned,
        })
    }
}

/// Keep a stored ID only if it is well-formed and not already taken.
fn usable_id(board: &Board, id: Option<String>, prefix: &str) -> Option<String> {
    id.filter(|id| validate_id(id, prefix).is_ok() && !board.contains_id(id))
}

fn parse_stored_date(raw: Option<&str>, title: &str) -> Result<Option<NaiveDate>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, DATE_FORMAT)
            .map(Some)
            .map_err(|e| {
                Error::InvalidInput(format!(
                    "Invalid due date '{}' on task '{}': {}",
                    s, title, e
                ))
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(json: &str) -> Decoded {
        let doc: StoredDocument = serde_json::from_str(json).unwrap();
        doc.into_board().unwrap()
    }

    #[test]
    fn test_decode_legacy_document_without_ids() {
        let decoded = decode(
            r#"{
                "version": 1,
                "projects": [
                    {"name": "Chapter 2", "tasks": [
                        {"title": "Outline", "due_date": "2026-11-03", "completed": false},
                        {"title": "Read papers", "due_date": null, "completed": true}
                    ]}
                ]
            }"#,
        );

        assert!(decoded.ids_assigned);
        let project = &decoded.board.projects[0];
        assert!(project.id.starts_with("tp-"));
        assert_eq!(project.name, "Chapter 2");
        assert_eq!(
            project.tasks[0].due_date,
            NaiveDate::from_ymd_opt(2026, 11, 3)
        );
        assert!(project.tasks[1].is_completed());
        assert!(project.tasks[1].due_date.is_none());
    }

    #[test]
    fn test_decode_fills_defaults() {
        let decoded = decode(
            r#"{"projects": [{"tasks": [{"title": "   "}, {"due_date": ""}]}]}"#,
        );
        let project = &decoded.board.projects[0];
        assert_eq!(project.name, "Untitled");
        assert_eq!(project.tasks[0].title, "Untitled Task");
        assert_eq!(project.tasks[1].title, "Untitled Task");
        assert!(project.tasks[1].due_date.is_none());
        assert!(!project.tasks[1].is_completed());
    }

    #[test]
    fn test_decode_empty_object() {
        let decoded = decode("{}");
        assert!(decoded.board.is_empty());
        assert!(!decoded.ids_assigned);
    }

    #[test]
    fn test_decode_keeps_valid_ids_and_replaces_duplicates() {
        let decoded = decode(
            r#"{"projects": [
                {"id": "tp-0001", "name": "A", "tasks": [
                    {"id": "tt-00aa", "title": "one"},
                    {"id": "tt-00aa", "title": "two"}
                ]}
            ]}"#,
        );
        let tasks = &decoded.board.projects[0].tasks;
        assert_eq!(decoded.board.projects[0].id, "tp-0001");
        assert_eq!(tasks[0].id, "tt-00aa");
        assert_ne!(tasks[1].id, "tt-00aa");
        assert!(decoded.ids_assigned);
    }

    #[test]
    fn test_decode_rejects_newer_version() {
        let doc: StoredDocument = serde_json::from_str(r#"{"version": 2}"#).unwrap();
        assert!(matches!(doc.into_board(), Err(Error::UnsupportedVersion(2))));
    }

    #[test]
    fn test_decode_rejects_bad_date() {
        let doc: StoredDocument = serde_json::from_str(
            r#"{"projects": [{"name": "P", "tasks": [{"title": "T", "due_date": "next week"}]}]}"#,
        )
        .unwrap();
        assert!(matches!(doc.into_board(), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_encode_writes_every_field() {
        let mut board = Board::new();
        let project = board.add_project("P").unwrap().id.clone();
        board.add_task(&project, "T", None).unwrap();

        let value = serde_json::to_value(StoredDocument::from_board(&board)).unwrap();
        let task = &value["projects"][0]["tasks"][0];
        assert_eq!(value["version"], 1);
        assert_eq!(task["title"], "T");
        assert!(task["due_date"].is_null());
        assert_eq!(task["completed"], false);
        assert!(task["completed_at"].is_null());
    }
}
