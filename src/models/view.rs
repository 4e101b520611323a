//! Active and completed views of a board.
//!
//! A view has one column per project, in board order. Each column holds the
//! project's tasks with the view's status, sorted by due date with undated
//! tasks last.

use super::{Board, Task, TaskStatus};
use serde::Serialize;

/// Which tasks a view shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    Active,
    Completed,
}

impl ViewKind {
    pub fn status(self) -> TaskStatus {
        match self {
            ViewKind::Active => TaskStatus::Active,
            ViewKind::Completed => TaskStatus::Completed,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ViewKind::Active => "Active Tasks",
            ViewKind::Completed => "Completed Tasks",
        }
    }
}

/// One project's slice of a view.
#[derive(Debug, Clone, Serialize)]
pub struct ViewColumn {
    pub project_id: String,
    pub project_name: String,
    /// Whether this is the selected project
    pub selected: bool,
    pub tasks: Vec<Task>,
}

/// A board projected onto one status.
#[derive(Debug, Clone, Serialize)]
pub struct BoardView {
    pub kind: ViewKind,
    pub columns: Vec<ViewColumn>,
}

impl BoardView {
    /// Build the view. `selected` is a project ID or name.
    ///
    /// Every project gets a column, even when it has no matching tasks.
    pub fn build(board: &Board, kind: ViewKind, selected: Option<&str>) -> Self {
        let columns = board
            .projects
            .iter()
            .map(|p| ViewColumn {
                project_id: p.id.clone(),
                project_name: p.name.clone(),
                selected: selected.is_some_and(|key| p.matches(key)),
                tasks: p
                    .sorted_tasks(Some(kind.status()))
                    .into_iter()
                    .cloned()
                    .collect(),
            })
            .collect();
        Self { kind, columns }
    }

    /// Number of tasks across all columns.
    pub fn task_count(&self) -> usize {
        self.columns.iter().map(|c| c.tasks.len()).sum()
    }

    /// Whether the view shows the task with `id`.
    pub fn contains_task(&self, id: &str) -> bool {
        self.columns
            .iter()
            .any(|c| c.tasks.iter().any(|t| t.id == id))
    }
}
