//! Task commands: add, edit, done, reopen, delete, move.

use super::{Context, Output, json_line, parse_optional_due};
use crate::Result;
use crate::models::{Board, DueChange, Task};
use crate::storage::validate_task_id;
use chrono::Utc;
use serde::Serialize;

/// A task together with the project it ended up in.
#[derive(Debug, Serialize)]
pub struct TaskResult {
    pub action: &'static str,
    /// False when the command found the task already in the requested state
    pub changed: bool,
    pub project_id: String,
    pub project_name: String,
    pub task: Task,
}

impl TaskResult {
    fn new(board: &Board, id: &str, action: &'static str, changed: bool) -> Result<Self> {
        let (project, task) = board.find_task(id)?;
        Ok(Self {
            action,
            changed,
            project_id: project.id.clone(),
            project_name: project.name.clone(),
            task: task.clone(),
        })
    }
}

impl Output for TaskResult {
    fn to_json(&self) -> String {
        json_line(self)
    }

    fn to_human(&self) -> String {
        let due = self
            .task
            .due_date
            .map(|d| format!(" (due {})", d.format("%Y-%m-%d")))
            .unwrap_or_default();
        let verb = match (self.action, self.changed) {
            ("added", _) => "Added",
            ("updated", _) => "Updated",
            ("completed", true) => "Completed",
            ("completed", false) => "Already completed:",
            ("reopened", true) => "Reopened",
            ("reopened", false) => "Already active:",
            ("moved", true) => "Moved",
            _ => "Unchanged:",
        };
        format!(
            "{} task {} \"{}\"{} in {}",
            verb, self.task.id, self.task.title, due, self.project_name
        )
    }
}

/// Add a task to the named project, or to the selected one.
pub fn task_add(
    ctx: &Context,
    title: &str,
    project: Option<&str>,
    due: Option<&str>,
) -> Result<TaskResult> {
    let due_date = parse_optional_due(due)?;
    let mut storage = ctx.open_storage()?;
    let project_id = ctx.target_project(&storage.board, project)?.id.clone();
    let id = storage.board.add_task(&project_id, title, due_date)?.id.clone();
    storage.save()?;

    tracing::info!(id = %id, project = %project_id, "added task");
    TaskResult::new(&storage.board, &id, "added", true)
}

/// Change a task's title and/or due date.
pub fn task_edit(
    ctx: &Context,
    id: &str,
    title: Option<&str>,
    due: Option<&str>,
    clear_due: bool,
) -> Result<TaskResult> {
    validate_task_id(id)?;
    let change = if clear_due {
        DueChange::Clear
    } else {
        match parse_optional_due(due)? {
            Some(date) => DueChange::Set(date),
            None => DueChange::Keep,
        }
    };
    let changed = title.is_some() || change != DueChange::Keep;

    let mut storage = ctx.open_storage()?;
    storage.board.edit_task(id, title, change)?;
    if changed {
        storage.save()?;
        tracing::info!(id = %id, "updated task");
    }
    TaskResult::new(&storage.board, id, "updated", changed)
}

/// Mark a task completed, stamping the completion time.
pub fn task_done(ctx: &Context, id: &str) -> Result<TaskResult> {
    validate_task_id(id)?;
    let mut storage = ctx.open_storage()?;
    let was_completed = storage.board.find_task(id)?.1.is_completed();
    storage.board.complete_task(id, Utc::now())?;
    if !was_completed {
        storage.save()?;
        tracing::info!(id = %id, "completed task");
    }
    TaskResult::new(&storage.board, id, "completed", !was_completed)
}

/// Move a completed task back to the active view.
pub fn task_reopen(ctx: &Context, id: &str) -> Result<TaskResult> {
    validate_task_id(id)?;
    let mut storage = ctx.open_storage()?;
    let was_completed = storage.board.find_task(id)?.1.is_completed();
    storage.board.reopen_task(id)?;
    if was_completed {
        storage.save()?;
        tracing::info!(id = %id, "reopened task");
    }
    TaskResult::new(&storage.board, id, "reopened", was_completed)
}

#[derive(Serialize)]
pub struct TaskDeleted {
    pub id: String,
    pub title: String,
    pub project_id: String,
    pub project_name: String,
}

impl Output for TaskDeleted {
    fn to_json(&self) -> String {
        json_line(self)
    }

    fn to_human(&self) -> String {
        format!(
            "Deleted task {} \"{}\" from {}",
            self.id, self.title, self.project_name
        )
    }
}

pub fn task_delete(ctx: &Context, id: &str) -> Result<TaskDeleted> {
    validate_task_id(id)?;
    let mut storage = ctx.open_storage()?;
    let (project_id, project_name) = {
        let (project, _) = storage.board.find_task(id)?;
        (project.id.clone(), project.name.clone())
    };
    let task = storage.board.remove_task(id)?;
    storage.save()?;

    tracing::info!(id = %id, project = %project_id, "deleted task");
    Ok(TaskDeleted {
        id: task.id,
        title: task.title,
        project_id,
        project_name,
    })
}

/// Move a task to the end of another project.
pub fn task_move(ctx: &Context, id: &str, target: &str) -> Result<TaskResult> {
    validate_task_id(id)?;
    let mut storage = ctx.open_storage()?;
    let from = storage.board.find_task(id)?.0.id.clone();
    let to = storage.board.find_project(target)?.id.clone();
    storage.board.move_task(id, &to)?;

    let changed = from != to;
    if changed {
        storage.save()?;
        tracing::info!(id = %id, from = %from, to = %to, "moved task");
    }
    TaskResult::new(&storage.board, id, "moved", changed)
}
