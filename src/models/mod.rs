//! Data models for ThesisTracker entities.
//!
//! This module defines the core data structures:
//! - `Task` - A to-do item with an optional due date and a completion status
//! - `Project` - A named, ordered collection of tasks
//! - `Board` - Every project in one project file
//!
//! Tasks are owned by exactly one project: they only ever live inside a
//! project's `tasks` list, and every board operation preserves that.

pub mod view;

use crate::storage::generate_id;
use crate::{Error, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// ID prefix for projects (`tp-xxxx`).
pub const PROJECT_ID_PREFIX: &str = "tp";

/// ID prefix for tasks (`tt-xxxx`).
pub const TASK_ID_PREFIX: &str = "tt";

/// Completion status of a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Active,
    Completed,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Active => write!(f, "active"),
            TaskStatus::Completed => write!(f, "completed"),
        }
    }
}

/// How an edit should treat a task's due date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DueChange {
    /// Leave the due date as it is
    #[default]
    Keep,
    /// Replace the due date
    Set(NaiveDate),
    /// Remove the due date
    Clear,
}

/// A single to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier (e.g., "tt-a1b2")
    pub id: String,

    /// Task title
    pub title: String,

    /// Optional due date
    pub due_date: Option<NaiveDate>,

    /// Current status
    #[serde(default)]
    pub status: TaskStatus,

    /// When the task was completed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Create a new active task with the given ID and title.
    pub fn new(id: String, title: String, due_date: Option<NaiveDate>) -> Self {
        Self {
            id,
            title,
            due_date,
            status: TaskStatus::Active,
            completed_at: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    /// Mark the task completed. Returns false if it already was.
    pub fn complete(&mut self, now: DateTime<Utc>) -> bool {
        if self.is_completed() {
            return false;
        }
        self.status = TaskStatus::Completed;
        self.completed_at = Some(now);
        true
    }

    /// Move the task back to active. Returns false if it already was.
    pub fn reopen(&mut self) -> bool {
        if !self.is_completed() {
            return false;
        }
        self.status = TaskStatus::Active;
        self.completed_at = None;
        true
    }
}

/// Sort key placing dated tasks first, earliest first, and undated tasks last.
pub fn due_sort_key(task: &Task) -> (bool, NaiveDate) {
    (task.due_date.is_none(), task.due_date.unwrap_or(NaiveDate::MAX))
}

/// A named collection of tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Unique identifier (e.g., "tp-a1b2")
    pub id: String,

    /// Display name
    pub name: String,

    /// Tasks in insertion order
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Project {
    /// Create an empty project with the given ID and name.
    pub fn new(id: String, name: String) -> Self {
        Self {
            id,
            name,
            tasks: Vec::new(),
        }
    }

    /// Tasks in due-date order, optionally restricted to one status.
    ///
    /// The sort is stable, so tasks sharing a due date keep insertion order.
    pub fn sorted_tasks(&self, status: Option<TaskStatus>) -> Vec<&Task> {
        let mut tasks: Vec<&Task> = self
            .tasks
            .iter()
            .filter(|t| status.is_none_or(|s| t.status == s))
            .collect();
        tasks.sort_by_key(|t| due_sort_key(t));
        tasks
    }

    /// Number of tasks with the given status.
    pub fn count(&self, status: TaskStatus) -> usize {
        self.tasks.iter().filter(|t| t.status == status).count()
    }

    /// Whether `key` names this project (by ID or exact name).
    pub fn matches(&self, key: &str) -> bool {
        self.id == key || self.name == key
    }
}

/// Trim a user-supplied name, rejecting blank input.
pub fn normalize_name(raw: &str, what: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidInput(format!("{} cannot be empty", what)));
    }
    Ok(trimmed.to_string())
}

/// Every project in a project file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub projects: Vec<Project>,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// Total number of tasks across all projects.
    pub fn task_count(&self) -> usize {
        self.projects.iter().map(|p| p.tasks.len()).sum()
    }

    /// Whether any project or task already uses `id`.
    pub fn contains_id(&self, id: &str) -> bool {
        self.projects
            .iter()
            .any(|p| p.id == id || p.tasks.iter().any(|t| t.id == id))
    }

    /// Generate an ID with `prefix` that is not yet used on this board.
    pub(crate) fn fresh_id(&self, prefix: &str, seed: &str) -> String {
        let mut attempt = 0u32;
        loop {
            let id = generate_id(prefix, &format!("{}:{}", seed, attempt));
            if !self.contains_id(&id) {
                return id;
            }
            attempt += 1;
        }
    }

    fn project_index(&self, key: &str) -> Result<usize> {
        // IDs win over names so a project named like another's ID stays reachable.
        self.projects
            .iter()
            .position(|p| p.id == key)
            .or_else(|| self.projects.iter().position(|p| p.name == key))
            .ok_or_else(|| Error::NotFound(format!("project '{}'", key)))
    }

    fn task_location(&self, id: &str) -> Result<(usize, usize)> {
        self.projects
            .iter()
            .enumerate()
            .find_map(|(pi, p)| p.tasks.iter().position(|t| t.id == id).map(|ti| (pi, ti)))
            .ok_or_else(|| Error::NotFound(format!("task '{}'", id)))
    }

    fn ensure_unique_name(&self, name: &str, except: Option<usize>) -> Result<()> {
        let taken = self
            .projects
            .iter()
            .enumerate()
            .any(|(i, p)| Some(i) != except && p.name == name);
        if taken {
            return Err(Error::InvalidInput(format!(
                "A project named '{}' already exists",
                name
            )));
        }
        Ok(())
    }

    /// Find a project by ID, then by exact name.
    pub fn find_project(&self, key: &str) -> Result<&Project> {
        let idx = self.project_index(key)?;
        Ok(&self.projects[idx])
    }

    /// Mutable lookup with the same ID-then-name rules as `find_project`.
    /// Renames should go through `rename_project` so names stay unique.
    pub fn find_project_mut(&mut self, key: &str) -> Result<&mut Project> {
        let idx = self.project_index(key)?;
        Ok(&mut self.projects[idx])
    }

    /// Append a new, empty project.
    pub fn add_project(&mut self, name: &str) -> Result<&Project> {
        let name = normalize_name(name, "Project name")?;
        self.ensure_unique_name(&name, None)?;
        let id = self.fresh_id(PROJECT_ID_PREFIX, &name);
        self.projects.push(Project::new(id, name));
        Ok(&self.projects[self.projects.len() - 1])
    }

    /// Rename a project, returning its previous name.
    pub fn rename_project(&mut self, key: &str, new_name: &str) -> Result<String> {
        let idx = self.project_index(key)?;
        let new_name = normalize_name(new_name, "Project name")?;
        self.ensure_unique_name(&new_name, Some(idx))?;
        Ok(std::mem::replace(&mut self.projects[idx].name, new_name))
    }

    /// Remove a project together with all of its tasks.
    pub fn remove_project(&mut self, key: &str) -> Result<Project> {
        let idx = self.project_index(key)?;
        Ok(self.projects.remove(idx))
    }

    /// Add a new active task to a project.
    pub fn add_task(
        &mut self,
        project_key: &str,
        title: &str,
        due_date: Option<NaiveDate>,
    ) -> Result<&Task> {
        let idx = self.project_index(project_key)?;
        let title = normalize_name(title, "Task title")?;
        let id = self.fresh_id(TASK_ID_PREFIX, &title);
        let tasks = &mut self.projects[idx].tasks;
        tasks.push(Task::new(id, title, due_date));
        Ok(&tasks[tasks.len() - 1])
    }

    /// Find a task and the project that owns it.
    pub fn find_task(&self, id: &str) -> Result<(&Project, &Task)> {
        let (pi, ti) = self.task_location(id)?;
        let project = &self.projects[pi];
        Ok((project, &project.tasks[ti]))
    }

    pub fn find_task_mut(&mut self, id: &str) -> Result<&mut Task> {
        let (pi, ti) = self.task_location(id)?;
        Ok(&mut self.projects[pi].tasks[ti])
    }

    /// Change a task's title and/or due date.
    pub fn edit_task(&mut self, id: &str, title: Option<&str>, due: DueChange) -> Result<&Task> {
        let title = title.map(|t| normalize_name(t, "Task title")).transpose()?;
        let task = self.find_task_mut(id)?;
        if let Some(title) = title {
            task.title = title;
        }
        match due {
            DueChange::Keep => {}
            DueChange::Set(date) => task.due_date = Some(date),
            DueChange::Clear => task.due_date = None,
        }
        Ok(task)
    }

    /// Mark a task completed. Completing a completed task keeps its timestamp.
    pub fn complete_task(&mut self, id: &str, now: DateTime<Utc>) -> Result<&Task> {
        let task = self.find_task_mut(id)?;
        task.complete(now);
        Ok(task)
    }

    /// Move a completed task back to active.
    pub fn reopen_task(&mut self, id: &str) -> Result<&Task> {
        let task = self.find_task_mut(id)?;
        task.reopen();
        Ok(task)
    }

    /// Remove a task from its project.
    pub fn remove_task(&mut self, id: &str) -> Result<Task> {
        let (pi, ti) = self.task_location(id)?;
        Ok(self.projects[pi].tasks.remove(ti))
    }

    /// Move a task to the end of another project.
    ///
    /// The target is resolved before anything changes, so a bad target
    /// leaves the board untouched.
    pub fn move_task(&mut self, id: &str, target_key: &str) -> Result<&Task> {
        let target = self.project_index(target_key)?;
        let (pi, ti) = self.task_location(id)?;
        if pi == target {
            return Ok(&self.projects[pi].tasks[ti]);
        }
        let task = self.projects[pi].tasks.remove(ti);
        let tasks = &mut self.projects[target].tasks;
        tasks.push(task);
        Ok(&tasks[tasks.len() - 1])
    }
}
