//! Project commands: add, list, rename, delete, select.

use super::{Context, Output, json_line};
use crate::Result;
use crate::models::{Project, TaskStatus};
use serde::Serialize;

/// A project with its task counts.
#[derive(Serialize)]
pub struct ProjectSummary {
    pub id: String,
    pub name: String,
    pub active: usize,
    pub completed: usize,
    pub selected: bool,
}

impl ProjectSummary {
    fn new(project: &Project, selected: bool) -> Self {
        Self {
            id: project.id.clone(),
            name: project.name.clone(),
            active: project.count(TaskStatus::Active),
            completed: project.count(TaskStatus::Completed),
            selected,
        }
    }
}

/// Result of `project add` and `project select`.
#[derive(Serialize)]
pub struct ProjectResult {
    pub action: &'static str,
    #[serde(flatten)]
    pub project: ProjectSummary,
}

impl Output for ProjectResult {
    fn to_json(&self) -> String {
        json_line(self)
    }

    fn to_human(&self) -> String {
        match self.action {
            "added" => {
                let mut out = format!("Added project {} \"{}\"", self.project.id, self.project.name);
                if self.project.selected {
                    out.push_str(" (selected)");
                }
                out
            }
            _ => format!(
                "Selected project {} \"{}\"",
                self.project.id, self.project.name
            ),
        }
    }
}

/// Create a project. The first project of a file becomes the selected one.
pub fn project_add(ctx: &mut Context, name: &str) -> Result<ProjectResult> {
    let mut storage = ctx.open_storage()?;
    let id = storage.board.add_project(name)?.id.clone();
    storage.save()?;

    let select = ctx.selected_project(&storage.board).is_none();
    if select {
        ctx.config.active_project = Some(id.clone());
        ctx.save_config()?;
    }

    let project = storage.board.find_project(&id)?;
    tracing::info!(id = %project.id, name = %project.name, "added project");
    Ok(ProjectResult {
        action: "added",
        project: ProjectSummary::new(project, select),
    })
}

#[derive(Serialize)]
pub struct ProjectList {
    pub count: usize,
    pub projects: Vec<ProjectSummary>,
}

impl Output for ProjectList {
    fn to_json(&self) -> String {
        json_line(self)
    }

    fn to_human(&self) -> String {
        if self.projects.is_empty() {
            return "No projects yet. Add one with `tt project add <name>`.".to_string();
        }
        let mut lines = vec![format!("{} project(s):", self.count)];
        for p in &self.projects {
            let marker = if p.selected { "*" } else { " " };
            lines.push(format!(
                "{} [{}] {} ({} active, {} completed)",
                marker, p.id, p.name, p.active, p.completed
            ));
        }
        lines.join("\n")
    }
}

/// List projects in file order.
pub fn project_list(ctx: &Context) -> Result<ProjectList> {
    let storage = ctx.open_storage()?;
    let selected = ctx
        .selected_project(&storage.board)
        .or_else(|| storage.board.projects.first())
        .map(|p| p.id.clone());

    let projects: Vec<ProjectSummary> = storage
        .board
        .projects
        .iter()
        .map(|p| ProjectSummary::new(p, selected.as_deref() == Some(p.id.as_str())))
        .collect();
    Ok(ProjectList {
        count: projects.len(),
        projects,
    })
}

#[derive(Serialize)]
pub struct ProjectRenamed {
    pub id: String,
    pub old_name: String,
    pub name: String,
}

impl Output for ProjectRenamed {
    fn to_json(&self) -> String {
        json_line(self)
    }

    fn to_human(&self) -> String {
        format!(
            "Renamed project {} from \"{}\" to \"{}\"",
            self.id, self.old_name, self.name
        )
    }
}

/// Rename a project. A selection that named it keeps pointing at it.
pub fn project_rename(ctx: &mut Context, key: &str, new_name: &str) -> Result<ProjectRenamed> {
    let mut storage = ctx.open_storage()?;
    let id = storage.board.find_project(key)?.id.clone();
    let was_selected = ctx
        .selected_project(&storage.board)
        .is_some_and(|p| p.id == id);
    let old_name = storage.board.rename_project(&id, new_name)?;
    storage.save()?;

    if was_selected && ctx.config.active_project.as_deref() != Some(id.as_str()) {
        ctx.config.active_project = Some(id.clone());
        ctx.save_config()?;
    }

    let name = storage.board.find_project(&id)?.name.clone();
    tracing::info!(id = %id, old = %old_name, new = %name, "renamed project");
    Ok(ProjectRenamed { id, old_name, name })
}

#[derive(Serialize)]
pub struct ProjectDeleted {
    pub id: String,
    pub name: String,
    pub tasks_removed: usize,
    /// Project selected after the delete, if any remain
    pub selected: Option<String>,
}

impl Output for ProjectDeleted {
    fn to_json(&self) -> String {
        json_line(self)
    }

    fn to_human(&self) -> String {
        format!(
            "Deleted project {} \"{}\" and {} task{}",
            self.id,
            self.name,
            self.tasks_removed,
            if self.tasks_removed == 1 { "" } else { "s" }
        )
    }
}

/// Delete a project together with its tasks.
pub fn project_delete(ctx: &mut Context, key: &str) -> Result<ProjectDeleted> {
    let mut storage = ctx.open_storage()?;
    let removed = storage.board.remove_project(key)?;
    storage.save()?;

    if ctx.selected_project(&storage.board).is_none() {
        ctx.config.active_project = storage.board.projects.first().map(|p| p.id.clone());
        ctx.save_config()?;
    }

    tracing::info!(id = %removed.id, tasks = removed.tasks.len(), "deleted project");
    Ok(ProjectDeleted {
        tasks_removed: removed.tasks.len(),
        id: removed.id,
        name: removed.name,
        selected: ctx.config.active_project.clone(),
    })
}

/// Make a project the default target for new tasks.
pub fn project_select(ctx: &mut Context, key: &str) -> Result<ProjectResult> {
    let storage = ctx.open_storage()?;
    let project = storage.board.find_project(key)?;
    ctx.config.active_project = Some(project.id.clone());
    ctx.save_config()?;

    Ok(ProjectResult {
        action: "selected",
        project: ProjectSummary::new(project, true),
    })
}
