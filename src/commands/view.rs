//! Board views and to-do list export.

use super::{Context, Output, json_line, today};
use crate::Result;
use crate::export::{self, ExportFormat, ExportOptions, ExportSummary};
use crate::models::view::{BoardView, ViewKind};
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
pub struct ViewResult {
    pub task_count: usize,
    #[serde(flatten)]
    pub view: BoardView,
}

impl Output for ViewResult {
    fn to_json(&self) -> String {
        json_line(self)
    }

    fn to_human(&self) -> String {
        if self.view.columns.is_empty() {
            return "No projects yet. Add one with `tt project add <name>`.".to_string();
        }
        let mut lines = vec![format!("{} ({})", self.view.kind.title(), self.task_count)];
        for column in &self.view.columns {
            lines.push(String::new());
            let marker = if column.selected { " *" } else { "" };
            lines.push(format!("{} [{}]{}", column.project_name, column.project_id, marker));
            if column.tasks.is_empty() {
                lines.push("  (nothing here)".to_string());
            }
            for task in &column.tasks {
                let due = match (self.view.kind, task.due_date, task.completed_at) {
                    (ViewKind::Completed, _, Some(at)) => {
                        format!("  done {}", at.format("%Y-%m-%d"))
                    }
                    (_, Some(d), _) => format!("  due {}", d.format("%Y-%m-%d")),
                    _ => String::new(),
                };
                lines.push(format!("  [{}] {}{}", task.id, task.title, due));
            }
        }
        lines.join("\n")
    }
}

/// Show every project's active or completed tasks.
pub fn view(ctx: &Context, kind: ViewKind) -> Result<ViewResult> {
    let storage = ctx.open_storage()?;
    let selected = ctx
        .selected_project(&storage.board)
        .or_else(|| storage.board.projects.first())
        .map(|p| p.id.clone());
    let view = BoardView::build(&storage.board, kind, selected.as_deref());
    Ok(ViewResult {
        task_count: view.task_count(),
        view,
    })
}

#[derive(Serialize)]
pub struct ExportResult(pub ExportSummary);

impl Output for ExportResult {
    fn to_json(&self) -> String {
        json_line(self)
    }

    fn to_human(&self) -> String {
        format!(
            "Exported {} task{} from {} project{} to {}",
            self.0.tasks,
            if self.0.tasks == 1 { "" } else { "s" },
            self.0.projects,
            if self.0.projects == 1 { "" } else { "s" },
            self.0.path
        )
    }
}

/// Export a to-do list for the chosen projects (all when none are named).
pub fn export(
    ctx: &Context,
    output: &Path,
    projects: &[String],
    include_completed: bool,
    format: ExportFormat,
) -> Result<ExportResult> {
    let storage = ctx.open_storage()?;
    let options = ExportOptions {
        projects: projects.to_vec(),
        include_completed,
        format,
    };
    let summary = export::export_to_file(&storage.board, &options, today(), output)?;
    Ok(ExportResult(summary))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::context_with_file;
    use super::*;
    use crate::Error;
    use crate::commands::{project_add, task_add, task_done};
    use crate::test_utils::TestEnv;
    use std::fs;

    #[test]
    fn test_view_moves_completed_task() {
        let env = TestEnv::new();
        let mut ctx = context_with_file(&env);
        project_add(&mut ctx, "Thesis").unwrap();
        project_add(&mut ctx, "Empty").unwrap();
        let later = task_add(&ctx, "Later", None, Some("2026-12-01")).unwrap().task.id;
        let sooner = task_add(&ctx, "Sooner", None, Some("2026-11-01")).unwrap().task.id;
        let undated = task_add(&ctx, "Someday", None, None).unwrap().task.id;

        let active = view(&ctx, ViewKind::Active).unwrap();
        assert_eq!(active.view.columns.len(), 2);
        assert!(active.view.columns[0].selected);
        let order: Vec<&str> = active.view.columns[0].tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(order, vec![sooner.as_str(), later.as_str(), undated.as_str()]);

        task_done(&ctx, &sooner).unwrap();
        let active = view(&ctx, ViewKind::Active).unwrap();
        let completed = view(&ctx, ViewKind::Completed).unwrap();
        assert!(!active.view.contains_task(&sooner));
        assert!(completed.view.contains_task(&sooner));
        assert_eq!(completed.task_count, 1);
        assert!(completed.to_human().starts_with("Completed Tasks (1)"));
        assert!(completed.to_human().contains("(nothing here)"));
    }

    #[test]
    fn test_export_writes_file() {
        let env = TestEnv::new();
        let mut ctx = context_with_file(&env);
        project_add(&mut ctx, "Thesis").unwrap();
        task_add(&ctx, "Write conclusion", None, Some("2026-11-20")).unwrap();

        let out = env.sync_dir.path().join("todo.txt");
        let result = export(&ctx, &out, &[], false, ExportFormat::Text).unwrap();
        assert_eq!(result.0.tasks, 1);

        let content = fs::read_to_string(&out).unwrap();
        assert!(content.contains("PROJECT: Thesis"));
        assert!(content.contains("[ ] Write conclusion  Due: 2026-11-20"));
    }

    #[test]
    fn test_export_html_and_unknown_project() {
        let env = TestEnv::new();
        let mut ctx = context_with_file(&env);
        project_add(&mut ctx, "Thesis").unwrap();
        project_add(&mut ctx, "Empty").unwrap();
        task_add(&ctx, "Write conclusion", None, None).unwrap();

        let out = env.sync_dir.path().join("todo.html");
        let result = export(&ctx, &out, &[], false, ExportFormat::Html).unwrap();
        assert_eq!(result.0.format, ExportFormat::Html);
        assert_eq!(result.0.projects, 2);
        assert!(fs::read_to_string(&out).unwrap().contains("<h2>Empty</h2>"));

        let missing = env.sync_dir.path().join("missing.txt");
        let names = vec!["Nope".to_string()];
        assert!(matches!(
            export(&ctx, &missing, &names, false, ExportFormat::Text),
            Err(Error::NotFound(_))
        ));
        assert!(!missing.exists());
    }
}
