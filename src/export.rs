//! To-do list export.
//!
//! Two renderings of the same selection:
//! - `Text`: the plain checklist, one `[ ]`/`[x]` line per task
//! - `Html`: a print-ready page (open it in a browser and print to PDF)
//!
//! Both list tasks in due-date order with undated tasks last.

use crate::models::{Board, Project, Task};
use crate::{Error, Result};
use chrono::NaiveDate;
use clap::ValueEnum;
use serde::Serialize;
use std::fs;
use std::path::Path;

const RULE_WIDTH: usize = 32;

/// Export output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Plain-text checklist
    #[default]
    #[value(alias = "txt")]
    Text,
    /// Print-ready HTML page
    #[value(alias = "htm")]
    Html,
}

/// What to export.
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Project IDs or names to include; empty means every project
    pub projects: Vec<String>,
    /// Also list completed tasks
    pub include_completed: bool,
    pub format: ExportFormat,
}

/// What an export wrote.
#[derive(Debug, Clone, Serialize)]
pub struct ExportSummary {
    pub path: String,
    pub format: ExportFormat,
    pub projects: usize,
    pub tasks: usize,
}

/// Resolve the selection against the board, keeping board order.
fn selected_projects<'a>(board: &'a Board, keys: &[String]) -> Result<Vec<&'a Project>> {
    if board.is_empty() {
        return Err(Error::InvalidInput(
            "There are no projects to export".to_string(),
        ));
    }
    for key in keys {
        board.find_project(key)?;
    }
    Ok(board
        .projects
        .iter()
        .filter(|p| keys.is_empty() || keys.iter().any(|k| p.matches(k)))
        .collect())
}

fn included_tasks<'a>(project: &'a Project, include_completed: bool) -> Vec<&'a Task> {
    project
        .sorted_tasks(None)
        .into_iter()
        .filter(|t| include_completed || !t.is_completed())
        .collect()
}

/// Render the export and return the document plus its summary counts.
pub fn render(board: &Board, options: &ExportOptions, today: NaiveDate) -> Result<(String, usize, usize)> {
    let projects = selected_projects(board, &options.projects)?;
    let mut sections: Vec<(&Project, Vec<&Task>)> = projects
        .into_iter()
        .map(|p| (p, included_tasks(p, options.include_completed)))
        .collect();
    // The checklist leaves out projects with nothing to do; the HTML page keeps them.
    if options.format == ExportFormat::Text {
        sections.retain(|(_, tasks)| !tasks.is_empty());
    }

    let body = match options.format {
        ExportFormat::Text => render_text(&sections, today),
        ExportFormat::Html => render_html(&sections, today),
    };
    let task_count = sections.iter().map(|(_, tasks)| tasks.len()).sum();
    Ok((body, sections.len(), task_count))
}

/// Render and write the export to `path`.
pub fn export_to_file(
    board: &Board,
    options: &ExportOptions,
    today: NaiveDate,
    path: &Path,
) -> Result<ExportSummary> {
    let (body, projects, tasks) = render(board, options, today)?;
    fs::write(path, body)?;
    tracing::info!(path = %path.display(), projects, tasks, "exported to-do list");
    Ok(ExportSummary {
        path: path.display().to_string(),
        format: options.format,
        projects,
        tasks,
    })
}

fn render_text(sections: &[(&Project, Vec<&Task>)], today: NaiveDate) -> String {
    let mut lines: Vec<String> = vec![
        "ThesisTracker – To-Do List".to_string(),
        format!("Generated: {}", today.format("%Y-%m-%d")),
        String::new(),
    ];

    for (project, tasks) in sections {
        lines.push("=".repeat(RULE_WIDTH));
        lines.push(format!("PROJECT: {}", project.name));
        lines.push("-".repeat(RULE_WIDTH));
        for task in tasks {
            let bx = if task.is_completed() { "[x]" } else { "[ ]" };
            let due = task
                .due_date
                .map(|d| format!("  Due: {}", d.format("%Y-%m-%d")))
                .unwrap_or_default();
            lines.push(format!("{} {}{}", bx, task.title, due));
        }
        lines.push(String::new());
    }

    lines.join("\n")
}

fn render_html(sections: &[(&Project, Vec<&Task>)], today: NaiveDate) -> String {
    let mut html = String::from(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>To-Do List</title>
<style>
  body { font-family: Helvetica, Arial, sans-serif; font-size: 11pt; }
  h1 { font-size: 14pt; margin-bottom: 10px; }
  h2 { font-size: 12pt; margin-top: 18px; margin-bottom: 6px; }
  ul { list-style-type: none; padding-left: 0; margin-left: 0; }
  li { margin-bottom: 6px; }
  .generated { color: #666; font-size: 9pt; }
</style>
</head>
<body>
<h1>To-Do List</h1>
"#,
    );
    html.push_str(&format!(
        "<p class=\"generated\">Generated {}</p>\n",
        today.format("%Y-%m-%d")
    ));

    for (project, tasks) in sections {
        html.push_str(&format!("<h2>{}</h2>\n<ul>\n", escape_html(&project.name)));
        for task in tasks {
            let bx = if task.is_completed() { "☑" } else { "☐" };
            let due = task
                .due_date
                .map(|d| format!(" — due {}", d.format("%Y-%m-%d")))
                .unwrap_or_default();
            html.push_str(&format!(
                "<li>{} {}{}</li>\n",
                bx,
                escape_html(&task.title),
                due
            ));
        }
        html.push_str("</ul>\n");
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
