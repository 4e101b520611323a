//! ThesisTracker CLI - thesis to-do lists in a single synced JSON file.

use clap::Parser;
use std::process;
use std::time::Instant;
use thesis_tracker::action_log;
use thesis_tracker::cli::{Cli, Commands, FileCommands, ProjectCommands, TaskCommands, ViewCommands};
use thesis_tracker::commands::{self, Context, Output};
use thesis_tracker::config::{OutputFormat, resolve_output_format};
use thesis_tracker::models::view::ViewKind;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn main() {
    init_tracing();

    let cli = Cli::parse();

    let mut ctx = match Context::load(cli.file.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            print_error(&e, cli.human_readable);
            process::exit(1);
        }
    };
    let human = resolve_output_format(cli.human_readable, &ctx.config).value == OutputFormat::Human;

    // Serialize command for logging
    let (cmd_name, args_json) = serialize_command(&cli.command);

    let start = Instant::now();
    let result = run_command(cli.command, &mut ctx, human);
    let duration = start.elapsed().as_millis() as u64;

    let (success, error) = match &result {
        Ok(_) => (true, None),
        Err(e) => (false, Some(e.to_string())),
    };
    action_log::log_action(&ctx.config_dir, &ctx.config, &cmd_name, args_json, success, error, duration);

    if let Err(e) = result {
        print_error(&e, human);
        process::exit(1);
    }
}

/// Diagnostics go to stderr so stdout stays machine-readable.
///
/// Quiet by default; use `RUST_LOG=thesis_tracker=debug` to see storage activity.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "thesis_tracker=warn".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false),
        )
        .init();
}

fn print_error(e: &thesis_tracker::Error, human: bool) {
    if human {
        eprintln!("Error: {}", e);
    } else {
        eprintln!("{}", serde_json::json!({ "error": e.to_string() }));
    }
}

fn run_command(
    command: Option<Commands>,
    ctx: &mut Context,
    human: bool,
) -> Result<(), thesis_tracker::Error> {
    match command {
        None | Some(Commands::Status) => {
            let result = commands::status(ctx)?;
            output(&result, human);
        }

        Some(Commands::File { command }) => match command {
            FileCommands::New { path } => {
                let result = commands::file_new(ctx, &path)?;
                output(&result, human);
            }
            FileCommands::Open { path, create } => {
                let result = commands::file_open(ctx, &path, create)?;
                output(&result, human);
            }
            FileCommands::Recent => {
                let result = commands::file_recent(ctx)?;
                output(&result, human);
            }
            FileCommands::Show => {
                let result = commands::file_show(ctx)?;
                output(&result, human);
            }
        },

        Some(Commands::Project { command }) => match command {
            ProjectCommands::Add { name } => {
                let result = commands::project_add(ctx, &name)?;
                output(&result, human);
            }
            ProjectCommands::List => {
                let result = commands::project_list(ctx)?;
                output(&result, human);
            }
            ProjectCommands::Rename { project, name } => {
                let result = commands::project_rename(ctx, &project, &name)?;
                output(&result, human);
            }
            ProjectCommands::Delete { project } => {
                let result = commands::project_delete(ctx, &project)?;
                output(&result, human);
            }
            ProjectCommands::Select { project } => {
                let result = commands::project_select(ctx, &project)?;
                output(&result, human);
            }
        },

        Some(Commands::Task { command }) => match command {
            TaskCommands::Add {
                title,
                project,
                due,
            } => {
                let result =
                    commands::task_add(ctx, &title, project.as_deref(), due.as_deref())?;
                output(&result, human);
            }
            TaskCommands::Edit {
                id,
                title,
                due,
                no_due,
            } => {
                let result =
                    commands::task_edit(ctx, &id, title.as_deref(), due.as_deref(), no_due)?;
                output(&result, human);
            }
            TaskCommands::Done { id } => {
                let result = commands::task_done(ctx, &id)?;
                output(&result, human);
            }
            TaskCommands::Reopen { id } => {
                let result = commands::task_reopen(ctx, &id)?;
                output(&result, human);
            }
            TaskCommands::Delete { id } => {
                let result = commands::task_delete(ctx, &id)?;
                output(&result, human);
            }
            TaskCommands::Move { id, project } => {
                let result = commands::task_move(ctx, &id, &project)?;
                output(&result, human);
            }
        },

        Some(Commands::View { command }) => {
            let kind = match command {
                ViewCommands::Active => ViewKind::Active,
                ViewCommands::Completed => ViewKind::Completed,
            };
            let result = commands::view(ctx, kind)?;
            output(&result, human);
        }

        Some(Commands::Export {
            output: path,
            project,
            include_completed,
            format,
        }) => {
            let result = commands::export(ctx, &path, &project, include_completed, format)?;
            output(&result, human);
        }

        Some(Commands::Doctor) => {
            let result = commands::doctor(ctx)?;
            output(&result, human);
        }
    }
    Ok(())
}

/// Print output in JSON or human-readable format.
fn output<T: Output>(result: &T, human: bool) {
    if human {
        println!("{}", result.to_human());
    } else {
        println!("{}", result.to_json());
    }
}

/// Command name and arguments as recorded in the action log.
fn serialize_command(command: &Option<Commands>) -> (String, serde_json::Value) {
    match command {
        None | Some(Commands::Status) => ("status".to_string(), serde_json::json!({})),

        Some(Commands::File { command }) => match command {
            FileCommands::New { path } => (
                "file new".to_string(),
                serde_json::json!({ "path": path }),
            ),
            FileCommands::Open { path, create } => (
                "file open".to_string(),
                serde_json::json!({ "path": path, "create": create }),
            ),
            FileCommands::Recent => ("file recent".to_string(), serde_json::json!({})),
            FileCommands::Show => ("file show".to_string(), serde_json::json!({})),
        },

        Some(Commands::Project { command }) => match command {
            ProjectCommands::Add { name } => (
                "project add".to_string(),
                serde_json::json!({ "name": name }),
            ),
            ProjectCommands::List => ("project list".to_string(), serde_json::json!({})),
            ProjectCommands::Rename { project, name } => (
                "project rename".to_string(),
                serde_json::json!({ "project": project, "name": name }),
            ),
            ProjectCommands::Delete { project } => (
                "project delete".to_string(),
                serde_json::json!({ "project": project }),
            ),
            ProjectCommands::Select { project } => (
                "project select".to_string(),
                serde_json::json!({ "project": project }),
            ),
        },

        Some(Commands::Task { command }) => match command {
            TaskCommands::Add {
                title,
                project,
                due,
            } => (
                "task add".to_string(),
                serde_json::json!({ "title": title, "project": project, "due": due }),
            ),
            TaskCommands::Edit {
                id,
                title,
                due,
                no_due,
            } => (
                "task edit".to_string(),
                serde_json::json!({ "id": id, "title": title, "due": due, "no_due": no_due }),
            ),
            TaskCommands::Done { id } => ("task done".to_string(), serde_json::json!({ "id": id })),
            TaskCommands::Reopen { id } => {
                ("task reopen".to_string(), serde_json::json!({ "id": id }))
            }
            TaskCommands::Delete { id } => {
                ("task delete".to_string(), serde_json::json!({ "id": id }))
            }
            TaskCommands::Move { id, project } => (
                "task move".to_string(),
                serde_json::json!({ "id": id, "project": project }),
            ),
        },

        Some(Commands::View { command }) => match command {
            ViewCommands::Active => ("view active".to_string(), serde_json::json!({})),
            ViewCommands::Completed => ("view completed".to_string(), serde_json::json!({})),
        },

        Some(Commands::Export {
            output,
            project,
            include_completed,
            format,
        }) => (
            "export".to_string(),
            serde_json::json!({
                "output": output,
                "project": project,
                "include_completed": include_completed,
                "format": format,
            }),
        ),

        Some(Commands::Doctor) => ("doctor".to_string(), serde_json::json!({})),
    }
}
