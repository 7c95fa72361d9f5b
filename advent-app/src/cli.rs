//! Command-line interface.
//!
//! - `CliArgs` - arguments parsed with clap
//! - `run` - executes a command against any object store

use std::io::Write;

use advent_storage::{CalendarManifest, CalendarRepository, CalendarToken, ObjectStore};
use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::{EditorApp, EditorConfig};

/// Advent Canvas calendar tool.
#[derive(Debug, Parser)]
#[command(name = "advent-canvas")]
#[command(about = "Create advent calendars and preview their days")]
#[command(version)]
pub struct CliArgs {
    /// What to do.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a calendar and print its token.
    New {
        /// Calendar title.
        #[arg(long)]
        title: String,
        /// Calendar description.
        #[arg(long, default_value = "")]
        description: String,
        /// IANA timezone of the unlock dates.
        #[arg(long, default_value = "UTC")]
        timezone: String,
    },
    /// Print the calendar manifest as JSON.
    Show {
        /// Calendar token.
        token: String,
    },
    /// List the days that have been saved.
    Days {
        /// Calendar token.
        token: String,
    },
    /// Render a saved day as HTML.
    Render {
        /// Calendar token.
        token: String,
        /// Day number, 1 to 24.
        #[arg(value_parser = clap::value_parser!(u8).range(1..=24))]
        day: u8,
        /// Render with editing affordances instead of the viewer layout.
        #[arg(long)]
        edit: bool,
    },
}

/// Execute `command`, writing results to `out`.
///
/// # Errors
///
/// Returns an error if the token is malformed, the calendar is missing, or
/// storage or rendering fails.
pub async fn run<S, W>(
    command: Command,
    repo: &CalendarRepository<S>,
    out: &mut W,
) -> anyhow::Result<()>
where
    S: ObjectStore,
    W: Write,
{
    match command {
        Command::New {
            title,
            description,
            timezone,
        } => {
            let token = CalendarToken::generate();
            let manifest = CalendarManifest {
                title,
                description,
                timezone,
            };
            repo.save_calendar(&token, &manifest).await?;
            writeln!(out, "{token}")?;
        }
        Command::Show { token } => {
            let token = CalendarToken::parse(&token)?;
            let manifest = repo
                .load_calendar(&token)
                .await
                .with_context(|| format!("calendar {token} not found"))?;
            writeln!(out, "{}", serde_json::to_string_pretty(&manifest)?)?;
        }
        Command::Days { token } => {
            let token = CalendarToken::parse(&token)?;
            for day in repo.saved_days(&token).await {
                writeln!(out, "{day}")?;
            }
        }
        Command::Render { token, day, edit } => {
            let token = CalendarToken::parse(&token)?;
            let config = if edit {
                EditorConfig::from_env()?
            } else {
                EditorConfig {
                    mode: advent_renderer::RenderMode::ReadOnly,
                    ..EditorConfig::from_env()?
                }
            };
            let mut app = EditorApp::new(config)?;
            if !app.load_day(repo, &token, day).await? {
                tracing::warn!("Day {day} of calendar {token} has not been saved yet");
            }
            writeln!(out, "{}", app.render_html()?)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use advent_core::{create_text, SceneStore};
    use advent_storage::MemoryObjectStore;

    async fn output(command: Command, repo: &CalendarRepository<MemoryObjectStore>) -> String {
        let mut out = Vec::new();
        run(command, repo, &mut out).await.expect("command");
        String::from_utf8(out).expect("utf-8")
    }

    #[test]
    fn day_must_be_in_range() {
        assert!(CliArgs::try_parse_from(["advent-canvas", "render", "tok", "25"]).is_err());
        assert!(CliArgs::try_parse_from(["advent-canvas", "render", "tok", "24"]).is_ok());
    }

    #[tokio::test]
    async fn new_then_show() {
        let repo = CalendarRepository::new(MemoryObjectStore::new());
        let token = output(
            Command::New {
                title: "Advent".into(),
                description: String::new(),
                timezone: "UTC".into(),
            },
            &repo,
        )
        .await;
        let shown = output(
            Command::Show {
                token: token.trim().to_string(),
            },
            &repo,
        )
        .await;
        assert!(shown.contains("\"title\": \"Advent\""));
    }

    #[tokio::test]
    async fn render_saved_day() {
        let repo = CalendarRepository::new(MemoryObjectStore::new());
        let token = CalendarToken::parse("tok").expect("token");
        let mut scene = SceneStore::new();
        scene.add_item(create_text()).expect("text");
        repo.save_day(&token, 1, &scene.document())
            .await
            .expect("save");

        let days = output(Command::Days { token: "tok".into() }, &repo).await;
        assert_eq!(days, "1\n");

        let html = output(
            Command::Render {
                token: "tok".into(),
                day: 1,
                edit: false,
            },
            &repo,
        )
        .await;
        assert!(html.contains("draggable-text"));
        assert!(!html.contains("text-toolbar"));
    }

    #[tokio::test]
    async fn show_missing_calendar_fails() {
        let repo = CalendarRepository::new(MemoryObjectStore::new());
        let mut out = Vec::new();
        let err = run(Command::Show { token: "nope".into() }, &repo, &mut out)
            .await
            .expect_err("missing");
        assert!(err.to_string().contains("not found"));
    }
}
