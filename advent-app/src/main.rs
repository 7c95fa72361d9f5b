//! # Advent Canvas CLI
//!
//! Creates calendars and previews saved days from the terminal.
//! Storage credentials come from `SUPABASE_URL`, `SUPABASE_ANON_KEY` and
//! `ADVENT_BUCKET`.

use advent_app::cli::{run, CliArgs};
use advent_app::telemetry::init_tracing;
use advent_storage::{CalendarRepository, SupabaseObjectStore};
use anyhow::Context;
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = CliArgs::parse();

    let store = SupabaseObjectStore::from_env().context("Failed to configure storage")?;
    tracing::debug!("Using bucket {}", store.config().bucket);
    let repo = CalendarRepository::new(store);

    let mut stdout = std::io::stdout().lock();
    run(args.command, &repo, &mut stdout).await
}
