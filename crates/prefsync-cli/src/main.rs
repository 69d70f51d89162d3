//! prefsync - save and sync job-search preferences from the terminal
//!
//! Preferences that cannot reach the backend are queued locally and retried
//! on the next run.

mod cli;
mod commands;
mod config_profiles;
mod error;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::common::ProfileContext;
use crate::commands::completions::run_completions;
use crate::commands::config::run_config;
use crate::commands::delete::run_delete;
use crate::commands::list::run_list;
use crate::commands::pending::run_pending;
use crate::commands::save::{run_save, SaveArgs};
use crate::commands::search::run_search;
use crate::commands::sync::run_sync;
use crate::error::CliError;

const DEFAULT_LOG_FILTER: &str = "prefsync=info,prefsync_core=info";

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let startup_sync = !cli.no_startup_sync;
    let profile = cli.profile.as_deref();
    let store_dir = cli.store_dir.as_deref();

    match cli.command {
        Commands::Save {
            text,
            name,
            id,
            user_id,
            metadata,
        } => {
            let context = ProfileContext::resolve(profile, store_dir)?;
            let args = SaveArgs {
                text,
                name,
                id,
                user_id,
                metadata,
            };
            run_save(args, &context, startup_sync).await?;
        }
        Commands::Delete { id } => {
            let context = ProfileContext::resolve(profile, store_dir)?;
            run_delete(&id, &context, startup_sync).await?;
        }
        Commands::Search {
            query,
            top_k,
            user_id,
            json,
        } => {
            let context = ProfileContext::resolve(profile, store_dir)?;
            run_search(&query, top_k, user_id, json, &context, startup_sync).await?;
        }
        Commands::List { user_id, json } => {
            let context = ProfileContext::resolve(profile, store_dir)?;
            run_list(user_id, json, &context, startup_sync).await?;
        }
        Commands::Sync => {
            let context = ProfileContext::resolve(profile, store_dir)?;
            run_sync(&context).await?;
        }
        Commands::Pending { json } => {
            let context = ProfileContext::resolve(profile, store_dir)?;
            run_pending(json, &context)?;
        }
        Commands::Config { command } => run_config(command, profile)?,
        Commands::Completions { shell, output } => run_completions(shell, output.as_deref())?,
    }

    Ok(())
}
