// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Strata - SQLite database adapter command line.
//!
//! This is the binary entry point. Every subcommand is dispatched through
//! the handler registry built in [`commands`].

mod commands;
mod status;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use strata_config::StrataConfig;
use strata_core::{DatabaseAdapter, RequestContext, StrataError};
use strata_storage::{SqliteAdapter, TracingSink};
use tracing::error;

/// Strata - run statements through the SQLite database adapter.
#[derive(Parser, Debug)]
#[command(name = "strata", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the XDG hierarchy.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Drop every existing table before opening.
    #[arg(long, global = true)]
    force_drop: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Apply the definition statements in a file.
    Schema {
        file: PathBuf,
    },
    /// Run a retrieval and print its rows.
    Query {
        sql: String,
        /// Positional parameters as a JSON array.
        #[arg(long)]
        params: Option<String>,
    },
    /// Run an update or delete.
    Exec {
        sql: String,
        /// Positional parameters as a JSON array.
        #[arg(long)]
        params: Option<String>,
        /// Return this field, aliased as `id`, for each changed row.
        #[arg(long)]
        returning: Option<String>,
    },
    /// Run an insert and print the assigned identifier.
    Insert {
        sql: String,
        /// Positional parameters as a JSON array.
        #[arg(long)]
        params: Option<String>,
    },
    /// Allocate the next value of a named sequence.
    Allocate {
        name: String,
    },
    /// Report database health and whether schema migration is pending.
    Status,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(errors) => {
            strata_config::render_errors(&errors);
            std::process::exit(2);
        }
    };
    init_tracing(&config.logging.level);

    if let Err(e) = run(cli, config).await {
        error!(error = %e, "command failed");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: StrataConfig) -> Result<(), StrataError> {
    let (name, args) = commands::to_call(cli.command)?;

    let adapter = Arc::new(SqliteAdapter::new(
        config.storage.clone(),
        Arc::new(TracingSink),
    ));
    adapter.open(cli.force_drop).await?;

    let registry = commands::build_registry(adapter.clone(), config)?;
    let result = registry.dispatch(name, &RequestContext::new(), args).await;
    adapter.close().await?;

    let output = serde_json::to_string_pretty(&result?)
        .map_err(|e| StrataError::Internal(format!("failed to render output: {e}")))?;
    println!("{output}");
    Ok(())
}

fn load_config(path: Option<&std::path::Path>) -> Result<StrataConfig, Vec<strata_config::ConfigError>> {
    match path {
        Some(path) => strata_config::load_and_validate_path(path),
        None => strata_config::load_and_validate(),
    }
}

/// `RUST_LOG` wins; otherwise `strata*` targets log at the configured level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(log_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn default_filter(log_level: &str) -> String {
    format!("strata={},warn", log_level.trim().to_ascii_lowercase())
}
