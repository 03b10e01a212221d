//! locsync CLI - bulk location-hierarchy reconciliation
//!
//! Usage: locsync <COMMAND>
//!
//! Commands:
//!   import    Validate an upload and commit it to the tenant's tree
//!   validate  Validate an upload without writing anything

mod cli;
mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use locsync::config::{self, Config, Verbosity};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config, warnings) = match &cli.config {
        Some(path) => {
            let (config, warnings) = config::load_with_warnings(path)
                .with_context(|| format!("loading config {}", path.display()))?;
            (config::with_env_overrides(config), warnings)
        }
        None => {
            let cwd = std::env::current_dir().context("reading current directory")?;
            config::load_or_default(Some(&cwd))
        }
    };

    init_tracing(&config, cli.verbose);
    for warning in &warnings {
        tracing::warn!("{}", warning);
    }

    let json = cli.json || config.output.json;
    match cli.command {
        Commands::Import { target, dry_run } => {
            commands::cmd_import(&config, &target, dry_run || config.import.dry_run, json)
        }
        Commands::Validate { target } => commands::cmd_validate(&config, &target, json),
    }
}

/// Log to stderr; `RUST_LOG` wins over `-v` and the config verbosity
fn init_tracing(config: &Config, verbose: u8) {
    let verbosity = match verbose {
        0 => config.output.verbosity,
        1 => Verbosity::Verbose,
        _ => Verbosity::Debug,
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.filter_directive()));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
