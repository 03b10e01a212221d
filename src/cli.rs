use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// locsync - bulk location-hierarchy reconciliation
#[derive(Parser, Debug)]
#[command(name = "locsync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output NDJSON events for CI
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file (defaults to ./locsync.toml, then the user config)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate an upload and commit it to the tenant's tree
    Import {
        #[command(flatten)]
        target: TargetArgs,

        /// Validate and plan, but don't write
        #[arg(long)]
        dry_run: bool,
    },

    /// Validate an upload without writing anything
    Validate {
        #[command(flatten)]
        target: TargetArgs,
    },
}

#[derive(clap::Args, Debug)]
pub struct TargetArgs {
    /// Workbook JSON file
    pub workbook: PathBuf,

    /// Tenant whose tree is reconciled
    #[arg(short, long)]
    pub tenant: Option<String>,

    /// Tree store file
    #[arg(long)]
    pub store: Option<PathBuf>,
}
