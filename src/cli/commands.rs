//! CLI commands and argument parsing

use crate::pagination::PagingPolicy;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Retrieve complete entity collections from paginated list endpoints
#[derive(Parser, Debug)]
#[command(name = "pagesweep")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Parameter file (YAML, or JSON with a .json extension)
    #[arg(short = 'C', long, global = true, default_value = "config.yaml")]
    pub config: PathBuf,

    /// Password, overrides the parameter file
    #[arg(long, global = true, env = "PAGESWEEP_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Accept any server certificate
    #[arg(long, global = true)]
    pub insecure: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "pretty")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Retrieve every entity of a kind
    List {
        /// Entity kind, defaults to the parameter file's `kind`
        kind: Option<String>,

        /// Page size sent as `length`
        #[arg(long)]
        page_size: Option<u64>,

        /// Follow-up page arithmetic
        #[arg(long)]
        policy: Option<PagingPolicy>,

        /// Follow-up pages in flight at once
        #[arg(long)]
        concurrency: Option<usize>,

        /// Print counts only, drop entity payloads
        #[arg(long)]
        summary: bool,
    },

    /// Request the first page and print the reported total
    Count {
        /// Entity kind, defaults to the parameter file's `kind`
        kind: Option<String>,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON report on stdout
    Json,
    /// Human-readable lines
    Pretty,
}
