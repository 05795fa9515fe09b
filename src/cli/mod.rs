//! CLI module
//!
//! Command-line interface for sweeping list endpoints.
//!
//! # Commands
//!
//! - `list` - Retrieve every entity of a kind
//! - `count` - Request the first page and print the reported total

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
