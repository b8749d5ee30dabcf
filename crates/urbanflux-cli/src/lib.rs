//! # urbanflux-cli
//!
//! Command-line front end for the pipeline.
//!
//! ```text
//! urbanflux [--config <file>] [--db <path>] [--format <table|json>] <COMMAND>
//!
//! Commands:
//!   ingest   Pull new records from the open-data feeds
//!   derive   Recompute transformation states and rebuild the heatmap
//!   run      Ingest every enabled source, then derive
//!   status   Recent sync runs and table counts
//! ```
//!
//! Exit codes: 0 success, 1 fatal error, 2 configuration error,
//! 3 finished but at least one source ingested only partially.

pub mod commands;
pub mod error;
pub mod handler;
pub mod output;

pub use commands::{Cli, Commands, OutputFormat};
pub use error::{CliError, CliResult};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
