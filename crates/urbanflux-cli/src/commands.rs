//! Command definitions.

use std::path::PathBuf;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use urbanflux_core::dates::parse_date;
use urbanflux_core::model::Source;

/// Urbanflux open-data pipeline
#[derive(Parser, Debug)]
#[command(name = "urbanflux")]
#[command(version)]
#[command(about = "Ingest NYC open data and build the transformation heatmap")]
pub struct Cli {
    /// Config file to use instead of ./urbanflux.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// SQLite database path (env: URBANFLUX_DB_PATH)
    #[arg(long, global = true)]
    pub db: Option<String>,

    /// Open-data app token (env: URBANFLUX_APP_TOKEN)
    #[arg(long, global = true)]
    pub app_token: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "table")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Pull new records from the open-data feeds
    Ingest(IngestArgs),

    /// Recompute transformation states and rebuild the heatmap
    Derive(DeriveArgs),

    /// Ingest every enabled source, then derive
    Run,

    /// Recent sync runs and table counts
    Status {
        /// Number of sync runs to show
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
}

#[derive(Args, Debug, Default)]
pub struct IngestArgs {
    /// Source to ingest; repeat for several. Defaults to every enabled source.
    #[arg(long = "source", value_parser = parse_source)]
    pub sources: Vec<Source>,

    /// Only records on or after this date. Defaults to each source's watermark.
    #[arg(long, value_parser = parse_since)]
    pub since: Option<DateTime<Utc>>,

    /// Stop each source after this many pages
    #[arg(long)]
    pub max_pages: Option<u32>,
}

#[derive(Args, Debug, Default)]
pub struct DeriveArgs {
    /// Locations per recompute batch
    #[arg(long)]
    pub batch_size: Option<usize>,
}

fn parse_source(s: &str) -> Result<Source, String> {
    Source::from_str(s).map_err(|_| {
        let known: Vec<&str> = Source::ALL.iter().map(|s| s.as_str()).collect();
        format!("unknown source {s:?} (expected one of: {})", known.join(", "))
    })
}

fn parse_since(s: &str) -> Result<DateTime<Utc>, String> {
    parse_date(s).ok_or_else(|| format!("unrecognized date {s:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ingest_flags() {
        let cli = Cli::try_parse_from([
            "urbanflux", "ingest", "--source", "dob_permits", "--source", "zap",
            "--since", "2024-01-01", "--max-pages", "3",
        ])
        .unwrap();
        match cli.command {
            Commands::Ingest(args) => {
                assert_eq!(args.sources, vec![Source::PermitFilings, Source::ZoningApplications]);
                assert_eq!(args.max_pages, Some(3));
                assert_eq!(args.since, parse_date("2024-01-01"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["urbanflux", "status", "--db", "x.db", "--format", "json"])
            .unwrap();
        assert_eq!(cli.db.as_deref(), Some("x.db"));
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.app_token, None);
        assert!(matches!(cli.command, Commands::Status { limit: 20 }));

        let cli = Cli::try_parse_from(["urbanflux", "ingest", "--app-token", "tok"]).unwrap();
        assert_eq!(cli.app_token.as_deref(), Some("tok"));
    }

    #[test]
    fn rejects_unknown_source_and_bad_date() {
        assert!(Cli::try_parse_from(["urbanflux", "ingest", "--source", "weather"]).is_err());
        assert!(Cli::try_parse_from(["urbanflux", "ingest", "--since", "soon"]).is_err());
    }

    #[test]
    fn derive_batch_size() {
        let cli = Cli::try_parse_from(["urbanflux", "derive", "--batch-size", "50"]).unwrap();
        match cli.command {
            Commands::Derive(args) => assert_eq!(args.batch_size, Some(50)),
            other => panic!("unexpected command {other:?}"),
        }
    }
}
