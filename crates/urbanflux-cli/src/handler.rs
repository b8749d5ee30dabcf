//! Command handlers.

use std::path::Path;

use chrono::{DateTime, Utc};
use urbanflux_analysis::{DerivationJob, DerivationReport};
use urbanflux_core::config::{CliOverrides, UrbanfluxConfig};
use urbanflux_core::model::Source;
use urbanflux_core::traits::SyncLedger;
use urbanflux_sources::{IngestOptions, IngestSummary, IngestionJob, PageFetcher, SodaClient, SodaClientConfig};
use urbanflux_storage::StorageEngine;

use crate::commands::{Cli, Commands, DeriveArgs, IngestArgs, OutputFormat};
use crate::error::{CliError, CliResult};
use crate::output;

pub fn run(cli: Cli) -> CliResult<()> {
    let root = std::env::current_dir()?;
    let config = load_config(&cli, &root)?;
    let store = open_store(&config)?;

    match &cli.command {
        Commands::Ingest(args) => {
            let client = soda_client(&config)?;
            let summary = ingest(&store, &client, &config, args, cli.format)?;
            require_complete(&summary)
        }
        Commands::Derive(_) => derive(&store, &config, cli.format).map(|_| ()),
        Commands::Run => {
            let client = soda_client(&config)?;
            let summary = ingest(&store, &client, &config, &IngestArgs::default(), cli.format)?;
            derive(&store, &config, cli.format)?;
            require_complete(&summary)
        }
        Commands::Status { limit } => status(&store, *limit, cli.format),
    }
}

/// Resolve configuration for a parsed command line, rooted at `root`.
pub fn load_config(cli: &Cli, root: &Path) -> CliResult<UrbanfluxConfig> {
    let mut overrides = CliOverrides {
        config_file: cli.config.clone(),
        db_path: cli.db.clone(),
        app_token: cli.app_token.clone(),
        ..CliOverrides::default()
    };
    match &cli.command {
        Commands::Ingest(IngestArgs { max_pages, .. }) => overrides.max_pages = *max_pages,
        Commands::Derive(DeriveArgs { batch_size }) => overrides.batch_size = *batch_size,
        Commands::Run | Commands::Status { .. } => {}
    }
    Ok(UrbanfluxConfig::load(root, Some(&overrides))?)
}

pub fn open_store(config: &UrbanfluxConfig) -> CliResult<StorageEngine> {
    let path = Path::new(config.storage.effective_db_path());
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(StorageEngine::open_with_config(path, &config.storage)?)
}

fn soda_client(config: &UrbanfluxConfig) -> CliResult<SodaClient> {
    Ok(SodaClient::new(SodaClientConfig::from_config(&config.sources))?)
}

/// Sources named on the command line, or every enabled source.
fn selected_sources(config: &UrbanfluxConfig, args: &IngestArgs) -> CliResult<Vec<Source>> {
    if args.sources.is_empty() {
        return Ok(config.enabled_sources()?);
    }
    let mut sources = args.sources.clone();
    sources.sort();
    sources.dedup();
    Ok(sources)
}

pub fn ingest(
    store: &StorageEngine,
    fetcher: &dyn PageFetcher,
    config: &UrbanfluxConfig,
    args: &IngestArgs,
    format: OutputFormat,
) -> CliResult<IngestSummary> {
    let since: Option<DateTime<Utc>> = args.since;
    if since.is_some_and(|s| s > Utc::now()) {
        return Err(CliError::invalid_arg("--since is in the future"));
    }
    let sources = selected_sources(config, args)?;
    let options = IngestOptions {
        since,
        max_pages: config.sources.max_pages,
        page_delay: None,
    };

    let summary = IngestionJob::new(store, fetcher, options).run(&sources)?;
    if let Err(e) = store.db().checkpoint() {
        tracing::warn!(error = %e, "WAL checkpoint failed");
    }
    output::print_ingest(&summary, format);
    Ok(summary)
}

pub fn derive(
    store: &StorageEngine,
    config: &UrbanfluxConfig,
    format: OutputFormat,
) -> CliResult<DerivationReport> {
    let report = DerivationJob::from_config(store, &config.analysis).run()?;
    output::print_derive(&report, format);
    Ok(report)
}

pub fn status(store: &StorageEngine, limit: usize, format: OutputFormat) -> CliResult<()> {
    let runs = store.recent_sync_runs(limit)?;
    let counts = store.counts()?;
    let by_source = store.event_counts_by_source()?;
    output::print_status(&runs, &counts, &by_source, format);
    Ok(())
}

/// `PartialIngestion` when any source stopped short.
pub fn require_complete(summary: &IngestSummary) -> CliResult<()> {
    if summary.all_complete() {
        return Ok(());
    }
    let sources: Vec<&str> = summary
        .incomplete_sources()
        .into_iter()
        .map(Source::as_str)
        .collect();
    Err(CliError::PartialIngestion {
        sources: sources.join(", "),
    })
}
