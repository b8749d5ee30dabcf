//! Ingestion job: sync each requested source in turn and keep the run ledger.
//!
//! A source that fails mid-run is recorded and the job moves on to the next
//! one. Only ledger failures abort the job.

use std::time::Duration;

use chrono::{DateTime, Utc};
use urbanflux_core::errors::PipelineError;
use urbanflux_core::model::Source;
use urbanflux_core::traits::{CancellationToken, PipelineStore, SyncLedger};

use crate::adapters::adapter_for;
use crate::sync::{sync_source, SyncOptions, SyncReport};
use crate::transport::PageFetcher;

#[derive(Debug, Clone, Default)]
pub struct IngestOptions {
    /// Explicit lower bound. When unset each source resumes from the start
    /// of its last complete run.
    pub since: Option<DateTime<Utc>>,
    pub max_pages: Option<u32>,
    pub page_delay: Option<Duration>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestSummary {
    pub reports: Vec<SyncReport>,
}

impl IngestSummary {
    pub fn all_complete(&self) -> bool {
        self.reports.iter().all(SyncReport::is_complete)
    }

    pub fn incomplete_sources(&self) -> Vec<Source> {
        self.reports
            .iter()
            .filter(|r| !r.is_complete())
            .map(|r| r.source)
            .collect()
    }

    pub fn total_upserted(&self) -> u64 {
        self.reports.iter().map(|r| r.upserted).sum()
    }
}

pub struct IngestionJob<'a, S: PipelineStore + SyncLedger> {
    store: &'a S,
    fetcher: &'a dyn PageFetcher,
    options: IngestOptions,
    cancel: CancellationToken,
}

impl<'a, S: PipelineStore + SyncLedger> IngestionJob<'a, S> {
    pub fn new(store: &'a S, fetcher: &'a dyn PageFetcher, options: IngestOptions) -> Self {
        Self {
            store,
            fetcher,
            options,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn run(&self, sources: &[Source]) -> Result<IngestSummary, PipelineError> {
        let mut summary = IngestSummary::default();
        for &source in sources {
            summary.reports.push(self.run_source(source)?);
        }

        if summary.all_complete() {
            tracing::info!(
                sources = sources.len(),
                upserted = summary.total_upserted(),
                "ingestion complete"
            );
        } else {
            tracing::warn!(
                incomplete = ?summary.incomplete_sources(),
                "ingestion finished with incomplete sources"
            );
        }
        Ok(summary)
    }

    fn run_source(&self, source: Source) -> Result<SyncReport, PipelineError> {
        let since = match self.options.since {
            Some(since) => Some(since),
            None => self.store.last_complete_sync(source)?,
        };
        let started_at = Utc::now();
        let run_id = self.store.begin_sync_run(source, started_at, since)?;

        let options = SyncOptions {
            since,
            max_pages: self.options.max_pages,
            page_delay: self.options.page_delay,
            ingested_at: Some(started_at),
        };
        let report = sync_source(
            adapter_for(source),
            self.fetcher,
            self.store,
            &options,
            &self.cancel,
        );

        self.store
            .finish_sync_run(run_id, &report.outcome(Utc::now()))?;
        Ok(report)
    }
}
