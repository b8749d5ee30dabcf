//! Paginated sync loop for one source.
//!
//! Pages are fetched sequentially with the source's politeness delay in
//! between. The loop stops on a short page (end of data), a failed page, the
//! page limit, cancellation, or a store failure. Only the first of these counts
//! as a complete run.

use std::time::Duration;

use chrono::{DateTime, Utc};
use urbanflux_core::model::{Source, SyncRunOutcome, SyncRunStatus};
use urbanflux_core::traits::{Cancellable, CancellationToken, PipelineStore};

use crate::adapters::{NormalizeContext, PageOutcome, SourceAdapter};
use crate::transport::PageFetcher;

#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// Only rows on or after this instant.
    pub since: Option<DateTime<Utc>>,
    pub max_pages: Option<u32>,
    /// Replaces the adapter's own inter-page delay.
    pub page_delay: Option<Duration>,
    /// Fallback "now" for records without a date; captured at start when unset.
    pub ingested_at: Option<DateTime<Utc>>,
}

/// Why the loop stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// A page came back shorter than the batch size.
    EndOfData,
    PageLimit,
    Cancelled,
    FetchFailed { offset: usize, message: String },
    StoreFailed { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub source: Source,
    pub pages: u32,
    pub failed_pages: u32,
    pub fetched: u64,
    pub normalized: u64,
    pub rejected: u64,
    pub upserted: u64,
    pub stop: StopReason,
}

impl SyncReport {
    fn new(source: Source) -> Self {
        Self {
            source,
            pages: 0,
            failed_pages: 0,
            fetched: 0,
            normalized: 0,
            rejected: 0,
            upserted: 0,
            stop: StopReason::EndOfData,
        }
    }

    /// Every page up to the end of data was fetched and stored.
    pub fn is_complete(&self) -> bool {
        self.stop == StopReason::EndOfData
    }

    pub fn status(&self) -> SyncRunStatus {
        match self.stop {
            StopReason::EndOfData => SyncRunStatus::Complete,
            StopReason::StoreFailed { .. } => SyncRunStatus::Failed,
            _ => SyncRunStatus::Incomplete,
        }
    }

    pub fn error(&self) -> Option<String> {
        match &self.stop {
            StopReason::EndOfData => None,
            StopReason::PageLimit => Some("page limit reached".to_string()),
            StopReason::Cancelled => Some("cancelled".to_string()),
            StopReason::FetchFailed { offset, message } => {
                Some(format!("page at offset {offset} failed: {message}"))
            }
            StopReason::StoreFailed { message } => Some(message.clone()),
        }
    }

    pub fn outcome(&self, finished_at: DateTime<Utc>) -> SyncRunOutcome {
        SyncRunOutcome {
            finished_at,
            pages: self.pages,
            failed_pages: self.failed_pages,
            fetched: self.fetched,
            normalized: self.normalized,
            rejected: self.rejected,
            upserted: self.upserted,
            status: self.status(),
            error: self.error(),
        }
    }
}

/// Page through one source and persist every normalized event.
pub fn sync_source(
    adapter: &dyn SourceAdapter,
    fetcher: &dyn PageFetcher,
    store: &dyn PipelineStore,
    options: &SyncOptions,
    cancel: &CancellationToken,
) -> SyncReport {
    let source = adapter.source();
    let span = tracing::info_span!("sync", source = %source);
    let _guard = span.enter();

    let ctx = NormalizeContext::new(options.ingested_at.unwrap_or_else(Utc::now));
    let batch_size = adapter.dataset().batch_size;
    let delay = options.page_delay.unwrap_or(adapter.dataset().page_delay);
    let mut report = SyncReport::new(source);
    let mut offset = 0usize;

    loop {
        if cancel.is_cancelled() {
            report.stop = StopReason::Cancelled;
            break;
        }
        if options.max_pages.is_some_and(|max| report.pages >= max) {
            report.stop = StopReason::PageLimit;
            break;
        }
        if report.pages > 0 && !delay.is_zero() {
            std::thread::sleep(delay);
        }

        let outcome = adapter.fetch_page(fetcher, options.since, offset);
        report.pages += 1;
        let records = match outcome {
            PageOutcome::Records(records) => records,
            PageOutcome::Failed(e) => {
                report.failed_pages += 1;
                report.stop = StopReason::FetchFailed {
                    offset,
                    message: e.to_string(),
                };
                break;
            }
        };

        report.fetched += records.len() as u64;
        let events: Vec<_> = records
            .iter()
            .filter_map(|record| adapter.normalize(record, &ctx))
            .collect();
        report.normalized += events.len() as u64;
        report.rejected += (records.len() - events.len()) as u64;

        match store.upsert_events(&events) {
            Ok(n) => report.upserted += n as u64,
            Err(e) => {
                tracing::error!(offset, error = %e, "failed to store page");
                report.stop = StopReason::StoreFailed {
                    message: e.to_string(),
                };
                break;
            }
        }

        tracing::debug!(
            offset,
            count = records.len(),
            normalized = events.len(),
            "page stored"
        );

        if records.len() < batch_size {
            report.stop = StopReason::EndOfData;
            break;
        }
        offset += batch_size;
    }

    tracing::info!(
        pages = report.pages,
        fetched = report.fetched,
        rejected = report.rejected,
        upserted = report.upserted,
        complete = report.is_complete(),
        "sync finished"
    );
    report
}
