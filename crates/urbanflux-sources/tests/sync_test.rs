//! Sync loop and ingestion job driven by a scripted fetcher against an
//! in-memory store.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use serde_json::json;
use urbanflux_core::errors::SourceError;
use urbanflux_core::model::{Source, SyncRunStatus};
use urbanflux_core::traits::{Cancellable, CancellationToken, SyncLedger};
use urbanflux_sources::{
    adapter_for, sync_source, IngestOptions, IngestionJob, PageFetcher, PageQuery, RawRecord,
    StopReason, SyncOptions,
};
use urbanflux_storage::StorageEngine;

/// Replays scripted pages per call and records every query it was given.
struct ScriptedFetcher {
    pages: Mutex<VecDeque<Result<Vec<RawRecord>, SourceError>>>,
    queries: Mutex<Vec<PageQuery>>,
}

impl ScriptedFetcher {
    fn new(pages: Vec<Result<Vec<RawRecord>, SourceError>>) -> Self {
        Self {
            pages: Mutex::new(pages.into()),
            queries: Mutex::new(Vec::new()),
        }
    }

    fn queries(&self) -> Vec<PageQuery> {
        self.queries.lock().unwrap().clone()
    }
}

impl PageFetcher for ScriptedFetcher {
    fn fetch(&self, _source: Source, query: &PageQuery) -> Result<Vec<RawRecord>, SourceError> {
        self.queries.lock().unwrap().push(query.clone());
        self.pages.lock().unwrap().pop_front().unwrap_or_else(|| Ok(Vec::new()))
    }
}

fn violation(i: usize) -> RawRecord {
    RawRecord::from_value(json!({
        "isn_dob_bis_viol": format!("{i}"),
        "issue_date": "20240115",
        "boro": "2",
        "block": "2345",
        "lot": format!("{}", i + 1)
    }))
}

fn violation_page(range: std::ops::Range<usize>) -> Vec<RawRecord> {
    range.map(violation).collect()
}

fn no_delay() -> SyncOptions {
    SyncOptions {
        page_delay: Some(Duration::ZERO),
        ..SyncOptions::default()
    }
}

fn timeout() -> SourceError {
    SourceError::Timeout {
        source_name: "dob_violations".to_string(),
        seconds: 120,
    }
}

const VIOLATION_BATCH: usize = 10_000;

#[test]
fn short_page_ends_a_complete_run() {
    let store = StorageEngine::open_in_memory().unwrap();
    let fetcher = ScriptedFetcher::new(vec![Ok(violation_page(0..3))]);

    let report = sync_source(
        adapter_for(Source::Violations),
        &fetcher,
        &store,
        &no_delay(),
        &CancellationToken::new(),
    );

    assert!(report.is_complete());
    assert_eq!(report.pages, 1);
    assert_eq!(report.fetched, 3);
    assert_eq!(report.upserted, 3);
    assert_eq!(store.counts().unwrap().events, 3);
}

#[test]
fn full_pages_advance_the_offset() {
    let store = StorageEngine::open_in_memory().unwrap();
    let fetcher = ScriptedFetcher::new(vec![
        Ok(violation_page(0..VIOLATION_BATCH)),
        Ok(violation_page(VIOLATION_BATCH..VIOLATION_BATCH + 5)),
    ]);

    let report = sync_source(
        adapter_for(Source::Violations),
        &fetcher,
        &store,
        &no_delay(),
        &CancellationToken::new(),
    );

    assert!(report.is_complete());
    assert_eq!(report.pages, 2);
    let offsets: Vec<_> = fetcher.queries().iter().map(|q| q.offset).collect();
    assert_eq!(offsets, [0, VIOLATION_BATCH]);
    assert_eq!(store.counts().unwrap().events, (VIOLATION_BATCH + 5) as u64);
}

#[test]
fn fetch_error_is_not_end_of_data() {
    let store = StorageEngine::open_in_memory().unwrap();
    let fetcher = ScriptedFetcher::new(vec![
        Ok(violation_page(0..VIOLATION_BATCH)),
        Err(timeout()),
        Ok(violation_page(0..1)),
    ]);

    let report = sync_source(
        adapter_for(Source::Violations),
        &fetcher,
        &store,
        &no_delay(),
        &CancellationToken::new(),
    );

    assert!(!report.is_complete());
    assert_eq!(report.failed_pages, 1);
    assert!(matches!(
        report.stop,
        StopReason::FetchFailed { offset, .. } if offset == VIOLATION_BATCH
    ));
    assert_eq!(report.status(), SyncRunStatus::Incomplete);
    // The first page was still stored.
    assert_eq!(store.counts().unwrap().events, VIOLATION_BATCH as u64);
    assert_eq!(fetcher.queries().len(), 2);
}

#[test]
fn rejected_records_are_counted_not_stored() {
    let store = StorageEngine::open_in_memory().unwrap();
    let mut page = violation_page(0..2);
    page.push(RawRecord::from_value(json!({"issue_date": "20240115"})));
    page.push(RawRecord::from_value(json!({"isn_dob_bis_viol": "x", "issue_date": "soon"})));
    let fetcher = ScriptedFetcher::new(vec![Ok(page)]);

    let report = sync_source(
        adapter_for(Source::Violations),
        &fetcher,
        &store,
        &no_delay(),
        &CancellationToken::new(),
    );

    assert_eq!(report.fetched, 4);
    assert_eq!(report.normalized, 2);
    assert_eq!(report.rejected, 2);
    assert_eq!(store.counts().unwrap().events, 2);
}

#[test]
fn page_limit_leaves_the_run_incomplete() {
    let store = StorageEngine::open_in_memory().unwrap();
    let fetcher = ScriptedFetcher::new(vec![
        Ok(violation_page(0..VIOLATION_BATCH)),
        Ok(violation_page(0..VIOLATION_BATCH)),
    ]);
    let options = SyncOptions {
        max_pages: Some(1),
        ..no_delay()
    };

    let report = sync_source(
        adapter_for(Source::Violations),
        &fetcher,
        &store,
        &options,
        &CancellationToken::new(),
    );

    assert_eq!(report.stop, StopReason::PageLimit);
    assert_eq!(report.pages, 1);
    assert_eq!(report.status(), SyncRunStatus::Incomplete);
}

#[test]
fn cancellation_is_checked_before_each_page() {
    let store = StorageEngine::open_in_memory().unwrap();
    let fetcher = ScriptedFetcher::new(vec![Ok(violation_page(0..3))]);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let report = sync_source(
        adapter_for(Source::Violations),
        &fetcher,
        &store,
        &no_delay(),
        &cancel,
    );

    assert_eq!(report.stop, StopReason::Cancelled);
    assert_eq!(report.pages, 0);
    assert!(fetcher.queries().is_empty());
}

#[test]
fn since_is_written_in_the_native_literal() {
    let store = StorageEngine::open_in_memory().unwrap();
    let fetcher = ScriptedFetcher::new(vec![Ok(Vec::new())]);
    let options = SyncOptions {
        since: Some(Utc.with_ymd_and_hms(2024, 1, 15, 8, 0, 0).unwrap()),
        ..no_delay()
    };

    sync_source(
        adapter_for(Source::Violations),
        &fetcher,
        &store,
        &options,
        &CancellationToken::new(),
    );

    let query = &fetcher.queries()[0];
    assert_eq!(query.order, "issue_date DESC");
    assert_eq!(query.where_clause.as_deref(), Some("issue_date >= '20240115'"));
    assert_eq!(query.limit, VIOLATION_BATCH);
}

#[test]
fn ingestion_job_records_runs_and_moves_the_watermark() {
    let store = StorageEngine::open_in_memory().unwrap();
    let options = IngestOptions {
        page_delay: Some(Duration::ZERO),
        ..IngestOptions::default()
    };

    let fetcher = ScriptedFetcher::new(vec![Ok(violation_page(0..3))]);
    let summary = IngestionJob::new(&store, &fetcher, options.clone())
        .run(&[Source::Violations])
        .unwrap();
    assert!(summary.all_complete());
    assert_eq!(summary.total_upserted(), 3);
    assert!(fetcher.queries()[0].where_clause.is_none());

    let watermark = store.last_complete_sync(Source::Violations).unwrap().unwrap();

    // The next run resumes from the watermark.
    let fetcher = ScriptedFetcher::new(vec![Ok(Vec::new())]);
    IngestionJob::new(&store, &fetcher, options)
        .run(&[Source::Violations])
        .unwrap();
    let expected = format!("issue_date >= '{}'", watermark.format("%Y%m%d"));
    assert_eq!(fetcher.queries()[0].where_clause.as_deref(), Some(expected.as_str()));

    let runs = store.recent_sync_runs(10).unwrap();
    assert_eq!(runs.len(), 2);
    assert!(runs.iter().all(|r| r.status == SyncRunStatus::Complete));
    assert_eq!(runs[0].since, Some(watermark));
}

#[test]
fn failed_source_does_not_stop_the_others() {
    let store = StorageEngine::open_in_memory().unwrap();
    let fetcher = ScriptedFetcher::new(vec![
        Err(SourceError::HttpStatus {
            source_name: "dob_complaints".to_string(),
            status: 503,
            body: "unavailable".to_string(),
        }),
        Ok(violation_page(0..2)),
    ]);
    let options = IngestOptions {
        page_delay: Some(Duration::ZERO),
        ..IngestOptions::default()
    };

    let summary = IngestionJob::new(&store, &fetcher, options)
        .run(&[Source::Complaints, Source::Violations])
        .unwrap();

    assert!(!summary.all_complete());
    assert_eq!(summary.incomplete_sources(), vec![Source::Complaints]);
    assert_eq!(store.counts().unwrap().events, 2);

    // The failed run must not become a watermark.
    assert_eq!(store.last_complete_sync(Source::Complaints).unwrap(), None);
    let runs = store.recent_sync_runs(10).unwrap();
    let complaints = runs.iter().find(|r| r.source == Source::Complaints).unwrap();
    assert_eq!(complaints.status, SyncRunStatus::Incomplete);
    assert_eq!(complaints.failed_pages, 1);
    assert!(complaints.error.as_deref().unwrap().contains("503"));
}
