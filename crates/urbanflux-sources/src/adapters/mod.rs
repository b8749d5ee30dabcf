//! Source adapters: one per open-data feed.
//!
//! An adapter knows its dataset (identifier, ordering column, date-literal
//! format, page size, politeness delay) and how to turn one raw row into a
//! canonical event. `normalize` returns `None` for rows it rejects; it never
//! errors and never panics on malformed input.

pub mod certificates;
pub mod complaints;
pub mod environmental_review;
pub mod nta_boundaries;
pub mod parcels;
pub mod permits;
pub mod violations;
pub mod zoning;

use std::time::Duration;

use chrono::{DateTime, Utc};
use urbanflux_core::dates::DateLiteral;
use urbanflux_core::errors::SourceError;
use urbanflux_core::model::{CanonicalEvent, EventType, Source};

use crate::raw::RawRecord;
use crate::transport::{PageFetcher, PageQuery};

pub use certificates::CertificatesAdapter;
pub use complaints::ComplaintsAdapter;
pub use environmental_review::EnvironmentalReviewAdapter;
pub use nta_boundaries::NtaBoundariesAdapter;
pub use parcels::ParcelsAdapter;
pub use permits::PermitsAdapter;
pub use violations::ViolationsAdapter;
pub use zoning::ZoningAdapter;

/// Static description of one portal dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetSpec {
    /// Portal dataset identifier, e.g. `ic3t-wcy2`.
    pub dataset_id: &'static str,
    /// Column used for newest-first ordering and the incremental filter.
    pub order_column: &'static str,
    /// How the incremental filter's date literal is written for this dataset.
    pub since_literal: DateLiteral,
    pub batch_size: usize,
    /// Pause between consecutive page requests.
    pub page_delay: Duration,
}

/// Per-run normalization context.
///
/// `ingested_at` is the "now" used when a feed carries no usable date, fixed
/// once per run so re-normalizing the same page yields identical events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeContext {
    pub ingested_at: DateTime<Utc>,
}

impl NormalizeContext {
    pub fn new(ingested_at: DateTime<Utc>) -> Self {
        Self { ingested_at }
    }

    pub fn now() -> Self {
        Self::new(Utc::now())
    }
}

/// Result of requesting one page. A failure is an empty page plus the cause.
#[derive(Debug)]
pub enum PageOutcome {
    Records(Vec<RawRecord>),
    Failed(SourceError),
}

impl PageOutcome {
    pub fn records(&self) -> &[RawRecord] {
        match self {
            Self::Records(records) => records,
            Self::Failed(_) => &[],
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

pub trait SourceAdapter: Send + Sync {
    fn source(&self) -> Source;

    fn dataset(&self) -> &'static DatasetSpec;

    /// Map one raw row to a canonical event, or reject it.
    fn normalize(&self, record: &RawRecord, ctx: &NormalizeContext) -> Option<CanonicalEvent>;

    /// Newest-first page query, optionally restricted to rows on or after `since`.
    fn page_query(&self, since: Option<DateTime<Utc>>, limit: usize, offset: usize) -> PageQuery {
        let dataset = self.dataset();
        PageQuery {
            dataset: dataset.dataset_id,
            limit,
            offset,
            order: format!("{} DESC", dataset.order_column),
            where_clause: since.map(|since| {
                format!(
                    "{} >= '{}'",
                    dataset.order_column,
                    dataset.since_literal.format(since)
                )
            }),
        }
    }

    /// Fetch one page at `offset`. Transport failures are logged and come
    /// back as [`PageOutcome::Failed`], never as a panic or an `Err`.
    fn fetch_page(
        &self,
        fetcher: &dyn PageFetcher,
        since: Option<DateTime<Utc>>,
        offset: usize,
    ) -> PageOutcome {
        let query = self.page_query(since, self.dataset().batch_size, offset);
        match fetcher.fetch(self.source(), &query) {
            Ok(records) => PageOutcome::Records(records),
            Err(e) => {
                tracing::warn!(
                    source = %self.source(),
                    offset,
                    error = %e,
                    "page fetch failed"
                );
                PageOutcome::Failed(e)
            }
        }
    }
}

static ZONING: ZoningAdapter = ZoningAdapter;
static ENVIRONMENTAL_REVIEW: EnvironmentalReviewAdapter = EnvironmentalReviewAdapter;
static PERMITS: PermitsAdapter = PermitsAdapter;
static VIOLATIONS: ViolationsAdapter = ViolationsAdapter;
static COMPLAINTS: ComplaintsAdapter = ComplaintsAdapter;
static CERTIFICATES: CertificatesAdapter = CertificatesAdapter;
static PARCELS: ParcelsAdapter = ParcelsAdapter;
static NTA_BOUNDARIES: NtaBoundariesAdapter = NtaBoundariesAdapter;

/// The adapter for a source.
pub fn adapter_for(source: Source) -> &'static dyn SourceAdapter {
    match source {
        Source::ZoningApplications => &ZONING,
        Source::EnvironmentalReview => &ENVIRONMENTAL_REVIEW,
        Source::PermitFilings => &PERMITS,
        Source::Violations => &VIOLATIONS,
        Source::Complaints => &COMPLAINTS,
        Source::CertificatesOfOccupancy => &CERTIFICATES,
        Source::Parcels => &PARCELS,
        Source::Boundaries => &NTA_BOUNDARIES,
    }
}

/// Event with only the identity, type, date and payload filled in.
pub(crate) fn base_event(
    source: Source,
    source_id: String,
    event_type: EventType,
    event_date: DateTime<Utc>,
    record: &RawRecord,
) -> CanonicalEvent {
    CanonicalEvent {
        source,
        source_id,
        event_type,
        event_date,
        location_ref: None,
        borough: None,
        latitude: None,
        longitude: None,
        community_district: None,
        raw_payload: record.to_value(),
    }
}

/// `{a}-{b}` when the qualifier is present, else `a`.
pub(crate) fn qualified_id(id: String, qualifier: Option<String>) -> String {
    match qualifier {
        Some(q) => format!("{id}-{q}"),
        None => id,
    }
}
