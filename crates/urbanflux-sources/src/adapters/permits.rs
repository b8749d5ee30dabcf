//! DOB permit filings (`ic3t-wcy2`).

use std::time::Duration;

use urbanflux_core::bbl;
use urbanflux_core::dates::DateLiteral;
use urbanflux_core::model::borough::normalize_community_district;
use urbanflux_core::model::{Borough, BoroughPolicy, CanonicalEvent, EventType, Source};

use super::{base_event, qualified_id, DatasetSpec, NormalizeContext, SourceAdapter};
use crate::raw::RawRecord;

static DATASET: DatasetSpec = DatasetSpec {
    dataset_id: "ic3t-wcy2",
    order_column: "dobrundate",
    since_literal: DateLiteral::CompactTimestamp,
    batch_size: 5000,
    page_delay: Duration::from_millis(200),
};

pub const BOROUGH_POLICY: BoroughPolicy = BoroughPolicy::Drop;

const JOB_TYPES: [(&str, EventType); 8] = [
    ("NB", EventType::NewBuilding),
    ("A1", EventType::MajorAlteration),
    ("A2", EventType::MinorAlteration),
    ("A3", EventType::MinorAlteration),
    ("DM", EventType::Demolition),
    ("SH", EventType::Scaffold),
    ("EW", EventType::EquipmentWork),
    ("PL", EventType::Plumbing),
];

/// Unmapped or missing job types are `other`, not rejected.
pub fn classify_job_type(job_type: Option<&str>) -> EventType {
    job_type
        .and_then(|code| {
            JOB_TYPES
                .iter()
                .find(|(known, _)| code.eq_ignore_ascii_case(known))
                .map(|(_, event_type)| *event_type)
        })
        .unwrap_or(EventType::Other)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PermitsAdapter;

impl SourceAdapter for PermitsAdapter {
    fn source(&self) -> Source {
        Source::PermitFilings
    }

    fn dataset(&self) -> &'static DatasetSpec {
        &DATASET
    }

    fn normalize(&self, record: &RawRecord, ctx: &NormalizeContext) -> Option<CanonicalEvent> {
        let job = record.text("job__")?;
        let source_id = qualified_id(job, record.text("doc__"));
        let event_type = classify_job_type(record.str("job_type"));
        let event_date = record
            .first_date(&["filing_date", "pre__filing_date"])
            .unwrap_or(ctx.ingested_at);

        let borough_token = record.str("borough");
        let mut event = base_event(self.source(), source_id, event_type, event_date, record);
        event.location_ref = borough_token
            .and_then(Borough::parse)
            .zip(record.str("block").zip(record.str("lot")))
            .and_then(|(borough, (block, lot))| bbl::compose(borough, block, lot));
        event.borough = BOROUGH_POLICY.normalize(borough_token);
        event.latitude = record.latitude("gis_latitude");
        event.longitude = record.longitude("gis_longitude");
        event.community_district = normalize_community_district(record.str("community_board"));
        Some(event)
    }
}
