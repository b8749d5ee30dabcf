//! Zoning application portal (`hgx4-8ukb`).
//!
//! The event type depends on both the ULURP/non-ULURP category and the free
//! text public status. This portal publishes no coordinates, and it keeps
//! borough tokens it cannot map (`Citywide`, multi-borough values).

use std::time::Duration;

use urbanflux_core::bbl;
use urbanflux_core::dates::DateLiteral;
use urbanflux_core::model::borough::normalize_community_district;
use urbanflux_core::model::{BoroughPolicy, CanonicalEvent, EventType, Source};

use super::{base_event, DatasetSpec, NormalizeContext, SourceAdapter};
use crate::raw::RawRecord;

static DATASET: DatasetSpec = DatasetSpec {
    dataset_id: "hgx4-8ukb",
    order_column: "app_filed_date",
    since_literal: DateLiteral::IsoDate,
    batch_size: 1000,
    page_delay: Duration::from_millis(500),
};

pub const BOROUGH_POLICY: BoroughPolicy = BoroughPolicy::PassThrough;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Filed,
    Approved,
    Denied,
}

/// Status keywords, checked top-down; first hit wins. A keyword must start a
/// word, so `Completed` matches `complete` but `Inactive` does not match `active`.
const STATUS_KEYWORDS: [(&str, Stage); 6] = [
    ("filed", Stage::Filed),
    ("active", Stage::Filed),
    ("complete", Stage::Approved),
    ("approved", Stage::Approved),
    ("denied", Stage::Denied),
    ("withdrawn", Stage::Denied),
];

fn classify(category: Option<&str>, status: &str) -> Option<EventType> {
    let ulurp = category.is_some_and(|c| c.eq_ignore_ascii_case("ULURP"));
    let status = status.to_ascii_lowercase();
    let stage = STATUS_KEYWORDS
        .iter()
        .find(|(keyword, _)| {
            status
                .split(|c: char| !c.is_ascii_alphanumeric())
                .any(|word| word.starts_with(keyword))
        })
        .map(|(_, stage)| *stage)?;

    match (ulurp, stage) {
        (true, Stage::Filed) => Some(EventType::UlurpFiled),
        (true, Stage::Approved) => Some(EventType::UlurpApproved),
        (true, Stage::Denied) => Some(EventType::UlurpDenied),
        (false, Stage::Filed) => Some(EventType::NonUlurpFiled),
        (false, Stage::Approved) => Some(EventType::NonUlurpApproved),
        (false, Stage::Denied) => None,
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ZoningAdapter;

impl SourceAdapter for ZoningAdapter {
    fn source(&self) -> Source {
        Source::ZoningApplications
    }

    fn dataset(&self) -> &'static DatasetSpec {
        &DATASET
    }

    fn normalize(&self, record: &RawRecord, ctx: &NormalizeContext) -> Option<CanonicalEvent> {
        let project_id = record.text("project_id")?;
        let event_type = classify(record.str("ulurp_non"), record.str("public_status")?)?;
        let event_date = record
            .first_date(&["app_filed_date", "pre_pas_date"])
            .unwrap_or(ctx.ingested_at);

        let mut event = base_event(self.source(), project_id, event_type, event_date, record);
        event.location_ref = record.str("bbl").and_then(bbl::normalize);
        event.borough = BOROUGH_POLICY.normalize(record.str("borough"));
        event.community_district = normalize_community_district(record.str("community_district"));
        Some(event)
    }
}
