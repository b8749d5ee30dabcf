//! Environmental review projects (`gezn-7mgk`).
//!
//! One project row carries several milestone dates. The most advanced
//! milestone present decides the event type and supplies the event date.

use std::time::Duration;

use urbanflux_core::bbl;
use urbanflux_core::dates::DateLiteral;
use urbanflux_core::model::borough::normalize_community_district;
use urbanflux_core::model::{BoroughPolicy, CanonicalEvent, EventType, Source};

use super::{base_event, DatasetSpec, NormalizeContext, SourceAdapter};
use crate::raw::RawRecord;

static DATASET: DatasetSpec = DatasetSpec {
    dataset_id: "gezn-7mgk",
    order_column: "last_modified_date",
    since_literal: DateLiteral::IsoDate,
    batch_size: 1000,
    page_delay: Duration::from_millis(300),
};

pub const BOROUGH_POLICY: BoroughPolicy = BoroughPolicy::Drop;

/// Milestones in descending priority.
const MILESTONES: [(&str, EventType); 4] = [
    ("completed_date", EventType::ReviewCompleted),
    ("feis_date", EventType::FeisSubmitted),
    ("deis_date", EventType::DeisSubmitted),
    ("eas_date", EventType::EasSubmitted),
];

const ACTIVE_STATUSES: [&str; 2] = ["active", "in progress"];

#[derive(Debug, Clone, Copy, Default)]
pub struct EnvironmentalReviewAdapter;

impl SourceAdapter for EnvironmentalReviewAdapter {
    fn source(&self) -> Source {
        Source::EnvironmentalReview
    }

    fn dataset(&self) -> &'static DatasetSpec {
        &DATASET
    }

    fn normalize(&self, record: &RawRecord, ctx: &NormalizeContext) -> Option<CanonicalEvent> {
        let ceqr_number = record.text("ceqr_number")?;

        let milestone = MILESTONES
            .iter()
            .find_map(|(field, event_type)| record.date(field).map(|date| (*event_type, date)));
        let (event_type, event_date) = match milestone {
            Some(hit) => hit,
            None => {
                let status = record.str("project_status")?.to_ascii_lowercase();
                if !ACTIVE_STATUSES.iter().any(|s| status.contains(s)) {
                    return None;
                }
                let date = record
                    .date("last_modified_date")
                    .unwrap_or(ctx.ingested_at);
                (EventType::ReviewActive, date)
            }
        };

        let mut event = base_event(self.source(), ceqr_number, event_type, event_date, record);
        event.location_ref = record.str("bbl").and_then(bbl::normalize);
        event.borough = BOROUGH_POLICY.normalize(record.str("borough"));
        event.latitude = record.latitude("latitude");
        event.longitude = record.longitude("longitude");
        event.community_district = normalize_community_district(record.str("community_district"));
        Some(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::test_support::{ctx, day, record};
    use serde_json::json;

    #[test]
    fn final_statement_outranks_draft() {
        let r = record(json!({
            "ceqr_number": "24DCP001K",
            "eas_date": "2023-01-10",
            "deis_date": "2023-06-01",
            "feis_date": "2024-01-05",
            "borough": "K"
        }));
        let event = EnvironmentalReviewAdapter.normalize(&r, &ctx()).unwrap();
        assert_eq!(event.event_type, EventType::FeisSubmitted);
        assert_eq!(event.event_date, day(2024, 1, 5));
    }

    #[test]
    fn completion_outranks_everything() {
        let r = record(json!({
            "ceqr_number": "X",
            "completed_date": "2024-04-02",
            "feis_date": "2024-01-05",
            "project_status": "Active"
        }));
        let event = EnvironmentalReviewAdapter.normalize(&r, &ctx()).unwrap();
        assert_eq!(event.event_type, EventType::ReviewCompleted);
        assert_eq!(event.event_date, day(2024, 4, 2));
    }

    #[test]
    fn unparsable_milestone_date_does_not_win() {
        let r = record(json!({
            "ceqr_number": "X",
            "feis_date": "TBD",
            "eas_date": "2022-09-09"
        }));
        let event = EnvironmentalReviewAdapter.normalize(&r, &ctx()).unwrap();
        assert_eq!(event.event_type, EventType::EasSubmitted);
    }

    #[test]
    fn active_status_is_the_last_resort() {
        let r = record(json!({
            "ceqr_number": "X",
            "project_status": "In Progress",
            "last_modified_date": "2024-05-05"
        }));
        let event = EnvironmentalReviewAdapter.normalize(&r, &ctx()).unwrap();
        assert_eq!(event.event_type, EventType::ReviewActive);
        assert_eq!(event.event_date, day(2024, 5, 5));

        let r = record(json!({"ceqr_number": "X", "project_status": "Active"}));
        let event = EnvironmentalReviewAdapter.normalize(&r, &ctx()).unwrap();
        assert_eq!(event.event_date, ctx().ingested_at);
    }

    #[test]
    fn no_signal_is_rejected() {
        let r = record(json!({"ceqr_number": "X", "project_status": "Closed"}));
        assert!(EnvironmentalReviewAdapter.normalize(&r, &ctx()).is_none());
        let r = record(json!({"ceqr_number": "X"}));
        assert!(EnvironmentalReviewAdapter.normalize(&r, &ctx()).is_none());
    }

    #[test]
    fn unmapped_borough_is_dropped() {
        let r = record(json!({
            "ceqr_number": "X",
            "eas_date": "2022-09-09",
            "borough": "Citywide"
        }));
        let event = EnvironmentalReviewAdapter.normalize(&r, &ctx()).unwrap();
        assert_eq!(event.borough, None);
    }
}
