//! DOB violations (`3h2n-5cm9`).

use std::time::Duration;

use urbanflux_core::bbl;
use urbanflux_core::dates::DateLiteral;
use urbanflux_core::model::{Borough, BoroughPolicy, CanonicalEvent, EventType, Source};

use super::{base_event, DatasetSpec, NormalizeContext, SourceAdapter};
use crate::raw::RawRecord;

static DATASET: DatasetSpec = DatasetSpec {
    dataset_id: "3h2n-5cm9",
    order_column: "issue_date",
    since_literal: DateLiteral::Compact,
    batch_size: 10_000,
    page_delay: Duration::from_millis(100),
};

pub const BOROUGH_POLICY: BoroughPolicy = BoroughPolicy::Drop;

/// A construction violation means work is under way on site.
fn classify(violation_type: Option<&str>) -> EventType {
    match violation_type {
        Some(t) if t.to_ascii_uppercase().contains("CONSTRUCTION") => {
            EventType::ConstructionStarted
        }
        _ => EventType::ViolationIssued,
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ViolationsAdapter;

impl SourceAdapter for ViolationsAdapter {
    fn source(&self) -> Source {
        Source::Violations
    }

    fn dataset(&self) -> &'static DatasetSpec {
        &DATASET
    }

    fn normalize(&self, record: &RawRecord, _ctx: &NormalizeContext) -> Option<CanonicalEvent> {
        let isn = record.text("isn_dob_bis_viol")?;
        let event_date = record.date("issue_date")?;
        let event_type = classify(record.str("violation_type"));

        let borough_token = record.str("boro");
        let mut event = base_event(self.source(), isn, event_type, event_date, record);
        event.location_ref = borough_token
            .and_then(Borough::parse)
            .zip(record.str("block").zip(record.str("lot")))
            .and_then(|(borough, (block, lot))| bbl::compose(borough, block, lot));
        event.borough = BOROUGH_POLICY.normalize(borough_token);
        Some(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::test_support::{ctx, day, record};
    use serde_json::json;

    #[test]
    fn compact_issue_date_is_required() {
        let r = record(json!({
            "isn_dob_bis_viol": "2460981",
            "issue_date": "20240115",
            "boro": "1",
            "block": "00877",
            "lot": "0012",
            "violation_type": "LL6291-LOCAL LAW 62/91 - BOILERS"
        }));
        let event = ViolationsAdapter.normalize(&r, &ctx()).unwrap();
        assert_eq!(event.event_date, day(2024, 1, 15));
        assert_eq!(event.event_type, EventType::ViolationIssued);
        assert_eq!(event.borough.as_deref(), Some("Manhattan"));
        assert_eq!(event.location_ref.as_deref(), Some("1008770012"));

        let r = record(json!({"isn_dob_bis_viol": "2460981", "issue_date": "2024011"}));
        assert!(ViolationsAdapter.normalize(&r, &ctx()).is_none());
    }

    #[test]
    fn construction_violation_means_work_under_way() {
        let r = record(json!({
            "isn_dob_bis_viol": "1",
            "issue_date": "20240115",
            "violation_type": "C-CONSTRUCTION"
        }));
        let event = ViolationsAdapter.normalize(&r, &ctx()).unwrap();
        assert_eq!(event.event_type, EventType::ConstructionStarted);
    }

    #[test]
    fn missing_identifier_is_rejected() {
        let r = record(json!({"issue_date": "20240115"}));
        assert!(ViolationsAdapter.normalize(&r, &ctx()).is_none());
    }
}
