//! DOB certificates of occupancy (`bs8b-p36w`).
//!
//! The only feed that confirms physical work: a temporary certificate means
//! construction is under way, a final one means it is done.

use std::time::Duration;

use urbanflux_core::bbl;
use urbanflux_core::dates::DateLiteral;
use urbanflux_core::model::{Borough, BoroughPolicy, CanonicalEvent, EventType, Source};

use super::{base_event, DatasetSpec, NormalizeContext, SourceAdapter};
use crate::raw::RawRecord;

static DATASET: DatasetSpec = DatasetSpec {
    dataset_id: "bs8b-p36w",
    order_column: "c_of_o_issuance_date",
    since_literal: DateLiteral::IsoDate,
    batch_size: 2000,
    page_delay: Duration::from_millis(200),
};

pub const BOROUGH_POLICY: BoroughPolicy = BoroughPolicy::Drop;

fn classify(issue_type: Option<&str>) -> EventType {
    match issue_type {
        Some(t) if t.to_ascii_lowercase().starts_with("temp") => EventType::ConstructionStarted,
        _ => EventType::ConstructionCompleted,
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CertificatesAdapter;

impl SourceAdapter for CertificatesAdapter {
    fn source(&self) -> Source {
        Source::CertificatesOfOccupancy
    }

    fn dataset(&self) -> &'static DatasetSpec {
        &DATASET
    }

    fn normalize(&self, record: &RawRecord, _ctx: &NormalizeContext) -> Option<CanonicalEvent> {
        let job_number = record.text("job_number")?;
        let event_date = record.date("c_of_o_issuance_date")?;
        // A job accumulates several certificates; the issuance day tells them apart.
        let source_id = format!("{}-{}", job_number, event_date.format("%Y%m%d"));
        let event_type = classify(record.str("issue_type"));

        let borough_token = record.str("borough");
        let mut event = base_event(self.source(), source_id, event_type, event_date, record);
        event.location_ref = borough_token
            .and_then(Borough::parse)
            .zip(record.str("block").zip(record.str("lot")))
            .and_then(|(borough, (block, lot))| bbl::compose(borough, block, lot));
        event.borough = BOROUGH_POLICY.normalize(borough_token);
        event.latitude = record.latitude("latitude");
        event.longitude = record.longitude("longitude");
        Some(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::test_support::{ctx, day, record};
    use serde_json::json;

    #[test]
    fn final_certificate_completes_construction() {
        let r = record(json!({
            "job_number": "320912345",
            "c_of_o_issuance_date": "2024-04-30T00:00:00.000",
            "issue_type": "Final",
            "borough": "BROOKLYN",
            "block": "1234",
            "lot": "56",
            "latitude": "40.6782",
            "longitude": "-73.9442"
        }));
        let event = CertificatesAdapter.normalize(&r, &ctx()).unwrap();
        assert_eq!(event.event_type, EventType::ConstructionCompleted);
        assert_eq!(event.source_id, "320912345-20240430");
        assert_eq!(event.event_date, day(2024, 4, 30));
        assert_eq!(event.borough.as_deref(), Some("Brooklyn"));
        assert_eq!(event.location_ref.as_deref(), Some("3012340056"));
    }

    #[test]
    fn temporary_certificate_starts_construction() {
        let r = record(json!({
            "job_number": "1",
            "c_of_o_issuance_date": "2024-04-30",
            "issue_type": "Temporary"
        }));
        let event = CertificatesAdapter.normalize(&r, &ctx()).unwrap();
        assert_eq!(event.event_type, EventType::ConstructionStarted);
    }

    #[test]
    fn issuance_date_is_required() {
        let r = record(json!({"job_number": "1", "issue_type": "Final"}));
        assert!(CertificatesAdapter.normalize(&r, &ctx()).is_none());
    }
}
