//! DOB complaints received (`eabe-havv`).
//!
//! The feed has no borough column; the borough is the leading digit of the
//! three-digit community board.

use std::time::Duration;

use urbanflux_core::bbl;
use urbanflux_core::dates::DateLiteral;
use urbanflux_core::model::borough::normalize_community_district;
use urbanflux_core::model::{Borough, BoroughPolicy, CanonicalEvent, EventType, Source};

use super::{base_event, DatasetSpec, NormalizeContext, SourceAdapter};
use crate::raw::RawRecord;

static DATASET: DatasetSpec = DatasetSpec {
    dataset_id: "eabe-havv",
    order_column: "date_entered",
    since_literal: DateLiteral::IsoDate,
    batch_size: 5000,
    page_delay: Duration::from_millis(200),
};

pub const BOROUGH_POLICY: BoroughPolicy = BoroughPolicy::Drop;

#[derive(Debug, Clone, Copy, Default)]
pub struct ComplaintsAdapter;

impl SourceAdapter for ComplaintsAdapter {
    fn source(&self) -> Source {
        Source::Complaints
    }

    fn dataset(&self) -> &'static DatasetSpec {
        &DATASET
    }

    fn normalize(&self, record: &RawRecord, _ctx: &NormalizeContext) -> Option<CanonicalEvent> {
        let complaint_number = record.text("complaint_number")?;
        let event_date = record.date("date_entered")?;

        let board = record.text("community_board");
        let borough_token = board.as_deref().and_then(|b| b.get(..1));

        let mut event = base_event(
            self.source(),
            complaint_number,
            EventType::ComplaintFiled,
            event_date,
            record,
        );
        event.location_ref = borough_token
            .and_then(Borough::parse)
            .zip(record.str("block").zip(record.str("lot")))
            .and_then(|(borough, (block, lot))| bbl::compose(borough, block, lot));
        event.borough = BOROUGH_POLICY.normalize(borough_token);
        event.community_district = normalize_community_district(board.as_deref());
        Some(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::test_support::{ctx, day, record};
    use serde_json::json;

    #[test]
    fn borough_comes_from_the_community_board() {
        let r = record(json!({
            "complaint_number": "4876543",
            "date_entered": "2024-03-01T00:00:00.000",
            "community_board": "412"
        }));
        let event = ComplaintsAdapter.normalize(&r, &ctx()).unwrap();
        assert_eq!(event.event_type, EventType::ComplaintFiled);
        assert_eq!(event.borough.as_deref(), Some("Queens"));
        assert_eq!(event.community_district.as_deref(), Some("412"));
        assert_eq!(event.event_date, day(2024, 3, 1));
    }

    #[test]
    fn unknown_board_prefix_is_dropped() {
        let r = record(json!({
            "complaint_number": "1",
            "date_entered": "2024-03-01",
            "community_board": "000"
        }));
        let event = ComplaintsAdapter.normalize(&r, &ctx()).unwrap();
        assert_eq!(event.borough, None);
    }

    #[test]
    fn entry_date_is_required() {
        let r = record(json!({"complaint_number": "1", "community_board": "101"}));
        assert!(ComplaintsAdapter.normalize(&r, &ctx()).is_none());
    }
}
