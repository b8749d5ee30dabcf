//! Tax-lot registry (`64uk-42ks`).
//!
//! Parcels carry no temporal signal; they anchor places with coordinates and
//! administrative attributes so other feeds' events can be mapped.

use std::time::Duration;

use urbanflux_core::bbl;
use urbanflux_core::dates::DateLiteral;
use urbanflux_core::model::borough::normalize_community_district;
use urbanflux_core::model::{BoroughPolicy, CanonicalEvent, EventType, Source};

use super::{base_event, DatasetSpec, NormalizeContext, SourceAdapter};
use crate::raw::RawRecord;

static DATASET: DatasetSpec = DatasetSpec {
    dataset_id: "64uk-42ks",
    order_column: ":updated_at",
    since_literal: DateLiteral::IsoDate,
    batch_size: 5000,
    page_delay: Duration::from_millis(200),
};

pub const BOROUGH_POLICY: BoroughPolicy = BoroughPolicy::Drop;

#[derive(Debug, Clone, Copy, Default)]
pub struct ParcelsAdapter;

impl SourceAdapter for ParcelsAdapter {
    fn source(&self) -> Source {
        Source::Parcels
    }

    fn dataset(&self) -> &'static DatasetSpec {
        &DATASET
    }

    fn normalize(&self, record: &RawRecord, ctx: &NormalizeContext) -> Option<CanonicalEvent> {
        let bbl = record.text("bbl").as_deref().and_then(bbl::normalize)?;

        let mut event = base_event(
            self.source(),
            bbl.clone(),
            EventType::ParcelRecorded,
            ctx.ingested_at,
            record,
        );
        event.location_ref = Some(bbl);
        event.borough = BOROUGH_POLICY.normalize(record.str("borough"));
        event.latitude = record.latitude("latitude");
        event.longitude = record.longitude("longitude");
        event.community_district = normalize_community_district(record.str("cd"));
        Some(event)
    }
}
