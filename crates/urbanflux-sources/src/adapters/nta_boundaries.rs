//! Neighborhood tabulation areas (`9nt8-h7nd`).
//!
//! Each area becomes a coordinate-bearing record at the centroid of its
//! geometry. Areas are not parcels, so they carry no location reference.

use std::time::Duration;

use serde_json::Value;
use urbanflux_core::dates::DateLiteral;
use urbanflux_core::model::borough::normalize_community_district;
use urbanflux_core::model::{BoroughPolicy, CanonicalEvent, EventType, Source};

use super::{base_event, DatasetSpec, NormalizeContext, SourceAdapter};
use crate::raw::RawRecord;

static DATASET: DatasetSpec = DatasetSpec {
    dataset_id: "9nt8-h7nd",
    order_column: ":updated_at",
    since_literal: DateLiteral::IsoDate,
    batch_size: 1000,
    page_delay: Duration::from_millis(500),
};

pub const BOROUGH_POLICY: BoroughPolicy = BoroughPolicy::Drop;

/// Mean of the outer-ring vertices of a GeoJSON `Polygon` or `MultiPolygon`,
/// as `(lat, lng)`. The closing vertex of each ring is not counted twice.
pub fn centroid(geometry: &Value) -> Option<(f64, f64)> {
    let coordinates = geometry.get("coordinates")?;
    let outer_rings: Vec<&Value> = match geometry.get("type")?.as_str()? {
        "Polygon" => vec![coordinates.get(0)?],
        "MultiPolygon" => coordinates
            .as_array()?
            .iter()
            .filter_map(|polygon| polygon.get(0))
            .collect(),
        _ => return None,
    };

    let (mut lat_sum, mut lng_sum, mut count) = (0.0, 0.0, 0usize);
    for ring in outer_rings {
        let mut vertices: Vec<(f64, f64)> = ring
            .as_array()?
            .iter()
            .filter_map(|point| Some((point.get(0)?.as_f64()?, point.get(1)?.as_f64()?)))
            .collect();
        if vertices.len() > 1 && vertices.first() == vertices.last() {
            vertices.pop();
        }
        for (lng, lat) in vertices {
            lat_sum += lat;
            lng_sum += lng;
            count += 1;
        }
    }

    if count == 0 {
        return None;
    }
    let n = count as f64;
    let (lat, lng) = (lat_sum / n, lng_sum / n);
    (lat.is_finite() && lng.is_finite()).then_some((lat, lng))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NtaBoundariesAdapter;

impl SourceAdapter for NtaBoundariesAdapter {
    fn source(&self) -> Source {
        Source::Boundaries
    }

    fn dataset(&self) -> &'static DatasetSpec {
        &DATASET
    }

    fn normalize(&self, record: &RawRecord, ctx: &NormalizeContext) -> Option<CanonicalEvent> {
        let code = record.text("nta2020").or_else(|| record.text("ntacode"))?;
        let center = record.get("the_geom").and_then(centroid);

        let mut event = base_event(
            self.source(),
            code,
            EventType::BoundaryRecorded,
            ctx.ingested_at,
            record,
        );
        event.borough = BOROUGH_POLICY.normalize(record.str("boroname"));
        event.latitude = center.map(|(lat, _)| lat);
        event.longitude = center.map(|(_, lng)| lng);
        event.community_district = normalize_community_district(record.str("cdta2020"));
        Some(event)
    }
}
