//! Pipeline store behavior on an in-memory database: event upserts, place
//! enrichment, keyset batches, states, the heatmap swap and the sync ledger.

use chrono::{Duration, TimeZone, Utc};
use serde_json::json;
use urbanflux_core::model::{
    CanonicalEvent, Certainty, EventType, HeatmapCell, Nature, Source, SyncRunOutcome,
    SyncRunStatus, TransformationState,
};
use urbanflux_core::traits::{PipelineStore, SyncLedger};
use urbanflux_storage::StorageEngine;

fn event(source: Source, id: &str, event_type: EventType, location_ref: Option<&str>) -> CanonicalEvent {
    CanonicalEvent {
        source,
        source_id: id.to_string(),
        event_type,
        event_date: Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap(),
        location_ref: location_ref.map(str::to_string),
        borough: None,
        latitude: None,
        longitude: None,
        community_district: None,
        raw_payload: json!({"id": id}),
    }
}

fn geocoded(mut e: CanonicalEvent, lat: f64, lng: f64) -> CanonicalEvent {
    e.latitude = Some(lat);
    e.longitude = Some(lng);
    e
}

fn cell(index: &str, avg: f64) -> HeatmapCell {
    HeatmapCell {
        cell_index: index.to_string(),
        center_lat: 40.7,
        center_lng: -73.9,
        avg_intensity: avg,
        max_intensity: avg,
        place_count: 1,
        dominant_nature: Nature::Mixed,
        computed_at: Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
    }
}

fn state(location_id: i64, intensity: f64) -> TransformationState {
    TransformationState {
        location_id,
        certainty: Certainty::Probable,
        intensity,
        nature: Nature::NewConstruction,
        computed_at: Utc.with_ymd_and_hms(2024, 6, 1, 12, 30, 15).unwrap()
            + Duration::microseconds(250),
    }
}

// ── Events ────────────────────────────────────────────────────────────────

#[test]
fn upsert_is_keyed_on_source_and_source_id() {
    let store = StorageEngine::open_in_memory().unwrap();
    let mut e = event(Source::PermitFilings, "100-01", EventType::NewBuilding, Some("3012340056"));
    store.upsert_event(&e).unwrap();
    store.upsert_event(&e).unwrap();

    e.event_type = EventType::Demolition;
    store.upsert_event(&e).unwrap();

    // Same id from another source is a different event.
    store
        .upsert_event(&event(Source::Violations, "100-01", EventType::ViolationIssued, None))
        .unwrap();

    let counts = store.counts().unwrap();
    assert_eq!(counts.events, 2);
    assert_eq!(counts.places, 1);

    let (stored, location_id) = store
        .find_event(Source::PermitFilings, "100-01")
        .unwrap()
        .unwrap();
    assert_eq!(stored.event_type, "demolition");
    assert!(location_id.is_some());

    let (_, unlinked) = store.find_event(Source::Violations, "100-01").unwrap().unwrap();
    assert_eq!(unlinked, None);
}

#[test]
fn batch_upsert_counts_and_skips_empty() {
    let store = StorageEngine::open_in_memory().unwrap();
    assert_eq!(store.upsert_events(&[]).unwrap(), 0);
    let events: Vec<_> = (0..25)
        .map(|i| event(Source::Complaints, &format!("c{i}"), EventType::ComplaintFiled, None))
        .collect();
    assert_eq!(store.upsert_events(&events).unwrap(), 25);
    assert_eq!(store.counts().unwrap().events, 25);
}

#[test]
fn places_are_enriched_only_where_empty() {
    let store = StorageEngine::open_in_memory().unwrap();
    let bbl = "3012340056";

    store
        .upsert_event(&event(Source::PermitFilings, "a", EventType::NewBuilding, Some(bbl)))
        .unwrap();
    let place = store.find_location(bbl).unwrap().unwrap();
    assert_eq!(place.coordinates(), None);

    let mut parcel = geocoded(
        event(Source::Parcels, bbl, EventType::ParcelRecorded, Some(bbl)),
        40.6782,
        -73.9442,
    );
    parcel.borough = Some("Brooklyn".to_string());
    parcel.raw_payload = json!({"bbl": bbl, "nta": "Crown Heights North"});
    store.upsert_event(&parcel).unwrap();

    let mut later = geocoded(
        event(Source::CertificatesOfOccupancy, "b", EventType::ConstructionCompleted, Some(bbl)),
        41.0,
        -74.5,
    );
    later.borough = Some("Queens".to_string());
    store.upsert_event(&later).unwrap();

    let place = store.find_location(bbl).unwrap().unwrap();
    assert_eq!(place.coordinates(), Some((40.6782, -73.9442)));
    assert_eq!(place.borough.as_deref(), Some("Brooklyn"));
    assert_eq!(place.nta.as_deref(), Some("Crown Heights North"));
    assert_eq!(store.counts().unwrap().places, 1);
}

#[test]
fn half_coordinates_never_land_on_a_place() {
    let store = StorageEngine::open_in_memory().unwrap();
    let mut e = event(Source::PermitFilings, "a", EventType::NewBuilding, Some("1008770012"));
    e.latitude = Some(40.75);
    store.upsert_event(&e).unwrap();

    let place = store.find_location("1008770012").unwrap().unwrap();
    assert_eq!(place.latitude, None);
    assert_eq!(place.longitude, None);
}

// ── Derivation reads ──────────────────────────────────────────────────────

#[test]
fn locations_with_events_page_by_id() {
    let store = StorageEngine::open_in_memory().unwrap();
    for i in 1..=5 {
        let bbl = format!("10000{i}0001");
        store
            .upsert_event(&event(Source::PermitFilings, &format!("p{i}"), EventType::NewBuilding, Some(bbl.as_str())))
            .unwrap();
        store
            .upsert_event(&event(Source::Violations, &format!("v{i}"), EventType::ViolationIssued, Some(bbl.as_str())))
            .unwrap();
    }

    let first = store.find_locations_with_events(0, 2).unwrap();
    assert_eq!(first.len(), 2);
    assert!(first.iter().all(|l| l.events.len() == 2));

    let after = first.last().unwrap().location.id;
    let rest = store.find_locations_with_events(after, 10).unwrap();
    assert_eq!(rest.len(), 3);
    assert!(rest.iter().all(|l| l.location.id > after));

    let ids: Vec<_> = first.iter().chain(&rest).map(|l| l.location.id).collect();
    let mut sorted = ids.clone();
    sorted.sort_unstable();
    assert_eq!(ids, sorted);

    let last = rest.last().unwrap().location.id;
    assert!(store.find_locations_with_events(last, 10).unwrap().is_empty());
}

#[test]
fn geocoded_states_need_coordinates_and_a_state() {
    let store = StorageEngine::open_in_memory().unwrap();
    store
        .upsert_event(&geocoded(
            event(Source::Parcels, "1000010001", EventType::ParcelRecorded, Some("1000010001")),
            40.70,
            -74.00,
        ))
        .unwrap();
    store
        .upsert_event(&event(Source::Parcels, "1000020001", EventType::ParcelRecorded, Some("1000020001")))
        .unwrap();
    store
        .upsert_event(&geocoded(
            event(Source::Parcels, "1000030001", EventType::ParcelRecorded, Some("1000030001")),
            40.71,
            -74.01,
        ))
        .unwrap();

    let geocoded_id = store.find_location("1000010001").unwrap().unwrap().id;
    let bare_id = store.find_location("1000020001").unwrap().unwrap().id;
    store.upsert_transformation_state(&state(geocoded_id, 40.0)).unwrap();
    store.upsert_transformation_state(&state(bare_id, 80.0)).unwrap();

    let rows = store.find_geocoded_locations_with_state().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].location_id, geocoded_id);
    assert_eq!(rows[0].intensity, 40.0);
    assert_eq!(rows[0].nature, Nature::NewConstruction);
}

#[test]
fn state_upsert_overwrites_and_round_trips() {
    let store = StorageEngine::open_in_memory().unwrap();
    store
        .upsert_event(&event(Source::Parcels, "1000010001", EventType::ParcelRecorded, Some("1000010001")))
        .unwrap();
    let id = store.find_location("1000010001").unwrap().unwrap().id;

    store.upsert_transformation_state(&state(id, 10.0)).unwrap();
    let replacement = state(id, 55.5);
    store.upsert_transformation_state(&replacement).unwrap();

    assert_eq!(store.get_transformation_state(id).unwrap(), Some(replacement));
    assert_eq!(store.counts().unwrap().states, 1);
}

#[test]
fn state_for_missing_place_is_rejected() {
    let store = StorageEngine::open_in_memory().unwrap();
    assert!(store.upsert_transformation_state(&state(999, 10.0)).is_err());
}

// ── Heatmap ───────────────────────────────────────────────────────────────

#[test]
fn replace_swaps_the_whole_snapshot() {
    let store = StorageEngine::open_in_memory().unwrap();
    store
        .replace_heatmap_cells(&[cell("8-1-1", 10.0), cell("8-1-2", 20.0)])
        .unwrap();
    let n = store.replace_heatmap_cells(&[cell("8-5-5", 60.0)]).unwrap();
    assert_eq!(n, 1);

    let cells = store.heatmap_cells().unwrap();
    assert_eq!(cells.len(), 1);
    assert_eq!(cells[0], cell("8-5-5", 60.0));
}

#[test]
fn failed_replace_keeps_previous_snapshot() {
    let store = StorageEngine::open_in_memory().unwrap();
    store.replace_heatmap_cells(&[cell("8-1-1", 10.0)]).unwrap();

    let duplicate = [cell("8-2-2", 30.0), cell("8-2-2", 40.0)];
    assert!(store.replace_heatmap_cells(&duplicate).is_err());

    let cells = store.heatmap_cells().unwrap();
    assert_eq!(cells, vec![cell("8-1-1", 10.0)]);
}

#[test]
fn delete_then_insert_primitives() {
    let store = StorageEngine::open_in_memory().unwrap();
    store.insert_heatmap_cell(&cell("8-1-1", 10.0)).unwrap();
    store.insert_heatmap_cell(&cell("8-1-2", 10.0)).unwrap();
    assert_eq!(store.delete_all_heatmap_cells().unwrap(), 2);
    assert!(store.heatmap_cells().unwrap().is_empty());
}

#[test]
fn cells_come_back_in_insertion_order() {
    let store = StorageEngine::open_in_memory().unwrap();
    let cells = [cell("8-9-9", 1.0), cell("8-0-0", 2.0), cell("8-5-5", 3.0)];
    store.replace_heatmap_cells(&cells).unwrap();
    let indexes: Vec<_> = store
        .heatmap_cells()
        .unwrap()
        .into_iter()
        .map(|c| c.cell_index)
        .collect();
    assert_eq!(indexes, ["8-9-9", "8-0-0", "8-5-5"]);
}

// ── Sync ledger ───────────────────────────────────────────────────────────

fn outcome(status: SyncRunStatus) -> SyncRunOutcome {
    SyncRunOutcome {
        finished_at: Utc.with_ymd_and_hms(2024, 6, 2, 0, 0, 0).unwrap(),
        pages: 3,
        failed_pages: u32::from(status == SyncRunStatus::Incomplete),
        fetched: 250,
        normalized: 240,
        rejected: 10,
        upserted: 240,
        status,
        error: (status != SyncRunStatus::Complete).then(|| "page failed".to_string()),
    }
}

#[test]
fn watermark_is_the_last_complete_start() {
    let store = StorageEngine::open_in_memory().unwrap();
    assert_eq!(store.last_complete_sync(Source::Violations).unwrap(), None);

    let first = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
    let run = store.begin_sync_run(Source::Violations, first, None).unwrap();
    store.finish_sync_run(run, &outcome(SyncRunStatus::Complete)).unwrap();

    let second = first + Duration::days(1);
    let run = store.begin_sync_run(Source::Violations, second, Some(first)).unwrap();
    store.finish_sync_run(run, &outcome(SyncRunStatus::Incomplete)).unwrap();

    assert_eq!(store.last_complete_sync(Source::Violations).unwrap(), Some(first));
    assert_eq!(store.last_complete_sync(Source::PermitFilings).unwrap(), None);
}

#[test]
fn recent_runs_are_newest_first() {
    let store = StorageEngine::open_in_memory().unwrap();
    let start = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
    let a = store.begin_sync_run(Source::Parcels, start, None).unwrap();
    store.finish_sync_run(a, &outcome(SyncRunStatus::Complete)).unwrap();
    let b = store.begin_sync_run(Source::Complaints, start, Some(start)).unwrap();

    let runs = store.recent_sync_runs(10).unwrap();
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0].id, b);
    assert_eq!(runs[0].status, SyncRunStatus::Running);
    assert_eq!(runs[0].since, Some(start));
    assert_eq!(runs[1].source, Source::Parcels);
    assert_eq!(runs[1].fetched, 250);
    assert_eq!(runs[1].rejected, 10);

    assert_eq!(store.recent_sync_runs(1).unwrap().len(), 1);
}

#[test]
fn finishing_an_unknown_run_fails() {
    let store = StorageEngine::open_in_memory().unwrap();
    assert!(store.finish_sync_run(42, &outcome(SyncRunStatus::Complete)).is_err());
}
