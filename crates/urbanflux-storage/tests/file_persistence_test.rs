//! File-backed store: WAL mode, read pool visibility, persistence across
//! reopen, and idempotent migrations.

use chrono::{TimeZone, Utc};
use serde_json::json;
use tempfile::TempDir;
use urbanflux_core::model::{CanonicalEvent, EventType, Source};
use urbanflux_core::traits::PipelineStore;
use urbanflux_storage::connection::pragmas::verify_wal_mode;
use urbanflux_storage::{migrations, StorageEngine};

fn parcel(bbl: &str) -> CanonicalEvent {
    CanonicalEvent {
        source: Source::Parcels,
        source_id: bbl.to_string(),
        event_type: EventType::ParcelRecorded,
        event_date: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        location_ref: Some(bbl.to_string()),
        borough: Some("Manhattan".to_string()),
        latitude: Some(40.75),
        longitude: Some(-73.99),
        community_district: Some("105".to_string()),
        raw_payload: json!({"bbl": bbl}),
    }
}

#[test]
fn file_store_uses_wal_and_a_read_pool() {
    let dir = TempDir::new().unwrap();
    let store = StorageEngine::open(&dir.path().join("urbanflux.db")).unwrap();

    let wal = store.db().with_writer(verify_wal_mode).unwrap();
    assert!(wal);
    assert!(store.db().read_pool_size() >= 1);
}

#[test]
fn pooled_reads_see_committed_writes() {
    let dir = TempDir::new().unwrap();
    let store = StorageEngine::open(&dir.path().join("urbanflux.db")).unwrap();
    store
        .upsert_events(&[parcel("1000010001"), parcel("1000010002")])
        .unwrap();

    // Several reads so every pooled connection is exercised.
    for _ in 0..6 {
        assert_eq!(store.counts().unwrap().places, 2);
    }
}

#[test]
fn nested_reads_take_an_idle_reader() {
    let dir = TempDir::new().unwrap();
    let store = StorageEngine::open(&dir.path().join("urbanflux.db")).unwrap();
    store.upsert_event(&parcel("1000010001")).unwrap();

    let places = store
        .db()
        .with_reader(|_outer| store.db().with_reader(urbanflux_storage::queries::stats::table_counts))
        .unwrap()
        .places;
    assert_eq!(places, 1);
}

#[test]
fn data_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("urbanflux.db");
    {
        let store = StorageEngine::open(&path).unwrap();
        store.upsert_event(&parcel("1000010001")).unwrap();
    }
    let store = StorageEngine::open(&path).unwrap();
    let place = store.find_location("1000010001").unwrap().unwrap();
    assert_eq!(place.borough.as_deref(), Some("Manhattan"));
    assert_eq!(place.community_district.as_deref(), Some("105"));
}

#[test]
fn migrations_are_idempotent() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("urbanflux.db");
    let store = StorageEngine::open(&path).unwrap();
    let version = store
        .db()
        .with_writer(migrations::run_migrations)
        .unwrap();
    assert_eq!(version, migrations::latest_version());
    let current = store
        .db()
        .with_writer(migrations::current_version)
        .unwrap();
    assert_eq!(current, migrations::latest_version());
}
