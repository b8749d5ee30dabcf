//! V001: places, events, transformation_states, heatmap_cells.

pub const MIGRATION_SQL: &str = r#"
-- Places: one row per location reference (a BBL for most feeds).
-- Attributes are filled from the first event that carries them.
CREATE TABLE IF NOT EXISTS places (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    location_ref TEXT NOT NULL UNIQUE,
    latitude REAL,
    longitude REAL,
    borough TEXT,
    community_district TEXT,
    nta TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
) STRICT;

CREATE INDEX IF NOT EXISTS idx_places_geocoded
    ON places(id) WHERE latitude IS NOT NULL AND longitude IS NOT NULL;

-- Canonical events. Identity is (source, source_id).
CREATE TABLE IF NOT EXISTS events (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    source TEXT NOT NULL,
    source_id TEXT NOT NULL,
    event_type TEXT NOT NULL,
    event_date TEXT NOT NULL,
    location_ref TEXT,
    location_id INTEGER REFERENCES places(id),
    borough TEXT,
    latitude REAL,
    longitude REAL,
    community_district TEXT,
    raw_payload TEXT NOT NULL,
    ingested_at TEXT NOT NULL,
    UNIQUE (source, source_id)
) STRICT;

CREATE INDEX IF NOT EXISTS idx_events_location ON events(location_id);
CREATE INDEX IF NOT EXISTS idx_events_type ON events(event_type);

-- One derived state per place, overwritten on every recompute.
CREATE TABLE IF NOT EXISTS transformation_states (
    location_id INTEGER PRIMARY KEY REFERENCES places(id) ON DELETE CASCADE,
    certainty TEXT NOT NULL,
    intensity REAL NOT NULL CHECK (intensity >= 0 AND intensity <= 100),
    nature TEXT NOT NULL,
    computed_at TEXT NOT NULL
) STRICT;

-- Heatmap snapshot, rebuilt wholesale by each aggregation run.
CREATE TABLE IF NOT EXISTS heatmap_cells (
    cell_index TEXT PRIMARY KEY,
    center_lat REAL NOT NULL,
    center_lng REAL NOT NULL,
    avg_intensity REAL NOT NULL,
    max_intensity REAL NOT NULL,
    place_count INTEGER NOT NULL,
    dominant_nature TEXT NOT NULL,
    computed_at TEXT NOT NULL
) STRICT;
"#;
