//! Database schema for the document collections.

/// SQL schema for creating all collections.
///
/// Documents are stored as JSON in the `doc` column; the columns next to
/// it are extracted keys backing the lookup and uniqueness indexes.
/// `order` is a keyword in SQL, so the race order column is `race_order`.
pub const SCHEMA: &str = r#"
-- Raceplans collection
CREATE TABLE IF NOT EXISTS raceplans (
    id TEXT PRIMARY KEY,
    event_id TEXT NOT NULL,
    doc TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_raceplans_event_id ON raceplans(event_id);

-- Races collection
CREATE TABLE IF NOT EXISTS races (
    id TEXT PRIMARY KEY,
    event_id TEXT NOT NULL,
    raceplan_id TEXT NOT NULL,
    raceclass TEXT NOT NULL,
    race_order INTEGER NOT NULL,
    doc TEXT NOT NULL
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_races_event_order
    ON races(event_id, race_order);
CREATE UNIQUE INDEX IF NOT EXISTS idx_races_event_raceclass_order
    ON races(event_id, raceclass, race_order);
CREATE INDEX IF NOT EXISTS idx_races_raceplan_id ON races(raceplan_id);

-- Startlists collection
CREATE TABLE IF NOT EXISTS startlists (
    id TEXT PRIMARY KEY,
    event_id TEXT NOT NULL,
    doc TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_startlists_event_id ON startlists(event_id);

-- Start entries collection
CREATE TABLE IF NOT EXISTS start_entries (
    id TEXT PRIMARY KEY,
    startlist_id TEXT NOT NULL,
    race_id TEXT NOT NULL,
    bib INTEGER NOT NULL,
    starting_position INTEGER NOT NULL,
    doc TEXT NOT NULL
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_start_entries_race_position
    ON start_entries(race_id, starting_position);
CREATE INDEX IF NOT EXISTS idx_start_entries_race_id ON start_entries(race_id);
CREATE INDEX IF NOT EXISTS idx_start_entries_startlist_id ON start_entries(startlist_id);

-- Time events collection
CREATE TABLE IF NOT EXISTS time_events (
    id TEXT PRIMARY KEY,
    event_id TEXT NOT NULL,
    race_id TEXT,
    timing_point TEXT NOT NULL,
    bib INTEGER NOT NULL,
    doc TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_time_events_event_id ON time_events(event_id);
CREATE INDEX IF NOT EXISTS idx_time_events_event_timing_point
    ON time_events(event_id, timing_point);
CREATE INDEX IF NOT EXISTS idx_time_events_race_id ON time_events(race_id);

-- Race results collection
CREATE TABLE IF NOT EXISTS race_results (
    id TEXT PRIMARY KEY,
    race_id TEXT NOT NULL,
    timing_point TEXT NOT NULL,
    doc TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_race_results_race_id ON race_results(race_id);
CREATE INDEX IF NOT EXISTS idx_race_results_race_timing_point
    ON race_results(race_id, timing_point);
"#;

/// Schema version tracking table.
pub const SCHEMA_VERSION_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL
);
"#;

/// Current schema version.
pub const CURRENT_VERSION: i32 = 1;
