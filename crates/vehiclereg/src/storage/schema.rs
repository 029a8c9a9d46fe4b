//! `SQLite` schema definitions for vehiclereg.

/// SQL statement to create the vehicles table.
///
/// `vehicle_id` is the document key. Location columns are nullable; a row
/// missing either coordinate is simply not plottable.
pub const CREATE_VEHICLES_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS vehicles (
    vehicle_id TEXT PRIMARY KEY NOT NULL,
    make TEXT NOT NULL DEFAULT '',
    model TEXT NOT NULL DEFAULT '',
    color TEXT NOT NULL DEFAULT '',
    office_location TEXT,
    state_name TEXT,
    latitude REAL,
    longitude REAL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
";

/// SQL statement to create a partial index over plottable rows for the map view.
pub const CREATE_COORDINATES_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_vehicles_coordinates ON vehicles(latitude, longitude)
WHERE latitude IS NOT NULL AND longitude IS NOT NULL
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    CREATE_VEHICLES_TABLE,
    CREATE_COORDINATES_INDEX,
    CREATE_METADATA_TABLE,
];
