//! Record store for vehiclereg.
//!
//! This module provides `SQLite`-based persistent storage for vehicle records,
//! keyed by vehicle ID. Writes are merge-upserts; reads enumerate all records
//! or only the plottable coordinates.
//!
//! Concurrent writers to the same vehicle ID race with last-write-wins. There
//! is no conflict detection.

pub mod migrations;
pub mod schema;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::vehicle::{Coordinate, VehicleRecord, VehicleUpdate};

/// Columns selected by every record query, in `row_to_record` order.
const RECORD_COLUMNS: &str = "vehicle_id, make, model, color, office_location, state_name, \
                              latitude, longitude, created_at, updated_at";

/// Storage engine for vehicle records.
#[derive(Debug)]
pub struct Storage {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl Storage {
    /// Open or create a storage database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        migrations::initialize_schema(&conn)?;

        info!("Database opened at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory storage instance for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Merge `update` into the record for `vehicle_id`, creating it if absent.
    ///
    /// Fields not set in `update` keep their stored values. A new record
    /// starts with empty strings and no location. The read and the write run
    /// in one transaction. Returns the record as stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn upsert(&self, vehicle_id: &str, update: &VehicleUpdate) -> Result<VehicleRecord> {
        let tx = self.conn.unchecked_transaction()?;

        let existing = self.get(vehicle_id)?;
        let created = existing.is_none();
        let mut record = existing.unwrap_or_else(|| VehicleRecord::empty(vehicle_id));
        record.apply(update);
        record.updated_at = Utc::now();

        tx.execute(
            r"
            INSERT INTO vehicles (vehicle_id, make, model, color, office_location,
                                  state_name, latitude, longitude, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            ON CONFLICT(vehicle_id) DO UPDATE SET
                make = excluded.make,
                model = excluded.model,
                color = excluded.color,
                office_location = excluded.office_location,
                state_name = excluded.state_name,
                latitude = excluded.latitude,
                longitude = excluded.longitude,
                updated_at = excluded.updated_at
            ",
            params![
                record.vehicle_id,
                record.make,
                record.model,
                record.color,
                record.office_location,
                record.state_name,
                record.latitude,
                record.longitude,
                record.created_at.to_rfc3339(),
                record.updated_at.to_rfc3339(),
            ],
        )?;
        tx.commit()?;

        if created {
            debug!(vehicle_id, "Inserted vehicle record");
        } else {
            debug!(vehicle_id, "Updated vehicle record");
        }
        Ok(record)
    }

    /// Get a record by vehicle ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get(&self, vehicle_id: &str) -> Result<Option<VehicleRecord>> {
        let record = self
            .conn
            .query_row(
                &format!("SELECT {RECORD_COLUMNS} FROM vehicles WHERE vehicle_id = ?1"),
                [vehicle_id],
                Self::row_to_record,
            )
            .optional()?;
        Ok(record)
    }

    /// Check whether a record exists for `vehicle_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn exists(&self, vehicle_id: &str) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM vehicles WHERE vehicle_id = ?1",
            [vehicle_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Delete the record for `vehicle_id`.
    ///
    /// Returns `true` if a record was deleted, `false` if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn delete(&self, vehicle_id: &str) -> Result<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM vehicles WHERE vehicle_id = ?1", [vehicle_id])?;
        if affected > 0 {
            debug!(vehicle_id, "Deleted vehicle record");
        }
        Ok(affected > 0)
    }

    /// Get every record, keyed by vehicle ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list_all(&self) -> Result<BTreeMap<String, VehicleRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {RECORD_COLUMNS} FROM vehicles"))?;

        let records = stmt
            .query_map([], Self::row_to_record)?
            .map(|row| row.map(|record| (record.vehicle_id.clone(), record)))
            .collect::<std::result::Result<BTreeMap<_, _>, _>>()?;

        Ok(records)
    }

    /// Get the coordinates of every record that has both latitude and longitude.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list_with_coordinates(&self) -> Result<Vec<Coordinate>> {
        let mut stmt = self.conn.prepare(
            r"
            SELECT latitude, longitude FROM vehicles
            WHERE latitude IS NOT NULL AND longitude IS NOT NULL
            ",
        )?;

        let points = stmt
            .query_map([], |row| Ok(Coordinate::new(row.get(0)?, row.get(1)?)))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        debug!("Loaded {} geographic data points", points.len());
        Ok(points)
    }

    /// Count total records in storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM vehicles", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Get database statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn stats(&self) -> Result<StorageStats> {
        let total_records = self.count()?;
        let plottable_records: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM vehicles WHERE latitude IS NOT NULL AND longitude IS NOT NULL",
            [],
            |row| row.get(0),
        )?;

        let db_size_bytes = if self.path.to_string_lossy() == ":memory:" {
            0
        } else {
            std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
        };

        Ok(StorageStats {
            total_records,
            plottable_records,
            db_size_bytes,
        })
    }

    fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<VehicleRecord> {
        let vehicle_id: String = row.get(0)?;
        let created_at_str: String = row.get(8)?;
        let updated_at_str: String = row.get(9)?;

        Ok(VehicleRecord {
            make: row.get(1)?,
            model: row.get(2)?,
            color: row.get(3)?,
            office_location: row.get(4)?,
            state_name: row.get(5)?,
            latitude: row.get(6)?,
            longitude: row.get(7)?,
            created_at: parse_timestamp(&vehicle_id, &created_at_str),
            updated_at: parse_timestamp(&vehicle_id, &updated_at_str),
            vehicle_id,
        })
    }
}

fn parse_timestamp(vehicle_id: &str, value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value).map_or_else(
        |_| {
            warn!(vehicle_id, value, "Unparseable timestamp, using current time");
            Utc::now()
        },
        |dt| dt.with_timezone(&Utc),
    )
}

/// Statistics about the record store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageStats {
    /// Total number of records stored.
    pub total_records: i64,
    /// Records with both latitude and longitude.
    pub plottable_records: i64,
    /// Size of the database file in bytes.
    pub db_size_bytes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_storage() -> Storage {
        Storage::open_in_memory().expect("failed to create test storage")
    }

    fn descriptive(make: &str, model: &str, color: &str) -> VehicleUpdate {
        VehicleUpdate::descriptive(
            Some(make.to_string()),
            Some(model.to_string()),
            Some(color.to_string()),
        )
    }

    fn located(latitude: Option<f64>, longitude: Option<f64>) -> VehicleUpdate {
        VehicleUpdate {
            latitude,
            longitude,
            ..VehicleUpdate::default()
        }
    }

    #[test]
    fn test_open_in_memory() {
        assert!(Storage::open_in_memory().is_ok());
    }

    #[test]
    fn test_upsert_new_then_list_all() {
        let storage = create_test_storage();
        storage
            .upsert("UP 80 AB 1234", &descriptive("2019", "Tata", "Red"))
            .unwrap();

        let all = storage.list_all().unwrap();
        assert_eq!(all.len(), 1);

        let record = &all["UP 80 AB 1234"];
        assert_eq!(record.vehicle_id, "UP 80 AB 1234");
        assert_eq!(record.make, "2019");
        assert_eq!(record.model, "Tata");
        assert_eq!(record.color, "Red");
        assert!(record.office_location.is_none());
    }

    #[test]
    fn test_upsert_existing_changes_only_supplied_fields() {
        let storage = create_test_storage();
        let first = storage
            .upsert("A", &descriptive("Tata", "Nexon", "Red"))
            .unwrap();
        storage
            .upsert(
                "A",
                &VehicleUpdate {
                    office_location: Some("Agra".to_string()),
                    ..VehicleUpdate::default()
                },
            )
            .unwrap();

        storage
            .upsert(
                "A",
                &VehicleUpdate::descriptive(None, None, Some("Blue".to_string())),
            )
            .unwrap();

        let record = storage.get("A").unwrap().unwrap();
        assert_eq!(record.make, "Tata");
        assert_eq!(record.model, "Nexon");
        assert_eq!(record.color, "Blue");
        assert_eq!(record.office_location.as_deref(), Some("Agra"));
        assert_eq!(record.created_at, first.created_at);
        assert!(record.updated_at >= first.updated_at);
        assert_eq!(storage.count().unwrap(), 1);
    }

    #[test]
    fn test_upsert_partial_creates_with_defaults() {
        let storage = create_test_storage();
        let record = storage
            .upsert(
                "B",
                &VehicleUpdate::descriptive(Some("Maruti".to_string()), None, None),
            )
            .unwrap();

        assert_eq!(record.make, "Maruti");
        assert!(record.model.is_empty());
        assert!(record.color.is_empty());
        assert_eq!(storage.get("B").unwrap().unwrap(), record);
    }

    #[test]
    fn test_upsert_returns_stored_record() {
        let storage = create_test_storage();
        let returned = storage.upsert("C", &descriptive("a", "b", "c")).unwrap();
        let stored = storage.get("C").unwrap().unwrap();

        assert_eq!(returned, stored);
    }

    #[test]
    fn test_get_nonexistent() {
        let storage = create_test_storage();
        assert!(storage.get("missing").unwrap().is_none());
    }

    #[test]
    fn test_exists() {
        let storage = create_test_storage();
        assert!(!storage.exists("A").unwrap());

        storage.upsert("A", &VehicleUpdate::default()).unwrap();
        assert!(storage.exists("A").unwrap());
    }

    #[test]
    fn test_delete_removes_from_list_all() {
        let storage = create_test_storage();
        storage.upsert("A", &descriptive("a", "b", "c")).unwrap();
        storage.upsert("B", &descriptive("d", "e", "f")).unwrap();

        assert!(storage.delete("A").unwrap());

        let all = storage.list_all().unwrap();
        assert!(!all.contains_key("A"));
        assert!(all.contains_key("B"));
    }

    #[test]
    fn test_delete_nonexistent() {
        let storage = create_test_storage();
        assert!(!storage.delete("missing").unwrap());
    }

    #[test]
    fn test_list_all_empty() {
        let storage = create_test_storage();
        assert!(storage.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_list_with_coordinates_excludes_partial_records() {
        let storage = create_test_storage();
        storage
            .upsert("both", &located(Some(27.17), Some(78.01)))
            .unwrap();
        storage.upsert("lat_only", &located(Some(18.52), None)).unwrap();
        storage.upsert("lon_only", &located(None, Some(73.85))).unwrap();
        storage.upsert("neither", &located(None, None)).unwrap();

        let points = storage.list_with_coordinates().unwrap();
        assert_eq!(points, vec![Coordinate::new(27.17, 78.01)]);
    }

    #[test]
    fn test_list_with_coordinates_empty() {
        let storage = create_test_storage();
        storage.upsert("A", &descriptive("a", "b", "c")).unwrap();

        assert!(storage.list_with_coordinates().unwrap().is_empty());
    }

    #[test]
    fn test_count() {
        let storage = create_test_storage();
        assert_eq!(storage.count().unwrap(), 0);

        storage.upsert("One", &VehicleUpdate::default()).unwrap();
        storage.upsert("Two", &VehicleUpdate::default()).unwrap();
        storage.upsert("Two", &VehicleUpdate::default()).unwrap();

        assert_eq!(storage.count().unwrap(), 2);
    }

    #[test]
    fn test_stats() {
        let storage = create_test_storage();
        storage
            .upsert("A", &located(Some(27.17), Some(78.01)))
            .unwrap();
        storage.upsert("B", &VehicleUpdate::default()).unwrap();

        let stats = storage.stats().unwrap();
        assert_eq!(stats.total_records, 2);
        assert_eq!(stats.plottable_records, 1);
        assert_eq!(stats.db_size_bytes, 0);
    }

    #[test]
    fn test_unicode_fields() {
        let storage = create_test_storage();
        storage
            .upsert("KA 05 ಕ 1", &descriptive("ಟಾಟಾ", "नेक्सन", "लाल"))
            .unwrap();

        let record = storage.get("KA 05 ಕ 1").unwrap().unwrap();
        assert_eq!(record.model, "नेक्सन");
    }

    #[test]
    fn test_path() {
        let storage = create_test_storage();
        assert_eq!(storage.path().to_string_lossy(), ":memory:");
    }

    #[test]
    fn test_open_file_based_persists() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("vehicles.db");

        {
            let storage = Storage::open(&db_path).unwrap();
            storage.upsert("A", &descriptive("a", "b", "c")).unwrap();
            assert_eq!(storage.path(), db_path);
        }

        let reopened = Storage::open(&db_path).unwrap();
        assert_eq!(reopened.get("A").unwrap().unwrap().make, "a");
        assert!(reopened.stats().unwrap().db_size_bytes > 0);
    }

    #[test]
    fn test_open_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let nested_path = dir.path().join("nested/deeper/vehicles.db");

        let _storage = Storage::open(&nested_path).unwrap();
        assert!(nested_path.exists());
    }

    #[test]
    fn test_storage_stats_clone() {
        let stats = StorageStats {
            total_records: 5,
            plottable_records: 3,
            db_size_bytes: 512,
        };
        assert_eq!(stats.clone(), stats);
    }
}
