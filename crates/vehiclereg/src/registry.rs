//! Vehicle registry operations.
//!
//! [`Registry`] runs one user action against a record store and a location
//! table, both passed in by the caller. It adds the checks the raw store does
//! not make: create refuses an existing ID, update and delete refuse an
//! unknown one.

use std::collections::BTreeMap;

use tracing::info;

use crate::error::{Error, Result};
use crate::heatmap::{Heatmap, DEFAULT_ZOOM_START};
use crate::location::{enrich, Enrichment, LocationLookup};
use crate::storage::Storage;
use crate::vehicle::{NewVehicle, VehicleRecord, VehicleUpdate};

/// Outcome of creating a record.
#[derive(Debug, Clone, PartialEq)]
pub struct Created {
    /// The record as stored.
    pub record: VehicleRecord,
    /// The code extraction and lookup used to fill the location fields.
    pub enrichment: Enrichment,
}

/// Record operations over an injected store and location table.
#[derive(Debug)]
pub struct Registry<'a, L: ?Sized> {
    storage: &'a Storage,
    locations: &'a L,
    zoom_start: u8,
}

impl<'a, L: LocationLookup + ?Sized> Registry<'a, L> {
    /// Create a registry over `storage` and `locations`.
    #[must_use]
    pub fn new(storage: &'a Storage, locations: &'a L) -> Self {
        Self {
            storage,
            locations,
            zoom_start: DEFAULT_ZOOM_START,
        }
    }

    /// Set the initial zoom level for [`Registry::heatmap`].
    #[must_use]
    pub fn with_zoom_start(mut self, zoom_start: u8) -> Self {
        self.zoom_start = zoom_start;
        self
    }

    /// Create a new record, enriched with location data from its vehicle ID.
    ///
    /// An unmatched code is not an error: the sentinel location is stored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyVehicleId`] for a blank ID,
    /// [`Error::DuplicateVehicle`] if the ID is taken, or a storage error.
    pub fn create(&self, vehicle: NewVehicle) -> Result<Created> {
        let vehicle_id = normalize_id(&vehicle.vehicle_id)?;
        if self.storage.exists(vehicle_id)? {
            return Err(Error::duplicate(vehicle_id));
        }

        let enrichment = enrich(self.locations, vehicle_id);
        let update = VehicleUpdate::descriptive(
            Some(vehicle.make),
            Some(vehicle.model),
            Some(vehicle.color),
        )
        .with_location(&enrichment.details);

        let record = self.storage.upsert(vehicle_id, &update)?;
        info!(
            vehicle_id,
            office = record.office_location.as_deref().unwrap_or_default(),
            state = record.state_name.as_deref().unwrap_or_default(),
            "Created vehicle record"
        );

        Ok(Created { record, enrichment })
    }

    /// Update the make, model, and color of an existing record.
    ///
    /// Only fields set in `changes` are written. Location fields in `changes`
    /// are ignored; they are fixed at creation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyVehicleId`] for a blank ID,
    /// [`Error::VehicleNotFound`] if the ID is unknown, or a storage error.
    pub fn update(&self, vehicle_id: &str, changes: &VehicleUpdate) -> Result<VehicleRecord> {
        let vehicle_id = normalize_id(vehicle_id)?;
        if !self.storage.exists(vehicle_id)? {
            return Err(Error::not_found(vehicle_id));
        }

        let descriptive = VehicleUpdate::descriptive(
            changes.make.clone(),
            changes.model.clone(),
            changes.color.clone(),
        );
        let record = self.storage.upsert(vehicle_id, &descriptive)?;
        info!(vehicle_id, "Updated vehicle record");
        Ok(record)
    }

    /// Delete a record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyVehicleId`] for a blank ID,
    /// [`Error::VehicleNotFound`] if the ID is unknown, or a storage error.
    pub fn delete(&self, vehicle_id: &str) -> Result<()> {
        let vehicle_id = normalize_id(vehicle_id)?;
        if !self.storage.delete(vehicle_id)? {
            return Err(Error::not_found(vehicle_id));
        }
        info!(vehicle_id, "Deleted vehicle record");
        Ok(())
    }

    /// Get one record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyVehicleId`] for a blank ID,
    /// [`Error::VehicleNotFound`] if the ID is unknown, or a storage error.
    pub fn get(&self, vehicle_id: &str) -> Result<VehicleRecord> {
        let vehicle_id = normalize_id(vehicle_id)?;
        self.storage
            .get(vehicle_id)?
            .ok_or_else(|| Error::not_found(vehicle_id))
    }

    /// Every record, keyed by vehicle ID. One store read per call.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn records(&self) -> Result<BTreeMap<String, VehicleRecord>> {
        self.storage.list_all()
    }

    /// Preview the enrichment a vehicle ID would get, without storing anything.
    #[must_use]
    pub fn preview(&self, identifier: &str) -> Enrichment {
        enrich(self.locations, identifier)
    }

    /// The heatmap of all plottable records, or `None` if there are none.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn heatmap(&self) -> Result<Option<Heatmap>> {
        let points = self.storage.list_with_coordinates()?;
        Ok(Heatmap::from_points(points, self.zoom_start))
    }
}

/// Vehicle IDs are stored and looked up without surrounding whitespace.
fn normalize_id(vehicle_id: &str) -> Result<&str> {
    let trimmed = vehicle_id.trim();
    if trimmed.is_empty() {
        return Err(Error::EmptyVehicleId);
    }
    Ok(trimmed)
}
