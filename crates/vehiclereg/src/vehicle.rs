//! Vehicle record types.
//!
//! A [`VehicleRecord`] is one stored registration document, keyed by its
//! vehicle ID. A [`VehicleUpdate`] carries the fields an upsert should write;
//! unset fields are left untouched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::location::LocationDetails;

/// A latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
}

impl Coordinate {
    /// Create a new coordinate.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// A stored vehicle registration record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleRecord {
    /// Unique vehicle ID (primary key), e.g. `UP 80 AB 1234`.
    pub vehicle_id: String,

    /// Vehicle make.
    pub make: String,

    /// Vehicle model.
    pub model: String,

    /// Vehicle color.
    pub color: String,

    /// Registering office, from the location table.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub office_location: Option<String>,

    /// State name, from the location table.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_name: Option<String>,

    /// Latitude of the registering office.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,

    /// Longitude of the registering office.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,

    /// When the record was first stored.
    pub created_at: DateTime<Utc>,

    /// When the record was last written.
    pub updated_at: DateTime<Utc>,
}

impl VehicleRecord {
    /// Create an empty record for `vehicle_id`, stamped with the current time.
    #[must_use]
    pub fn empty(vehicle_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            vehicle_id: vehicle_id.into(),
            make: String::new(),
            model: String::new(),
            color: String::new(),
            office_location: None,
            state_name: None,
            latitude: None,
            longitude: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// The record's coordinate, if both latitude and longitude are set.
    #[must_use]
    pub fn coordinate(&self) -> Option<Coordinate> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinate::new(latitude, longitude)),
            _ => None,
        }
    }

    /// Whether the record can be placed on the heatmap.
    #[must_use]
    pub fn is_plottable(&self) -> bool {
        self.coordinate().is_some()
    }

    /// Apply `update` in place, overwriting only the fields it sets.
    pub fn apply(&mut self, update: &VehicleUpdate) {
        if let Some(make) = &update.make {
            self.make.clone_from(make);
        }
        if let Some(model) = &update.model {
            self.model.clone_from(model);
        }
        if let Some(color) = &update.color {
            self.color.clone_from(color);
        }
        if let Some(office) = &update.office_location {
            self.office_location = Some(office.clone());
        }
        if let Some(state) = &update.state_name {
            self.state_name = Some(state.clone());
        }
        if let Some(latitude) = update.latitude {
            self.latitude = Some(latitude);
        }
        if let Some(longitude) = update.longitude {
            self.longitude = Some(longitude);
        }
    }
}

/// Fields to write in an upsert. `None` leaves the stored value as is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VehicleUpdate {
    /// New make.
    pub make: Option<String>,
    /// New model.
    pub model: Option<String>,
    /// New color.
    pub color: Option<String>,
    /// New office location.
    pub office_location: Option<String>,
    /// New state name.
    pub state_name: Option<String>,
    /// New latitude.
    pub latitude: Option<f64>,
    /// New longitude.
    pub longitude: Option<f64>,
}

impl VehicleUpdate {
    /// An update touching only the user-editable descriptive fields.
    #[must_use]
    pub fn descriptive(
        make: Option<String>,
        model: Option<String>,
        color: Option<String>,
    ) -> Self {
        Self {
            make,
            model,
            color,
            ..Self::default()
        }
    }

    /// Set the location fields from an enrichment result.
    #[must_use]
    pub fn with_location(mut self, details: &LocationDetails) -> Self {
        self.office_location = Some(details.office_location().to_string());
        self.state_name = Some(details.state().to_string());
        self.latitude = details.latitude();
        self.longitude = details.longitude();
        self
    }

    /// Whether the update sets no fields at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// User-supplied fields for a new record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVehicle {
    /// Vehicle ID; also the source of the registration code.
    pub vehicle_id: String,
    /// Vehicle make.
    pub make: String,
    /// Vehicle model.
    pub model: String,
    /// Vehicle color.
    pub color: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_record() {
        let record = VehicleRecord::empty("UP 80 AB 1234");

        assert_eq!(record.vehicle_id, "UP 80 AB 1234");
        assert!(record.make.is_empty());
        assert!(record.office_location.is_none());
        assert!(!record.is_plottable());
        assert_eq!(record.created_at, record.updated_at);
    }

    #[test]
    fn test_coordinate_requires_both_fields() {
        let mut record = VehicleRecord::empty("A");
        record.latitude = Some(27.17);
        assert!(record.coordinate().is_none());

        record.longitude = Some(78.01);
        assert_eq!(record.coordinate(), Some(Coordinate::new(27.17, 78.01)));
    }

    #[test]
    fn test_apply_overwrites_only_set_fields() {
        let mut record = VehicleRecord::empty("A");
        record.make = "Tata".to_string();
        record.model = "Nexon".to_string();
        record.color = "Red".to_string();

        record.apply(&VehicleUpdate::descriptive(
            None,
            None,
            Some("Blue".to_string()),
        ));

        assert_eq!(record.make, "Tata");
        assert_eq!(record.model, "Nexon");
        assert_eq!(record.color, "Blue");
    }

    #[test]
    fn test_apply_location_fields() {
        let mut record = VehicleRecord::empty("A");
        let update = VehicleUpdate {
            office_location: Some("Agra".to_string()),
            state_name: Some("Uttar Pradesh".to_string()),
            latitude: Some(27.17),
            longitude: Some(78.01),
            ..VehicleUpdate::default()
        };

        record.apply(&update);

        assert_eq!(record.office_location.as_deref(), Some("Agra"));
        assert_eq!(record.state_name.as_deref(), Some("Uttar Pradesh"));
        assert!(record.is_plottable());
    }

    #[test]
    fn test_update_is_empty() {
        assert!(VehicleUpdate::default().is_empty());
        assert!(!VehicleUpdate::descriptive(Some("x".to_string()), None, None).is_empty());
    }

    #[test]
    fn test_with_location_not_found_leaves_coordinates_unset() {
        let update = VehicleUpdate::default().with_location(&LocationDetails::NotFound);

        assert_eq!(
            update.office_location.as_deref(),
            Some(crate::location::NOT_FOUND)
        );
        assert_eq!(update.state_name.as_deref(), Some(crate::location::NOT_FOUND));
        assert!(update.latitude.is_none());
        assert!(update.longitude.is_none());
    }

    #[test]
    fn test_record_serialization_skips_missing_location() {
        let record = VehicleRecord::empty("A");
        let json = serde_json::to_string(&record).unwrap();

        assert!(json.contains("vehicle_id"));
        assert!(!json.contains("latitude"));
        assert!(!json.contains("office_location"));
    }
}
