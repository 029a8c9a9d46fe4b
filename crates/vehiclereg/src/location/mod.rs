//! Location enrichment for vehicle records.
//!
//! A registration code is looked up in a read-only reference table that maps
//! each code to its registering office, state, and coordinates:
//!
//! - [`LocationLookup`] is the seam; callers inject whichever table they have.
//! - [`CsvLocationTable`] reads a CSV export of the reference spreadsheet,
//!   fresh on every lookup.
//! - [`StaticLocationTable`] holds entries in memory.
//!
//! A missing code never fails record creation. [`enrich`] degrades to
//! [`LocationDetails::NotFound`], whose text fields carry the [`NOT_FOUND`]
//! sentinel and whose coordinates are unset.
//!
//! # Example
//!
//! ```
//! use vehiclereg::location::{enrich, LocationEntry, StaticLocationTable};
//!
//! let table = StaticLocationTable::new(vec![LocationEntry {
//!     code: "UP 80".to_string(),
//!     office_location: "Agra".to_string(),
//!     state: "Uttar Pradesh".to_string(),
//!     latitude: 27.1767,
//!     longitude: 78.0081,
//! }]);
//!
//! let enrichment = enrich(&table, "UP 80 AB 1234");
//! assert_eq!(enrichment.details.office_location(), "Agra");
//!
//! let missing = enrich(&table, "randomtext");
//! assert!(!missing.details.is_found());
//! ```

mod csv_table;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::code::{extract_code, RegistrationCode};
use crate::error::Result;

pub use csv_table::CsvLocationTable;

/// Text stored in place of the office location and state when no row matches.
pub const NOT_FOUND: &str = "Code not found in reference table";

/// One row of the location reference table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationEntry {
    /// Registration code, matched exactly.
    #[serde(rename = "Code")]
    pub code: String,

    /// Registering office.
    #[serde(rename = "Office location")]
    pub office_location: String,

    /// State name.
    #[serde(rename = "State")]
    pub state: String,

    /// Office latitude in decimal degrees.
    #[serde(rename = "Latitude")]
    pub latitude: f64,

    /// Office longitude in decimal degrees.
    #[serde(rename = "Longitude")]
    pub longitude: f64,
}

impl LocationEntry {
    /// Whether both coordinates are finite numbers.
    #[must_use]
    pub fn has_finite_coordinates(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

/// A source of location entries keyed by registration code.
pub trait LocationLookup {
    /// Find the entry whose code equals `code` exactly.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying table cannot be read.
    fn find(&self, code: &str) -> Result<Option<LocationEntry>>;
}

impl<T: LocationLookup + ?Sized> LocationLookup for &T {
    fn find(&self, code: &str) -> Result<Option<LocationEntry>> {
        (**self).find(code)
    }
}

/// The four location fields produced by a lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationDetails {
    /// A row matched the code.
    Found(LocationEntry),
    /// No code was extracted, no row matched, or the table was unreadable.
    NotFound,
}

impl LocationDetails {
    /// Whether a row matched.
    #[must_use]
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Office location, or the [`NOT_FOUND`] sentinel.
    #[must_use]
    pub fn office_location(&self) -> &str {
        match self {
            Self::Found(entry) => &entry.office_location,
            Self::NotFound => NOT_FOUND,
        }
    }

    /// State name, or the [`NOT_FOUND`] sentinel.
    #[must_use]
    pub fn state(&self) -> &str {
        match self {
            Self::Found(entry) => &entry.state,
            Self::NotFound => NOT_FOUND,
        }
    }

    /// Latitude, unset when not found.
    #[must_use]
    pub fn latitude(&self) -> Option<f64> {
        match self {
            Self::Found(entry) => Some(entry.latitude),
            Self::NotFound => None,
        }
    }

    /// Longitude, unset when not found.
    #[must_use]
    pub fn longitude(&self) -> Option<f64> {
        match self {
            Self::Found(entry) => Some(entry.longitude),
            Self::NotFound => None,
        }
    }
}

/// Result of enriching one vehicle ID.
#[derive(Debug, Clone, PartialEq)]
pub struct Enrichment {
    /// The extracted code, if the ID contained one.
    pub code: Option<RegistrationCode>,
    /// The looked-up location fields.
    pub details: LocationDetails,
}

/// Extract the code from `identifier` and look it up in `table`.
///
/// Never fails. A read error from the table, or a matching row whose
/// coordinates are NaN or infinite, is logged and reported as
/// [`LocationDetails::NotFound`].
#[must_use]
pub fn enrich<L: LocationLookup + ?Sized>(table: &L, identifier: &str) -> Enrichment {
    let Some(code) = extract_code(identifier) else {
        debug!(identifier, "no registration code in vehicle ID");
        return Enrichment {
            code: None,
            details: LocationDetails::NotFound,
        };
    };

    let details = match table.find(code.as_str()) {
        Ok(Some(entry)) if !entry.has_finite_coordinates() => {
            warn!(
                code = %code,
                latitude = entry.latitude,
                longitude = entry.longitude,
                "location row has non-finite coordinates, storing sentinel"
            );
            LocationDetails::NotFound
        }
        Ok(Some(entry)) => {
            debug!(code = %code, office = %entry.office_location, "location found");
            LocationDetails::Found(entry)
        }
        Ok(None) => {
            debug!(code = %code, "code not in location table");
            LocationDetails::NotFound
        }
        Err(e) => {
            warn!(code = %code, error = %e, "location lookup failed, storing sentinel");
            LocationDetails::NotFound
        }
    };

    Enrichment {
        code: Some(code),
        details,
    }
}

/// An in-memory location table.
#[derive(Debug, Clone, Default)]
pub struct StaticLocationTable {
    entries: Vec<LocationEntry>,
}

impl StaticLocationTable {
    /// Create a table from the given entries.
    #[must_use]
    pub fn new(entries: Vec<LocationEntry>) -> Self {
        Self { entries }
    }

    /// Number of entries in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl LocationLookup for StaticLocationTable {
    fn find(&self, code: &str) -> Result<Option<LocationEntry>> {
        Ok(self.entries.iter().find(|e| e.code == code).cloned())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::Error;

    pub(crate) fn agra() -> LocationEntry {
        LocationEntry {
            code: "UP 80".to_string(),
            office_location: "Agra".to_string(),
            state: "Uttar Pradesh".to_string(),
            latitude: 27.1767,
            longitude: 78.0081,
        }
    }

    pub(crate) fn pune() -> LocationEntry {
        LocationEntry {
            code: "MH 12".to_string(),
            office_location: "Pune".to_string(),
            state: "Maharashtra".to_string(),
            latitude: 18.5204,
            longitude: 73.8567,
        }
    }

    struct BrokenTable;

    impl LocationLookup for BrokenTable {
        fn find(&self, _code: &str) -> Result<Option<LocationEntry>> {
            Err(Error::internal("table unavailable"))
        }
    }

    #[test]
    fn test_enrich_found() {
        let table = StaticLocationTable::new(vec![agra(), pune()]);
        let enrichment = enrich(&table, "UP 80 AB 1234");

        assert_eq!(enrichment.code.unwrap().as_str(), "UP 80");
        assert!(enrichment.details.is_found());
        assert_eq!(enrichment.details.office_location(), "Agra");
        assert_eq!(enrichment.details.state(), "Uttar Pradesh");
        assert_eq!(enrichment.details.latitude(), Some(27.1767));
        assert_eq!(enrichment.details.longitude(), Some(78.0081));
    }

    #[test]
    fn test_enrich_code_not_in_table() {
        let table = StaticLocationTable::new(vec![agra()]);
        let enrichment = enrich(&table, "KA 05 MN 4321");

        assert_eq!(enrichment.code.unwrap().as_str(), "KA 05");
        let details = enrichment.details;
        assert_eq!(details.office_location(), NOT_FOUND);
        assert_eq!(details.state(), NOT_FOUND);
        assert!(details.latitude().is_none());
        assert!(details.longitude().is_none());
    }

    #[test]
    fn test_enrich_no_code() {
        let table = StaticLocationTable::new(vec![agra()]);
        let enrichment = enrich(&table, "randomtext");

        assert!(enrichment.code.is_none());
        assert_eq!(enrichment.details, LocationDetails::NotFound);
    }

    #[test]
    fn test_enrich_is_exact_match_only() {
        let table = StaticLocationTable::new(vec![agra()]);
        // "UP80" is a valid code but not the table's "UP 80"
        let enrichment = enrich(&table, "UP80AB1234");

        assert_eq!(enrichment.code.unwrap().as_str(), "UP80");
        assert!(!enrichment.details.is_found());
    }

    #[test]
    fn test_enrich_degrades_on_table_error() {
        let enrichment = enrich(&BrokenTable, "UP 80 AB 1234");

        assert!(enrichment.code.is_some());
        assert_eq!(enrichment.details, LocationDetails::NotFound);
    }

    #[test]
    fn test_enrich_rejects_non_finite_coordinates() {
        let mut bad_lat = agra();
        bad_lat.latitude = f64::NAN;
        let mut bad_lon = pune();
        bad_lon.longitude = f64::INFINITY;
        let table = StaticLocationTable::new(vec![bad_lat, bad_lon]);

        for identifier in ["UP 80 AB 1234", "MH 12 AB 0001"] {
            let enrichment = enrich(&table, identifier);
            assert!(enrichment.code.is_some());
            assert_eq!(enrichment.details, LocationDetails::NotFound);
        }
    }

    #[test]
    fn test_has_finite_coordinates() {
        assert!(agra().has_finite_coordinates());

        let mut entry = agra();
        entry.longitude = f64::NEG_INFINITY;
        assert!(!entry.has_finite_coordinates());
    }

    #[test]
    fn test_enrich_through_trait_object() {
        let table = StaticLocationTable::new(vec![pune()]);
        let dyn_table: &dyn LocationLookup = &table;

        let enrichment = enrich(dyn_table, "MH 12 AB 0001");
        assert_eq!(enrichment.details.office_location(), "Pune");
    }

    #[test]
    fn test_static_table_len() {
        assert!(StaticLocationTable::default().is_empty());
        assert_eq!(StaticLocationTable::new(vec![agra(), pune()]).len(), 2);
    }
}
