//! `vehiclereg` - Vehicle registration records with location enrichment
//!
//! This library stores vehicle registration records in `SQLite`, fills in the
//! registering office and state from a reference table keyed by the
//! registration code in the vehicle ID, and prepares stored coordinates for a
//! heatmap renderer.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod code;
pub mod config;
pub mod error;
pub mod heatmap;
pub mod location;
pub mod logging;
pub mod registry;
pub mod storage;
pub mod vehicle;

pub use code::{extract_code, RegistrationCode};
pub use config::Config;
pub use error::{Error, Result};
pub use heatmap::Heatmap;
pub use location::{
    enrich, CsvLocationTable, Enrichment, LocationDetails, LocationEntry, LocationLookup,
    StaticLocationTable,
};
pub use logging::init_logging;
pub use registry::{Created, Registry};
pub use storage::{Storage, StorageStats};
pub use vehicle::{Coordinate, NewVehicle, VehicleRecord, VehicleUpdate};
