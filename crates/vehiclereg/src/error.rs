//! Error types for vehiclereg.
//!
//! This module defines all error types used throughout the vehiclereg crate,
//! covering the record store, the location reference table, and configuration.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for vehiclereg operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Record Errors ===
    /// A record with this vehicle ID already exists.
    #[error("vehicle ID already exists: {vehicle_id}")]
    DuplicateVehicle {
        /// The conflicting vehicle ID.
        vehicle_id: String,
    },

    /// No record exists for this vehicle ID.
    #[error("vehicle ID not found: {vehicle_id}")]
    VehicleNotFound {
        /// The vehicle ID that was requested.
        vehicle_id: String,
    },

    /// The vehicle ID is empty or whitespace.
    #[error("vehicle ID must not be empty")]
    EmptyVehicleId,

    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    // === Location Table Errors ===
    /// Failed to open the location reference table.
    #[error("failed to open location table at {path}: {source}")]
    LocationTableOpen {
        /// Path to the reference table.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: csv::Error,
    },

    /// A row of the location reference table could not be read.
    #[error("failed to read location table: {0}")]
    LocationTableRead(#[from] csv::Error),

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for vehiclereg operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a duplicate vehicle error.
    #[must_use]
    pub fn duplicate(vehicle_id: impl Into<String>) -> Self {
        Self::DuplicateVehicle {
            vehicle_id: vehicle_id.into(),
        }
    }

    /// Create a vehicle not found error.
    #[must_use]
    pub fn not_found(vehicle_id: impl Into<String>) -> Self {
        Self::VehicleNotFound {
            vehicle_id: vehicle_id.into(),
        }
    }

    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this error is a rejected create on an existing ID.
    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::DuplicateVehicle { .. })
    }

    /// Check if this error reports a missing vehicle ID.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::VehicleNotFound { .. })
    }
}
