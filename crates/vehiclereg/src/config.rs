//! Configuration management for vehiclereg.
//!
//! Configuration is loaded with figment, layering defaults, a TOML file, and
//! environment variables.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "vehiclereg";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "vehicles.db";

/// Default location reference table file name.
const LOCATION_TABLE_FILE_NAME: &str = "locations.csv";

/// Highest zoom level accepted by common tile renderers.
const MAX_ZOOM: u8 = 18;

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `VEHICLEREG_`)
/// 2. TOML config file at `~/.config/vehiclereg/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Record store configuration.
    pub storage: StorageConfig,
    /// Location reference table configuration.
    pub locations: LocationsConfig,
    /// Heatmap configuration.
    pub map: MapConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/vehiclereg/vehicles.db`
    pub database_path: Option<PathBuf>,
}

/// Location reference table configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationsConfig {
    /// Path to the CSV export of the reference spreadsheet.
    /// Defaults to `~/.local/share/vehiclereg/locations.csv`
    pub table_path: Option<PathBuf>,
}

/// Heatmap-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Initial zoom level handed to the map renderer.
    pub zoom_start: u8,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self { zoom_start: 6 }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing, or validation fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("VEHICLEREG_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.map.zoom_start == 0 || self.map.zoom_start > MAX_ZOOM {
            return Err(Error::ConfigValidation {
                message: format!(
                    "zoom_start ({}) must be between 1 and {MAX_ZOOM}",
                    self.map.zoom_start
                ),
            });
        }

        if let Some(path) = &self.locations.table_path {
            if path.as_os_str().is_empty() {
                return Err(Error::ConfigValidation {
                    message: "locations.table_path must not be empty".to_string(),
                });
            }
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Get the location table path, resolving defaults if not set.
    #[must_use]
    pub fn location_table_path(&self) -> PathBuf {
        self.locations
            .table_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(LOCATION_TABLE_FILE_NAME))
    }
}
