//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::vehicle::NewVehicle;

/// Create command arguments.
#[derive(Debug, Args)]
pub struct CreateCommand {
    /// Vehicle ID (e.g., "UP 80 AB 1234")
    #[arg(short, long)]
    pub id: String,

    /// Make (e.g., "2019")
    #[arg(long, default_value = "")]
    pub make: String,

    /// Model (e.g., "Tata")
    #[arg(long, default_value = "")]
    pub model: String,

    /// Color (e.g., "Red")
    #[arg(long, default_value = "")]
    pub color: String,
}

impl From<CreateCommand> for NewVehicle {
    fn from(cmd: CreateCommand) -> Self {
        Self {
            vehicle_id: cmd.id,
            make: cmd.make,
            model: cmd.model,
            color: cmd.color,
        }
    }
}

/// Update command arguments.
#[derive(Debug, Args)]
pub struct UpdateCommand {
    /// Vehicle ID of the record to update
    pub id: String,

    /// New make
    #[arg(long)]
    pub make: Option<String>,

    /// New model
    #[arg(long)]
    pub model: Option<String>,

    /// New color
    #[arg(long)]
    pub color: Option<String>,
}

impl UpdateCommand {
    /// Whether any field was given.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        self.make.is_some() || self.model.is_some() || self.color.is_some()
    }
}

/// Delete command arguments.
#[derive(Debug, Args)]
pub struct DeleteCommand {
    /// Vehicle ID of the record to delete
    pub id: String,
}

/// Show command arguments.
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Vehicle ID of the record to show
    pub id: String,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Map command arguments.
#[derive(Debug, Args)]
pub struct MapCommand {
    /// Write the heatmap payload to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Initial zoom level, 1 to 18 (overrides configuration)
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=18))]
    pub zoom: Option<u8>,
}

/// Lookup command arguments.
#[derive(Debug, Args)]
pub struct LookupCommand {
    /// Vehicle ID to extract a registration code from
    pub identifier: String,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One line per record
    #[default]
    Plain,
    /// Aligned columns
    Table,
    /// JSON object keyed by vehicle ID
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Plain);
    }

    #[test]
    fn test_create_command_into_new_vehicle() {
        let cmd = CreateCommand {
            id: "UP 80 AB 1234".to_string(),
            make: "2019".to_string(),
            model: "Tata".to_string(),
            color: "Red".to_string(),
        };
        let vehicle = NewVehicle::from(cmd);

        assert_eq!(vehicle.vehicle_id, "UP 80 AB 1234");
        assert_eq!(vehicle.color, "Red");
    }

    #[test]
    fn test_update_command_has_changes() {
        let mut cmd = UpdateCommand {
            id: "A".to_string(),
            make: None,
            model: None,
            color: None,
        };
        assert!(!cmd.has_changes());

        cmd.color = Some("Blue".to_string());
        assert!(cmd.has_changes());
    }

    #[test]
    fn test_config_command_debug() {
        let cmd = ConfigCommand::Show { json: false };
        assert!(format!("{cmd:?}").contains("Show"));
    }
}
