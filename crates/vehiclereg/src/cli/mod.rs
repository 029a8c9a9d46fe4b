//! Command-line interface for vehiclereg.
//!
//! This module provides the CLI structure for the `vreg` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    ConfigCommand, CreateCommand, DeleteCommand, ListCommand, LookupCommand, MapCommand,
    OutputFormat, ShowCommand, StatusCommand, UpdateCommand,
};

/// vreg - Vehicle registration records
///
/// Create, update, delete, and browse vehicle registration records. New
/// records are enriched with the registering office and state looked up
/// from the registration code in the vehicle ID.
#[derive(Debug, Parser)]
#[command(name = "vreg")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for info, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a new vehicle record
    Create(CreateCommand),

    /// Update make, model, or color of a record
    Update(UpdateCommand),

    /// Delete a vehicle record
    Delete(DeleteCommand),

    /// Show one vehicle record
    Show(ShowCommand),

    /// List all vehicle records
    List(ListCommand),

    /// Export the vehicle distribution heatmap
    Map(MapCommand),

    /// Preview location lookup for a vehicle ID
    Lookup(LookupCommand),

    /// Show database and reference table status
    Status(StatusCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}
