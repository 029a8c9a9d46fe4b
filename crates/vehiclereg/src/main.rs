//! `vreg` - CLI for vehiclereg
//!
//! Each invocation is one request cycle: open the store, run one operation,
//! print the result.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;

use vehiclereg::cli::{Cli, Command, ConfigCommand, LookupCommand, OutputFormat};
use vehiclereg::{
    init_logging, Config, CsvLocationTable, Registry, Storage, VehicleRecord, VehicleUpdate,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    // Configuration commands load the file themselves so validate can report
    // a broken one
    if let Command::Config(config_cmd) = cli.command {
        return handle_config(cli.config, config_cmd);
    }

    let config = Config::load_from(cli.config.clone()).context("loading configuration")?;

    let database_path = config.database_path();
    let storage = Storage::open(&database_path)
        .with_context(|| format!("opening database {}", database_path.display()))?;
    let locations = CsvLocationTable::new(config.location_table_path());
    let registry = Registry::new(&storage, &locations).with_zoom_start(config.map.zoom_start);

    match cli.command {
        Command::Create(cmd) => {
            let created = registry.create(cmd.into())?;
            println!(
                "Record created successfully with office location: {} and state name: {}",
                created.enrichment.details.office_location(),
                created.enrichment.details.state()
            );
        }
        Command::Update(cmd) => {
            if !cmd.has_changes() {
                bail!("nothing to update; pass at least one of --make, --model, --color");
            }
            let changes = VehicleUpdate::descriptive(cmd.make, cmd.model, cmd.color);
            registry.update(&cmd.id, &changes)?;
            println!("Record updated successfully.");
        }
        Command::Delete(cmd) => {
            registry.delete(&cmd.id)?;
            println!("Record deleted successfully.");
        }
        Command::Show(cmd) => {
            let record = registry.get(&cmd.id)?;
            if cmd.json {
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else {
                println!("{}", describe(&record));
            }
        }
        Command::List(cmd) => print_records(&registry.records()?, cmd.format)?,
        Command::Map(cmd) => {
            let registry = match cmd.zoom {
                Some(zoom) => registry.with_zoom_start(zoom),
                None => registry,
            };
            match registry.heatmap()? {
                Some(heatmap) => match cmd.output {
                    Some(path) => {
                        heatmap.write_to(&path)?;
                        println!(
                            "Wrote {} points to {}",
                            heatmap.len(),
                            path.display()
                        );
                    }
                    None => println!("{}", heatmap.to_json()?),
                },
                None => {
                    eprintln!("No geographic data available to display the heatmap.");
                }
            }
        }
        Command::Lookup(cmd) => handle_lookup(&registry, &cmd)?,
        Command::Status(cmd) => handle_status(&config, &storage, cmd.json)?,
        Command::Config(config_cmd) => handle_config(cli.config, config_cmd)?,
    }

    Ok(())
}

fn describe(record: &VehicleRecord) -> String {
    format!(
        "Vehicle ID: {}, Make: {}, Model: {}, Color: {}, Office Location: {}, State: {}",
        record.vehicle_id,
        record.make,
        record.model,
        record.color,
        record.office_location.as_deref().unwrap_or_default(),
        record.state_name.as_deref().unwrap_or_default()
    )
}

fn print_records(records: &BTreeMap<String, VehicleRecord>, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(records)?);
        return Ok(());
    }

    if records.is_empty() {
        eprintln!("No vehicle records found.");
        return Ok(());
    }

    match format {
        OutputFormat::Plain => {
            for record in records.values() {
                println!("{}", describe(record));
            }
        }
        OutputFormat::Table => {
            let id_width = records
                .keys()
                .map(String::len)
                .max()
                .unwrap_or(0)
                .max("VEHICLE ID".len());
            println!(
                "{:<id_width$}  {:<10}  {:<12}  {:<8}  {:<20}  STATE",
                "VEHICLE ID", "MAKE", "MODEL", "COLOR", "OFFICE"
            );
            for record in records.values() {
                println!(
                    "{:<id_width$}  {:<10}  {:<12}  {:<8}  {:<20}  {}",
                    record.vehicle_id,
                    record.make,
                    record.model,
                    record.color,
                    record.office_location.as_deref().unwrap_or("-"),
                    record.state_name.as_deref().unwrap_or("-")
                );
            }
        }
        OutputFormat::Json => {}
    }
    Ok(())
}

fn handle_lookup(registry: &Registry<'_, CsvLocationTable>, cmd: &LookupCommand) -> Result<()> {
    let enrichment = registry.preview(&cmd.identifier);
    let details = &enrichment.details;

    if cmd.json {
        let value = serde_json::json!({
            "identifier": cmd.identifier,
            "code": enrichment.code,
            "found": details.is_found(),
            "office_location": details.office_location(),
            "state": details.state(),
            "latitude": details.latitude(),
            "longitude": details.longitude(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    match &enrichment.code {
        Some(code) => println!("Code:            {code}"),
        None => println!("Code:            (no code found)"),
    }
    println!("Office location: {}", details.office_location());
    println!("State:           {}", details.state());
    match (details.latitude(), details.longitude()) {
        (Some(lat), Some(lon)) => println!("Coordinates:     {lat}, {lon}"),
        _ => println!("Coordinates:     -"),
    }
    Ok(())
}

fn handle_status(config: &Config, storage: &Storage, json: bool) -> Result<()> {
    let stats = storage.stats()?;
    let table_path = config.location_table_path();
    let table_exists = table_path.exists();

    if json {
        let status = serde_json::json!({
            "database_path": storage.path(),
            "location_table_path": table_path,
            "location_table_exists": table_exists,
            "total_records": stats.total_records,
            "plottable_records": stats.plottable_records,
            "db_size_bytes": stats.db_size_bytes,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("vreg status");
        println!("-----------");
        println!("Database:        {}", storage.path().display());
        println!(
            "Location table:  {}{}",
            table_path.display(),
            if table_exists { "" } else { " (missing)" }
        );
        println!("Records:         {}", stats.total_records);
        println!("On map:          {}", stats.plottable_records);
        println!("Database size:   {} bytes", stats.db_size_bytes);
    }
    Ok(())
}

fn handle_config(config_path: Option<PathBuf>, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            let config = Config::load_from(config_path).context("loading configuration")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!();
                println!("[Locations]");
                println!(
                    "  Table path:         {}",
                    config.location_table_path().display()
                );
                println!();
                println!("[Map]");
                println!("  Zoom start:         {}", config.map.zoom_start);
            }
        }
        ConfigCommand::Path => {
            let path = config_path.unwrap_or_else(Config::default_config_path);
            println!("{}", path.display());
        }
        ConfigCommand::Validate { file } => {
            let path = file
                .or(config_path)
                .unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            validate_config(&path)?;
            println!("Configuration is valid.");
        }
    }
    Ok(())
}

fn validate_config(path: &Path) -> Result<Config> {
    Config::load_from(Some(path.to_path_buf()))
        .map_err(|e| anyhow!("configuration error in {}: {e}", path.display()))
}
