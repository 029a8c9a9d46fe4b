//! CSV-backed location reference table.

use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::trace;

use super::{LocationEntry, LocationLookup};
use crate::error::{Error, Result};

/// Header of the column holding the registration code.
const CODE_COLUMN: &str = "Code";

/// Location table stored as a CSV export of the reference spreadsheet.
///
/// Expected header: `Code,Office location,State,Latitude,Longitude`. Extra
/// columns are ignored. The file is re-read on every lookup.
#[derive(Debug, Clone)]
pub struct CsvLocationTable {
    path: PathBuf,
}

impl CsvLocationTable {
    /// Create a table reading from `path`. The file is not opened until the
    /// first lookup.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path to the CSV file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every entry in the table.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or any row is malformed.
    pub fn entries(&self) -> Result<Vec<LocationEntry>> {
        let mut reader = self.open()?;
        let entries = reader
            .deserialize()
            .collect::<std::result::Result<Vec<LocationEntry>, _>>()?;
        Ok(entries)
    }

    fn open(&self) -> Result<csv::Reader<std::fs::File>> {
        ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .from_path(&self.path)
            .map_err(|source| Error::LocationTableOpen {
                path: self.path.clone(),
                source,
            })
    }
}

impl LocationLookup for CsvLocationTable {
    fn find(&self, code: &str) -> Result<Option<LocationEntry>> {
        let mut reader = self.open()?;
        let headers = reader.headers()?.clone();
        let code_index = headers
            .iter()
            .position(|h| h == CODE_COLUMN)
            .ok_or_else(|| Error::LocationTableOpen {
                path: self.path.clone(),
                source: missing_column_error(),
            })?;

        // Only the matching row is deserialized, so malformed rows elsewhere
        // do not break lookups.
        let mut record = StringRecord::new();
        while reader.read_record(&mut record)? {
            if record.get(code_index) == Some(code) {
                trace!(code, line = ?record.position().map(csv::Position::line), "matched row");
                let entry: LocationEntry = record.deserialize(Some(&headers))?;
                return Ok(Some(entry));
            }
        }
        Ok(None)
    }
}

fn missing_column_error() -> csv::Error {
    csv::Error::from(std::io::Error::new(
        std::io::ErrorKind::InvalidData,
        format!("missing '{CODE_COLUMN}' column"),
    ))
}
