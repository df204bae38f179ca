//! Reads the JSON export file produced by the upstream reporting system.
//!
//! The file is a JSON array of objects, each carrying the thirteen upstream
//! column names defined on [RawRecord](crate::record::RawRecord).

use std::{fs, io, path::Path};

use serde_json::Value;

use crate::{Error, record::RawRecord};

/// Read and parse the JSON export at `path` as a list of financial records.
///
/// # Errors
/// Returns [Error::DataFileNotFound] if no file exists at `path` and
/// [Error::JsonDecode] if the contents are not a JSON array of well-formed
/// records (including records with missing keys).
pub fn read_data_file(path: &Path) -> Result<Vec<RawRecord>, Error> {
    let contents = read_to_string(path)?;

    serde_json::from_str(&contents).map_err(|error| Error::JsonDecode(error.to_string()))
}

/// Read and parse the JSON export at `path` without interpreting its
/// contents, for serving the file back to API clients verbatim.
///
/// # Errors
/// Returns [Error::DataFileNotFound] if no file exists at `path` and
/// [Error::JsonDecode] if the contents are not valid JSON.
pub fn read_data_file_raw(path: &Path) -> Result<Value, Error> {
    let contents = read_to_string(path)?;

    serde_json::from_str(&contents).map_err(|error| Error::JsonDecode(error.to_string()))
}

fn read_to_string(path: &Path) -> Result<String, Error> {
    fs::read_to_string(path).map_err(|error| match error.kind() {
        io::ErrorKind::NotFound => Error::DataFileNotFound,
        _ => Error::DataFileUnreadable(error.to_string()),
    })
}
