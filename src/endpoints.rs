//! The API endpoint URIs.

/// The home page listing the loaded financial records.
///
/// Requesting this page also refreshes the record table from the data file.
pub const RECORDS_VIEW: &str = "/";

/// The route that returns the raw contents of the JSON data file.
pub const LOAD_DATA_API: &str = "/load-data/";
