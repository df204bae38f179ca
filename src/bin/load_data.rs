use std::{error::Error, path::Path};

use clap::Parser;
use rusqlite::Connection;

use ledgerlens::{initialize_db, insert_records, read_data_file};

/// A utility for loading the upstream JSON export into the ledgerlens
/// database.
///
/// Records are appended to whatever is already in the table, no rows are
/// purged first.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    /// File path to the upstream JSON export.
    #[arg(long, default_value = "data/data.json")]
    data_path: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let records = read_data_file(Path::new(&args.data_path))?;

    let connection = Connection::open(&args.db_path)?;
    initialize_db(&connection)?;

    let count = insert_records(&records, &connection)?;

    println!("Data loaded successfully! ({count} records)");

    Ok(())
}
