//! Sets up the application's database.

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{Error, record::create_financial_record_table};

/// Create the tables for the application's domain models if they do not
/// already exist.
///
/// The DDL runs in an exclusive transaction so that two processes pointed at
/// the same database file cannot interleave table creation.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction =
        SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_financial_record_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

#[cfg(test)]
mod initialize_tests {
    use rusqlite::Connection;

    use super::initialize;

    #[test]
    fn creates_financial_record_table() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).expect("Could not initialize database");

        let count: i64 = connection
            .query_row("SELECT COUNT(*) FROM financial_record", [], |row| {
                row.get(0)
            })
            .expect("financial_record table should exist");
        assert_eq!(count, 0);
    }

    #[test]
    fn is_idempotent() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).expect("Could not initialize database");
        initialize(&connection).expect("Initializing twice should succeed");
    }
}
