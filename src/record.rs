//! This file defines the financial record type, the raw type it is loaded
//! from and the queries for bulk-loading and listing records.
//!
//! A financial record is one general-ledger journal line from the upstream
//! reporting system's JSON export.

use rusqlite::{
    Connection, Row, Transaction as SqlTransaction, TransactionBehavior, params,
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::Error;

/// Alias for the integer type used for mapping to database IDs.
pub type RecordId = i64;

/// A financial record as it appears in the upstream JSON export.
///
/// The serde names match the upstream report's column names, which are
/// case-sensitive. A missing or mistyped field fails deserialization, there
/// is no schema version negotiation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    /// The general-ledger account number.
    #[serde(rename = "GL_AC_NO")]
    pub account_no: i64,

    /// The general-ledger account description.
    #[serde(rename = "GL_AC_DESC")]
    pub account_description: String,

    /// The net debit/credit amount.
    #[serde(rename = "Net_DR_CR")]
    pub net_debit_credit: f64,

    /// The profit-and-loss amount converted to the reporting currency.
    #[serde(rename = "Converted_PnL")]
    pub converted_pnl: f64,

    /// The account total at the prior reporting date.
    #[serde(rename = "GL_RP_DT_PRE_TL")]
    pub prior_report_total: f64,

    /// The account total at the current reporting date.
    #[serde(rename = "GL_RP_DT_CUR_TL")]
    pub current_report_total: f64,

    /// The difference between the prior and current reporting-date totals.
    #[serde(rename = "GL_RP_DIFF")]
    pub report_difference: f64,

    /// The foreign-exchange control total.
    #[serde(rename = "FOX_CON_TL")]
    pub fx_control_total: f64,

    /// A generic difference column from the upstream report.
    #[serde(rename = "DIFF")]
    pub difference: f64,

    /// Free-text comments from the upstream report.
    #[serde(rename = "Comments")]
    pub comments: String,

    /// When the upstream report was produced.
    #[serde(rename = "UPSTREAM_REPORT_DATE", with = "time::serde::rfc3339")]
    pub upstream_report_date: OffsetDateTime,

    /// The upstream report version identifier.
    #[serde(rename = "VERSION_ID")]
    pub version_id: String,

    /// When the upstream system wrote the record to the export.
    #[serde(rename = "LOAD_TIME_STAMP", with = "time::serde::rfc3339")]
    pub load_timestamp: OffsetDateTime,
}

/// A financial record stored in the database.
#[derive(Debug, Clone, PartialEq)]
pub struct FinancialRecord {
    /// The ID of the record row.
    pub id: RecordId,

    /// The record's fields as they appeared in the JSON export.
    pub fields: RawRecord,
}

impl FinancialRecord {
    /// A human-readable label combining the account description and number,
    /// e.g. "Cash at Bank (10010)".
    pub fn label(&self) -> String {
        format!(
            "{} ({})",
            self.fields.account_description, self.fields.account_no
        )
    }
}

/// Insert `records` into the database, one insert per record.
///
/// Always an insert, never an upsert: duplicate account numbers across runs
/// accumulate as distinct rows unless the caller purges first. Returns the
/// number of records inserted.
///
/// # Errors
/// This function will return an error if there is an SQL error.
pub fn insert_records(records: &[RawRecord], connection: &Connection) -> Result<usize, Error> {
    let mut statement = connection.prepare(
        "INSERT INTO financial_record (
            account_no, account_description, net_debit_credit, converted_pnl,
            prior_report_total, current_report_total, report_difference,
            fx_control_total, difference, comments, upstream_report_date,
            version_id, load_timestamp
        )
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
    )?;

    for record in records {
        statement.execute(params![
            record.account_no,
            record.account_description,
            record.net_debit_credit,
            record.converted_pnl,
            record.prior_report_total,
            record.current_report_total,
            record.report_difference,
            record.fx_control_total,
            record.difference,
            record.comments,
            record.upstream_report_date,
            record.version_id,
            record.load_timestamp,
        ])?;
    }

    Ok(records.len())
}

/// Replace the entire record table with `records` in a single transaction.
///
/// The delete and the inserts either all commit or all roll back, so a
/// failure partway through leaves the previous contents intact and readers
/// never observe a half-loaded table. Returns the number of records
/// inserted.
///
/// # Errors
/// This function will return an error if there is an SQL error.
pub fn replace_all_records(
    records: &[RawRecord],
    connection: &Connection,
) -> Result<usize, Error> {
    let transaction =
        SqlTransaction::new_unchecked(connection, TransactionBehavior::Immediate)?;

    delete_all_records(&transaction)?;
    let count = insert_records(records, &transaction)?;

    transaction.commit()?;

    Ok(count)
}

/// Retrieve every financial record in the database, unfiltered and
/// unpaginated, in insertion order.
///
/// # Errors
/// This function will return an error if there is an SQL error.
pub fn get_all_records(connection: &Connection) -> Result<Vec<FinancialRecord>, Error> {
    connection
        .prepare(
            "SELECT id, account_no, account_description, net_debit_credit, converted_pnl,
                prior_report_total, current_report_total, report_difference,
                fx_control_total, difference, comments, upstream_report_date,
                version_id, load_timestamp
             FROM financial_record
             ORDER BY id ASC;",
        )?
        .query_map([], map_row)?
        .map(|maybe_record| maybe_record.map_err(|error| error.into()))
        .collect()
}

/// Delete every financial record from the database, returning the number of
/// rows deleted.
///
/// # Errors
/// This function will return an error if there is an SQL error.
pub fn delete_all_records(connection: &Connection) -> Result<usize, Error> {
    let rows_deleted = connection.execute("DELETE FROM financial_record", ())?;

    Ok(rows_deleted)
}

pub fn create_financial_record_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS financial_record (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                account_no INTEGER NOT NULL,
                account_description TEXT NOT NULL,
                net_debit_credit REAL NOT NULL,
                converted_pnl REAL NOT NULL,
                prior_report_total REAL NOT NULL,
                current_report_total REAL NOT NULL,
                report_difference REAL NOT NULL,
                fx_control_total REAL NOT NULL,
                difference REAL NOT NULL,
                comments TEXT NOT NULL,
                upstream_report_date TEXT NOT NULL,
                version_id TEXT NOT NULL,
                load_timestamp TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<FinancialRecord, rusqlite::Error> {
    Ok(FinancialRecord {
        id: row.get(0)?,
        fields: RawRecord {
            account_no: row.get(1)?,
            account_description: row.get(2)?,
            net_debit_credit: row.get(3)?,
            converted_pnl: row.get(4)?,
            prior_report_total: row.get(5)?,
            current_report_total: row.get(6)?,
            report_difference: row.get(7)?,
            fx_control_total: row.get(8)?,
            difference: row.get(9)?,
            comments: row.get(10)?,
            upstream_report_date: row.get(11)?,
            version_id: row.get(12)?,
            load_timestamp: row.get(13)?,
        },
    })
}

#[cfg(test)]
pub(crate) fn test_record(account_no: i64, account_description: &str) -> RawRecord {
    use time::macros::datetime;

    RawRecord {
        account_no,
        account_description: account_description.to_string(),
        net_debit_credit: 1520.75,
        converted_pnl: -310.4,
        prior_report_total: 10_000.0,
        current_report_total: 11_520.75,
        report_difference: 1520.75,
        fx_control_total: 11_520.75,
        difference: 0.0,
        comments: "Matches FX control".to_string(),
        upstream_report_date: datetime!(2024-06-28 17:30:00 UTC),
        version_id: "2024Q2-FINAL".to_string(),
        load_timestamp: datetime!(2024-06-29 02:15:00 UTC),
    }
}
