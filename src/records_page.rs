//! The home page listing the loaded financial records.
//!
//! Each request re-reads the upstream JSON export and replaces the record
//! table with its contents before rendering, so the page always reflects the
//! latest export. The refresh happens in-process rather than through an HTTP
//! round trip to the app's own API, and the purge and reload run in a single
//! database transaction, so a failed refresh leaves the previous records in
//! place and the page falls back to rendering those.

use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use time::{OffsetDateTime, macros::format_description};

use crate::{
    AppState, Error,
    data_file::read_data_file,
    html::{
        PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_NUMBER_CELL_STYLE,
        TABLE_ROW_STYLE, base, format_amount,
    },
    record::{FinancialRecord, get_all_records, replace_all_records},
};

/// The state needed for the records page.
#[derive(Debug, Clone)]
pub struct RecordsPageState {
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,

    /// The path to the upstream JSON export file.
    pub data_path: PathBuf,
}

impl FromRef<AppState> for RecordsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            data_path: state.data_path.clone(),
        }
    }
}

/// A route handler for the home page.
///
/// Refreshes the record table from the data file, then renders whatever is
/// in storage. A failed refresh is logged and otherwise ignored.
pub async fn get_records_page(State(state): State<RecordsPageState>) -> Response {
    if let Err(error) = refresh_records(&state) {
        tracing::error!("could not refresh financial records: {error}");
    }

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match get_all_records(&connection) {
        Ok(records) => records_view(&records).into_response(),
        Err(error) => error.into_response(),
    }
}

/// Replace the stored records with the current contents of the data file.
fn refresh_records(state: &RecordsPageState) -> Result<usize, Error> {
    let records = read_data_file(&state.data_path)?;

    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    replace_all_records(&records, &connection)
}

fn records_view(records: &[FinancialRecord]) -> Markup {
    let table_row = |record: &FinancialRecord| {
        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                td class=(TABLE_CELL_STYLE) { (record.label()) }
                td class=(TABLE_NUMBER_CELL_STYLE) { (format_amount(record.fields.net_debit_credit)) }
                td class=(TABLE_NUMBER_CELL_STYLE) { (format_amount(record.fields.converted_pnl)) }
                td class=(TABLE_NUMBER_CELL_STYLE) { (format_amount(record.fields.prior_report_total)) }
                td class=(TABLE_NUMBER_CELL_STYLE) { (format_amount(record.fields.current_report_total)) }
                td class=(TABLE_NUMBER_CELL_STYLE) { (format_amount(record.fields.report_difference)) }
                td class=(TABLE_NUMBER_CELL_STYLE) { (format_amount(record.fields.fx_control_total)) }
                td class=(TABLE_NUMBER_CELL_STYLE) { (format_amount(record.fields.difference)) }
                td class=(TABLE_CELL_STYLE) { (record.fields.comments) }
                td class=(TABLE_CELL_STYLE) { (format_timestamp(&record.fields.upstream_report_date)) }
                td class=(TABLE_CELL_STYLE) { (record.fields.version_id) }
                td class=(TABLE_CELL_STYLE) { (format_timestamp(&record.fields.load_timestamp)) }
            }
        )
    };

    let content = html!(
        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="relative"
            {
                h1 class="text-xl font-bold" { "Financial Records" }

                @if records.is_empty() {
                    p class="py-4"
                    {
                        "No records have been loaded. Check that the data \
                        file exists and contains a JSON array of records."
                    }
                } @else {
                    div class="dark:bg-gray-800 overflow-x-auto"
                    {
                        table class="w-full text-sm text-left rtl:text-right
                            text-gray-500 dark:text-gray-400"
                        {
                            thead class=(TABLE_HEADER_STYLE)
                            {
                                tr
                                {
                                    th class=(TABLE_CELL_STYLE) { "Account" }
                                    th class=(TABLE_CELL_STYLE) { "Net DR/CR" }
                                    th class=(TABLE_CELL_STYLE) { "Converted PnL" }
                                    th class=(TABLE_CELL_STYLE) { "Prior Total" }
                                    th class=(TABLE_CELL_STYLE) { "Current Total" }
                                    th class=(TABLE_CELL_STYLE) { "Report Diff" }
                                    th class=(TABLE_CELL_STYLE) { "FX Control" }
                                    th class=(TABLE_CELL_STYLE) { "Diff" }
                                    th class=(TABLE_CELL_STYLE) { "Comments" }
                                    th class=(TABLE_CELL_STYLE) { "Report Date" }
                                    th class=(TABLE_CELL_STYLE) { "Version" }
                                    th class=(TABLE_CELL_STYLE) { "Loaded" }
                                }
                            }

                            tbody
                            {
                                @for record in records {
                                    (table_row(record))
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base("Financial Records", &content)
}

fn format_timestamp(timestamp: &OffsetDateTime) -> String {
    let format = format_description!("[year]-[month]-[day] [hour]:[minute]");

    timestamp.format(&format).unwrap_or_default()
}

#[cfg(test)]
mod records_view_tests {
    use scraper::{Html, Selector};

    use crate::record::{FinancialRecord, test_record};

    use super::records_view;

    #[track_caller]
    fn assert_valid_html(html: &Html) {
        assert!(
            html.errors.is_empty(),
            "Got HTML parsing errors: {:?}",
            html.errors
        );
    }

    #[test]
    fn renders_one_row_per_record() {
        let records = vec![
            FinancialRecord {
                id: 1,
                fields: test_record(10010, "Cash at Bank"),
            },
            FinancialRecord {
                id: 2,
                fields: test_record(20020, "Accounts Payable"),
            },
        ];

        let markup = records_view(&records).into_string();

        let html = Html::parse_document(&markup);
        assert_valid_html(&html);

        let row_selector = Selector::parse("tbody tr").unwrap();
        let rows: Vec<_> = html.select(&row_selector).collect();
        assert_eq!(rows.len(), 2);

        let first_row_text = rows[0].text().collect::<Vec<_>>().join(" ");
        assert!(
            first_row_text.contains("Cash at Bank (10010)"),
            "want row containing the record label, got {first_row_text:?}"
        );
        assert!(
            first_row_text.contains("1,520.75"),
            "want row containing the formatted net amount, got {first_row_text:?}"
        );
        assert!(
            first_row_text.contains("2024Q2-FINAL"),
            "want row containing the version ID, got {first_row_text:?}"
        );
        assert!(
            first_row_text.contains("2024-06-28 17:30"),
            "want row containing the formatted report date, got {first_row_text:?}"
        );
    }

    #[test]
    fn renders_no_data_message_when_empty() {
        let markup = records_view(&[]).into_string();

        let html = Html::parse_document(&markup);
        assert_valid_html(&html);

        assert!(html.select(&Selector::parse("table").unwrap()).next().is_none());

        let paragraph = html
            .select(&Selector::parse("p").unwrap())
            .next()
            .expect("No paragraph found");
        let text = paragraph.text().collect::<Vec<_>>().join(" ");
        assert!(text.contains("No records have been loaded"));
    }
}
