//! Application router configuration.

use axum::{Router, middleware, routing::get};

use crate::{
    AppState, endpoints, load_data::get_load_data, logging::logging_middleware,
    not_found::get_404_not_found, records_page::get_records_page,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::RECORDS_VIEW, get(get_records_page))
        .route(endpoints::LOAD_DATA_API, get(get_load_data))
        .layer(middleware::from_fn(logging_middleware))
        .fallback(get_404_not_found)
        .with_state(state)
}

#[cfg(test)]
mod router_tests {
    use std::fs;

    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::json;
    use tempfile::TempDir;

    use crate::{AppState, endpoints};

    use super::build_router;

    const RECORDS_JSON: &str = r#"[
        {
            "GL_AC_NO": 10010,
            "GL_AC_DESC": "Cash at Bank",
            "Net_DR_CR": 1520.75,
            "Converted_PnL": -310.4,
            "GL_RP_DT_PRE_TL": 10000.0,
            "GL_RP_DT_CUR_TL": 11520.75,
            "GL_RP_DIFF": 1520.75,
            "FOX_CON_TL": 11520.75,
            "DIFF": 0.0,
            "Comments": "Matches FX control",
            "UPSTREAM_REPORT_DATE": "2024-06-28T17:30:00Z",
            "VERSION_ID": "2024Q2-FINAL",
            "LOAD_TIME_STAMP": "2024-06-29T02:15:00Z"
        }
    ]"#;

    fn get_test_server(temp_dir: &TempDir) -> TestServer {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        let state = AppState::new(connection, temp_dir.path().join("data.json"))
            .expect("Could not create app state");

        TestServer::try_new(build_router(state)).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn records_page_renders_loaded_records() {
        let temp_dir = TempDir::new().expect("Could not create temp dir");
        let server = get_test_server(&temp_dir);
        fs::write(temp_dir.path().join("data.json"), RECORDS_JSON)
            .expect("Could not write data file");

        let response = server.get(endpoints::RECORDS_VIEW).await;

        response.assert_status_ok();
        let text = response.text();
        assert!(
            text.contains("Cash at Bank (10010)"),
            "want page containing the record label"
        );
    }

    #[tokio::test]
    async fn load_data_returns_file_contents() {
        let temp_dir = TempDir::new().expect("Could not create temp dir");
        let server = get_test_server(&temp_dir);
        fs::write(temp_dir.path().join("data.json"), RECORDS_JSON)
            .expect("Could not write data file");

        let response = server.get(endpoints::LOAD_DATA_API).await;

        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        let array = body.as_array().expect("want a JSON array");
        assert_eq!(array.len(), 1);
        assert_eq!(array[0]["GL_AC_NO"], 10010);
    }

    #[tokio::test]
    async fn load_data_with_missing_file_returns_404() {
        let temp_dir = TempDir::new().expect("Could not create temp dir");
        let server = get_test_server(&temp_dir);

        let response = server.get(endpoints::LOAD_DATA_API).await;

        response.assert_status(StatusCode::NOT_FOUND);
        response.assert_json(&json!({"error": "Data file not found"}));
    }

    #[tokio::test]
    async fn load_data_with_malformed_file_returns_400() {
        let temp_dir = TempDir::new().expect("Could not create temp dir");
        let server = get_test_server(&temp_dir);
        fs::write(temp_dir.path().join("data.json"), "[{\"GL_AC_NO\": 10010,")
            .expect("Could not write data file");

        let response = server.get(endpoints::LOAD_DATA_API).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json(&json!({"error": "Error decoding JSON"}));
    }

    #[tokio::test]
    async fn unknown_route_returns_404_page() {
        let temp_dir = TempDir::new().expect("Could not create temp dir");
        let server = get_test_server(&temp_dir);

        let response = server.get("/no-such-page").await;

        response.assert_status(StatusCode::NOT_FOUND);
        assert!(response.text().contains("404"));
    }
}
