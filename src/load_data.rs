//! The API route that serves the raw contents of the JSON export file.
//!
//! This endpoint bypasses the database entirely: it reads the file from disk
//! on every request and returns whatever valid JSON it contains.

use std::path::PathBuf;

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{AppState, Error, data_file::read_data_file_raw};

/// The state needed for the load-data endpoint.
#[derive(Debug, Clone)]
pub struct LoadDataState {
    /// The path to the upstream JSON export file.
    pub data_path: PathBuf,
}

impl FromRef<AppState> for LoadDataState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            data_path: state.data_path.clone(),
        }
    }
}

/// A route handler that returns the contents of the data file as a JSON
/// array.
///
/// Returns 404 with `{"error": "Data file not found"}` when the file is
/// absent and 400 with `{"error": "Error decoding JSON"}` when the file
/// cannot be parsed.
pub async fn get_load_data(State(state): State<LoadDataState>) -> Response {
    match read_data_file_raw(&state.data_path) {
        Ok(data) => Json(data).into_response(),
        Err(Error::DataFileNotFound) => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "Data file not found"})),
        )
            .into_response(),
        Err(Error::JsonDecode(error)) => {
            tracing::debug!("could not decode the data file: {error}");

            (
                StatusCode::BAD_REQUEST,
                Json(json!({"error": "Error decoding JSON"})),
            )
                .into_response()
        }
        Err(error) => error.into_response(),
    }
}

#[cfg(test)]
mod load_data_endpoint_tests {
    use std::fs;

    use axum::{
        extract::State,
        http::StatusCode,
        response::{IntoResponse, Response},
    };
    use serde_json::{Value, json};
    use tempfile::TempDir;

    use super::{LoadDataState, get_load_data};

    fn get_load_data_state(temp_dir: &TempDir) -> LoadDataState {
        LoadDataState {
            data_path: temp_dir.path().join("data.json"),
        }
    }

    async fn parse_json_body(response: Response) -> Value {
        let body = response.into_body();
        let body = axum::body::to_bytes(body, usize::MAX).await.unwrap();

        serde_json::from_slice(&body).expect("Could not parse response body as JSON")
    }

    #[tokio::test]
    async fn returns_file_contents_verbatim() {
        let temp_dir = TempDir::new().expect("Could not create temp dir");
        let state = get_load_data_state(&temp_dir);
        fs::write(&state.data_path, r#"[{"GL_AC_NO": 10010}]"#)
            .expect("Could not write data file");

        let response = get_load_data(State(state)).await.into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let body = parse_json_body(response).await;
        assert_eq!(body, json!([{"GL_AC_NO": 10010}]));
    }

    #[tokio::test]
    async fn missing_file_returns_404_with_error_body() {
        let temp_dir = TempDir::new().expect("Could not create temp dir");
        let state = get_load_data_state(&temp_dir);

        let response = get_load_data(State(state)).await.into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = parse_json_body(response).await;
        assert_eq!(body, json!({"error": "Data file not found"}));
    }

    #[tokio::test]
    async fn malformed_json_returns_400_with_error_body() {
        let temp_dir = TempDir::new().expect("Could not create temp dir");
        let state = get_load_data_state(&temp_dir);
        fs::write(&state.data_path, "[{\"GL_AC_NO\": 10010,")
            .expect("Could not write data file");

        let response = get_load_data(State(state)).await.into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = parse_json_body(response).await;
        assert_eq!(body, json!({"error": "Error decoding JSON"}));
    }
}
