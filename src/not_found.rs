//! Defines the route handler for pages and resources that do not exist.
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::html::error_view;

pub async fn get_404_not_found() -> Response {
    get_404_not_found_response()
}

pub fn get_404_not_found_response() -> Response {
    (
        StatusCode::NOT_FOUND,
        Html(
            error_view(
                "404",
                "Sorry, that page does not exist.",
                "Check the address or head back to the records page.",
            )
            .into_string(),
        ),
    )
        .into_response()
}
