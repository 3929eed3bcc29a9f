//! The page shown when the server could not handle a request.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use axum_htmx::HxRedirect;

use crate::{endpoints, html::error_view};

/// The explanation shown on the 500 page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternalServerError {
    pub description: String,
    pub fix: String,
}

impl Default for InternalServerError {
    fn default() -> Self {
        Self {
            description: "Sorry, something went wrong.".to_owned(),
            fix: "Try again later or check the server logs".to_owned(),
        }
    }
}

impl InternalServerError {
    pub fn new(description: &str, fix: &str) -> Self {
        Self {
            description: description.to_owned(),
            fix: fix.to_owned(),
        }
    }

    fn page(&self) -> Html<String> {
        Html(error_view("Internal Server Error", "500", &self.description, &self.fix).into_string())
    }
}

impl IntoResponse for InternalServerError {
    /// htmx requests follow the redirect header to the error page, other
    /// requests render the body.
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            HxRedirect(endpoints::INTERNAL_ERROR_VIEW.to_owned()),
            self.page(),
        )
            .into_response()
    }
}

/// Display the generic 500 page.
pub async fn get_internal_server_error_page() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        InternalServerError::default().page(),
    )
        .into_response()
}
