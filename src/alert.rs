//! Alert system for displaying success and error messages to users.
//!
//! Alerts are rendered as fragments and swapped into the `#alert-container`
//! element that every page includes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

/// A message to pop up at the bottom of the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Alert {
    Success { message: String, details: String },
    Error { message: String, details: String },
}

impl Alert {
    pub fn error(message: &str, details: &str) -> Self {
        Self::Error {
            message: message.to_owned(),
            details: details.to_owned(),
        }
    }

    pub fn success(message: &str, details: &str) -> Self {
        Self::Success {
            message: message.to_owned(),
            details: details.to_owned(),
        }
    }

    pub fn into_html(self) -> Markup {
        let (message, details, container_style, role) = match self {
            Alert::Success { message, details } => (
                message,
                details,
                "text-green-800 border-green-300 bg-green-50 dark:bg-gray-800 \
                dark:text-green-400 dark:border-green-800",
                "status",
            ),
            Alert::Error { message, details } => (
                message,
                details,
                "text-red-800 border-red-300 bg-red-50 dark:bg-gray-800 \
                dark:text-red-400 dark:border-red-800",
                "alert",
            ),
        };

        html! {
            div
                class={ "flex items-start justify-between gap-4 p-4 mb-4 text-sm border rounded-lg shadow-lg " (container_style) }
                role=(role)
                data-alert
            {
                div
                {
                    p class="font-semibold" { (message) }
                    @if !details.is_empty() {
                        p { (details) }
                    }
                }

                button
                    type="button"
                    class="font-bold"
                    aria-label="Dismiss"
                    onclick="this.closest('[data-alert]').remove()"
                {
                    "×"
                }
            }
        }
    }

    /// Render the alert as the body of a response with `status_code`.
    pub fn into_response_with_status(self, status_code: StatusCode) -> Response {
        (status_code, self.into_html()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use scraper::Selector;

    use crate::test_utils::{assert_valid_html, parse_html_fragment};

    use super::Alert;

    #[tokio::test]
    async fn renders_error_alert() {
        let response = Alert::error("Could not upload", "Try again")
            .into_response_with_status(StatusCode::CONFLICT);

        assert_eq!(response.status(), StatusCode::CONFLICT);
        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);
        let alert = html
            .select(&Selector::parse("[role=alert]").unwrap())
            .next()
            .expect("no alert element");
        let text = alert.text().collect::<String>();
        assert!(text.contains("Could not upload"));
        assert!(text.contains("Try again"));
    }

    #[test]
    fn success_alert_uses_status_role() {
        let markup = Alert::success("Saved", "").into_html().into_string();

        assert!(markup.contains("role=\"status\""));
    }
}
