use axum::{body::Body, response::Response};
use scraper::{Html, Selector};

use crate::Error;

async fn body_text(response: Response<Body>) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Could not get response body");

    String::from_utf8_lossy(&body).to_string()
}

pub(crate) async fn parse_html_document(response: Response<Body>) -> Html {
    Html::parse_document(&body_text(response).await)
}

pub(crate) async fn parse_html_fragment(response: Response<Body>) -> Html {
    Html::parse_fragment(&body_text(response).await)
}

/// Unwrap a handler result that should be a 200 response holding a valid HTML fragment.
pub(crate) async fn ok_fragment(result: Result<Response, Error>) -> Html {
    let response = result.unwrap();
    assert_eq!(response.status(), axum::http::StatusCode::OK);

    let html = parse_html_fragment(response).await;
    assert_valid_html(&html);
    html
}

#[track_caller]
pub(crate) fn assert_valid_html(html: &Html) {
    assert!(
        html.errors.is_empty(),
        "Got HTML parsing errors: {:?}",
        html.errors
    );
}

/// The trimmed text of the first element matching `selector`.
#[track_caller]
pub(crate) fn text_of(html: &Html, selector: &str) -> String {
    html.select(&Selector::parse(selector).unwrap())
        .next()
        .unwrap_or_else(|| panic!("nothing matches {selector}"))
        .text()
        .collect::<String>()
        .trim()
        .to_owned()
}

/// The value of `attribute` on every element matching `selector` that has it.
#[track_caller]
pub(crate) fn attr_values(html: &Html, selector: &str, attribute: &str) -> Vec<String> {
    html.select(&Selector::parse(selector).unwrap())
        .filter_map(|element| element.value().attr(attribute))
        .map(ToOwned::to_owned)
        .collect()
}
