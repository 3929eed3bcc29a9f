#![allow(missing_docs)]

pub(crate) mod form;
pub(crate) mod html;
pub(crate) mod http;

pub(crate) use form::{assert_form_input, assert_hx_endpoint, must_get_form};
pub(crate) use html::{
    assert_valid_html, attr_values, ok_fragment, parse_html_document, parse_html_fragment, text_of,
};
pub(crate) use http::{assert_content_type, assert_hx_redirect, assert_status_ok, header_value};
