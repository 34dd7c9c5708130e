#![allow(missing_docs)]

pub(crate) mod backend;
pub(crate) mod html;
pub(crate) mod http;

pub(crate) use backend::{FakeBackend, unused_local_url};
pub(crate) use html::{assert_valid_html, parse_html_document, parse_html_fragment};
pub(crate) use http::{assert_hx_redirect, assert_status_ok, get_header};
