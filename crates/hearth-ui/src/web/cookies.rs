//! `document.cookie` persistence adapter.

use gloo::utils::document;
use wasm_bindgen::JsCast;
use web_sys::HtmlDocument;

use crate::core::cookie::{format_expired_cookie, format_set_cookie, parse_cookie_header};
use crate::core::persistence::{COOKIE_PATH, PersistencePort, WriteOptions};
use crate::error::PersistenceError;

/// Cookie jar of the current document.
#[derive(Clone, Copy, Debug, Default)]
pub struct CookieJar;

fn html_document() -> Result<HtmlDocument, PersistenceError> {
    document()
        .dyn_into::<HtmlDocument>()
        .map_err(|_| PersistenceError::Unavailable { medium: "cookie" })
}

fn assign(key: &str, header: &str) -> Result<(), PersistenceError> {
    html_document()?
        .set_cookie(header)
        .map_err(|err| PersistenceError::Write {
            key: key.to_string(),
            detail: format!("{err:?}"),
        })
}

impl PersistencePort for CookieJar {
    fn read(&self, key: &str) -> Option<String> {
        let header = html_document().ok()?.cookie().ok()?;
        parse_cookie_header(&header).remove(key)
    }

    fn write(
        &self,
        key: &str,
        value: &str,
        options: &WriteOptions,
    ) -> Result<(), PersistenceError> {
        assign(key, &format_set_cookie(key, value, options))
    }

    fn expire(&self, key: &str) -> Result<(), PersistenceError> {
        assign(key, &format_expired_cookie(key, COOKIE_PATH))
    }
}
