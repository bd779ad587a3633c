//! Cookie string codec shared by the browser cookie adapter.
//!
//! Kept DOM-free so `document.cookie` formatting can be tested natively.

use std::collections::HashMap;

use crate::core::persistence::{SameSite, WriteOptions};

/// Render a `Set-Cookie`-style assignment suitable for `document.cookie`.
#[must_use]
pub fn format_set_cookie(name: &str, value: &str, options: &WriteOptions) -> String {
    let mut cookie = format!(
        "{}={}; Path={}",
        urlencoding::encode(name),
        urlencoding::encode(value),
        options.path
    );
    if let Some(max_age) = options.max_age {
        cookie.push_str(&format!("; Max-Age={max_age}"));
    }
    if options.secure {
        cookie.push_str("; Secure");
    }
    if let Some(same_site) = options.same_site {
        cookie.push_str("; SameSite=");
        cookie.push_str(same_site.as_str());
    }
    cookie
}

/// Render an assignment that expires `name` immediately.
#[must_use]
pub fn format_expired_cookie(name: &str, path: &str) -> String {
    format!("{}=; Path={path}; Max-Age=-1", urlencoding::encode(name))
}

/// Parse a `document.cookie` string into decoded name/value pairs.
///
/// Later duplicates win; malformed fragments without `=` are skipped.
#[must_use]
pub fn parse_cookie_header(header: &str) -> HashMap<String, String> {
    header
        .split(';')
        .filter_map(|pair| {
            let (name, value) = pair.split_once('=')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            let name = urlencoding::decode(name)
                .map_or_else(|_| name.to_string(), |decoded| decoded.into_owned());
            let value = value.trim();
            let value =
                urlencoding::decode(value).map_or_else(|_| value.to_string(), |v| v.into_owned());
            Some((name, value))
        })
        .collect()
}

impl SameSite {
    /// Attribute value used in cookie strings.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lax => "Lax",
            Self::Strict => "Strict",
            Self::None => "None",
        }
    }
}
