//! [`BrowserHost`] over the real window and document.

use gloo::utils::{document, window};
use js_sys::Date;
use wasm_bindgen::JsValue;

use crate::core::host::{BrowserHost, HostEnvironment};
use crate::error::HostError;

/// The current browser window.
#[derive(Clone, Copy, Debug, Default)]
pub struct WindowHost;

/// Host environment backed by [`WindowHost`].
#[must_use]
pub fn browser_environment() -> HostEnvironment {
    HostEnvironment::browser(WindowHost)
}

fn dom_error(operation: &'static str, err: &JsValue) -> HostError {
    HostError::Dom {
        operation,
        detail: format!("{err:?}"),
    }
}

impl BrowserHost for WindowHost {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn inner_width(&self) -> u32 {
        window()
            .inner_width()
            .ok()
            .and_then(|width| width.as_f64())
            .map_or(0, |width| width.max(0.0) as u32)
    }

    #[allow(clippy::cast_possible_truncation)]
    fn now_ms(&self) -> i64 {
        Date::now() as i64
    }

    fn set_root_attribute(&self, name: &str, value: &str) -> Result<(), HostError> {
        let root = document().document_element().ok_or(HostError::Dom {
            operation: "document_element",
            detail: "missing root element".to_string(),
        })?;
        root.set_attribute(name, value)
            .map_err(|err| dom_error("set_attribute", &err))
    }

    fn set_body_class(&self, class: &str, present: bool) -> Result<(), HostError> {
        let body = document().body().ok_or(HostError::Dom {
            operation: "body",
            detail: "missing body element".to_string(),
        })?;
        let classes = body.class_list();
        let result = if present {
            classes.add_1(class)
        } else {
            classes.remove_1(class)
        };
        result.map_err(|err| dom_error("class_list", &err))
    }
}
