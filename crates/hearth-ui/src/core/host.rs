//! Host environment capability: browser-present or headless.
//!
//! # Design
//! - Browser globals (window width, document, clock) sit behind [`BrowserHost`]
//!   so classifier and token logic can be tested without a DOM.
//! - [`HostEnvironment::Headless`] models server-side rendering: width 0,
//!   no document, no persisted reads for browser-only stores.
//! - [`MemoryBrowser`] is the in-memory stand-in used by tests.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::rc::Rc;

use crate::error::HostError;

/// Browser capabilities the stores depend on.
pub trait BrowserHost {
    /// Current `window.innerWidth` in CSS pixels.
    fn inner_width(&self) -> u32;

    /// Milliseconds since the Unix epoch.
    fn now_ms(&self) -> i64;

    /// Set an attribute on `document.documentElement`.
    ///
    /// # Errors
    ///
    /// Returns an error when the document is unavailable or rejects the attribute.
    fn set_root_attribute(&self, name: &str, value: &str) -> Result<(), HostError>;

    /// Add (`present = true`) or remove a class on `document.body`.
    ///
    /// # Errors
    ///
    /// Returns an error when the body element is unavailable.
    fn set_body_class(&self, class: &str, present: bool) -> Result<(), HostError>;
}

/// Document-level target a preference is mirrored onto.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reflection {
    /// Attribute on the root element, set to the encoded value.
    RootAttribute(&'static str),
    /// Class on the body element, present while the value is truthy.
    BodyClass(&'static str),
}

/// Execution context the stores run in.
#[derive(Clone, Default)]
pub enum HostEnvironment {
    /// A browser window and document are available.
    Browser(Rc<dyn BrowserHost>),
    /// No browser context (server-side rendering, native tests).
    #[default]
    Headless,
}

impl HostEnvironment {
    /// Wrap a browser implementation.
    #[must_use]
    pub fn browser(host: impl BrowserHost + 'static) -> Self {
        Self::Browser(Rc::new(host))
    }

    /// Whether a browser context is present.
    #[must_use]
    pub const fn is_browser(&self) -> bool {
        matches!(self, Self::Browser(_))
    }

    /// Window width, or 0 when headless.
    #[must_use]
    pub fn inner_width(&self) -> u32 {
        match self {
            Self::Browser(host) => host.inner_width(),
            Self::Headless => 0,
        }
    }

    /// Current time from the browser clock, `None` when headless.
    #[must_use]
    pub fn now_ms(&self) -> Option<i64> {
        match self {
            Self::Browser(host) => Some(host.now_ms()),
            Self::Headless => None,
        }
    }

    /// Mirror an encoded value onto the document. No-op when headless.
    pub(crate) fn reflect(&self, reflection: Reflection, encoded: &str, truthy: bool) {
        let Self::Browser(host) = self else {
            return;
        };
        let result = match reflection {
            Reflection::RootAttribute(name) => host.set_root_attribute(name, encoded),
            Reflection::BodyClass(class) => host.set_body_class(class, truthy),
        };
        if let Err(err) = result {
            tracing::warn!(?reflection, error = %err, "document reflection failed");
        }
    }
}

impl fmt::Debug for HostEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Browser(_) => f.write_str("HostEnvironment::Browser"),
            Self::Headless => f.write_str("HostEnvironment::Headless"),
        }
    }
}

/// In-memory browser: settable width and clock, recorded DOM mutations.
///
/// Clones share state, so a test can keep a handle after passing one to
/// [`HostEnvironment::browser`].
#[derive(Clone, Debug, Default)]
pub struct MemoryBrowser {
    width: Rc<Cell<u32>>,
    now_ms: Rc<Cell<i64>>,
    root_attributes: Rc<RefCell<HashMap<String, String>>>,
    body_classes: Rc<RefCell<BTreeSet<String>>>,
}

impl MemoryBrowser {
    /// Browser with the given window width and clock.
    #[must_use]
    pub fn new(width: u32, now_ms: i64) -> Self {
        let browser = Self::default();
        browser.width.set(width);
        browser.now_ms.set(now_ms);
        browser
    }

    /// Change the reported window width.
    pub fn set_width(&self, width: u32) {
        self.width.set(width);
    }

    /// Change the reported clock.
    pub fn set_now_ms(&self, now_ms: i64) {
        self.now_ms.set(now_ms);
    }

    /// Value of a root attribute, if set.
    #[must_use]
    pub fn root_attribute(&self, name: &str) -> Option<String> {
        self.root_attributes.borrow().get(name).cloned()
    }

    /// Whether the body carries `class`.
    #[must_use]
    pub fn has_body_class(&self, class: &str) -> bool {
        self.body_classes.borrow().contains(class)
    }
}

impl BrowserHost for MemoryBrowser {
    fn inner_width(&self) -> u32 {
        self.width.get()
    }

    fn now_ms(&self) -> i64 {
        self.now_ms.get()
    }

    fn set_root_attribute(&self, name: &str, value: &str) -> Result<(), HostError> {
        self.root_attributes
            .borrow_mut()
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn set_body_class(&self, class: &str, present: bool) -> Result<(), HostError> {
        let mut classes = self.body_classes.borrow_mut();
        if present {
            classes.insert(class.to_string());
        } else {
            classes.remove(class);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headless_reports_zero_width_and_no_clock() {
        let host = HostEnvironment::Headless;
        assert!(!host.is_browser());
        assert_eq!(host.inner_width(), 0);
        assert_eq!(host.now_ms(), None);
    }

    #[test]
    fn reflect_updates_attribute_and_class() {
        let browser = MemoryBrowser::new(1280, 0);
        let host = HostEnvironment::browser(browser.clone());

        host.reflect(Reflection::RootAttribute("createTheme"), "light", true);
        host.reflect(Reflection::BodyClass("high-contrast"), "true", true);
        assert_eq!(browser.root_attribute("createTheme").as_deref(), Some("light"));
        assert!(browser.has_body_class("high-contrast"));

        host.reflect(Reflection::BodyClass("high-contrast"), "false", false);
        assert!(!browser.has_body_class("high-contrast"));
    }

    #[test]
    fn headless_reflection_is_a_no_op() {
        HostEnvironment::Headless.reflect(Reflection::RootAttribute("createTheme"), "dark", true);
    }
}
