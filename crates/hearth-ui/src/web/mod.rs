//! Browser bindings for the core ports and Yew hooks over the stores.
//!
//! Only compiled for `wasm32`; everything here is a thin adapter and the
//! behaviour under test lives in [`crate::core`].

pub mod browser;
pub mod cookies;
pub mod hooks;
pub mod storage;

use std::rc::Rc;

pub use browser::{WindowHost, browser_environment};
pub use cookies::CookieJar;
pub use hooks::{use_auth_check, use_notification, use_theme, use_viewport};
pub use storage::LocalStoragePersistence;

use crate::config::ClientConfig;
use crate::core::context::StoreContext;

/// Stores for the current page: preferences and session in cookies, the
/// theme snapshot mirrored to local storage.
#[must_use]
pub fn browser_store_context(config: ClientConfig) -> StoreContext {
    let context = StoreContext::new(config, Rc::new(CookieJar), browser_environment());
    context
        .theme
        .mirror_snapshot(Rc::new(LocalStoragePersistence));
    context
}
