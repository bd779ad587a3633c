#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::multiple_crate_versions)]
//! Hearth: persisted preference, session and request stores for web front-ends.
//!
//! The [`core`] module is DOM-free and runs on the host toolchain; browser
//! globals reach it only through the [`core::host::BrowserHost`] and
//! [`core::persistence::PersistencePort`] seams. On `wasm32`, the `web`
//! module binds those seams to the window, cookies and local storage and
//! exposes Yew hooks. Store state lives in yewdux slices of an injected
//! context.

pub mod breakpoints;
pub mod config;
pub mod core;
pub mod error;
pub mod i18n;
pub mod services;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use crate::breakpoints::{ViewportBand, ViewportObserver, ViewportSnapshot};
pub use crate::config::{ClientConfig, Environment};
pub use crate::core::auth::{AuthCheck, AuthOutcome, DecodedIdentity};
pub use crate::core::context::StoreContext;
pub use crate::core::fetch::{PostRequest, RequestPhase, RequestState, Transport};
pub use crate::core::host::HostEnvironment;
pub use crate::core::language::{LanguageEffect, LanguageMenuStore, LanguageStore};
pub use crate::core::notify::{NotificationStore, Severity};
pub use crate::core::persistence::{MemoryPersistence, PersistencePort};
pub use crate::core::preference::{Preference, PreferenceSlot, PreferenceSpec, PreferenceValue};
pub use crate::core::session::SessionStore;
pub use crate::core::store::{Slice, SubscriptionId};
pub use crate::core::theme::{ThemeMode, ThemeState, ThemeStore};
pub use crate::error::{AuthError, ConfigError, FetchError, HostError, PersistenceError};
pub use crate::i18n::{LanguageCode, Translations};
