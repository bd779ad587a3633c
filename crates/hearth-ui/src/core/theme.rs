//! Color mode, high-contrast flag and the mirrored UI language.
//!
//! # Design
//! - Mode and contrast are [`Preference`]s; the document reflection lives in
//!   their specs, so every setter keeps cookie, document and memory aligned.
//! - The language is memory-only here; the language store owns its cookie.
//! - Each field is its own yewdux slice; [`ThemeState`] is the combined view.
//! - [`ThemeStore::mirror_snapshot`] keeps a JSON copy of the combined view
//!   under `theme-store` (local storage in the browser).

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::core::host::{HostEnvironment, Reflection};
use crate::core::persistence::{PersistencePort, WriteOptions, write_logged};
use crate::core::preference::{Preference, PreferenceSlot, PreferenceSpec, PreferenceValue};
use crate::core::store::{Context, Slice, Store, SubscriptionId};
use crate::i18n::LanguageCode;

/// Cookie holding the color mode.
pub const THEME_COOKIE: &str = "createTheme";
/// Root attribute mirroring the color mode.
pub const THEME_ATTRIBUTE: &str = "createTheme";
/// Cookie holding the high-contrast flag.
pub const HIGH_CONTRAST_COOKIE: &str = "highContrast";
/// Body class present while high contrast is on.
pub const HIGH_CONTRAST_CLASS: &str = "high-contrast";
/// Key of the serialized [`ThemeState`] snapshot.
pub const THEME_SNAPSHOT_KEY: &str = "theme-store";

/// Light or dark color mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Light surfaces.
    Light,
    /// Dark surfaces.
    #[default]
    Dark,
}

impl ThemeMode {
    /// Identifier used for the cookie and the root attribute.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// The opposite mode.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl PreferenceValue for ThemeMode {
    fn encode(&self) -> String {
        self.as_str().to_string()
    }

    fn decode(raw: &str) -> Option<Self> {
        match raw {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }
}

/// Color mode slice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Store)]
pub struct ColorMode(pub ThemeMode);

impl PreferenceSlot for ColorMode {
    type Value = ThemeMode;

    fn from_value(value: ThemeMode) -> Self {
        Self(value)
    }

    fn value(&self) -> &ThemeMode {
        &self.0
    }
}

/// High-contrast slice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Store)]
pub struct HighContrast(pub bool);

impl PreferenceSlot for HighContrast {
    type Value = bool;

    fn from_value(value: bool) -> Self {
        Self(value)
    }

    fn value(&self) -> &bool {
        &self.0
    }
}

/// UI language mirrored into the theme.
#[derive(Clone, Debug, Default, PartialEq, Eq, Store)]
pub struct ThemeLanguage(pub LanguageCode);

/// Snapshot of the theme settings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeState {
    /// Color mode.
    pub mode: ThemeMode,
    /// High-contrast flag.
    pub high_contrast: bool,
    /// UI language mirrored from the language store.
    pub language: LanguageCode,
}

/// Theme settings backed by cookies and reflected onto the document.
#[derive(Clone)]
pub struct ThemeStore {
    mode: Preference<ColorMode>,
    high_contrast: Preference<HighContrast>,
    language: Slice<ThemeLanguage>,
    persistence: Rc<dyn PersistencePort>,
}

impl ThemeStore {
    /// Build the store in `cx`, reading both cookies once.
    #[must_use]
    pub fn new(cx: &Context, persistence: Rc<dyn PersistencePort>, host: HostEnvironment) -> Self {
        let mode = Preference::new(
            cx,
            PreferenceSpec::new(THEME_COOKIE, ThemeMode::Dark)
                .reflected(Reflection::RootAttribute(THEME_ATTRIBUTE)),
            Rc::clone(&persistence),
            host.clone(),
        );
        let high_contrast = Preference::new(
            cx,
            PreferenceSpec::new(HIGH_CONTRAST_COOKIE, false)
                .reflected(Reflection::BodyClass(HIGH_CONTRAST_CLASS)),
            Rc::clone(&persistence),
            host,
        );
        Self {
            mode,
            high_contrast,
            language: Slice::with_state(cx, ThemeLanguage::default()),
            persistence,
        }
    }

    /// Current settings.
    #[must_use]
    pub fn state(&self) -> ThemeState {
        ThemeState {
            mode: self.mode.get(),
            high_contrast: self.high_contrast.get(),
            language: self.language.get().0,
        }
    }

    /// Current color mode.
    #[must_use]
    pub fn mode(&self) -> ThemeMode {
        self.mode.get()
    }

    /// Whether high contrast is on.
    #[must_use]
    pub fn high_contrast(&self) -> bool {
        self.high_contrast.get()
    }

    /// Mirrored UI language.
    #[must_use]
    pub fn language(&self) -> LanguageCode {
        self.language.get().0
    }

    /// Switch between light and dark. Returns the new mode.
    pub fn toggle_mode(&self) -> ThemeMode {
        let next = self.mode.get().toggled();
        self.mode.set(next);
        next
    }

    /// Set the color mode.
    pub fn set_mode(&self, mode: ThemeMode) {
        self.mode.set(mode);
    }

    /// Flip high contrast. Returns the new flag.
    pub fn toggle_high_contrast(&self) -> bool {
        self.high_contrast.toggle()
    }

    /// Set high contrast.
    pub fn set_high_contrast(&self, enabled: bool) {
        self.high_contrast.set(enabled);
    }

    /// Mirror the UI language.
    pub fn set_language(&self, language: LanguageCode) {
        self.language.set(ThemeLanguage(language));
    }

    /// Re-apply both cookies through the setters (missing or unknown values
    /// fall back to dark / off).
    pub fn sync_from_persisted(&self) {
        let mode = self
            .persistence
            .read(THEME_COOKIE)
            .and_then(|raw| ThemeMode::decode(&raw))
            .unwrap_or_default();
        let high_contrast = self
            .persistence
            .read(HIGH_CONTRAST_COOKIE)
            .is_some_and(|raw| raw == "true");
        tracing::debug!(mode = mode.as_str(), high_contrast, "theme synced from cookies");
        self.set_mode(mode);
        self.set_high_contrast(high_contrast);
    }

    /// Observe color mode changes.
    pub fn subscribe_mode(&self, listener: impl Fn(&ThemeMode) + 'static) -> SubscriptionId {
        self.mode.subscribe(listener)
    }

    /// Observe high-contrast changes.
    pub fn subscribe_high_contrast(&self, listener: impl Fn(&bool) + 'static) -> SubscriptionId {
        self.high_contrast.subscribe(listener)
    }

    /// Observe language changes.
    pub fn subscribe_language(&self, listener: impl Fn(&LanguageCode) + 'static) -> SubscriptionId {
        self.language
            .subscribe(move |language: &ThemeLanguage| listener(&language.0))
    }

    /// Write the combined view to `port` under [`THEME_SNAPSHOT_KEY`] now and
    /// after every change. The subscriptions last as long as the context.
    pub fn mirror_snapshot(&self, port: Rc<dyn PersistencePort>) {
        let snapshot = Rc::new(RefCell::new(self.state()));
        write_snapshot(port.as_ref(), &snapshot.borrow());
        {
            let (snapshot, port) = (Rc::clone(&snapshot), Rc::clone(&port));
            self.subscribe_mode(move |mode| {
                snapshot.borrow_mut().mode = *mode;
                write_snapshot(port.as_ref(), &snapshot.borrow());
            });
        }
        {
            let (snapshot, port) = (Rc::clone(&snapshot), Rc::clone(&port));
            self.subscribe_high_contrast(move |enabled| {
                snapshot.borrow_mut().high_contrast = *enabled;
                write_snapshot(port.as_ref(), &snapshot.borrow());
            });
        }
        self.subscribe_language(move |language| {
            snapshot.borrow_mut().language = language.clone();
            write_snapshot(port.as_ref(), &snapshot.borrow());
        });
    }
}

fn write_snapshot(port: &dyn PersistencePort, state: &ThemeState) {
    match serde_json::to_string(state) {
        Ok(json) => write_logged(port, THEME_SNAPSHOT_KEY, &json, &WriteOptions::persistent()),
        Err(err) => tracing::warn!(error = %err, "theme snapshot not serialized"),
    }
}

impl std::fmt::Debug for ThemeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeStore")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
