//! Selected UI language, its translation payload and the menu selection.
//!
//! # Design
//! - `set_language` writes the `languageSelected` cookie, updates memory,
//!   mirrors the code into the theme store and, for user-initiated changes,
//!   announces the switch through the notification store.
//! - [`LanguageEffect`] is the mount-time routine: restore the persisted
//!   selection, then load translations for whatever is selected.
//! - Translation load failures are logged and leave state untouched.
//! - Selection and menu state are yewdux slices in the injected context.

use std::rc::Rc;

use serde_json::Value;

use crate::config::ClientConfig;
use crate::core::fetch::{Transport, get_json};
use crate::core::host::HostEnvironment;
use crate::core::notify::{NotificationStore, Severity};
use crate::core::persistence::{PersistencePort, WriteOptions, write_logged};
use crate::core::preference::{Preference, PreferenceSlot, PreferenceSpec};
use crate::core::store::{Context, Slice, Store, SubscriptionId};
use crate::core::theme::ThemeStore;
use crate::i18n::{LanguageCode, Translations};

/// Cookie holding the selected language.
pub const LANGUAGE_COOKIE: &str = "languageSelected";
/// Cookie holding the language menu selection.
pub const LANGUAGE_MENU_COOKIE: &str = "languageMenu";

/// Language selection and loaded translations.
#[derive(Clone, Debug, Default, PartialEq, Store)]
pub struct LanguageState {
    /// Selected language.
    pub selected: LanguageCode,
    /// Whether the last change was made by the user.
    pub changed_manually: bool,
    /// Payload loaded for the selected language.
    pub translations: Option<Translations>,
}

/// Observable language selection.
#[derive(Clone)]
pub struct LanguageStore {
    state: Slice<LanguageState>,
    persistence: Rc<dyn PersistencePort>,
    theme: ThemeStore,
    notifications: NotificationStore,
}

impl LanguageStore {
    /// Store in `cx` starting at the default language.
    #[must_use]
    pub fn new(
        cx: &Context,
        persistence: Rc<dyn PersistencePort>,
        theme: ThemeStore,
        notifications: NotificationStore,
    ) -> Self {
        Self {
            state: Slice::with_state(cx, LanguageState::default()),
            persistence,
            theme,
            notifications,
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> LanguageState {
        self.state.get()
    }

    /// Selected language.
    #[must_use]
    pub fn selected(&self) -> LanguageCode {
        self.state.read(|state| state.selected.clone())
    }

    /// Switch language. `manually` marks a user action and shows a
    /// confirmation.
    pub fn set_language(&self, code: impl Into<LanguageCode>, manually: bool) {
        let code = code.into();
        write_logged(
            self.persistence.as_ref(),
            LANGUAGE_COOKIE,
            code.as_str(),
            &WriteOptions::persistent(),
        );
        self.state.update(|state| {
            state.selected = code.clone();
            state.changed_manually = manually;
        });
        self.theme.set_language(code.clone());
        if manually {
            self.notifications
                .show(code.change_message(), Severity::Success);
        }
    }

    /// Store a loaded translation payload.
    pub fn set_translations(&self, translations: Translations) {
        self.state
            .update(|state| state.translations = Some(translations));
    }

    /// Observe state changes.
    pub fn subscribe(&self, listener: impl Fn(&LanguageState) + 'static) -> SubscriptionId {
        self.state.subscribe(listener)
    }

    /// Stop observing.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.state.unsubscribe(id)
    }
}

impl std::fmt::Debug for LanguageStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LanguageStore")
            .field("selected", &self.selected())
            .finish_non_exhaustive()
    }
}

/// Mount-time language routine: cookie restore and translation loading.
pub struct LanguageEffect {
    language: LanguageStore,
    persistence: Rc<dyn PersistencePort>,
    transport: Rc<dyn Transport>,
    config: ClientConfig,
}

impl LanguageEffect {
    /// Bind the routine to a store and transport.
    #[must_use]
    pub fn new(
        language: LanguageStore,
        persistence: Rc<dyn PersistencePort>,
        transport: Rc<dyn Transport>,
        config: ClientConfig,
    ) -> Self {
        Self {
            language,
            persistence,
            transport,
            config,
        }
    }

    /// Adopt the persisted language when it differs from the selection.
    /// Returns whether the selection changed.
    pub fn restore_from_persisted(&self) -> bool {
        let Some(stored) = self
            .persistence
            .read(LANGUAGE_COOKIE)
            .map(LanguageCode::new)
            .filter(|code| !code.as_str().is_empty())
        else {
            return false;
        };
        if stored == self.language.selected() {
            return false;
        }
        tracing::debug!(language = %stored, "restoring persisted language");
        self.language.set_language(stored, false);
        true
    }

    /// Fetch `language/{code}.json` for the selected language. On success the
    /// payload is stored and the cookie refreshed. Returns whether it loaded.
    pub async fn load_translations(&self) -> bool {
        let code = self.language.selected();
        let url = self.config.endpoint(&code.translation_path());
        match get_json::<Value>(self.transport.as_ref(), &url).await {
            Ok(payload) => {
                self.language
                    .set_translations(Translations::new(code.clone(), payload));
                write_logged(
                    self.persistence.as_ref(),
                    LANGUAGE_COOKIE,
                    code.as_str(),
                    &WriteOptions::persistent(),
                );
                true
            }
            Err(err) => {
                tracing::error!(language = %code, %url, error = %err, "language fetch failed");
                false
            }
        }
    }

    /// Restore, then load translations for the resulting selection.
    pub async fn run(&self) -> bool {
        self.restore_from_persisted();
        self.load_translations().await
    }
}

impl std::fmt::Debug for LanguageEffect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LanguageEffect")
            .field("language", &self.language)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Menu selection slice.
#[derive(Clone, Debug, Default, PartialEq, Eq, Store)]
pub struct MenuLanguage(pub LanguageCode);

impl PreferenceSlot for MenuLanguage {
    type Value = LanguageCode;

    fn from_value(value: LanguageCode) -> Self {
        Self(value)
    }

    fn value(&self) -> &LanguageCode {
        &self.0
    }
}

/// Language shown as selected in the menu, persisted as `languageMenu`.
#[derive(Clone, Debug)]
pub struct LanguageMenuStore {
    selected: Preference<MenuLanguage>,
}

impl LanguageMenuStore {
    /// Store in `cx`; hydrates from the cookie only in a browser host.
    #[must_use]
    pub fn new(cx: &Context, persistence: Rc<dyn PersistencePort>, host: &HostEnvironment) -> Self {
        let spec = PreferenceSpec::new(LANGUAGE_MENU_COOKIE, LanguageCode::default());
        let selected = if host.is_browser() {
            Preference::new(cx, spec, persistence, host.clone())
        } else {
            Preference::with_initial(cx, spec, LanguageCode::default(), persistence, host.clone())
        };
        Self { selected }
    }

    /// Selected menu language.
    #[must_use]
    pub fn selected(&self) -> LanguageCode {
        self.selected.get()
    }

    /// Persist and select `code`.
    pub fn set_selected(&self, code: impl Into<LanguageCode>) {
        self.selected.set(code.into());
    }

    /// Observe selection changes.
    pub fn subscribe(&self, listener: impl Fn(&LanguageCode) + 'static) -> SubscriptionId {
        self.selected.subscribe(listener)
    }
}
