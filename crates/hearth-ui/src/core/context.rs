//! Explicit wiring of every store against one persistence port and host.
//!
//! # Design
//! - One yewdux [`Context`] holds every slice; hand it to the component tree
//!   through a `ContextProvider` so `use_selector` reads the same state.
//! - Building a second `StoreContext` yields a fully independent set.

use std::rc::Rc;

use crate::breakpoints::ViewportObserver;
use crate::config::ClientConfig;
use crate::core::auth::AuthCheck;
use crate::core::fetch::Transport;
use crate::core::host::HostEnvironment;
use crate::core::language::{LanguageEffect, LanguageMenuStore, LanguageStore};
use crate::core::notify::NotificationStore;
use crate::core::persistence::PersistencePort;
use crate::core::session::SessionStore;
use crate::core::store::Context;
use crate::core::theme::ThemeStore;

/// Stores shared by the UI, constructed once and handed to components.
#[derive(Clone)]
pub struct StoreContext {
    /// Client configuration.
    pub config: ClientConfig,
    /// Execution context.
    pub host: HostEnvironment,
    /// Color mode, contrast and mirrored language.
    pub theme: ThemeStore,
    /// Selected language and translations.
    pub language: LanguageStore,
    /// Language menu selection.
    pub language_menu: LanguageMenuStore,
    /// Notification slot.
    pub notifications: NotificationStore,
    /// Authentication token.
    pub session: SessionStore,
    cx: Context,
    persistence: Rc<dyn PersistencePort>,
}

impl StoreContext {
    /// Build every store against `persistence` and `host`.
    #[must_use]
    pub fn new(
        config: ClientConfig,
        persistence: Rc<dyn PersistencePort>,
        host: HostEnvironment,
    ) -> Self {
        let cx = Context::new();
        let theme = ThemeStore::new(&cx, Rc::clone(&persistence), host.clone());
        let notifications = NotificationStore::new(&cx);
        let language = LanguageStore::new(
            &cx,
            Rc::clone(&persistence),
            theme.clone(),
            notifications.clone(),
        );
        let language_menu = LanguageMenuStore::new(&cx, Rc::clone(&persistence), &host);
        let session = SessionStore::new(&cx, Rc::clone(&persistence), &host, config.environment);
        tracing::debug!(?host, environment = ?config.environment, "stores constructed");
        Self {
            config,
            host,
            theme,
            language,
            language_menu,
            notifications,
            session,
            cx,
            persistence,
        }
    }

    /// yewdux context holding every slice of this set.
    #[must_use]
    pub const fn yewdux(&self) -> &Context {
        &self.cx
    }

    /// Session check bound to this context's session store.
    #[must_use]
    pub fn auth_check(&self) -> AuthCheck {
        AuthCheck::new(
            &self.cx,
            self.session.clone(),
            Rc::clone(&self.persistence),
            self.host.clone(),
        )
    }

    /// Language routine bound to this context's language store.
    #[must_use]
    pub fn language_effect(&self, transport: Rc<dyn Transport>) -> LanguageEffect {
        LanguageEffect::new(
            self.language.clone(),
            Rc::clone(&self.persistence),
            transport,
            self.config.clone(),
        )
    }

    /// Viewport observer for this context's host.
    #[must_use]
    pub fn viewport(&self) -> ViewportObserver {
        ViewportObserver::new(&self.cx, self.host.clone())
    }
}

impl std::fmt::Debug for StoreContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreContext")
            .field("config", &self.config)
            .field("host", &self.host)
            .field("theme", &self.theme)
            .field("language", &self.language)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::breakpoints::ViewportBand;
    use crate::core::host::MemoryBrowser;
    use crate::core::language::LANGUAGE_COOKIE;
    use crate::core::persistence::MemoryPersistence;
    use crate::core::session::AUTH_COOKIE;
    use crate::core::theme::ThemeMode;

    #[test]
    fn stores_share_one_persistence_port() {
        let storage = MemoryPersistence::new();
        let context = StoreContext::new(
            ClientConfig::default(),
            Rc::new(storage.clone()),
            HostEnvironment::browser(MemoryBrowser::new(800, 0)),
        );

        context.theme.set_mode(ThemeMode::Light);
        context.language.set_language("en", true);
        context.session.set("Bearer tok");

        assert_eq!(storage.read("createTheme").as_deref(), Some("light"));
        assert_eq!(storage.read(LANGUAGE_COOKIE).as_deref(), Some("en"));
        assert_eq!(storage.read(AUTH_COOKIE).as_deref(), Some("Bearer tok"));
        assert_eq!(context.theme.language().as_str(), "en");
        assert!(context.notifications.state().visible);
        assert_eq!(context.viewport().snapshot().current, ViewportBand::Tablet);
    }

    #[test]
    fn contexts_do_not_share_state() {
        let build = || {
            StoreContext::new(
                ClientConfig::default(),
                Rc::new(MemoryPersistence::new()),
                HostEnvironment::Headless,
            )
        };
        let first = build();
        let second = build();

        first.notifications.show("only here", crate::core::notify::Severity::Info);
        first.theme.set_mode(ThemeMode::Light);

        assert!(!second.notifications.state().visible);
        assert_eq!(second.theme.mode(), ThemeMode::Dark);
    }

    #[test]
    fn auth_check_reports_malformed_claims() {
        let storage = MemoryPersistence::new().seeded(AUTH_COOKIE, "Bearer x.e30.y");
        let context = StoreContext::new(
            ClientConfig::default(),
            Rc::new(storage),
            HostEnvironment::browser(MemoryBrowser::new(1280, 1)),
        );
        let outcome = context.auth_check().run();
        assert!(outcome.user.is_none());
        assert!(outcome.error.is_some());
        assert!(!outcome.loading);
    }
}
