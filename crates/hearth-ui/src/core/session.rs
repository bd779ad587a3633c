//! Authentication token store persisted as the `authentication` cookie.
//!
//! # Design
//! - Read the cookie once at construction, and only when a browser is present.
//! - `Secure` follows the configured environment; `SameSite=Lax` always.
//! - Removal expires the cookie through the port instead of writing a value.
//! - The token is the [`SessionState`] slice of the injected context.

use std::rc::Rc;

use crate::config::Environment;
use crate::core::host::HostEnvironment;
use crate::core::persistence::{
    PersistencePort, SameSite, WriteOptions, expire_logged, write_logged,
};
use crate::core::store::{Context, Slice, Store, SubscriptionId};

/// Cookie holding the bearer token.
pub const AUTH_COOKIE: &str = "authentication";

/// Session token slice; `None` when unauthenticated.
#[derive(Clone, Debug, Default, PartialEq, Eq, Store)]
pub struct SessionState {
    /// Raw persisted value (`Bearer <jwt>`).
    pub token: Option<String>,
}

/// Observable session token backed by the cookie jar.
#[derive(Clone)]
pub struct SessionStore {
    token: Slice<SessionState>,
    persistence: Rc<dyn PersistencePort>,
    options: WriteOptions,
}

impl SessionStore {
    /// Create the store in `cx`; hydrates from the cookie only in a browser host.
    #[must_use]
    pub fn new(
        cx: &Context,
        persistence: Rc<dyn PersistencePort>,
        host: &HostEnvironment,
        environment: Environment,
    ) -> Self {
        let initial = if host.is_browser() {
            persistence
                .read(AUTH_COOKIE)
                .filter(|raw| !raw.is_empty())
        } else {
            None
        };
        Self {
            token: Slice::with_state(cx, SessionState { token: initial }),
            persistence,
            options: WriteOptions::persistent()
                .with_secure(environment.secure_cookies())
                .with_same_site(SameSite::Lax),
        }
    }

    /// Current token, `None` when unauthenticated.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.token.get().token
    }

    /// Whether a token is held.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.read(|state| state.token.is_some())
    }

    /// Store and persist `token`.
    pub fn set(&self, token: impl Into<String>) {
        let token = token.into();
        write_logged(self.persistence.as_ref(), AUTH_COOKIE, &token, &self.options);
        self.token.set(SessionState { token: Some(token) });
    }

    /// Clear the token and expire the cookie.
    pub fn remove(&self) {
        expire_logged(self.persistence.as_ref(), AUTH_COOKIE);
        self.token.set(SessionState::default());
    }

    /// Attributes used for token writes.
    #[must_use]
    pub const fn write_options(&self) -> &WriteOptions {
        &self.options
    }

    /// Observe token changes.
    pub fn subscribe(&self, listener: impl Fn(&Option<String>) + 'static) -> SubscriptionId {
        self.token
            .subscribe(move |state: &SessionState| listener(&state.token))
    }

    /// Stop observing.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.token.unsubscribe(id)
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("authenticated", &self.is_authenticated())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::host::MemoryBrowser;
    use crate::core::persistence::MemoryPersistence;

    fn browser() -> HostEnvironment {
        HostEnvironment::browser(MemoryBrowser::new(1280, 0))
    }

    #[test]
    fn set_then_remove_clears_memory_and_expires_cookie() {
        let storage = MemoryPersistence::new();
        let session = SessionStore::new(
            &Context::new(),
            Rc::new(storage.clone()),
            &browser(),
            Environment::Development,
        );

        session.set("tok");
        assert_eq!(session.token().as_deref(), Some("tok"));
        assert_eq!(storage.read(AUTH_COOKIE).as_deref(), Some("tok"));

        session.remove();
        assert_eq!(session.token(), None);
        assert!(storage.read(AUTH_COOKIE).is_none());
        assert!(storage.is_expired(AUTH_COOKIE));
    }

    #[test]
    fn secure_flag_follows_environment() {
        let storage = MemoryPersistence::new();
        let prod = SessionStore::new(
            &Context::new(),
            Rc::new(storage.clone()),
            &browser(),
            Environment::Production,
        );
        prod.set("Bearer a");
        let entry = storage.entry(AUTH_COOKIE);
        let options = entry.map(|e| e.options);
        assert_eq!(
            options,
            Some(
                WriteOptions::persistent()
                    .with_secure(true)
                    .with_same_site(SameSite::Lax)
            )
        );

        let dev = SessionStore::new(
            &Context::new(),
            Rc::new(storage),
            &browser(),
            Environment::Development,
        );
        assert!(!dev.write_options().secure);
        assert_eq!(dev.write_options().same_site, Some(SameSite::Lax));
    }

    #[test]
    fn hydrates_only_in_browser() {
        let storage = MemoryPersistence::new().seeded(AUTH_COOKIE, "Bearer x");
        let headless = SessionStore::new(
            &Context::new(),
            Rc::new(storage.clone()),
            &HostEnvironment::Headless,
            Environment::Development,
        );
        assert!(!headless.is_authenticated());

        let hydrated = SessionStore::new(
            &Context::new(),
            Rc::new(storage),
            &browser(),
            Environment::Development,
        );
        assert_eq!(hydrated.token().as_deref(), Some("Bearer x"));
    }

    #[test]
    fn empty_cookie_counts_as_absent() {
        let storage = MemoryPersistence::new().seeded(AUTH_COOKIE, "");
        let session =
            SessionStore::new(&Context::new(), Rc::new(storage), &browser(), Environment::Test);
        assert_eq!(session.token(), None);
    }
}
