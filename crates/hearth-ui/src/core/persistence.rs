//! Persistence port and the in-memory adapter.
//!
//! # Design
//! - `write` and `expire` are separate operations so a removal can never be
//!   expressed as an accidental write with a negative lifetime.
//! - Adapters report failures, stores log them and carry on: persisted writes
//!   are fire-and-forget from the caller's point of view.
//! - The in-memory adapter records write options and expirations so tests can
//!   assert on what a cookie jar would have received.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use crate::error::PersistenceError;

/// Root path applied to every persisted key.
pub const COOKIE_PATH: &str = "/";
/// Default lifetime of persisted keys: 30 days in seconds.
pub const MAX_AGE_SECS: i64 = 30 * 24 * 60 * 60;

/// `SameSite` cookie attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SameSite {
    /// Sent on top-level navigations and same-site requests.
    Lax,
    /// Sent on same-site requests only.
    Strict,
    /// Sent on all requests (requires `Secure`).
    None,
}

/// Attributes applied when persisting a value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WriteOptions {
    /// Cookie path.
    pub path: &'static str,
    /// Lifetime in seconds; `None` for a session-scoped value.
    pub max_age: Option<i64>,
    /// Restrict to HTTPS.
    pub secure: bool,
    /// Optional `SameSite` policy.
    pub same_site: Option<SameSite>,
}

impl WriteOptions {
    /// Root path with the standard 30-day lifetime.
    #[must_use]
    pub const fn persistent() -> Self {
        Self {
            path: COOKIE_PATH,
            max_age: Some(MAX_AGE_SECS),
            secure: false,
            same_site: None,
        }
    }

    /// Copy with the `Secure` flag set as given.
    #[must_use]
    pub const fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Copy with a `SameSite` policy.
    #[must_use]
    pub const fn with_same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = Some(same_site);
        self
    }
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self::persistent()
    }
}

/// Key/value persistence medium (cookie jar, local storage, memory).
pub trait PersistencePort {
    /// Read the raw value stored under `key`.
    fn read(&self, key: &str) -> Option<String>;

    /// Store `value` under `key` with the given attributes.
    ///
    /// # Errors
    ///
    /// Returns an error when the medium rejects the write.
    fn write(&self, key: &str, value: &str, options: &WriteOptions)
    -> Result<(), PersistenceError>;

    /// Expire `key` so subsequent reads see no value.
    ///
    /// # Errors
    ///
    /// Returns an error when the medium rejects the removal.
    fn expire(&self, key: &str) -> Result<(), PersistenceError>;
}

/// Value plus the attributes it was last written with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredEntry {
    /// Raw persisted value.
    pub value: String,
    /// Attributes supplied by the last write.
    pub options: WriteOptions,
}

#[derive(Debug, Default)]
struct MemoryState {
    entries: HashMap<String, StoredEntry>,
    expired: HashSet<String>,
    writes: Vec<(String, String)>,
}

/// In-memory adapter used for tests and headless rendering.
///
/// Clones share the same backing map.
#[derive(Clone, Debug, Default)]
pub struct MemoryPersistence {
    state: Rc<RefCell<MemoryState>>,
}

impl MemoryPersistence {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate `key` as if a previous session had written it.
    #[must_use]
    pub fn seeded(self, key: &str, value: &str) -> Self {
        self.state.borrow_mut().entries.insert(
            key.to_string(),
            StoredEntry {
                value: value.to_string(),
                options: WriteOptions::persistent(),
            },
        );
        self
    }

    /// Last entry written under `key`.
    #[must_use]
    pub fn entry(&self, key: &str) -> Option<StoredEntry> {
        self.state.borrow().entries.get(key).cloned()
    }

    /// Whether `key` was expired and not written since.
    #[must_use]
    pub fn is_expired(&self, key: &str) -> bool {
        self.state.borrow().expired.contains(key)
    }

    /// Number of writes performed for `key`.
    #[must_use]
    pub fn write_count(&self, key: &str) -> usize {
        self.state
            .borrow()
            .writes
            .iter()
            .filter(|(written, _)| written == key)
            .count()
    }
}

impl PersistencePort for MemoryPersistence {
    fn read(&self, key: &str) -> Option<String> {
        self.state
            .borrow()
            .entries
            .get(key)
            .map(|entry| entry.value.clone())
    }

    fn write(
        &self,
        key: &str,
        value: &str,
        options: &WriteOptions,
    ) -> Result<(), PersistenceError> {
        let mut state = self.state.borrow_mut();
        state.expired.remove(key);
        state.writes.push((key.to_string(), value.to_string()));
        state.entries.insert(
            key.to_string(),
            StoredEntry {
                value: value.to_string(),
                options: options.clone(),
            },
        );
        Ok(())
    }

    fn expire(&self, key: &str) -> Result<(), PersistenceError> {
        let mut state = self.state.borrow_mut();
        state.entries.remove(key);
        state.expired.insert(key.to_string());
        Ok(())
    }
}

/// Write through `port`, logging instead of propagating failures.
pub(crate) fn write_logged(
    port: &dyn PersistencePort,
    key: &str,
    value: &str,
    options: &WriteOptions,
) {
    if let Err(err) = port.write(key, value, options) {
        tracing::warn!(key, error = %err, "persisted write failed");
    } else {
        tracing::debug!(key, "persisted value written");
    }
}

/// Expire through `port`, logging instead of propagating failures.
pub(crate) fn expire_logged(port: &dyn PersistencePort, key: &str) {
    if let Err(err) = port.expire(key) {
        tracing::warn!(key, error = %err, "persisted expire failed");
    } else {
        tracing::debug!(key, "persisted value expired");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_read_returns_value_and_options() -> Result<(), PersistenceError> {
        let storage = MemoryPersistence::new();
        let options = WriteOptions::persistent().with_secure(true);
        storage.write("createTheme", "light", &options)?;

        assert_eq!(storage.read("createTheme").as_deref(), Some("light"));
        let entry = storage.entry("createTheme");
        assert_eq!(entry.map(|e| e.options), Some(options));
        assert_eq!(storage.write_count("createTheme"), 1);
        Ok(())
    }

    #[test]
    fn expire_removes_value_until_next_write() -> Result<(), PersistenceError> {
        let storage = MemoryPersistence::new().seeded("authentication", "Bearer tok");
        storage.expire("authentication")?;
        assert!(storage.read("authentication").is_none());
        assert!(storage.is_expired("authentication"));

        storage.write("authentication", "Bearer next", &WriteOptions::persistent())?;
        assert!(!storage.is_expired("authentication"));
        Ok(())
    }

    #[test]
    fn clones_share_backing_state() -> Result<(), PersistenceError> {
        let storage = MemoryPersistence::new();
        let handle = storage.clone();
        handle.write("languageMenu", "en", &WriteOptions::persistent())?;
        assert_eq!(storage.read("languageMenu").as_deref(), Some("en"));
        Ok(())
    }
}
