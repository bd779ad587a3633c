//! Single named preference mirrored to persistence and the document.
//!
//! # Design
//! - Initialise once from the persisted value when it parses, else the default.
//! - Every `set`/`toggle` writes persistence and re-applies the reflection,
//!   even when the value is unchanged; this keeps the cookie lifetime fresh.
//! - Persist and reflect before updating memory so listeners observe a document
//!   that already matches the new value.
//! - The value lives in a [`PreferenceSlot`], a one-field yewdux slice, so
//!   components can select it like any other slice.

use std::rc::Rc;

use crate::core::host::{HostEnvironment, Reflection};
use crate::core::persistence::{PersistencePort, WriteOptions, write_logged};
use crate::core::store::{Context, Slice, Store, SubscriptionId};

/// Value that can round-trip through its persisted string form.
pub trait PreferenceValue: Clone + PartialEq + Default + 'static {
    /// Persisted representation.
    fn encode(&self) -> String;

    /// Parse a persisted representation; `None` falls back to the default.
    fn decode(raw: &str) -> Option<Self>;

    /// Whether a class reflection should be present for this value.
    fn is_truthy(&self) -> bool {
        true
    }
}

impl PreferenceValue for bool {
    fn encode(&self) -> String {
        self.to_string()
    }

    fn decode(raw: &str) -> Option<Self> {
        match raw {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        }
    }

    fn is_truthy(&self) -> bool {
        *self
    }
}

impl PreferenceValue for String {
    fn encode(&self) -> String {
        self.clone()
    }

    fn decode(raw: &str) -> Option<Self> {
        Some(raw.to_string())
    }
}

/// Static description of a preference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreferenceSpec<T> {
    /// Persisted key (cookie or storage name).
    pub key: &'static str,
    /// Value used when nothing parseable is persisted.
    pub default: T,
    /// Attributes for every write.
    pub options: WriteOptions,
    /// Optional document reflection.
    pub reflection: Option<Reflection>,
}

impl<T> PreferenceSpec<T> {
    /// Persistent preference with no reflection.
    #[must_use]
    pub fn new(key: &'static str, default: T) -> Self {
        Self {
            key,
            default,
            options: WriteOptions::persistent(),
            reflection: None,
        }
    }

    /// Copy mirrored onto `reflection` on every write.
    #[must_use]
    pub fn reflected(mut self, reflection: Reflection) -> Self {
        self.reflection = Some(reflection);
        self
    }
}

impl<T: PreferenceValue> PreferenceSpec<T> {
    /// Persisted value when it parses, else the default.
    #[must_use]
    pub fn load(&self, persistence: &dyn PersistencePort) -> T {
        persistence
            .read(self.key)
            .and_then(|raw| T::decode(&raw))
            .unwrap_or_else(|| self.default.clone())
    }

    /// Persist `value` and mirror it onto the document.
    pub fn write_through(
        &self,
        value: &T,
        persistence: &dyn PersistencePort,
        host: &HostEnvironment,
    ) {
        let encoded = value.encode();
        write_logged(persistence, self.key, &encoded, &self.options);
        if let Some(reflection) = self.reflection {
            host.reflect(reflection, &encoded, value.is_truthy());
        }
    }
}

/// yewdux slice holding a single preference value.
pub trait PreferenceSlot: Store + Clone + PartialEq {
    /// Value carried by the slice.
    type Value: PreferenceValue;

    /// Slice holding `value`.
    fn from_value(value: Self::Value) -> Self;

    /// Carried value.
    fn value(&self) -> &Self::Value;
}

/// Observable preference backed by a persistence port.
pub struct Preference<S: PreferenceSlot> {
    spec: Rc<PreferenceSpec<S::Value>>,
    slot: Slice<S>,
    persistence: Rc<dyn PersistencePort>,
    host: HostEnvironment,
}

impl<S: PreferenceSlot> Preference<S> {
    /// Create the preference in `cx`, reading the persisted value when it parses.
    #[must_use]
    pub fn new(
        cx: &Context,
        spec: PreferenceSpec<S::Value>,
        persistence: Rc<dyn PersistencePort>,
        host: HostEnvironment,
    ) -> Self {
        let initial = spec.load(persistence.as_ref());
        Self::with_initial(cx, spec, initial, persistence, host)
    }

    /// Create the preference with an explicit starting value (no persisted read).
    #[must_use]
    pub fn with_initial(
        cx: &Context,
        spec: PreferenceSpec<S::Value>,
        initial: S::Value,
        persistence: Rc<dyn PersistencePort>,
        host: HostEnvironment,
    ) -> Self {
        Self {
            spec: Rc::new(spec),
            slot: Slice::with_state(cx, S::from_value(initial)),
            persistence,
            host,
        }
    }

    /// Persisted key.
    #[must_use]
    pub fn key(&self) -> &'static str {
        self.spec.key
    }

    /// Default value.
    #[must_use]
    pub fn default_value(&self) -> &S::Value {
        &self.spec.default
    }

    /// Current value.
    #[must_use]
    pub fn get(&self) -> S::Value {
        self.slot.read(|slot| slot.value().clone())
    }

    /// Persist, reflect and store `value`.
    pub fn set(&self, value: S::Value) {
        self.spec
            .write_through(&value, self.persistence.as_ref(), &self.host);
        self.slot.set(S::from_value(value));
    }

    /// Re-persist and re-reflect the current value.
    pub fn apply(&self) {
        let current = self.get();
        self.spec
            .write_through(&current, self.persistence.as_ref(), &self.host);
    }

    /// Observe value changes.
    pub fn subscribe(&self, listener: impl Fn(&S::Value) + 'static) -> SubscriptionId {
        self.slot.subscribe(move |slot: &S| listener(slot.value()))
    }

    /// Stop observing.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.slot.unsubscribe(id)
    }
}

impl<S: PreferenceSlot<Value = bool>> Preference<S> {
    /// Flip the flag with the same write-through as [`Preference::set`].
    /// Returns the new value.
    pub fn toggle(&self) -> bool {
        let next = !self.get();
        self.set(next);
        next
    }
}

impl<S: PreferenceSlot> Clone for Preference<S> {
    fn clone(&self) -> Self {
        Self {
            spec: Rc::clone(&self.spec),
            slot: self.slot.clone(),
            persistence: Rc::clone(&self.persistence),
            host: self.host.clone(),
        }
    }
}

impl<S: PreferenceSlot> std::fmt::Debug for Preference<S>
where
    S::Value: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Preference")
            .field("key", &self.spec.key)
            .field("value", &self.get())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::host::MemoryBrowser;
    use crate::core::persistence::MemoryPersistence;
    use std::cell::RefCell;

    #[derive(Clone, Debug, Default, PartialEq, Store)]
    struct Contrast(bool);

    impl PreferenceSlot for Contrast {
        type Value = bool;

        fn from_value(value: bool) -> Self {
            Self(value)
        }

        fn value(&self) -> &bool {
            &self.0
        }
    }

    #[derive(Clone, Debug, Default, PartialEq, Store)]
    struct Menu(String);

    impl PreferenceSlot for Menu {
        type Value = String;

        fn from_value(value: String) -> Self {
            Self(value)
        }

        fn value(&self) -> &String {
            &self.0
        }
    }

    fn contrast(storage: &MemoryPersistence, host: HostEnvironment) -> Preference<Contrast> {
        Preference::new(
            &Context::new(),
            PreferenceSpec::new("highContrast", false)
                .reflected(Reflection::BodyClass("high-contrast")),
            Rc::new(storage.clone()),
            host,
        )
    }

    #[test]
    fn initial_value_prefers_parseable_persisted_value() {
        let storage = MemoryPersistence::new().seeded("highContrast", "true");
        assert!(contrast(&storage, HostEnvironment::Headless).get());

        let garbage = MemoryPersistence::new().seeded("highContrast", "yes");
        assert!(!contrast(&garbage, HostEnvironment::Headless).get());
    }

    #[test]
    fn set_round_trips_through_memory_and_persistence() {
        let storage = MemoryPersistence::new();
        let pref: Preference<Menu> = Preference::new(
            &Context::new(),
            PreferenceSpec::new("languageMenu", "de".to_string()),
            Rc::new(storage.clone()),
            HostEnvironment::Headless,
        );
        for value in ["en", "fr", "ar", "de"] {
            pref.set(value.to_string());
            assert_eq!(pref.get(), value);
            assert_eq!(storage.read("languageMenu").as_deref(), Some(value));
        }
        let entry = storage.entry("languageMenu");
        assert_eq!(entry.map(|e| e.options), Some(WriteOptions::persistent()));
    }

    #[test]
    fn toggle_reflects_body_class() {
        let storage = MemoryPersistence::new();
        let browser = MemoryBrowser::new(1024, 0);
        let pref = contrast(&storage, HostEnvironment::browser(browser.clone()));

        assert!(pref.toggle());
        assert!(browser.has_body_class("high-contrast"));
        assert_eq!(storage.read("highContrast").as_deref(), Some("true"));

        assert!(!pref.toggle());
        assert!(!browser.has_body_class("high-contrast"));
        assert_eq!(storage.read("highContrast").as_deref(), Some("false"));
    }

    #[test]
    fn setting_same_value_still_writes() {
        let storage = MemoryPersistence::new();
        let pref = contrast(&storage, HostEnvironment::Headless);
        pref.set(false);
        pref.set(false);
        assert_eq!(storage.write_count("highContrast"), 2);
    }

    #[test]
    fn listeners_observe_writes() {
        let storage = MemoryPersistence::new();
        let pref = contrast(&storage, HostEnvironment::Headless);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let id = pref.subscribe(move |value| sink.borrow_mut().push(*value));

        pref.toggle();
        pref.unsubscribe(id);
        pref.toggle();

        assert_eq!(*seen.borrow(), vec![true]);
    }
}
