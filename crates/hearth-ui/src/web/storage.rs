//! `localStorage` persistence adapter.
//!
//! Values are stored as JSON strings through `gloo::storage`; cookie
//! attributes in [`WriteOptions`] do not apply and are ignored.

use gloo::storage::{LocalStorage, Storage};

use crate::core::persistence::{PersistencePort, WriteOptions};
use crate::error::PersistenceError;

/// Local storage of the current origin.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStoragePersistence;

impl PersistencePort for LocalStoragePersistence {
    fn read(&self, key: &str) -> Option<String> {
        LocalStorage::get::<String>(key).ok()
    }

    fn write(
        &self,
        key: &str,
        value: &str,
        _options: &WriteOptions,
    ) -> Result<(), PersistenceError> {
        LocalStorage::set(key, value).map_err(|err| PersistenceError::Write {
            key: key.to_string(),
            detail: err.to_string(),
        })
    }

    fn expire(&self, key: &str) -> Result<(), PersistenceError> {
        LocalStorage::delete(key);
        Ok(())
    }
}
