//! `localStorage`-backed preference store.

use docsite_page::PreferenceStore;
use web_sys::Storage;

use crate::dom;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("localStorage unavailable")]
    Unavailable,
    #[error("Storage error: {0}")]
    Js(String),
}

/// Access the browser `localStorage` handle.
///
/// # Errors
/// Returns an error if the browser window cannot be accessed or `localStorage` is unavailable.
pub fn local_storage() -> Result<Storage, StorageError> {
    dom::window()
        .ok_or(StorageError::Unavailable)?
        .local_storage()
        .map_err(|err| StorageError::Js(dom::js_error_message(&err)))?
        .ok_or(StorageError::Unavailable)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalPreferenceStore;

impl PreferenceStore for LocalPreferenceStore {
    type Error = StorageError;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        local_storage()?
            .get_item(key)
            .map_err(|err| StorageError::Js(dom::js_error_message(&err)))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        local_storage()?
            .set_item(key, value)
            .map_err(|err| StorageError::Js(dom::js_error_message(&err)))
    }
}
