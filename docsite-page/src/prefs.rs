//! Persisted theme preference.

use std::cell::RefCell;
use std::collections::HashMap;
use std::convert::Infallible;

use crate::theme::Theme;

/// Key-value string storage surviving page reloads.
/// Platform-specific implementations should provide this
pub trait PreferenceStore {
    type Error: std::error::Error + 'static;

    /// Read the value stored under `key`
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Store `value` under `key`
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the write.
    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error>;
}

/// Sole owner of the theme persistence slot.
pub struct ThemePreferences<S> {
    store: S,
    key: String,
}

impl<S: PreferenceStore> ThemePreferences<S> {
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// The persisted theme, if one is stored and readable.
    pub fn stored(&self) -> Option<Theme> {
        match self.store.get(&self.key) {
            Ok(value) => value.and_then(|v| v.parse().ok()),
            Err(err) => {
                log::warn!("Theme preference unreadable: {err}");
                None
            }
        }
    }

    /// Resolve the theme to show on load.
    pub fn load(&self, prefers_dark: bool) -> Theme {
        self.stored()
            .unwrap_or_else(|| Theme::resolve(None, prefers_dark))
    }

    /// Write `theme` to the slot. Failures leave the session unpersisted.
    pub fn persist(&self, theme: Theme) {
        if let Err(err) = self.store.set(&self.key, theme.as_str()) {
            log::warn!("Failed to persist theme preference: {err}");
        }
    }

    pub const fn store(&self) -> &S {
        &self.store
    }
}

/// In-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(key: &str, value: &str) -> Self {
        let store = Self::default();
        store
            .values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        store
    }

    #[must_use]
    pub fn value(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }
}

impl PreferenceStore for MemoryStore {
    type Error = Infallible;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.value(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
