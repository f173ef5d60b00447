//! User preferences.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::storage::{Storage, read_json, write_json};

/// Persisted user preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Use the dark theme.
    pub dark_theme: bool,
    /// Play sound effects.
    pub sound_enabled: bool,
}

impl Settings {
    /// Default for [`dark_theme`](Self::dark_theme).
    pub const DEFAULT_DARK_THEME: bool = false;
    /// Default for [`sound_enabled`](Self::sound_enabled).
    pub const DEFAULT_SOUND_ENABLED: bool = true;
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dark_theme: Self::DEFAULT_DARK_THEME,
            sound_enabled: Self::DEFAULT_SOUND_ENABLED,
        }
    }
}

/// Preference persistence.
pub trait SettingsStore: Send + Sync {
    /// Current preferences; defaults when nothing has been saved.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    fn settings(&self) -> Result<Settings, StoreError>;

    /// Replace all preferences.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    fn save(&self, settings: Settings) -> Result<(), StoreError>;

    /// Toggle the dark theme.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    fn set_dark_theme(&self, enabled: bool) -> Result<(), StoreError> {
        let mut s = self.settings()?;
        s.dark_theme = enabled;
        self.save(s)
    }

    /// Toggle sound effects.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    fn set_sound_enabled(&self, enabled: bool) -> Result<(), StoreError> {
        let mut s = self.settings()?;
        s.sound_enabled = enabled;
        self.save(s)
    }
}

const KEY: &str = "settings";

/// [`SettingsStore`] as a single JSON document.
#[derive(Clone)]
pub struct StoredSettings {
    storage: Arc<dyn Storage>,
}

impl StoredSettings {
    /// Persist through `storage`.
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }
}

impl SettingsStore for StoredSettings {
    fn settings(&self) -> Result<Settings, StoreError> {
        Ok(read_json(self.storage.as_ref(), KEY)?.unwrap_or_default())
    }

    fn save(&self, settings: Settings) -> Result<(), StoreError> {
        write_json(self.storage.as_ref(), KEY, &settings)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn defaults_when_unsaved() {
        let s = StoredSettings::new(Arc::new(MemoryStorage::new()));
        let settings = s.settings().unwrap();
        assert!(!settings.dark_theme);
        assert!(settings.sound_enabled);
    }

    #[test]
    fn toggles_persist_independently() {
        let s = StoredSettings::new(Arc::new(MemoryStorage::new()));
        s.set_dark_theme(true).unwrap();
        s.set_sound_enabled(false).unwrap();
        assert_eq!(
            s.settings().unwrap(),
            Settings {
                dark_theme: true,
                sound_enabled: false
            }
        );
    }

    #[test]
    fn partial_document_fills_defaults() {
        let storage = Arc::new(MemoryStorage::new());
        storage.write(KEY, br#"{"dark_theme": true}"#).unwrap();
        let s = StoredSettings::new(storage);
        assert!(s.settings().unwrap().sound_enabled);
    }
}
