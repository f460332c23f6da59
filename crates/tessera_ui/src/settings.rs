//! Persisted window layout.
//!
//! One `[[window]]` table per window that has ever been shown without
//! `NO_SAVED_SETTINGS`:
//!
//! ```toml
//! [[window]]
//! name = "Inspector"
//! pos = { x = 60.0, y = 60.0 }
//! size = { x = 320.0, y = 240.0 }
//! collapsed = false
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tessera_core::Vec2;
use tracing::debug;

use crate::error::UiResult;
use crate::id::Id;

/// Saved rectangle and collapse state of one window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowSettings {
    /// Window name, hashed to find the window.
    pub name: String,
    /// Top-left position.
    pub pos: Vec2,
    /// Full (uncollapsed) size.
    pub size: Vec2,
    /// Collapsed to its title bar.
    #[serde(default)]
    pub collapsed: bool,
    #[serde(skip)]
    id: Id,
}

impl WindowSettings {
    /// Creates settings for a window at the origin with no size.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let id = Id::from_name(&name);
        Self {
            name,
            pos: Vec2::ZERO,
            size: Vec2::ZERO,
            collapsed: false,
            id,
        }
    }

    /// Identity of the window these settings belong to.
    #[must_use]
    pub fn id(&self) -> Id {
        self.id
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SettingsDocument {
    #[serde(default)]
    window: Vec<WindowSettings>,
}

/// All saved windows, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsStore {
    windows: Vec<WindowSettings>,
}

impl SettingsStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a settings document. Duplicate names keep the last entry.
    ///
    /// # Errors
    ///
    /// Returns [`crate::UiError::SettingsParse`] on malformed TOML.
    pub fn from_toml_str(s: &str) -> UiResult<Self> {
        let doc: SettingsDocument = toml::from_str(s)?;
        let mut store = Self::new();
        for mut entry in doc.window {
            entry.id = Id::from_name(&entry.name);
            let slot = store.find_or_insert(&entry.name);
            *slot = entry;
        }
        Ok(store)
    }

    /// Serializes every entry.
    ///
    /// # Errors
    ///
    /// Returns [`crate::UiError::SettingsSerialize`] if serialization fails.
    pub fn to_toml_string(&self) -> UiResult<String> {
        let doc = SettingsDocument {
            window: self.windows.clone(),
        };
        Ok(toml::to_string_pretty(&doc)?)
    }

    /// Reads a settings file.
    ///
    /// # Errors
    ///
    /// Returns [`crate::UiError::Io`] if the file cannot be read, or
    /// [`crate::UiError::SettingsParse`] if it is malformed.
    pub fn load(path: &Path) -> UiResult<Self> {
        let text = fs::read_to_string(path)?;
        let store = Self::from_toml_str(&text)?;
        debug!(path = %path.display(), windows = store.len(), "loaded window settings");
        Ok(store)
    }

    /// Writes every entry to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::UiError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> UiResult<()> {
        fs::write(path, self.to_toml_string()?)?;
        debug!(path = %path.display(), windows = self.len(), "saved window settings");
        Ok(())
    }

    /// Looks up a window's entry.
    #[must_use]
    pub fn find(&self, id: Id) -> Option<&WindowSettings> {
        self.windows.iter().find(|w| w.id == id)
    }

    /// Returns the entry for `name`, creating an empty one if needed.
    pub fn find_or_insert(&mut self, name: &str) -> &mut WindowSettings {
        let id = Id::from_name(name);
        let pos = match self.windows.iter().position(|w| w.id == id) {
            Some(pos) => pos,
            None => {
                self.windows.push(WindowSettings::new(name));
                self.windows.len() - 1
            }
        };
        &mut self.windows[pos]
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    /// Returns true if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Iterates over the entries.
    pub fn iter(&self) -> impl Iterator<Item = &WindowSettings> {
        self.windows.iter()
    }
}
