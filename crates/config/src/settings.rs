// Editor settings
// Loaded from ~/.config/gridedit/settings.toml

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::ConfigError;

/// Whether the row count of a grid may change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowMode {
    /// Rows cannot be added or deleted, only edited
    Fixed,
    /// Rows can be appended and deleted
    #[default]
    Dynamic,
}

impl RowMode {
    pub fn allows_row_changes(&self) -> bool {
        matches!(self, RowMode::Dynamic)
    }
}

/// What happens to a displayed edit when the data source rejects the write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersistFailurePolicy {
    /// Keep the edit on screen; the failure is only logged
    #[default]
    Keep,
    /// Drop the edit so the cell shows the snapshot value again
    Revert,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RowSettings {
    pub mode: RowMode,
}

impl Default for RowSettings {
    fn default() -> Self {
        Self { mode: RowMode::Dynamic }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistSettings {
    pub on_failure: PersistFailurePolicy,
}

impl Default for PersistSettings {
    fn default() -> Self {
        Self { on_failure: PersistFailurePolicy::Keep }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Cache cells read from the snapshot
    pub enabled: bool,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SortSettings {
    /// Toggle sorting off when the requested direction is already active
    pub auto_reset: bool,
}

impl Default for SortSettings {
    fn default() -> Self {
        Self { auto_reset: false }
    }
}

/// Settings for one editing session.
///
/// ```toml
/// [rows]
/// mode = "fixed"
///
/// [persist]
/// on_failure = "revert"
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    pub rows: RowSettings,
    pub persist: PersistSettings,
    pub cache: CacheSettings,
    pub sort: SortSettings,
}

impl EditorSettings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gridedit");
        config_dir.join("settings.toml")
    }

    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        toml::from_str(input).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load settings from disk, falling back to defaults
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load settings from a specific file, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(contents) => match Self::from_toml(&contents) {
                Ok(settings) => settings,
                Err(e) => {
                    log::warn!("Error parsing {}: {}; using default settings", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Error reading {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save current settings to disk
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io(e.to_string()))?;
        }
        let contents = self.to_toml()?;
        fs::write(path, contents).map_err(|e| ConfigError::Io(e.to_string()))
    }

    /// Save current settings to the default location
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path())
    }
}
