// Theme configuration
// Supports: built-in themes and custom JSON themes

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::ConfigError;

/// Theme source - where to load theme from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum ThemeSource {
    /// Built-in dark theme
    Dark,
    /// Built-in light theme
    Light,
    /// Custom theme from file path
    Custom(String),
}

impl Default for ThemeSource {
    fn default() -> Self {
        ThemeSource::Light
    }
}

/// Cell presentation settings that are not specific to a column.
///
/// Columns with their own format override the temporal formats here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub name: String,
    pub is_dark: bool,
    /// Text shown for missing values (empty = blank cell)
    pub missing_value_text: String,
    /// chrono strftime patterns
    pub date_format: String,
    pub time_format: String,
    pub datetime_format: String,
    pub true_text: String,
    pub false_text: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}

impl Theme {
    pub fn light() -> Self {
        Self {
            name: "Light".to_string(),
            is_dark: false,
            missing_value_text: String::new(),
            date_format: "%Y-%m-%d".to_string(),
            time_format: "%H:%M:%S".to_string(),
            datetime_format: "%Y-%m-%d %H:%M:%S".to_string(),
            true_text: "true".to_string(),
            false_text: "false".to_string(),
        }
    }

    pub fn dark() -> Self {
        Self {
            name: "Dark".to_string(),
            is_dark: true,
            ..Self::light()
        }
    }

    /// Resolve a theme source, falling back to the light theme when a custom
    /// theme cannot be loaded
    pub fn from_source(source: &ThemeSource) -> Self {
        match source {
            ThemeSource::Dark => Self::dark(),
            ThemeSource::Light => Self::light(),
            ThemeSource::Custom(path) => match Self::load_custom(Path::new(path)) {
                Ok(theme) => theme,
                Err(e) => {
                    log::warn!("Failed to load theme {}: {}", path, e);
                    Self::light()
                }
            },
        }
    }

    /// Load a theme from a JSON file
    pub fn load_custom(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        let theme: Theme =
            serde_json::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        if theme.name.trim().is_empty() {
            return Err(ConfigError::Invalid("theme name is empty".to_string()));
        }
        Ok(theme)
    }

    /// Directory holding user themes
    pub fn custom_themes_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("gridedit").join("themes"))
    }
}
