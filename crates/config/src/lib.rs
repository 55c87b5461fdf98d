// Configuration loading

pub mod settings;
pub mod theme;

pub use settings::{EditorSettings, PersistFailurePolicy, RowMode};
pub use theme::{Theme, ThemeSource};

use std::fmt;

/// Errors raised while reading or writing configuration files.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// TOML / JSON parse or deserialization error.
    Parse(String),
    /// Filesystem error.
    Io(String),
    /// Parsed successfully but the values are inconsistent.
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "config parse error: {msg}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
            Self::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}
