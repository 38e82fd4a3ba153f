//! Process-wide wallboard defaults.
//!
//! # Responsibility
//! - Provide the fallback values used when a document omits a directive.
//! - Load overrides from a TOML file for hosts that want different defaults.
//!
//! # Invariants
//! - `image_width` and `table_columns` are positive.
//! - Progress characters are exactly one character each.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

pub const DEFAULT_IMAGE_WIDTH: u32 = 200;
pub const DEFAULT_TABLE_COLUMNS: u32 = 3;
pub const DEFAULT_PROGRESS_COMPLETION_CHAR: &str = "★";
pub const DEFAULT_PROGRESS_REMAINING_CHAR: &str = "☆";
pub const DEFAULT_NOTE_URL_BASE: &str = "https://www.amplenote.com/notes/";

/// Error raised while loading or validating defaults.
#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: String,
        source: std::io::Error,
    },
    Parse(toml::de::Error),
    InvalidValue {
        key: &'static str,
        message: String,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "failed to read defaults `{path}`: {source}"),
            Self::Parse(err) => write!(f, "failed to parse defaults: {err}"),
            Self::InvalidValue { key, message } => write!(f, "invalid `{key}`: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::InvalidValue { .. } => None,
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        Self::Parse(value)
    }
}

/// Fallback values for directives a document leaves out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WallboardDefaults {
    pub image_width: u32,
    pub table_columns: u32,
    pub progress_completion_char: String,
    pub progress_remaining_char: String,
    pub note_url_base: String,
}

impl Default for WallboardDefaults {
    fn default() -> Self {
        Self {
            image_width: DEFAULT_IMAGE_WIDTH,
            table_columns: DEFAULT_TABLE_COLUMNS,
            progress_completion_char: DEFAULT_PROGRESS_COMPLETION_CHAR.to_string(),
            progress_remaining_char: DEFAULT_PROGRESS_REMAINING_CHAR.to_string(),
            note_url_base: DEFAULT_NOTE_URL_BASE.to_string(),
        }
    }
}

impl WallboardDefaults {
    /// Parses defaults from TOML text; absent keys keep built-in values.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let defaults: Self = toml::from_str(text)?;
        defaults.validate()?;
        Ok(defaults)
    }

    /// Reads and parses a TOML defaults file.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.image_width == 0 {
            return Err(ConfigError::InvalidValue {
                key: "image_width",
                message: "must be positive".to_string(),
            });
        }
        if self.table_columns == 0 {
            return Err(ConfigError::InvalidValue {
                key: "table_columns",
                message: "must be positive".to_string(),
            });
        }
        for (key, value) in [
            ("progress_completion_char", &self.progress_completion_char),
            ("progress_remaining_char", &self.progress_remaining_char),
        ] {
            if value.chars().count() != 1 {
                return Err(ConfigError::InvalidValue {
                    key,
                    message: format!("expected one character, got `{value}`"),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, WallboardDefaults};
    use std::io::Write;

    #[test]
    fn partial_toml_keeps_builtin_values() {
        let defaults = WallboardDefaults::from_toml_str("table_columns = 4\n").unwrap();
        assert_eq!(defaults.table_columns, 4);
        assert_eq!(defaults.image_width, 200);
        assert_eq!(defaults.progress_completion_char, "★");
    }

    #[test]
    fn zero_columns_are_rejected() {
        let err = WallboardDefaults::from_toml_str("table_columns = 0\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                key: "table_columns",
                ..
            }
        ));
    }

    #[test]
    fn multi_char_progress_marker_is_rejected() {
        let err =
            WallboardDefaults::from_toml_str("progress_remaining_char = \"--\"\n").unwrap_err();
        assert!(err.to_string().contains("progress_remaining_char"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = WallboardDefaults::from_toml_str("colums = 2\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn load_from_path_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "image_width = 320").unwrap();
        let defaults = WallboardDefaults::load_from_path(file.path()).unwrap();
        assert_eq!(defaults.image_width, 320);
    }

    #[test]
    fn load_from_missing_path_reports_io_error() {
        let err = WallboardDefaults::load_from_path("/nonexistent/wallboard.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
