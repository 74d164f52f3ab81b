//! Copier configuration
//!
//! Settings come from defaults, a JSON or YAML file, or the builder. The
//! defaults reproduce the classic behaviour: US medium date-time style for
//! formatted dates, untrimmed integer parsing, and trace output for every
//! skipped property.

use crate::error::{CopyError, Result};
use chrono::format::{Fixed, Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default pattern for date-times copied into text properties
pub const DEFAULT_DATETIME_FORMAT: &str = "%b %-d, %Y %-I:%M:%S %p";

/// Settings that shape how values are coerced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CopyConfig {
    /// strftime pattern used when a date-time lands in a text property
    pub datetime_format: String,

    /// Trim whitespace around integer and decimal text before parsing
    pub trim_numeric_text: bool,

    /// Emit a trace record for every property left untouched
    pub log_skipped: bool,
}

impl Default for CopyConfig {
    fn default() -> Self {
        Self {
            datetime_format: DEFAULT_DATETIME_FORMAT.to_string(),
            trim_numeric_text: false,
            log_skipped: true,
        }
    }
}

impl CopyConfig {
    /// Load configuration from a file
    ///
    /// `.yaml`/`.yml` files are read as YAML, anything else as JSON. The
    /// loaded configuration is validated before it is returned.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        let config: CopyConfig = if path.extension().and_then(|s| s.to_str()) == Some("yaml")
            || path.extension().and_then(|s| s.to_str()) == Some("yml") {
            serde_yaml::from_str(&content)?
        } else {
            serde_json::from_str(&content)?
        };

        config.validate()?;
        Ok(config)
    }

    /// Load from `file` when given, otherwise use the defaults
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        match file {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Reject settings that would fail at copy time
    ///
    /// Date-times are rendered without an offset, so offset and zone
    /// specifiers (`%z`, `%:z`, `%Z`, `%+`, ...) are rejected along with
    /// malformed ones.
    pub fn validate(&self) -> Result<()> {
        for item in StrftimeItems::new(&self.datetime_format) {
            let problem = match item {
                Item::Error => "is malformed",
                Item::Fixed(ref fixed) if needs_offset(fixed) => "needs a time zone offset",
                _ => continue,
            };
            return Err(CopyError::Configuration {
                message: format!("datetime_format '{}' {}", self.datetime_format, problem),
                source: None,
            });
        }
        Ok(())
    }

    /// Merge with another config (other takes precedence)
    ///
    /// Every field of `other` wins, including ones left at their default.
    pub fn merge(&mut self, other: CopyConfig) {
        self.datetime_format = other.datetime_format;
        self.trim_numeric_text = other.trim_numeric_text;
        self.log_skipped = other.log_skipped;
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = if path.extension().and_then(|s| s.to_str()) == Some("yaml")
            || path.extension().and_then(|s| s.to_str()) == Some("yml") {
            serde_yaml::to_string(self)?
        } else {
            serde_json::to_string_pretty(self)?
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

fn needs_offset(fixed: &Fixed) -> bool {
    matches!(
        fixed,
        Fixed::TimezoneName
            | Fixed::TimezoneOffset
            | Fixed::TimezoneOffsetColon
            | Fixed::TimezoneOffsetDoubleColon
            | Fixed::TimezoneOffsetTripleColon
            | Fixed::TimezoneOffsetColonZ
            | Fixed::TimezoneOffsetZ
            | Fixed::RFC2822
            | Fixed::RFC3339
    )
}

/// Builder for creating configurations programmatically
pub struct CopyConfigBuilder {
    config: CopyConfig,
}

impl CopyConfigBuilder {
    /// Create a new config builder
    pub fn new() -> Self {
        Self {
            config: CopyConfig::default(),
        }
    }

    pub fn datetime_format(mut self, format: impl Into<String>) -> Self {
        self.config.datetime_format = format.into();
        self
    }

    pub fn trim_numeric_text(mut self, trim: bool) -> Self {
        self.config.trim_numeric_text = trim;
        self
    }

    pub fn log_skipped(mut self, log: bool) -> Self {
        self.config.log_skipped = log;
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<CopyConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for CopyConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{Builder, TempDir};

    #[test]
    fn test_defaults() {
        let config = CopyConfig::default();
        assert_eq!(config.datetime_format, DEFAULT_DATETIME_FORMAT);
        assert!(!config.trim_numeric_text);
        assert!(config.log_skipped);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_rejects_bad_format() {
        let err = CopyConfigBuilder::new()
            .datetime_format("%Q %Y")
            .build()
            .unwrap_err();
        assert!(matches!(err, CopyError::Configuration { .. }));
    }

    #[test]
    fn test_builder_rejects_offset_specifiers() {
        for format in ["%Y-%m-%d %z", "%H:%M %:z", "%d %b %Z", "%+"] {
            let err = CopyConfigBuilder::new()
                .datetime_format(format)
                .build()
                .unwrap_err();
            assert!(err.to_string().contains("time zone offset"), "{format}: {err}");
        }
    }

    #[test]
    fn test_from_json_file() {
        let mut file = Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"datetime_format": "%Y-%m-%d", "trim_numeric_text": true}}"#).unwrap();

        let config = CopyConfig::from_file(file.path()).unwrap();
        assert_eq!(config.datetime_format, "%Y-%m-%d");
        assert!(config.trim_numeric_text);
        // Missing keys fall back to defaults
        assert!(config.log_skipped);
    }

    #[test]
    fn test_from_yaml_file() {
        let mut file = Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "log_skipped: false").unwrap();

        let config = CopyConfig::from_file(file.path()).unwrap();
        assert!(!config.log_skipped);
        assert_eq!(config.datetime_format, DEFAULT_DATETIME_FORMAT);
    }

    #[test]
    fn test_from_file_validates() {
        let mut file = Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"datetime_format": "%Q"}}"#).unwrap();

        assert!(CopyConfig::from_file(file.path()).is_err());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = CopyConfig::from_file(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, CopyError::Io { .. }));
    }

    #[test]
    fn test_load_with_file_defaults() {
        assert_eq!(CopyConfig::load_with_file(None).unwrap(), CopyConfig::default());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("copy.yaml");
        let config = CopyConfigBuilder::new()
            .datetime_format("%H:%M")
            .log_skipped(false)
            .build()
            .unwrap();

        config.save(&path).unwrap();
        assert_eq!(CopyConfig::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_merge() {
        let mut base = CopyConfig::default();
        base.merge(CopyConfig {
            datetime_format: "%F".to_string(),
            trim_numeric_text: true,
            log_skipped: true,
        });
        assert_eq!(base.datetime_format, "%F");
        assert!(base.trim_numeric_text);

        // An explicit default pattern restores the default
        base.merge(CopyConfig::default());
        assert_eq!(base.datetime_format, DEFAULT_DATETIME_FORMAT);
        assert!(!base.trim_numeric_text);
    }
}
