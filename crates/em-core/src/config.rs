//! Configuration structures for the entity model engine.
//!
//! - [`EngineConfig`] - derivation settings (nesting bound, defaults, formats)
//! - [`Config`] - root configuration loaded by the CLI
//!
//! All configuration types implement [`Default`] and deserialize with
//! `serde(default)`, so a configuration file only needs the keys it changes.

use std::fs;

use camino::Utf8Path;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::locale::Locale;
use crate::types::SelectMode;

/// Settings that drive model derivation.
///
/// # Examples
///
/// ```
/// use em_core::EngineConfig;
///
/// let config = EngineConfig::default();
/// assert_eq!(config.max_nesting_depth, 3);
/// assert_eq!(config.default_group, "default");
/// assert!(config.is_skipped("version"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum number of `.` separators in a nested model reference.
    ///
    /// Relationships that would produce a deeper reference keep their kind and
    /// type but get no nested model.
    pub max_nesting_depth: usize,

    /// Property names that are never exposed as attributes.
    pub skipped_properties: Vec<String>,

    /// Name of the group collecting attributes no group mentions.
    pub default_group: String,

    /// Locale used for overrides resolved at build time.
    pub default_locale: Locale,

    /// Whether every word of a derived display name is capitalized
    /// (`Order Date`) or only the first one (`Order date`).
    pub capitalize_words: bool,

    /// Default precision for decimal and floating point attributes.
    pub decimal_precision: u32,

    /// Display format for date-only attributes.
    pub date_format: String,

    /// Display format for time attributes.
    pub time_format: String,

    /// Display format for timestamp attributes.
    pub timestamp_format: String,

    /// Default rendering of a `true` boolean value.
    pub true_representation: String,

    /// Default rendering of a `false` boolean value.
    pub false_representation: String,

    /// Selection mode used when nothing overrides it.
    pub default_select_mode: SelectMode,
}

impl EngineConfig {
    /// Returns `true` if the property with this name is on the deny-list.
    #[must_use]
    pub fn is_skipped(&self, property: &str) -> bool {
        self.skipped_properties.iter().any(|p| p == property)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_nesting_depth: 3,
            skipped_properties: vec!["class".to_owned(), "version".to_owned()],
            default_group: "default".to_owned(),
            default_locale: Locale::new("en"),
            capitalize_words: true,
            decimal_precision: 2,
            date_format: "dd-MM-yyyy".to_owned(),
            time_format: "HH:mm:ss".to_owned(),
            timestamp_format: "dd-MM-yyyy HH:mm:ss".to_owned(),
            true_representation: "true".to_owned(),
            false_representation: "false".to_owned(),
            default_select_mode: SelectMode::Combo,
        }
    }
}

/// Root configuration for the entity model tooling.
///
/// # Examples
///
/// ```
/// use em_core::Config;
///
/// let config: Config = serde_json::from_str(r#"{"engine": {"max_nesting_depth": 1}}"#)?;
/// assert_eq!(config.engine.max_nesting_depth, 1);
/// assert_eq!(config.engine.default_group, "default");
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Model derivation settings.
    pub engine: EngineConfig,
}

impl Config {
    /// Loads a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingFile`] if the file does not exist, and
    /// [`ConfigError::Io`] / [`ConfigError::Parse`] if it cannot be read or
    /// parsed.
    pub fn from_json_file(path: &Utf8Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::MissingFile(path.to_owned()));
        }
        let contents = fs::read_to_string(path.as_std_path())?;
        Ok(serde_json::from_str(&contents)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_config_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.max_nesting_depth, 3);
        assert_eq!(config.skipped_properties, vec!["class", "version"]);
        assert_eq!(config.default_locale.tag(), "en");
        assert!(config.capitalize_words);
        assert_eq!(config.decimal_precision, 2);
        assert_eq!(config.default_select_mode, SelectMode::Combo);
    }

    #[test]
    fn test_is_skipped() {
        let config = EngineConfig::default();
        assert!(config.is_skipped("class"));
        assert!(!config.is_skipped("name"));
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_config_deserialize_with_missing_fields() {
        let json = r#"{"engine": {"default_locale": "de_CH", "capitalize_words": false}}"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.engine.default_locale.tag(), "de-CH");
        assert!(!config.engine.capitalize_words);
        assert_eq!(config.engine.date_format, "dd-MM-yyyy");
    }

    #[test]
    fn test_from_missing_file() {
        let result = Config::from_json_file(Utf8Path::new("/nonexistent/em-config.json"));
        assert!(matches!(result, Err(ConfigError::MissingFile(_))));
    }
}
