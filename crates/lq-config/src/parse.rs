//! Configuration file parsing.
//!
//! Parses individual `.lq.toml` files into intermediate `RawConfig` structures
//! that preserve the optional nature of all fields before merging.

use std::{fs, path::Path};

use serde::Deserialize;
#[cfg(test)]
use toml::de::Error as TomlError;

use crate::ConfigError;

/// Raw configuration as parsed directly from a TOML file.
///
/// All fields are optional to support partial configs that will be merged.
/// This mirrors the TOML schema exactly.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// When true, stop discovery here - ignore parent and global configs.
    pub root: Option<bool>,
    /// Filter editing section.
    pub filters: Option<RawFilterSettings>,
    /// Output section.
    pub output: Option<RawOutputSettings>,
}

/// Raw filter settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawFilterSettings {
    /// Join operator for added filters, as written (`"AND"` or `"OR"`).
    pub operator: Option<String>,
    /// Whether added filters are negated by default.
    pub negate: Option<bool>,
}

/// Raw output settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawOutputSettings {
    /// Print JSON instead of text where supported.
    pub json: Option<bool>,
    /// Colorize terminal output.
    pub color: Option<bool>,
}

/// Parses a configuration file from disk.
///
/// Returns a `RawConfig` with all fields as optionals, ready for merging.
pub fn parse_config_file(path: &Path) -> Result<RawConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    parse_config_str(&contents, path)
}

/// Parses configuration from a TOML string.
///
/// The `path` parameter is used for error reporting.
pub fn parse_config_str(contents: &str, path: &Path) -> Result<RawConfig, ConfigError> {
    toml::from_str(contents).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses configuration from a TOML string without path context.
///
/// Useful for validating template content (tests only).
#[cfg(test)]
pub fn parse_config(contents: &str) -> Result<RawConfig, TomlError> {
    toml::from_str(contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_config() {
        let config = parse_config_str("", Path::new("test.toml")).unwrap();
        assert!(config.root.is_none());
        assert!(config.filters.is_none());
        assert!(config.output.is_none());
    }

    #[test]
    fn test_parse_filters() {
        let toml = r#"
[filters]
operator = "OR"
negate = true
"#;
        let config = parse_config_str(toml, Path::new("test.toml")).unwrap();
        let filters = config.filters.unwrap();
        assert_eq!(filters.operator.as_deref(), Some("OR"));
        assert_eq!(filters.negate, Some(true));
    }

    #[test]
    fn test_parse_partial_output() {
        let toml = r#"
[output]
json = true
"#;
        let config = parse_config_str(toml, Path::new("test.toml")).unwrap();
        let output = config.output.unwrap();
        assert_eq!(output.json, Some(true));
        assert!(output.color.is_none());
    }

    #[test]
    fn test_parse_root_flag() {
        let config = parse_config_str("root = true\n", Path::new("test.toml")).unwrap();
        assert_eq!(config.root, Some(true));
    }

    #[test]
    fn test_parse_invalid_toml_reports_path() {
        let err = parse_config_str("[filters\n", Path::new("/tmp/bad.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ParseToml { .. }));
        assert!(err.to_string().contains("/tmp/bad.toml"));
    }

    #[test]
    fn test_parse_wrong_type() {
        let result = parse_config_str("[output]\njson = \"yes\"\n", Path::new("test.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_config_file_missing() {
        let err = parse_config_file(Path::new("/nonexistent/.lq.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadFile { .. }));
    }
}
