//! Configuration merging.
//!
//! Merges multiple `RawConfig` files into a single resolved `Config`, applying precedence
//! rules and validating values that TOML alone cannot check.

use std::path::{Path, PathBuf};

use lq_query::BoolOperator;

use crate::{
    Config, ConfigError, FilterSettings, OutputSettings,
    parse::{RawConfig, RawFilterSettings, RawOutputSettings},
};

/// A parsed config file with its source path.
#[derive(Debug)]
pub struct ParsedConfig {
    /// Path to the config file.
    pub path: PathBuf,
    /// Parsed raw configuration.
    pub config: RawConfig,
}

/// Merges multiple configuration files into a single resolved `Config`.
///
/// Configs should be provided in precedence order: highest precedence first (closest to CWD),
/// lowest precedence last (global config). For every setting the first defined value wins.
pub fn merge_configs(configs: &[ParsedConfig]) -> Result<Config, ConfigError> {
    if configs.is_empty() {
        return Ok(Config::default());
    }

    let filters = merge_filter_settings(configs)?;
    let output = merge_output_settings(configs);
    let sources = configs.iter().map(|c| c.path.clone()).collect();

    Ok(Config {
        filters,
        output,
        sources,
    })
}

/// Merges filter settings, validating each operator that is written down.
fn merge_filter_settings(configs: &[ParsedConfig]) -> Result<FilterSettings, ConfigError> {
    let mut result = FilterSettings::default();

    // Lowest precedence first so closer files overwrite.
    for parsed in configs.iter().rev() {
        if let Some(ref filters) = parsed.config.filters {
            apply_raw_filters(&mut result, filters, &parsed.path)?;
        }
    }

    Ok(result)
}

/// Applies raw filter settings to result, overwriting any present values.
fn apply_raw_filters(
    result: &mut FilterSettings,
    raw: &RawFilterSettings,
    path: &Path,
) -> Result<(), ConfigError> {
    if let Some(ref v) = raw.operator {
        let operator = v
            .parse::<BoolOperator>()
            .map_err(|source| ConfigError::InvalidOperator {
                path: path.to_path_buf(),
                source,
            })?;
        result.operator = Some(operator);
    }
    if let Some(v) = raw.negate {
        result.negate = v;
    }
    Ok(())
}

/// Merges output settings.
fn merge_output_settings(configs: &[ParsedConfig]) -> OutputSettings {
    let mut result = OutputSettings::default();

    for parsed in configs.iter().rev() {
        if let Some(ref output) = parsed.config.output {
            apply_raw_output(&mut result, output);
        }
    }

    result
}

/// Applies raw output settings to result.
fn apply_raw_output(result: &mut OutputSettings, raw: &RawOutputSettings) {
    if let Some(v) = raw.json {
        result.json = v;
    }
    if let Some(v) = raw.color {
        result.color = v;
    }
}
