//! Configuration system for lq.
//!
//! lq uses TOML configuration files named `.lq.toml`. Configuration is resolved by walking up
//! the directory tree from the current working directory, reading any `.lq.toml` files found,
//! then loading `~/.lq.toml` as the global config with lowest precedence. `lq init` writes a
//! commented starter file for either [`ConfigScope`].
//!
//! ```toml
//! [filters]
//! operator = "AND"   # join used when adding filters; omit for an implicit join
//! negate = false     # add exclusion filters by default
//!
//! [output]
//! json = false
//! color = true
//! ```

#![warn(missing_docs)]

mod discovery;
mod error;
mod merge;
mod parse;
mod scope;
#[cfg(test)]
mod test_support;

use std::path::{Path, PathBuf};

pub use discovery::load_config_chain;
pub use error::ConfigError;
use lq_query::{BoolOperator, Modifier};
pub use merge::{ParsedConfig, merge_configs};
pub use parse::{
    RawConfig, RawFilterSettings, RawOutputSettings, parse_config_file, parse_config_str,
};
pub use scope::{CONFIG_FILENAME, ConfigScope, global_config_path};
use serde::Serialize;

/// Top-level merged configuration for lq.
///
/// This represents the fully resolved configuration after merging all discovered `.lq.toml`
/// files according to precedence rules.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Filter editing defaults.
    pub filters: FilterSettings,
    /// Output formatting.
    pub output: OutputSettings,
    /// Files the settings came from, highest precedence first.
    pub sources: Vec<PathBuf>,
}

impl Config {
    /// Loads configuration by discovering and merging all relevant `.lq.toml` files.
    ///
    /// Returns `Ok(Config::default())` if no configuration files are found.
    pub fn load(cwd: &Path) -> Result<Self, ConfigError> {
        merge_configs(&load_config_chain(cwd)?)
    }

    /// Loads configuration from a specific list of config file paths.
    ///
    /// Files should be provided in precedence order: highest precedence first.
    pub fn load_from_files(files: &[PathBuf]) -> Result<Self, ConfigError> {
        let parsed: Vec<ParsedConfig> = files
            .iter()
            .map(|path| {
                let config = parse_config_file(path)?;
                Ok(ParsedConfig {
                    path: path.clone(),
                    config,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        merge_configs(&parsed)
    }

    /// Serializes the effective settings to TOML format, in the layout of a `.lq.toml` file.
    pub fn settings_to_toml(&self) -> Result<String, ConfigError> {
        let serializable = SerializableSettings {
            filters: &self.filters,
            output: &self.output,
        };
        Ok(toml::to_string_pretty(&serializable)?)
    }
}

/// Defaults for `lq add` and friends.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FilterSettings {
    /// Operator joining an added filter to the query. `None` joins implicitly.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<BoolOperator>,
    /// Add exclusion (`-field:"value"`) filters unless told otherwise.
    pub negate: bool,
}

impl FilterSettings {
    /// The modifier a filter gets when the command line does not override it.
    pub fn default_modifier(&self) -> Modifier {
        if self.negate {
            Modifier::Exclude
        } else {
            Modifier::Include
        }
    }
}

/// Output formatting settings.
#[derive(Debug, Clone, Serialize)]
pub struct OutputSettings {
    /// Print JSON instead of text where supported.
    pub json: bool,
    /// Colorize terminal output.
    pub color: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            json: false,
            color: true,
        }
    }
}

/// Borrowed view of the settings for TOML output.
#[derive(Serialize)]
struct SerializableSettings<'a> {
    /// Filter settings.
    filters: &'a FilterSettings,
    /// Output settings.
    output: &'a OutputSettings,
}
