//! Error types for lq configuration.

use std::io;
use std::path::PathBuf;

use lq_query::UnknownOperator;
use thiserror::Error;
use toml::{de, ser};

/// Errors that can occur when loading or processing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to parse TOML configuration.
    #[error("failed to parse config file {path}: {source}")]
    ParseToml {
        /// Path to the file that could not be parsed.
        path: PathBuf,
        /// Underlying TOML parse error.
        source: de::Error,
    },

    /// `filters.operator` is neither `AND` nor `OR`.
    #[error("invalid filters.operator in {path}: {source}")]
    InvalidOperator {
        /// Path to the file defining the operator.
        path: PathBuf,
        /// The rejected value.
        source: UnknownOperator,
    },

    /// Failed to render settings as TOML.
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] ser::Error),
}
