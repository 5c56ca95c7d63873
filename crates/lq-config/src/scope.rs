//! The two places an lq configuration file can live, and the starter file `lq init` writes
//! for each.

use std::path::{Path, PathBuf};

use directories::BaseDirs;

/// The configuration filename.
pub const CONFIG_FILENAME: &str = ".lq.toml";

/// Starter settings for a project `.lq.toml` (valid TOML).
const LOCAL_TEMPLATE: &str = include_str!("../templates/config.toml");

/// Starter settings for `~/.lq.toml` (valid TOML).
const GLOBAL_TEMPLATE: &str = include_str!("../templates/config-global.toml");

/// Where a configuration file applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigScope {
    /// A `.lq.toml` in a project directory, covering it and everything below.
    Local,
    /// `~/.lq.toml`, covering every directory with the lowest precedence.
    Global,
}

impl ConfigScope {
    /// The scope `lq init` writes: global when asked for, or when run from the home directory.
    pub fn for_init(cwd: &Path, global: bool) -> Self {
        if global || home_dir().is_some_and(|home| home == cwd) {
            Self::Global
        } else {
            Self::Local
        }
    }

    /// The file this scope stands for when lq runs in `cwd`.
    ///
    /// `None` for the global scope when the home directory is unknown.
    pub fn config_path(self, cwd: &Path) -> Option<PathBuf> {
        match self {
            Self::Local => Some(cwd.join(CONFIG_FILENAME)),
            Self::Global => global_config_path(),
        }
    }

    /// Starter file for this scope with every setting commented out, so loading it changes
    /// nothing until a line is enabled.
    pub fn template(self) -> String {
        disable_settings(match self {
            Self::Local => LOCAL_TEMPLATE,
            Self::Global => GLOBAL_TEMPLATE,
        })
    }
}

/// Returns `~/.lq.toml`, or `None` if the home directory cannot be determined.
pub fn global_config_path() -> Option<PathBuf> {
    home_dir().map(|home| home.join(CONFIG_FILENAME))
}

/// The current user's home directory.
fn home_dir() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
}

/// Puts `# ` in front of settings and section headers. Prose comments and blank lines stay.
fn disable_settings(template: &str) -> String {
    template
        .lines()
        .map(|line| {
            if line.trim().is_empty() || line.starts_with('#') {
                format!("{line}\n")
            } else {
                format!("# {line}\n")
            }
        })
        .collect()
}
