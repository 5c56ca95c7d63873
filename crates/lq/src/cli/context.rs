//! Shared context for running CLI commands.

use std::{
    env,
    io::{self, IsTerminal},
    path::{Path, PathBuf},
    process::ExitCode,
};

use lq_config::Config;
use lq_highlight::{Highlighter, Painter};

/// Command execution context built once per CLI invocation.
pub struct CommandContext {
    /// Current working directory.
    pub cwd: PathBuf,
    /// Loaded configuration (may be default if no config files found).
    pub config: Config,
    /// Terminal styling, disabled for pipes, `--no-color` and `output.color = false`.
    pub painter: Painter,
}

impl CommandContext {
    /// Loads the current directory and configuration.
    pub fn load(no_color: bool) -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        let config = load_config_or_failure(&cwd)?;
        let painter = Painter::new(color_enabled(&config, no_color));
        Ok(Self {
            cwd,
            config,
            painter,
        })
    }

    /// Loads only the current directory, skipping configuration parsing.
    ///
    /// Used for `init`, which should work even when an existing config file is invalid.
    pub fn load_cwd_only(no_color: bool) -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        let config = Config::default();
        let painter = Painter::new(color_enabled(&config, no_color));
        Ok(Self {
            cwd,
            config,
            painter,
        })
    }

    /// Whether JSON output is requested, either by flag or by `output.json`.
    pub fn json(&self, flag: bool) -> bool {
        flag || self.config.output.json
    }

    /// Syntax-highlights TOML or JSON when color is on.
    pub fn highlight(&self, content: &str, syntax: &str) -> String {
        if self.painter.enabled() {
            Highlighter::new().highlight(content, syntax)
        } else {
            content.to_string()
        }
    }
}

/// Color is used only when every switch allows it and stdout is a terminal.
fn color_enabled(config: &Config, no_color: bool) -> bool {
    !no_color && config.output.color && io::stdout().is_terminal()
}

/// Returns the current working directory or exits with a consistent error.
fn current_dir_or_failure() -> Result<PathBuf, ExitCode> {
    env::current_dir().map_err(|e| {
        eprintln!("error: could not determine current directory: {e}");
        ExitCode::FAILURE
    })
}

/// Loads configuration from the provided directory or exits with an error.
fn load_config_or_failure(cwd: &Path) -> Result<Config, ExitCode> {
    Config::load(cwd).map_err(|e| {
        eprintln!("error: failed to load configuration: {e}");
        ExitCode::FAILURE
    })
}
