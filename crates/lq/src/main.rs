//! Command-line interface for the `lq` Lucene query tool.

use std::{env, process::ExitCode};

use log::LevelFilter;
use lq::cli::{CommandContext, args::parse_cli, commands};

fn main() -> ExitCode {
    let cli = parse_cli();
    init_logging(cli.verbose);

    let ctx = if cli.command.needs_config() {
        CommandContext::load(cli.no_color)
    } else {
        CommandContext::load_cwd_only(cli.no_color)
    };

    match ctx {
        Ok(ctx) => commands::run(cli.command, &ctx),
        Err(code) => code,
    }
}

/// Installs the logger. `RUST_LOG` wins; otherwise `-v` and `-vv` raise the level.
fn init_logging(verbose: u8) {
    let mut builder = env_logger::Builder::from_default_env();
    if env::var_os("RUST_LOG").is_none() {
        let level = match verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        };
        builder.filter_level(level);
    }
    builder.format_timestamp(None).init();
}
