//! Implementation of `lq init`.

use std::{fs, process::ExitCode};

use lq_config::ConfigScope;

use crate::cli::{args::InitCommand, context::CommandContext};

/// Initializes a `.lq.toml` configuration file.
pub fn run(ctx: &CommandContext, cmd: &InitCommand) -> ExitCode {
    let scope = ConfigScope::for_init(&ctx.cwd, cmd.global);
    let Some(config_path) = scope.config_path(&ctx.cwd) else {
        eprintln!("error: could not determine home directory");
        return ExitCode::FAILURE;
    };

    if config_path.exists() && !cmd.force {
        eprintln!(
            "error: configuration file already exists: {}",
            config_path.display()
        );
        eprintln!("use --force to overwrite");
        return ExitCode::FAILURE;
    }

    let template = scope.template();

    if let Err(e) = fs::write(&config_path, &template) {
        eprintln!("error: failed to write {}: {e}", config_path.display());
        return ExitCode::FAILURE;
    }

    println!("Created {}", config_path.display());
    println!();
    println!("{}", ctx.painter.header("Configuration written:"));
    for line in ctx.highlight(&template, "toml").lines() {
        println!("  {line}");
    }

    ExitCode::SUCCESS
}
