//! Implementation of `lq config`.

use std::process::ExitCode;

use crate::cli::context::CommandContext;

/// Shows effective configuration settings.
pub fn run(ctx: &CommandContext) -> ExitCode {
    let config = &ctx.config;
    let toml = match config.settings_to_toml() {
        Ok(toml) => toml,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    for source in &config.sources {
        println!("{}", ctx.painter.dim(&format!("# from {}", source.display())));
    }
    print!("{}", ctx.highlight(&toml, "toml"));
    ExitCode::SUCCESS
}
