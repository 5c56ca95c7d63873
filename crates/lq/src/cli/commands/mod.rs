//! Command implementations and dispatch.

pub mod adhoc;
pub mod add;
pub mod check;
pub mod concat;
pub mod config;
pub mod escape;
pub mod find;
pub mod format;
pub mod has;
pub mod init;
pub mod parse;
pub mod remove;
mod shared;
pub mod terms;

use std::process::ExitCode;

use super::{args::Commands, context::CommandContext};

/// Dispatches to the selected subcommand.
pub fn run(command: Commands, ctx: &CommandContext) -> ExitCode {
    match command {
        Commands::Parse(cmd) => parse::run(ctx, &cmd),
        Commands::Check(cmd) => check::run(ctx, &cmd),
        Commands::Find(cmd) => find::run(ctx, &cmd),
        Commands::Has(cmd) => has::run(ctx, &cmd),
        Commands::Add(cmd) => add::run(ctx, &cmd),
        Commands::Remove(cmd) => remove::run(ctx, &cmd),
        Commands::Terms(cmd) => terms::run(ctx, &cmd),
        Commands::Escape(cmd) => escape::run(&cmd),
        Commands::Concat(cmd) => concat::run(&cmd),
        Commands::AdHoc(cmd) => adhoc::run(&cmd),
        Commands::Format(cmd) => format::run(&cmd),
        Commands::Init(cmd) => init::run(ctx, &cmd),
        Commands::Config => config::run(ctx),
    }
}
