//! Implementation of `lq check`.

use std::process::ExitCode;

use super::shared::parse_or_report;
use crate::cli::{args::CheckCommand, context::CommandContext};

/// Checks that every query parses.
pub fn run(ctx: &CommandContext, cmd: &CheckCommand) -> ExitCode {
    let mut failures = 0;

    for query in &cmd.queries {
        if parse_or_report(&ctx.painter, query).is_some() {
            println!("{} {query}", ctx.painter.success("ok"));
        } else {
            failures += 1;
        }
    }

    if failures == 0 {
        return ExitCode::SUCCESS;
    }

    if cmd.queries.len() > 1 {
        eprintln!("{failures} of {} queries failed to parse", cmd.queries.len());
    }
    ExitCode::FAILURE
}
