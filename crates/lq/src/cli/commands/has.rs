//! Implementation of `lq has`.

use std::process::ExitCode;

use super::shared::{exit_codes, parse_or_report};
use crate::cli::{args::HasCommand, context::CommandContext};

/// Exits with [`exit_codes::FOUND`] if the filter is present. Prints nothing.
pub fn run(ctx: &CommandContext, cmd: &HasCommand) -> ExitCode {
    let Some(query) = parse_or_report(&ctx.painter, &cmd.filter.query) else {
        return exit_codes::invalid();
    };

    let modifier = cmd.modifier.resolve(&ctx.config.filters);
    if query.has_filter(&cmd.filter.field, &cmd.filter.value, modifier) {
        exit_codes::FOUND
    } else {
        exit_codes::NOT_FOUND
    }
}
