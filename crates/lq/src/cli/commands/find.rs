//! Implementation of `lq find`.

use std::process::ExitCode;

use super::shared::{exit_codes, parse_or_report, to_json};
use crate::cli::{args::FindCommand, context::CommandContext};

/// Prints the first term matching the filter.
pub fn run(ctx: &CommandContext, cmd: &FindCommand) -> ExitCode {
    let Some(query) = parse_or_report(&ctx.painter, &cmd.filter.query) else {
        return exit_codes::invalid();
    };

    let modifier = cmd.modifier.resolve(&ctx.config.filters);
    let Some(term) = query.find_filter(&cmd.filter.field, &cmd.filter.value, modifier) else {
        log::debug!(
            "{modifier}{}:{} not found",
            cmd.filter.field,
            cmd.filter.value
        );
        return exit_codes::NOT_FOUND;
    };

    if ctx.json(cmd.output.json) {
        match to_json(term) {
            Ok(json) => println!("{}", ctx.highlight(&json, "json").trim_end()),
            Err(e) => {
                eprintln!("error: failed to serialize term: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        println!("{}", term.to_query_string());
    }
    exit_codes::FOUND
}
