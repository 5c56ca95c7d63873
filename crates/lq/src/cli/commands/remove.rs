//! Implementation of `lq remove`.

use std::process::ExitCode;

use lq_query::LuceneQuery;

use super::shared::warn_if_invalid;
use crate::cli::{args::RemoveCommand, context::CommandContext};

/// Removes the first matching filter and prints the resulting query.
///
/// A missing filter is not an error: the query is printed unchanged with a warning.
pub fn run(ctx: &CommandContext, cmd: &RemoveCommand) -> ExitCode {
    let query = LuceneQuery::parse(&cmd.filter.query);
    warn_if_invalid(&ctx.painter, &query);

    let modifier = cmd.modifier.resolve(&ctx.config.filters);
    if query.is_valid() && !query.has_filter(&cmd.filter.field, &cmd.filter.value, modifier) {
        eprintln!(
            "{} {modifier}{}:\"{}\" not found; query unchanged",
            ctx.painter.warning("warning:"),
            cmd.filter.field,
            cmd.filter.value
        );
    }

    let updated = query.remove_filter(&cmd.filter.field, &cmd.filter.value, modifier);
    println!("{updated}");
    ExitCode::SUCCESS
}
