//! Implementation of `lq add`.

use std::process::ExitCode;

use lq_query::LuceneQuery;

use super::shared::warn_if_invalid;
use crate::cli::{args::AddCommand, context::CommandContext};

/// Adds a filter and prints the resulting query.
pub fn run(ctx: &CommandContext, cmd: &AddCommand) -> ExitCode {
    let query = LuceneQuery::parse(&cmd.filter.query);
    warn_if_invalid(&ctx.painter, &query);

    let modifier = cmd.modifier.resolve(&ctx.config.filters);
    let operator = cmd.operator.or(ctx.config.filters.operator);

    let updated =
        query.add_filter_with_operator(&cmd.filter.field, &cmd.filter.value, modifier, operator);

    if let Some(err) = updated.parse_error() {
        eprintln!(
            "{} result does not parse: {err}",
            ctx.painter.warning("warning:")
        );
    }
    println!("{updated}");
    ExitCode::SUCCESS
}
