//! Implementation of `lq parse`.

use std::process::ExitCode;

use lq_query::{LuceneQuery, Node};

use super::shared::{report_parse_error, to_json};
use crate::cli::{args::ParseCommand, context::CommandContext};

/// Parses a query and prints its tree.
pub fn run(ctx: &CommandContext, cmd: &ParseCommand) -> ExitCode {
    let query = LuceneQuery::parse(&cmd.query);

    if ctx.json(cmd.output.json) {
        let json = match to_json(&query) {
            Ok(json) => json,
            Err(e) => {
                eprintln!("error: failed to serialize query: {e}");
                return ExitCode::FAILURE;
            }
        };
        println!("{}", ctx.highlight(&json, "json").trim_end());
        return if query.is_valid() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        };
    }

    if let Some(err) = query.parse_error() {
        report_parse_error(&ctx.painter, &cmd.query, err);
        return ExitCode::FAILURE;
    }

    match query.ast() {
        None | Some(Node::Empty) => println!("{}", ctx.painter.dim("(empty query)")),
        Some(ast) => print!("{ast}"),
    }
    ExitCode::SUCCESS
}
