//! Implementation of `lq terms`.

use std::process::ExitCode;

use comfy_table::{Cell, Table, presets::UTF8_FULL_CONDENSED};
use lq_query::Term;

use super::shared::{parse_or_report, to_json};
use crate::cli::{args::TermsCommand, context::CommandContext};

/// Lists every term of a query in the order `find` visits them.
pub fn run(ctx: &CommandContext, cmd: &TermsCommand) -> ExitCode {
    let Some(query) = parse_or_report(&ctx.painter, &cmd.query) else {
        return ExitCode::FAILURE;
    };
    let terms: Vec<&Term> = query.ast().map(|ast| ast.terms()).unwrap_or_default();

    if ctx.json(cmd.output.json) {
        return match to_json(&terms) {
            Ok(json) => {
                println!("{}", ctx.highlight(&json, "json").trim_end());
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("error: failed to serialize terms: {e}");
                ExitCode::FAILURE
            }
        };
    }

    if terms.is_empty() {
        println!("{}", ctx.painter.dim("(no terms)"));
        return ExitCode::SUCCESS;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["#", "Field", "Value", "Quoted", "Prefix"]);
    for (i, term) in terms.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(term.field.as_deref().unwrap_or("-")),
            Cell::new(&term.term),
            Cell::new(if term.quoted { "yes" } else { "no" }),
            Cell::new(term.prefix.map_or("", |p| p.as_str())),
        ]);
    }
    println!("{table}");
    ExitCode::SUCCESS
}
