//! Implementation of `lq concat`.

use std::process::ExitCode;

use lq_query::concatenate;

use crate::cli::args::ConcatCommand;

/// Appends filter text to a query without parsing either.
pub fn run(cmd: &ConcatCommand) -> ExitCode {
    println!("{}", concatenate(&cmd.query, &cmd.filter, cmd.operator));
    ExitCode::SUCCESS
}
