//! Implementation of `lq adhoc`.

use std::process::ExitCode;

use lq_query::{AdHocFilter, add_ad_hoc_filter};

use crate::cli::args::AdHocCommand;

/// Applies one ad hoc filter and prints the resulting query.
pub fn run(cmd: &AdHocCommand) -> ExitCode {
    let filter = AdHocFilter::new(&cmd.key, cmd.operator, &cmd.value);
    println!("{}", add_ad_hoc_filter(&cmd.query, &filter));
    ExitCode::SUCCESS
}
