//! Implementation of `lq escape`.

use std::process::ExitCode;

use lq_query::{escape_filter, escape_filter_value, lucene_escape, unescape};

use crate::cli::args::{EscapeCommand, EscapeMode};

/// Escapes (or unescapes) a value and prints it.
pub fn run(cmd: &EscapeCommand) -> ExitCode {
    let output = if cmd.unescape {
        unescape(&cmd.value)
    } else {
        match cmd.mode {
            EscapeMode::Term => escape_filter(&cmd.value),
            EscapeMode::Phrase => escape_filter_value(&cmd.value),
            EscapeMode::Lucene => lucene_escape(&cmd.value),
        }
    };
    println!("{output}");
    ExitCode::SUCCESS
}
