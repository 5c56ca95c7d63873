//! Implementation of `lq format`.

use std::process::ExitCode;

use lq_query::{TemplateValue, format_template_value};

use crate::cli::args::FormatCommand;

/// Renders template variable values the way they are interpolated into a query.
///
/// One value is a single selection; none, several, or `--multi` make a multi-value selection.
pub fn run(cmd: &FormatCommand) -> ExitCode {
    let value = match cmd.values.as_slice() {
        [single] if !cmd.multi => TemplateValue::from(single.as_str()),
        values => TemplateValue::from(values.to_vec()),
    };
    println!(
        "{}",
        format_template_value(&value, cmd.variable_query.as_deref())
    );
    ExitCode::SUCCESS
}
