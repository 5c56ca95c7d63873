//! Shared helpers for command implementations.

use lq_config::FilterSettings;
use lq_highlight::Painter;
use lq_query::{LuceneQuery, Modifier, ParseError};
use serde::Serialize;

use crate::cli::args::ModifierArgs;

/// Exit codes for the lookup commands `find` and `has`.
pub mod exit_codes {
    use std::process::ExitCode;

    /// The filter is present.
    pub const FOUND: ExitCode = ExitCode::SUCCESS;
    /// The filter is absent.
    pub const NOT_FOUND: ExitCode = ExitCode::FAILURE;

    /// The query does not parse.
    pub fn invalid() -> ExitCode {
        ExitCode::from(2)
    }
}

impl ModifierArgs {
    /// Picks the modifier: explicit flags first, then `filters.negate`.
    pub fn resolve(&self, defaults: &FilterSettings) -> Modifier {
        if self.negate {
            Modifier::Exclude
        } else if self.include {
            Modifier::Include
        } else {
            defaults.default_modifier()
        }
    }
}

/// Prints a parse error with the offending line and a caret underline.
pub fn report_parse_error(painter: &Painter, source: &str, err: &ParseError) {
    eprintln!("{} {err}", painter.error("error:"));
    eprintln!("  {}", err.source_line(source));
    eprintln!(
        "  {}",
        painter.underline(err.column(), err.underline_width(source))
    );
    if let Some(hint) = err.suggestion() {
        eprintln!("{} {hint}", painter.warning("hint:"));
    }
}

/// Parses `text`, reporting any error. Returns `None` when the query is invalid.
pub fn parse_or_report(painter: &Painter, text: &str) -> Option<LuceneQuery> {
    let query = LuceneQuery::parse(text);
    match query.parse_error() {
        Some(err) => {
            report_parse_error(painter, text, err);
            None
        }
        None => Some(query),
    }
}

/// Warns that an edit is working on text that does not parse.
pub fn warn_if_invalid(painter: &Painter, query: &LuceneQuery) {
    if let Some(err) = query.parse_error() {
        eprintln!(
            "{} query does not parse ({err}); editing its text as-is",
            painter.warning("warning:")
        );
    }
}

/// Serializes `value` as pretty JSON.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modifier_flags_override_config() {
        let mut defaults = FilterSettings::default();
        let none = ModifierArgs::default();
        let negate = ModifierArgs {
            negate: true,
            include: false,
        };
        let include = ModifierArgs {
            negate: false,
            include: true,
        };

        assert_eq!(none.resolve(&defaults), Modifier::Include);
        assert_eq!(negate.resolve(&defaults), Modifier::Exclude);

        defaults.negate = true;
        assert_eq!(none.resolve(&defaults), Modifier::Exclude);
        assert_eq!(include.resolve(&defaults), Modifier::Include);
    }

    #[test]
    fn parse_or_report_returns_valid_queries() {
        let painter = Painter::new(false);
        assert!(parse_or_report(&painter, "a:1 b:2").is_some());
        assert!(parse_or_report(&painter, "a:1 AND").is_none());
    }
}
