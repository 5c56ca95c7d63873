//! Error types for query parsing.
//!
//! Parse failures are reported as values: `LuceneQuery` stores a `ParseError` next to a missing
//! AST instead of returning an error to the caller.

use serde::Serialize;
use thiserror::Error;

use crate::span::Span;

/// The category of a parse failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseErrorKind {
    /// A phrase was opened with `"` and never closed.
    UnclosedQuote,
    /// The input ends with a lone backslash.
    DanglingEscape,
    /// A token appeared where it cannot start or continue an expression.
    UnexpectedToken,
    /// The input ended in the middle of an expression.
    UnexpectedEnd,
    /// A `(` was never matched by a `)`.
    UnclosedGroup,
    /// A `field:` prefix with nothing after it.
    MissingFieldValue,
    /// Groups or prefixes nested past the parser's limit.
    TooDeep,
}

/// A structured parse failure with the location of the offending text.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{message} at {}", location.start)]
pub struct ParseError {
    /// What went wrong.
    pub kind: ParseErrorKind,
    /// Human-readable description.
    pub message: String,
    /// Span of the offending token (zero-width at end of input).
    pub location: Span,
}

impl ParseError {
    /// Creates a new parse error.
    pub fn new(kind: ParseErrorKind, message: impl Into<String>, location: Span) -> Self {
        Self {
            kind,
            message: message.into(),
            location,
        }
    }

    /// Line of the error start, 1-based.
    pub fn line(&self) -> usize {
        self.location.start.line
    }

    /// Column of the error start, 1-based.
    pub fn column(&self) -> usize {
        self.location.start.column
    }

    /// Formats the error against the query it came from, underlining the offending span.
    pub fn format_with_context(&self, source: &str) -> String {
        let mut result = format!("query syntax error: {}\n", self.message);

        let indent = self.column().saturating_sub(1);
        result.push_str(&format!("  {}\n", self.source_line(source)));
        result.push_str(&format!(
            "  {}{}",
            " ".repeat(indent),
            "^".repeat(self.underline_width(source))
        ));

        if let Some(hint) = self.suggestion() {
            result.push_str(&format!("\nhint: {hint}"));
        }
        result
    }

    /// The line of `source` the error starts on.
    pub fn source_line<'a>(&self, source: &'a str) -> &'a str {
        source
            .lines()
            .nth(self.line().saturating_sub(1))
            .unwrap_or_default()
    }

    /// How many characters of [`source_line`](Self::source_line) to underline. At least one.
    ///
    /// Spans running past the end of their first line are underlined to the end of that line.
    pub fn underline_width(&self, source: &str) -> usize {
        if self.location.end.line == self.location.start.line {
            return self.location.len().max(1);
        }
        let indent = self.column().saturating_sub(1);
        self.source_line(source)
            .chars()
            .count()
            .saturating_sub(indent)
            .max(1)
    }

    /// Returns a suggestion for common mistakes.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self.kind {
            ParseErrorKind::UnclosedQuote => {
                Some("Add a closing quote (\") to complete the phrase")
            }
            ParseErrorKind::UnclosedGroup => {
                Some("Add a closing parenthesis ) to match the opening one")
            }
            ParseErrorKind::DanglingEscape => Some("Escape the backslash itself as \\\\"),
            ParseErrorKind::MissingFieldValue => {
                Some("Put a term or a quoted phrase after the colon, e.g. 'level:\"error\"'")
            }
            ParseErrorKind::TooDeep => Some("Drop redundant parentheses or repeated NOTs"),
            ParseErrorKind::UnexpectedEnd | ParseErrorKind::UnexpectedToken
                if self.message.contains("operator") =>
            {
                Some("AND and OR require expressions on both sides, e.g. 'a:1 AND b:2'")
            }
            _ => None,
        }
    }
}
