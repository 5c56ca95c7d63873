//! Syntax highlighting and terminal colors for lq.
//!
//! [`Highlighter`] colors the TOML and JSON that `lq config` and `lq parse --json` print.
//! [`Painter`] styles everything else (headers, error underlines, hints) and can be switched
//! off for pipes and for users who set `output.color = false`.

#![warn(missing_docs)]

use syntect::{
    easy::HighlightLines,
    highlighting::Style,
    parsing::SyntaxSet,
    util::{LinesWithEndings, as_24_bit_terminal_escaped},
};
use two_face::{
    syntax::extra_newlines as extra_syntaxes,
    theme::{EmbeddedLazyThemeSet, EmbeddedThemeName, extra as extra_themes},
};

/// A syntax highlighter for terminal output.
pub struct Highlighter {
    /// Language definitions, including TOML and JSON.
    syntax_set: SyntaxSet,
    /// Color themes.
    theme_set: EmbeddedLazyThemeSet,
    /// The theme to use.
    theme: EmbeddedThemeName,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter {
    /// Creates a new highlighter with the default theme (Dracula).
    pub fn new() -> Self {
        Self {
            syntax_set: extra_syntaxes(),
            theme_set: extra_themes(),
            theme: EmbeddedThemeName::Dracula,
        }
    }

    /// Highlights TOML content.
    pub fn highlight_toml(&self, content: &str) -> String {
        self.highlight(content, "toml")
    }

    /// Highlights JSON content.
    pub fn highlight_json(&self, content: &str) -> String {
        self.highlight(content, "json")
    }

    /// Highlights content with the named syntax (extension or name).
    ///
    /// Unknown syntaxes are treated as plain text.
    pub fn highlight(&self, content: &str, syntax_name: &str) -> String {
        let syntax = self
            .syntax_set
            .find_syntax_by_extension(syntax_name)
            .or_else(|| self.syntax_set.find_syntax_by_name(syntax_name))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let theme = self.theme_set.get(self.theme);
        let mut highlighter = HighlightLines::new(syntax, theme);

        let mut output = String::new();
        for line in LinesWithEndings::from(content) {
            let ranges: Vec<(Style, &str)> = highlighter
                .highlight_line(line, &self.syntax_set)
                .unwrap_or_else(|_| vec![(Style::default(), line)]);
            output.push_str(&as_24_bit_terminal_escaped(&ranges[..], false));
        }
        output.push_str(colors::RESET);
        output
    }
}

/// ANSI color codes for terminal output.
pub mod colors {
    /// Bold text.
    pub const BOLD: &str = "\x1b[1m";
    /// Cyan text (for headers).
    pub const CYAN: &str = "\x1b[36m";
    /// Green text (for success).
    pub const GREEN: &str = "\x1b[32m";
    /// Yellow text (for hints).
    pub const YELLOW: &str = "\x1b[33m";
    /// Red text (for errors).
    pub const RED: &str = "\x1b[31m";
    /// Dim/gray text (for less important info).
    pub const DIM: &str = "\x1b[2m";
    /// Reset all formatting.
    pub const RESET: &str = "\x1b[0m";
}

/// Applies terminal styles, or leaves text alone when color is off.
#[derive(Debug, Clone, Copy)]
pub struct Painter {
    /// Whether escape codes are emitted.
    enabled: bool,
}

impl Painter {
    /// Creates a painter. With `enabled` false every method returns its input unchanged.
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// True if escape codes are emitted.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Wraps `text` in the given codes.
    fn paint(&self, codes: &[&str], text: &str) -> String {
        if !self.enabled {
            return text.to_string();
        }
        format!("{}{text}{}", codes.concat(), colors::RESET)
    }

    /// Bold cyan.
    pub fn header(&self, text: &str) -> String {
        self.paint(&[colors::BOLD, colors::CYAN], text)
    }

    /// Dimmed.
    pub fn dim(&self, text: &str) -> String {
        self.paint(&[colors::DIM], text)
    }

    /// Green.
    pub fn success(&self, text: &str) -> String {
        self.paint(&[colors::GREEN], text)
    }

    /// Yellow.
    pub fn warning(&self, text: &str) -> String {
        self.paint(&[colors::YELLOW], text)
    }

    /// Bold red.
    pub fn error(&self, text: &str) -> String {
        self.paint(&[colors::BOLD, colors::RED], text)
    }

    /// Renders a caret underline below a 1-based `column`, `width` characters wide.
    ///
    /// A zero width still draws one caret so end-of-input errors stay visible.
    pub fn underline(&self, column: usize, width: usize) -> String {
        let pad = " ".repeat(column.saturating_sub(1));
        let carets = "^".repeat(width.max(1));
        format!("{pad}{}", self.error(&carets))
    }
}

impl Default for Painter {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlight_toml() {
        let output = Highlighter::new().highlight_toml("[filters]\noperator = \"AND\"\n");
        assert!(output.contains("\x1b["));
        assert!(output.ends_with(colors::RESET));
    }

    #[test]
    fn test_highlight_json() {
        let output = Highlighter::new().highlight_json("{\"type\": \"term\"}\n");
        assert!(output.contains("\x1b["));
        assert!(output.contains("term"));
    }

    #[test]
    fn test_unknown_syntax_is_plain_text() {
        let output = Highlighter::new().highlight("level:error", "no-such-syntax");
        assert!(output.contains("level:error"));
    }

    #[test]
    fn test_syntaxes_available() {
        let ss = extra_syntaxes();
        assert!(ss.find_syntax_by_extension("toml").is_some());
        assert!(ss.find_syntax_by_extension("json").is_some());
    }

    #[test]
    fn test_painter_enabled() {
        let p = Painter::new(true);
        let h = p.header("Tree");
        assert!(h.starts_with(colors::BOLD));
        assert!(h.contains(colors::CYAN));
        assert!(h.ends_with(colors::RESET));
        assert!(p.dim("x").contains(colors::DIM));
    }

    #[test]
    fn test_painter_disabled_is_identity() {
        let p = Painter::new(false);
        assert_eq!(p.header("Tree"), "Tree");
        assert_eq!(p.error("bad"), "bad");
        assert_eq!(p.success("ok"), "ok");
        assert_eq!(p.warning("hint"), "hint");
    }

    #[test]
    fn test_underline() {
        let p = Painter::new(false);
        assert_eq!(p.underline(1, 3), "^^^");
        assert_eq!(p.underline(5, 1), "    ^");
        assert_eq!(p.underline(3, 0), "  ^");
    }
}
