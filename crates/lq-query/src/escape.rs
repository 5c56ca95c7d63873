//! Escaping for the three places user text ends up in a query.
//!
//! - [`escape_filter`]: a bare term or field name (`key` in `key:"value"`).
//! - [`escape_filter_value`]: the inside of a quoted phrase (`value` in `key:"value"`).
//! - [`lucene_escape`]: template interpolation, where numbers are left untouched.

/// Characters with meaning in a bare term position.
const TERM_SPECIAL: &[char] = &[
    '+', '-', '!', '(', ')', '{', '}', '[', ']', '^', '"', '?', ':', '\\', '&', '|', '\'', '/',
    '*', '~',
];

/// Characters escaped when interpolating template values.
const LUCENE_SPECIAL: &[char] = &[
    '!', '*', '+', '-', '=', '<', '>', '&', '|', '(', ')', '[', ']', '{', '}', '^', '~', '?', ':',
    '\\', '/', '"',
];

/// Backslash-prefixes every character for which `special` returns true.
fn escape_with(value: &str, special: impl Fn(char) -> bool) -> String {
    let mut escaped = String::with_capacity(value.len() * 2);
    for ch in value.chars() {
        if special(ch) {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Escapes a field name or bare term.
///
/// Colons, parentheses, operators, wildcards, quotes and whitespace are all significant in a
/// bare term and get a backslash.
pub fn escape_filter(value: &str) -> String {
    escape_with(value, |ch| ch.is_whitespace() || TERM_SPECIAL.contains(&ch))
}

/// Escapes a value for use inside a quoted phrase.
///
/// Backslashes are doubled first so existing backslashes survive, then quotes are escaped.
pub fn escape_filter_value(value: &str) -> String {
    escape_with(value, |ch| ch == '\\' || ch == '"')
}

/// Escapes a template variable value.
///
/// Values that read as numbers are returned as-is. Everything else has every Lucene special
/// character and all whitespace backslash-escaped.
pub fn lucene_escape(value: &str) -> String {
    if is_numeric(value) {
        return value.to_string();
    }
    escape_with(value, |ch| ch.is_whitespace() || LUCENE_SPECIAL.contains(&ch))
}

/// Removes one level of backslash escaping.
///
/// A trailing lone backslash is kept.
pub fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            match chars.next() {
                Some(escaped) => out.push(escaped),
                None => out.push('\\'),
            }
        } else {
            out.push(ch);
        }
    }
    out
}

/// Returns true if `value` converts to a number the way a JavaScript `Number(value)` would.
///
/// Accepts empty and whitespace-only strings (they convert to 0), decimal numbers with optional
/// sign, fraction and exponent, signed `Infinity`, and unsigned `0x`/`0o`/`0b` literals.
fn is_numeric(value: &str) -> bool {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return true;
    }

    let unsigned = trimmed
        .strip_prefix('+')
        .or_else(|| trimmed.strip_prefix('-'))
        .unwrap_or(trimmed);
    if unsigned == "Infinity" {
        return true;
    }

    let radix = match trimmed.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        let digits = &trimmed[2..];
        return !digits.is_empty() && digits.chars().all(|c| c.is_digit(radix));
    }

    // Rust accepts "inf" and "nan"; JavaScript does not.
    unsigned
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
        && unsigned.chars().any(|c| c.is_ascii_digit())
        && trimmed.parse::<f64>().is_ok()
}
