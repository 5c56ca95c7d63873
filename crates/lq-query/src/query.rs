//! Parsed query wrapper with filter operations.

use std::fmt;

use log::{debug, trace};
use serde::Serialize;

use crate::{
    ast::{Node, Term},
    concat::{BoolOperator, concatenate},
    error::ParseError,
    filter::{FilterKey, Modifier, find_first, remove_first},
    parser::parse_expression,
};

/// A query string together with its parse result.
///
/// Exactly one of [`ast`](Self::ast) and [`parse_error`](Self::parse_error) is set. All
/// operations return new values; a `LuceneQuery` is never modified in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LuceneQuery {
    /// Parsed tree, absent when parsing failed.
    ast: Option<Node>,
    /// Text this query was parsed from. Absent for trees built by removal.
    source: Option<String>,
    /// Why parsing failed.
    parse_error: Option<ParseError>,
}

impl LuceneQuery {
    /// Parses `text`.
    ///
    /// Failure is recorded on the returned value rather than returned as an error, so a query
    /// the user is still typing can be carried around and re-rendered verbatim.
    pub fn parse(text: &str) -> Self {
        match parse_expression(text) {
            Ok(ast) => Self {
                ast: Some(ast),
                source: Some(text.to_string()),
                parse_error: None,
            },
            Err(err) => {
                debug!("failed to parse query {text:?}: {err}");
                Self {
                    ast: None,
                    source: Some(text.to_string()),
                    parse_error: Some(err),
                }
            }
        }
    }

    /// Wraps an existing tree. The query text is derived from the tree on demand.
    pub fn from_ast(ast: Node) -> Self {
        Self {
            ast: Some(ast),
            source: None,
            parse_error: None,
        }
    }

    /// The parsed tree, or `None` if parsing failed.
    pub fn ast(&self) -> Option<&Node> {
        self.ast.as_ref()
    }

    /// The text this query was parsed from.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// The parse failure, if any.
    pub fn parse_error(&self) -> Option<&ParseError> {
        self.parse_error.as_ref()
    }

    /// True if the query parsed.
    pub fn is_valid(&self) -> bool {
        self.ast.is_some()
    }

    /// Finds the first `key:value` term carrying `modifier`.
    ///
    /// `key` and `value` are raw: they are escaped the same way [`add_filter`](Self::add_filter)
    /// writes them before comparing against the tree.
    pub fn find_filter(&self, key: &str, value: &str, modifier: Modifier) -> Option<&Term> {
        let ast = self.ast.as_ref()?;
        find_first(ast, &FilterKey::new(key, value, modifier))
    }

    /// True if [`find_filter`](Self::find_filter) finds a term.
    pub fn has_filter(&self, key: &str, value: &str, modifier: Modifier) -> bool {
        self.find_filter(key, value, modifier).is_some()
    }

    /// Appends `key:"value"` with an implicit join, unless the filter is already present.
    pub fn add_filter(&self, key: &str, value: &str, modifier: Modifier) -> Self {
        self.add_filter_with_operator(key, value, modifier, None)
    }

    /// Appends `key:"value"` joined with `operator`, unless the filter is already present.
    ///
    /// The result is re-parsed from the concatenated text, so it carries that text as its
    /// source.
    pub fn add_filter_with_operator(
        &self,
        key: &str,
        value: &str,
        modifier: Modifier,
        operator: Option<BoolOperator>,
    ) -> Self {
        if self.has_filter(key, value, modifier) {
            debug!("filter {modifier}{key}:{value:?} already present");
            return self.clone();
        }

        let clause = FilterKey::new(key, value, modifier).to_clause();
        let text = concatenate(&self.to_string(), &clause, operator);
        trace!("added filter {clause}: {text:?}");
        Self::parse(&text)
    }

    /// Removes the first `key:value` term carrying `modifier`.
    ///
    /// Returns an unchanged copy when the filter is absent or the query did not parse.
    pub fn remove_filter(&self, key: &str, value: &str, modifier: Modifier) -> Self {
        let Some(ast) = &self.ast else {
            debug!("cannot remove filter from unparsed query");
            return self.clone();
        };

        let mut tree = ast.clone();
        if !remove_first(&mut tree, &FilterKey::new(key, value, modifier)) {
            debug!("filter {modifier}{key}:{value:?} not present");
            return self.clone();
        }

        let removed = Self::from_ast(tree);
        trace!("removed filter {modifier}{key}:{value:?}: {removed}");
        removed
    }
}

impl Default for LuceneQuery {
    fn default() -> Self {
        Self::parse("")
    }
}

impl fmt::Display for LuceneQuery {
    /// Writes the original text when there is any, otherwise the serialized tree.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.source, &self.ast) {
            (Some(source), _) if !source.is_empty() => f.write_str(source),
            (_, Some(ast)) => f.write_str(&ast.to_query_string()),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ast::Prefix, error::ParseErrorKind};

    const INCLUDE: Modifier = Modifier::Include;

    #[test]
    fn empty_query_is_empty_ast() {
        let q = LuceneQuery::parse("");
        assert_eq!(q.ast(), Some(&Node::Empty));
        assert!(q.parse_error().is_none());
        assert_eq!(q.to_string(), "");
    }

    #[test]
    fn failed_parse_keeps_source() {
        let q = LuceneQuery::parse("a:1 AND (");
        assert!(!q.is_valid());
        assert!(q.ast().is_none());
        assert!(q.parse_error().is_some());
        assert_eq!(q.to_string(), "a:1 AND (");
        assert!(!q.has_filter("a", "1", INCLUDE));
    }

    #[test]
    fn find_single_filter() {
        let q = LuceneQuery::parse("field:value");
        let term = q.find_filter("field", "value", INCLUDE).unwrap();
        assert_eq!(term.field.as_deref(), Some("field"));
        assert!(q.find_filter("field", "other", INCLUDE).is_none());
    }

    #[test]
    fn find_excluded_filter() {
        let q = LuceneQuery::parse("level:info -level:debug");
        let term = q.find_filter("level", "debug", Modifier::Exclude).unwrap();
        assert_eq!(term.prefix, Some(Prefix::Prohibited));
        assert!(!q.has_filter("level", "debug", INCLUDE));
    }

    #[test]
    fn find_value_needing_escapes() {
        let q = LuceneQuery::parse("").add_filter("path", r#"C:\temp "x""#, INCLUDE);
        assert!(q.is_valid(), "{q}");
        assert!(q.has_filter("path", r#"C:\temp "x""#, INCLUDE));
    }

    #[test]
    fn add_to_empty() {
        let q = LuceneQuery::parse("").add_filter("level", "error", INCLUDE);
        assert_eq!(q.to_string(), "level:\"error\"");
    }

    #[test]
    fn add_appends_with_space() {
        let q = LuceneQuery::parse("service:api").add_filter("level", "error", Modifier::Exclude);
        assert_eq!(q.to_string(), "service:api -level:\"error\"");
        assert!(q.has_filter("level", "error", Modifier::Exclude));
    }

    #[test]
    fn add_with_operator() {
        let q = LuceneQuery::parse("service:api").add_filter_with_operator(
            "level",
            "error",
            INCLUDE,
            Some(BoolOperator::Or),
        );
        assert_eq!(q.to_string(), "service:api OR level:\"error\"");
    }

    #[test]
    fn add_is_idempotent() {
        let once = LuceneQuery::parse("a:1").add_filter("b", "2", INCLUDE);
        let twice = once.add_filter("b", "2", INCLUDE);
        assert_eq!(once.to_string(), twice.to_string());
    }

    #[test]
    fn add_existing_bare_value_is_noop() {
        let q = LuceneQuery::parse("level:error");
        assert_eq!(q.add_filter("level", "error", INCLUDE), q);
    }

    #[test]
    fn remove_left_of_and() {
        let q = LuceneQuery::parse("a:1 AND b:2").remove_filter("a", "1", INCLUDE);
        assert!(q.source().is_none());
        assert_eq!(
            LuceneQuery::parse(&q.to_string()).ast(),
            LuceneQuery::parse("b:2").ast()
        );
    }

    #[test]
    fn remove_missing_returns_copy() {
        let q = LuceneQuery::parse("a:1 AND b:2");
        let same = q.remove_filter("c", "3", INCLUDE);
        assert_eq!(same, q);
        assert_eq!(same.to_string(), "a:1 AND b:2");
    }

    #[test]
    fn remove_from_failed_parse_is_unchanged() {
        let q = LuceneQuery::parse("(a:1");
        assert_eq!(q.remove_filter("a", "1", INCLUDE).to_string(), "(a:1");
    }

    #[test]
    fn remove_only_filter_gives_empty() {
        let q = LuceneQuery::parse("level:\"error\"").remove_filter("level", "error", INCLUDE);
        assert_eq!(q.ast(), Some(&Node::Empty));
        assert_eq!(q.to_string(), "");
    }

    #[test]
    fn add_then_remove_restores_query() {
        let base = LuceneQuery::parse("service:api AND host:web");
        let added = base.add_filter("level", "error", INCLUDE);
        let removed = added.remove_filter("level", "error", INCLUDE);
        assert!(!removed.has_filter("level", "error", INCLUDE));
        assert_eq!(removed.ast(), base.ast());
    }

    #[test]
    fn every_filter_of_grouped_query_is_removable() {
        let q = LuceneQuery::parse("(a:1 OR b:2) AND c:3");
        let all = [("a", "1"), ("b", "2"), ("c", "3")];
        for (key, value) in all {
            let removed = q.remove_filter(key, value, INCLUDE);
            let reparsed = LuceneQuery::parse(&removed.to_string());
            assert!(reparsed.is_valid(), "{removed}");
            for (k, v) in all {
                assert_eq!(reparsed.has_filter(k, v, INCLUDE), k != key, "{removed}");
            }
        }
    }

    #[test]
    fn round_trip_preserves_ast() {
        for text in ["a:1 b:2", "x:(y OR z) -w", "NOT a AND b"] {
            let q = LuceneQuery::parse(text);
            assert_eq!(LuceneQuery::parse(&q.to_string()).ast(), q.ast());
        }
    }

    #[test]
    fn long_expanded_query_supports_every_operation() {
        let hosts = (0..50_000)
            .map(|i| format!("host:\"web-{i}\""))
            .collect::<Vec<_>>()
            .join(" OR ");
        let q = LuceneQuery::parse(&hosts);
        assert!(q.is_valid());
        assert!(q.has_filter("host", "web-49999", INCLUDE));

        let added = q.add_filter("level", "error", Modifier::Exclude);
        assert!(added.has_filter("level", "error", Modifier::Exclude));

        let removed = added.remove_filter("host", "web-0", INCLUDE);
        assert!(!removed.has_filter("host", "web-0", INCLUDE));
        assert!(removed.to_string().starts_with("host:\"web-1\" OR "));
        assert!(removed.to_string().ends_with(" -level:\"error\""));
    }

    #[test]
    fn runaway_nesting_is_a_parse_error() {
        let q = LuceneQuery::parse(&"(".repeat(10_000));
        assert!(!q.is_valid());
        assert_eq!(q.parse_error().map(|e| e.kind), Some(ParseErrorKind::TooDeep));
        assert!(!q.has_filter("a", "1", INCLUDE));
    }

    #[test]
    fn serializes_failure() {
        let json = serde_json::to_value(LuceneQuery::parse("a:")).unwrap();
        assert!(json["ast"].is_null());
        assert_eq!(json["parse_error"]["kind"], "missing_field_value");
    }
}
