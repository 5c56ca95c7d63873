//! Locating and excising `field:value` terms in a query tree.
//!
//! Both walks visit terms depth-first, left to right, so the term `remove_first` takes out is
//! always the one `find_first` reports.

use std::{fmt, mem, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    ast::{Binary, GroupPrefix, Node, Operator, Prefix, Term},
    escape::{escape_filter, escape_filter_value},
};

/// Whether a filter includes or excludes matching documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modifier {
    /// `field:"value"`.
    #[default]
    Include,
    /// `-field:"value"`.
    Exclude,
}

impl Modifier {
    /// Returns the modifier as written in front of a filter: `""` or `"-"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Include => "",
            Self::Exclude => "-",
        }
    }

    /// The term prefix a filter with this modifier carries once parsed.
    pub fn prefix(self) -> Option<Prefix> {
        match self {
            Self::Include => None,
            Self::Exclude => Some(Prefix::Prohibited),
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a filter modifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown filter modifier '{0}' (expected \"\" or \"-\")")]
pub struct UnknownModifier(pub String);

impl FromStr for Modifier {
    type Err = UnknownModifier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Ok(Self::Include),
            "-" => Ok(Self::Exclude),
            _ => Err(UnknownModifier(s.to_string())),
        }
    }
}

/// The escaped form of a filter, as it appears in a parsed term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterKey {
    /// Field name after term escaping.
    pub field: String,
    /// Value after phrase escaping.
    pub value: String,
    /// Expected term prefix.
    pub prefix: Option<Prefix>,
}

impl FilterKey {
    /// Escapes a raw key/value pair the same way a filter is written into a query.
    pub fn new(key: &str, value: &str, modifier: Modifier) -> Self {
        Self {
            field: escape_filter(key),
            value: escape_filter_value(value),
            prefix: modifier.prefix(),
        }
    }

    /// True if `term` is this filter.
    pub fn matches(&self, term: &Term) -> bool {
        term.field.as_deref() == Some(self.field.as_str())
            && term.term == self.value
            && term.prefix == self.prefix
    }

    /// Renders the filter clause: `{modifier}{field}:"{value}"`.
    pub fn to_clause(&self) -> String {
        let modifier = self.prefix.map_or("", Prefix::as_str);
        format!("{modifier}{}:\"{}\"", self.field, self.value)
    }
}

/// Returns the first term matching `key`.
pub fn find_first<'a>(node: &'a Node, key: &FilterKey) -> Option<&'a Term> {
    let mut node = node;
    loop {
        match node {
            Node::Empty => return None,
            Node::Term(term) => return key.matches(term).then_some(term),
            Node::LeftOnly(group) => node = &group.child,
            Node::Binary(binary) => {
                if let Some(term) = find_first(&binary.left, key) {
                    return Some(term);
                }
                node = &binary.right;
            }
        }
    }
}

/// Removes the first term matching `key`, collapsing the joins around it.
///
/// Returns true if a term was removed. A removed root term leaves `Node::Empty`; a binary node
/// that loses an operand is replaced by the other operand; a group left with nothing inside
/// disappears too.
pub fn remove_first(node: &mut Node, key: &FilterKey) -> bool {
    let Some(depth) = locate(node, key) else {
        return false;
    };

    if depth == 0 {
        remove_here(node, key);
        return true;
    }

    // Only the binary directly above the edited link can change shape.
    let parent = chain_link(node, depth - 1);
    if let Node::Binary(binary) = parent {
        remove_here(&mut binary.right, key);
        absorb_leading_not(binary);
    }
    collapse(parent);
    true
}

/// Returns how many right operands to follow before reaching the link holding the first match.
///
/// The match sits in that link's left operand, or the link is the last one in the chain.
fn locate(node: &Node, key: &FilterKey) -> Option<usize> {
    let mut node = node;
    let mut depth = 0;
    loop {
        match node {
            Node::Binary(binary) => {
                if find_first(&binary.left, key).is_some() {
                    return Some(depth);
                }
                node = &binary.right;
                depth += 1;
            }
            last => return find_first(last, key).is_some().then_some(depth),
        }
    }
}

/// Follows `depth` right operands down from `node`.
fn chain_link(node: &mut Node, depth: usize) -> &mut Node {
    let mut node = node;
    for _ in 0..depth {
        match node {
            Node::Binary(binary) => node = &mut binary.right,
            _ => break,
        }
    }
    node
}

/// Removes the match that `locate` reported at this link.
fn remove_here(node: &mut Node, key: &FilterKey) {
    match node {
        Node::Empty => return,
        Node::Term(_) => {}
        Node::LeftOnly(group) => {
            remove_first(&mut group.child, key);
        }
        Node::Binary(binary) => {
            remove_first(&mut binary.left, key);
        }
    }
    collapse(node);
}

/// Replaces `node` by what is left of it after one of its terms went away.
fn collapse(node: &mut Node) {
    let replacement = match node {
        Node::Term(_) => Node::Empty,
        Node::LeftOnly(group) if group.child.is_empty() => Node::Empty,
        Node::Binary(binary) if binary.left.is_empty() => binary.take_operand(true),
        Node::Binary(binary) if binary.right.is_empty() => binary.take_operand(false),
        _ => return,
    };
    *node = replacement;
}

/// Folds a `NOT` group that now opens `binary.right` into the operator.
///
/// `a AND NOT b` parses as one `AND NOT` operator, so `And` followed by a `NOT` group would not
/// survive a serialize/parse round trip.
fn absorb_leading_not(binary: &mut Binary) {
    let operator = match binary.operator {
        Operator::Implicit => Operator::Not,
        Operator::And => Operator::AndNot,
        Operator::Or => Operator::OrNot,
        Operator::AndNot | Operator::OrNot | Operator::Not => return,
    };

    let leading = leading_group(&mut binary.right);
    let Node::LeftOnly(group) = leading else {
        return;
    };
    if group.prefix != Some(GroupPrefix::Not) {
        return;
    }
    let child = mem::take(&mut *group.child);
    *leading = child;
    binary.operator = operator;
}

/// Returns the first group of an unparenthesized clause list.
fn leading_group(node: &mut Node) -> &mut Node {
    let mut node = node;
    while node.is_bare_list() {
        let Node::Binary(binary) = node else {
            break;
        };
        node = &mut binary.left;
    }
    node
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_expression;

    fn key(field: &str, value: &str) -> FilterKey {
        FilterKey::new(field, value, Modifier::Include)
    }

    fn removed(query: &str, field: &str, value: &str) -> String {
        let mut ast = parse_expression(query).unwrap();
        assert!(remove_first(&mut ast, &key(field, value)), "{field}:{value} not in {query}");
        ast.to_query_string()
    }

    #[test]
    fn modifier_parsing() {
        assert_eq!("".parse::<Modifier>().unwrap(), Modifier::Include);
        assert_eq!("-".parse::<Modifier>().unwrap(), Modifier::Exclude);
        assert!("+".parse::<Modifier>().is_err());
    }

    #[test]
    fn clause_rendering_escapes_both_sides() {
        let k = FilterKey::new("k8s:pod", "say \"hi\"", Modifier::Exclude);
        assert_eq!(k.to_clause(), r#"-k8s\:pod:"say \"hi\"""#);
    }

    #[test]
    fn finds_root_term() {
        let ast = parse_expression("level:error").unwrap();
        assert!(find_first(&ast, &key("level", "error")).is_some());
        assert!(find_first(&ast, &key("level", "warn")).is_none());
    }

    #[test]
    fn quoted_and_bare_values_both_match() {
        let ast = parse_expression("a:x b:\"y\"").unwrap();
        assert!(find_first(&ast, &key("a", "x")).is_some());
        assert!(find_first(&ast, &key("b", "y")).is_some());
    }

    #[test]
    fn finds_right_of_left_group() {
        let ast = parse_expression("(a:1 OR b:2) AND c:3").unwrap();
        assert!(find_first(&ast, &key("c", "3")).is_some());
        assert!(find_first(&ast, &key("b", "2")).is_some());
    }

    #[test]
    fn finds_inside_negated_group() {
        let ast = parse_expression("x NOT (a:1 b:2)").unwrap();
        assert!(find_first(&ast, &key("b", "2")).is_some());
    }

    #[test]
    fn modifier_must_match_prefix() {
        let ast = parse_expression("-level:debug").unwrap();
        assert!(find_first(&ast, &key("level", "debug")).is_none());
        assert!(
            find_first(&ast, &FilterKey::new("level", "debug", Modifier::Exclude)).is_some()
        );
    }

    #[test]
    fn bare_terms_never_match() {
        let ast = parse_expression("error").unwrap();
        assert!(find_first(&ast, &key("", "error")).is_none());
    }

    #[test]
    fn escaped_field_matches() {
        let ast = parse_expression(r#"k8s\:pod:"web""#).unwrap();
        assert!(find_first(&ast, &key("k8s:pod", "web")).is_some());
    }

    #[test]
    fn remove_root_term() {
        assert_eq!(removed("a:1", "a", "1"), "");
    }

    #[test]
    fn remove_left_promotes_right() {
        assert_eq!(removed("a:1 AND b:2", "a", "1"), "b:2");
        assert_eq!(removed("a:1 b:2 OR c:3", "a", "1"), "b:2 OR c:3");
    }

    #[test]
    fn remove_right_keeps_left() {
        assert_eq!(removed("a:1 AND b:2", "b", "2"), "a:1");
        assert_eq!(removed("a:1 b:2 OR c:3", "c", "3"), "a:1 b:2");
    }

    #[test]
    fn remove_inside_group() {
        assert_eq!(removed("(a:1 OR b:2) AND c:3", "a", "1"), "(b:2) AND c:3");
        assert_eq!(removed("(a:1 OR b:2) AND c:3", "b", "2"), "(a:1) AND c:3");
        assert_eq!(removed("(a:1 OR b:2) AND c:3", "c", "3"), "(a:1 OR b:2)");
    }

    #[test]
    fn remove_sole_group_member_collapses_group() {
        assert_eq!(removed("x:1 AND (a:1)", "a", "1"), "x:1");
        assert_eq!(removed("NOT a:1 AND x:1", "a", "1"), "x:1");
        assert_eq!(removed("NOT a:1", "a", "1"), "");
    }

    #[test]
    fn remove_keeps_field_scope() {
        assert_eq!(removed("host:(a:1 OR b) c", "a", "1"), "host:(b) c");
    }

    #[test]
    fn promoted_not_group_joins_operator() {
        assert_eq!(removed("a:1 b:2 NOT NOT c:3", "b", "2"), "a:1 NOT c:3");
        assert_eq!(removed("a:1 AND b:2 OR NOT NOT c:3 d", "b", "2"), "a:1 AND NOT c:3 d");
    }

    #[test]
    fn long_clause_lists_find_and_remove() {
        let values: Vec<String> = (0..50_000).map(|i| format!("f:v{i}")).collect();
        let query = values.join(" ");
        let mut ast = parse_expression(&query).unwrap();

        assert!(find_first(&ast, &key("f", "v49999")).is_some());
        assert!(find_first(&ast, &key("f", "v50000")).is_none());

        assert!(remove_first(&mut ast, &key("f", "v49999")));
        assert!(remove_first(&mut ast, &key("f", "v25000")));
        assert!(remove_first(&mut ast, &key("f", "v0")));
        assert!(!remove_first(&mut ast, &key("f", "v25000")));

        let kept = [&values[1..25_000], &values[25_001..49_999]].concat();
        assert_eq!(ast.to_query_string(), kept.join(" "));
    }

    #[test]
    fn removal_deep_in_chain_folds_not_group() {
        let mut query = (0..1000)
            .map(|i| format!("f:v{i}"))
            .collect::<Vec<_>>()
            .join(" ");
        query.push_str(" AND b:2 OR NOT NOT c:3");
        let mut ast = parse_expression(&query).unwrap();
        assert!(remove_first(&mut ast, &key("b", "2")));
        assert!(ast.to_query_string().ends_with("f:v999 AND NOT c:3"));
        assert_eq!(parse_expression(&ast.to_query_string()).unwrap(), ast);
    }

    #[test]
    fn remove_only_first_duplicate() {
        assert_eq!(removed("a:1 b:2 a:1", "a", "1"), "b:2 a:1");
    }

    #[test]
    fn remove_missing_is_noop() {
        let mut ast = parse_expression("a:1 b:2").unwrap();
        let before = ast.clone();
        assert!(!remove_first(&mut ast, &key("c", "3")));
        assert_eq!(ast, before);
    }

    #[test]
    fn removal_output_reparses_to_same_tree() {
        let cases = [
            ("(a:1 OR b:2) AND c:3", "b", "2"),
            ("x -(a:1 y) z", "a", "1"),
            ("((a:1 b)) c", "a", "1"),
            ("host:(a:1 OR b) c", "a", "1"),
            ("a:1 NOT b:2 OR NOT c:3", "b", "2"),
            ("a:1 b:2 NOT NOT c:3", "b", "2"),
            ("a:1 OR b:2 AND NOT NOT c:3 d", "b", "2"),
        ];
        for (query, field, value) in cases {
            let mut ast = parse_expression(query).unwrap();
            remove_first(&mut ast, &key(field, value));
            let text = ast.to_query_string();
            assert_eq!(parse_expression(&text).unwrap(), ast, "{query} -> {text}");
        }
    }
}
