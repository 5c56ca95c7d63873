//! Dashboard ad hoc filters (`key <op> value`) applied to query text.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    concat::concatenate,
    escape::{escape_filter, escape_filter_value},
    filter::Modifier,
    query::LuceneQuery,
};

/// Comparison operator of an ad hoc filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdHocOperator {
    /// `=`: field equals value.
    #[serde(rename = "=")]
    Equal,
    /// `!=`: field does not equal value.
    #[serde(rename = "!=")]
    NotEqual,
    /// `=~`: field matches a regular expression.
    #[serde(rename = "=~")]
    Matches,
    /// `!~`: field does not match a regular expression.
    #[serde(rename = "!~")]
    NotMatches,
    /// `>`: field is greater than value.
    #[serde(rename = ">")]
    Greater,
    /// `<`: field is less than value.
    #[serde(rename = "<")]
    Less,
}

impl AdHocOperator {
    /// Returns the operator symbol.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Equal => "=",
            Self::NotEqual => "!=",
            Self::Matches => "=~",
            Self::NotMatches => "!~",
            Self::Greater => ">",
            Self::Less => "<",
        }
    }
}

impl fmt::Display for AdHocOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned for an unrecognised ad hoc operator symbol.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown ad hoc operator '{0}' (expected one of = != =~ !~ > <)")]
pub struct AdHocParseError(pub String);

impl FromStr for AdHocOperator {
    type Err = AdHocParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "=" => Ok(Self::Equal),
            "!=" => Ok(Self::NotEqual),
            "=~" => Ok(Self::Matches),
            "!~" => Ok(Self::NotMatches),
            ">" => Ok(Self::Greater),
            "<" => Ok(Self::Less),
            other => Err(AdHocParseError(other.to_string())),
        }
    }
}

/// A single `key <op> value` constraint chosen on a dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdHocFilter {
    /// Field name, unescaped.
    pub key: String,
    /// Comparison.
    pub operator: AdHocOperator,
    /// Value, unescaped.
    pub value: String,
}

impl AdHocFilter {
    /// Creates a filter.
    pub fn new(key: impl Into<String>, operator: AdHocOperator, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            operator,
            value: value.into(),
        }
    }
}

/// Adds one ad hoc filter to `query`.
///
/// Equality filters go through [`LuceneQuery::add_filter`] and are therefore not duplicated.
/// The other operators append a fragment (`key:/re/`, `-key:/re/`, `key:>v`, `key:<v`). A filter
/// with an empty key or value leaves the query as it is.
pub fn add_ad_hoc_filter(query: &str, filter: &AdHocFilter) -> String {
    if filter.key.is_empty() || filter.value.is_empty() {
        return query.to_string();
    }

    let modifier = match filter.operator {
        AdHocOperator::Equal => Some(Modifier::Include),
        AdHocOperator::NotEqual => Some(Modifier::Exclude),
        _ => None,
    };
    if let Some(modifier) = modifier {
        return LuceneQuery::parse(query)
            .add_filter(&filter.key, &filter.value, modifier)
            .to_string();
    }

    let key = escape_filter(&filter.key);
    let value = escape_filter_value(&filter.value);
    let fragment = match filter.operator {
        AdHocOperator::Matches => format!("{key}:/{value}/"),
        AdHocOperator::NotMatches => format!("-{key}:/{value}/"),
        AdHocOperator::Greater => format!("{key}:>{value}"),
        AdHocOperator::Less => format!("{key}:<{value}"),
        AdHocOperator::Equal | AdHocOperator::NotEqual => String::new(),
    };
    concatenate(query, &fragment, None)
}

/// Adds every filter in order.
pub fn apply_ad_hoc_filters(query: &str, filters: &[AdHocFilter]) -> String {
    filters
        .iter()
        .fold(query.to_string(), |acc, filter| add_ad_hoc_filter(&acc, filter))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(query: &str, key: &str, op: &str, value: &str) -> String {
        add_ad_hoc_filter(query, &AdHocFilter::new(key, op.parse().unwrap(), value))
    }

    #[test]
    fn equality_adds_quoted_filter() {
        assert_eq!(apply("", "level", "=", "error"), "level:\"error\"");
        assert_eq!(apply("foo", "level", "!=", "error"), "foo -level:\"error\"");
    }

    #[test]
    fn equality_is_not_duplicated() {
        assert_eq!(apply("level:\"error\"", "level", "=", "error"), "level:\"error\"");
    }

    #[test]
    fn regex_operators() {
        assert_eq!(apply("foo", "host", "=~", "web.*"), "foo host:/web.*/");
        assert_eq!(apply("foo", "host", "!~", "web.*"), "foo -host:/web.*/");
    }

    #[test]
    fn range_operators() {
        assert_eq!(apply("", "latency", ">", "100"), "latency:>100");
        assert_eq!(apply("a:1", "latency", "<", "5"), "a:1 latency:<5");
    }

    #[test]
    fn keys_are_escaped() {
        assert_eq!(apply("", "k8s:pod", ">", "1"), r"k8s\:pod:>1");
        assert_eq!(apply("", "k8s:pod", "=", "web"), r#"k8s\:pod:"web""#);
    }

    #[test]
    fn empty_key_or_value_is_ignored() {
        assert_eq!(apply("foo", "", "=", "x"), "foo");
        assert_eq!(apply("foo", "x", "=", ""), "foo");
    }

    #[test]
    fn fragments_parse() {
        for op in ["=", "!=", "=~", "!~", ">", "<"] {
            let text = apply("service:api", "level", op, "err");
            assert!(LuceneQuery::parse(&text).is_valid(), "{op}: {text}");
        }
    }

    #[test]
    fn applies_in_order() {
        let filters = [
            AdHocFilter::new("a", AdHocOperator::Equal, "1"),
            AdHocFilter::new("b", AdHocOperator::Greater, "2"),
        ];
        assert_eq!(apply_ad_hoc_filters("x", &filters), "x a:\"1\" b:>2");
    }

    #[test]
    fn operator_symbols() {
        assert_eq!("=~".parse::<AdHocOperator>().unwrap(), AdHocOperator::Matches);
        assert_eq!(AdHocOperator::NotEqual.to_string(), "!=");
        assert!("==".parse::<AdHocOperator>().is_err());
    }
}
