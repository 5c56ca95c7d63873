//! Joining query text without a parse round trip.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An explicit operator for joining two clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BoolOperator {
    /// Both sides must match.
    And,
    /// Either side may match.
    Or,
}

impl BoolOperator {
    /// Returns the operator keyword.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

impl fmt::Display for BoolOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not `AND` or `OR`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown boolean operator '{0}' (expected AND or OR)")]
pub struct UnknownOperator(pub String);

impl FromStr for BoolOperator {
    type Err = UnknownOperator;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AND" | "&&" => Ok(Self::And),
            "OR" | "||" => Ok(Self::Or),
            _ => Err(UnknownOperator(s.to_string())),
        }
    }
}

/// Appends `filter` to `query`.
///
/// An empty filter leaves the query alone and an empty (or blank) query yields the filter
/// verbatim. Otherwise the two are joined by a single space, or by ` AND `/` OR ` when
/// `operator` is given.
pub fn concatenate(query: &str, filter: &str, operator: Option<BoolOperator>) -> String {
    if filter.is_empty() {
        return query.to_string();
    }
    if query.trim().is_empty() {
        return filter.to_string();
    }

    match operator {
        Some(op) => format!("{query} {op} {filter}"),
        None => format!("{query} {filter}"),
    }
}
