//! Lucene query parsing and filter manipulation for lq.
//!
//! Dashboards drive a search engine with free-text Lucene queries and let users toggle
//! `field:value` filters on and off. This crate turns that text into a tree, finds, adds and
//! removes filters anywhere in the tree, and serializes it back:
//!
//! - **Terms**: `error`, `level:error`, `msg:"disk full"`
//! - **Operators**: `a AND b`, `a OR b`, `a AND NOT b`, `&&`, `||`, and implicit joins `a b`
//! - **Negation**: `-level:debug`, `NOT a`, `!a`
//! - **Grouping**: `(a OR b) AND c`, `host:(web OR db)`
//!
//! Failed parses are values, not errors: a [`LuceneQuery`] remembers its text and the
//! [`ParseError`] so half-typed queries can be carried around unchanged.
//!
//! # Example
//!
//! ```
//! use lq_query::{LuceneQuery, Modifier};
//!
//! let query = LuceneQuery::parse("service:api");
//! let filtered = query.add_filter("level", "error", Modifier::Exclude);
//! assert_eq!(filtered.to_string(), r#"service:api -level:"error""#);
//! assert!(filtered.has_filter("level", "error", Modifier::Exclude));
//!
//! let restored = filtered.remove_filter("level", "error", Modifier::Exclude);
//! assert_eq!(restored.to_string(), "service:api");
//! ```

#![warn(missing_docs)]

mod adhoc;
mod ast;
mod concat;
mod error;
mod escape;
mod filter;
mod lexer;
mod parser;
mod query;
mod span;
mod template;

pub use adhoc::{
    AdHocFilter, AdHocOperator, AdHocParseError, add_ad_hoc_filter, apply_ad_hoc_filters,
};
pub use ast::{Binary, GroupPrefix, LeftOnly, Node, Operator, Prefix, Term};
pub use concat::{BoolOperator, UnknownOperator, concatenate};
pub use error::{ParseError, ParseErrorKind};
pub use escape::{escape_filter, escape_filter_value, lucene_escape, unescape};
pub use filter::{Modifier, UnknownModifier};
pub use lexer::{Token, TokenKind, tokenize};
pub use parser::{MAX_NESTING, parse_expression};
pub use query::LuceneQuery;
pub use span::{Position, Span};
pub use template::{EMPTY_SELECTION, TemplateValue, format_template_value};
