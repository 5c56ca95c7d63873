//! lq: Lucene filter queries from the command line.
//!
//! Dashboards store their searches as Lucene query text and toggle `field:value` filters on
//! and off as users click around. lq exposes the same operations to shells and scripts: parse a
//! query and show its tree, check whether a filter is present, add or remove one, escape values,
//! and interpolate template variables. The query engine itself lives in `lq-query`.

#![warn(missing_docs)]

pub mod cli;
