//! CLI support for the `lq` binary.

pub mod args;
pub mod commands;
pub mod context;

pub use context::CommandContext;
