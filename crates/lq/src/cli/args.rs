//! Clap argument definitions for the `lq` CLI.

use std::{env, process::exit};

use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum, error::ErrorKind};
use lq_query::{AdHocOperator, BoolOperator};

/// Parse a join operator (`AND`, `OR`, `&&`, `||`) from a string.
fn parse_operator(s: &str) -> Result<BoolOperator, String> {
    s.parse().map_err(|e: lq_query::UnknownOperator| e.to_string())
}

/// Parse an ad hoc comparison operator from a string.
fn parse_adhoc_operator(s: &str) -> Result<AdHocOperator, String> {
    s.parse().map_err(|e: lq_query::AdHocParseError| e.to_string())
}

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "lq")]
#[command(about = "Lucene query tool - parse, inspect and edit filter queries")]
pub struct Cli {
    /// Log verbosity (-v for debug, -vv for trace); RUST_LOG takes precedence
    #[arg(short = 'v', long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// The `field:value` filter a command looks for.
#[derive(Args, Debug, Clone)]
pub struct FilterArgs {
    /// Query text
    #[arg(allow_hyphen_values = true)]
    pub query: String,

    /// Field name, unescaped
    pub field: String,

    /// Value, unescaped
    #[arg(allow_hyphen_values = true)]
    pub value: String,
}

/// Flags choosing between `field:"value"` and `-field:"value"`.
#[derive(Args, Debug, Clone, Default)]
pub struct ModifierArgs {
    /// Use the exclusion form -field:"value" [default: from filters.negate]
    #[arg(long, conflicts_with = "include")]
    pub negate: bool,

    /// Use the inclusion form field:"value" even when filters.negate is set
    #[arg(long)]
    pub include: bool,
}

/// Shared output mode flag.
#[derive(Args, Debug, Clone, Default)]
pub struct JsonArgs {
    /// Output in JSON format [default: from output.json]
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `lq parse`.
#[derive(Args, Debug, Clone)]
pub struct ParseCommand {
    /// Query text
    #[arg(allow_hyphen_values = true)]
    pub query: String,

    #[command(flatten)]
    /// Output formatting flags.
    pub output: JsonArgs,
}

/// Arguments for `lq check`.
#[derive(Args, Debug, Clone)]
pub struct CheckCommand {
    /// Queries to check
    #[arg(required = true)]
    pub queries: Vec<String>,
}

/// Arguments for `lq find`.
#[derive(Args, Debug, Clone)]
pub struct FindCommand {
    #[command(flatten)]
    /// The filter to look for.
    pub filter: FilterArgs,

    #[command(flatten)]
    /// Inclusion or exclusion.
    pub modifier: ModifierArgs,

    #[command(flatten)]
    /// Output formatting flags.
    pub output: JsonArgs,
}

/// Arguments for `lq has`.
#[derive(Args, Debug, Clone)]
pub struct HasCommand {
    #[command(flatten)]
    /// The filter to look for.
    pub filter: FilterArgs,

    #[command(flatten)]
    /// Inclusion or exclusion.
    pub modifier: ModifierArgs,
}

/// Arguments for `lq add`.
#[derive(Args, Debug, Clone)]
pub struct AddCommand {
    #[command(flatten)]
    /// The filter to add.
    pub filter: FilterArgs,

    #[command(flatten)]
    /// Inclusion or exclusion.
    pub modifier: ModifierArgs,

    /// Join with AND or OR instead of a space [default: from filters.operator]
    #[arg(short = 'o', long, value_parser = parse_operator)]
    pub operator: Option<BoolOperator>,
}

/// Arguments for `lq remove`.
#[derive(Args, Debug, Clone)]
pub struct RemoveCommand {
    #[command(flatten)]
    /// The filter to remove.
    pub filter: FilterArgs,

    #[command(flatten)]
    /// Inclusion or exclusion.
    pub modifier: ModifierArgs,
}

/// Arguments for `lq terms`.
#[derive(Args, Debug, Clone)]
pub struct TermsCommand {
    /// Query text
    #[arg(allow_hyphen_values = true)]
    pub query: String,

    #[command(flatten)]
    /// Output formatting flags.
    pub output: JsonArgs,
}

/// Where an escaped value will end up.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum EscapeMode {
    /// A field name or bare term
    Term,
    /// The inside of a quoted phrase
    #[default]
    Phrase,
    /// A template value; numbers pass through untouched
    Lucene,
}

/// Arguments for `lq escape`.
#[derive(Args, Debug, Clone)]
pub struct EscapeCommand {
    /// Text to escape
    #[arg(allow_hyphen_values = true)]
    pub value: String,

    /// Escaping rules to apply
    #[arg(short = 'm', long, value_enum, default_value_t = EscapeMode::Phrase)]
    pub mode: EscapeMode,

    /// Remove backslash escapes instead of adding them
    #[arg(long, conflicts_with = "mode")]
    pub unescape: bool,
}

/// Arguments for `lq concat`.
#[derive(Args, Debug, Clone)]
pub struct ConcatCommand {
    /// Query text
    #[arg(allow_hyphen_values = true)]
    pub query: String,

    /// Filter text to append, used verbatim
    #[arg(allow_hyphen_values = true)]
    pub filter: String,

    /// Join with AND or OR instead of a space
    #[arg(short = 'o', long, value_parser = parse_operator)]
    pub operator: Option<BoolOperator>,
}

/// Arguments for `lq adhoc`.
#[derive(Args, Debug, Clone)]
pub struct AdHocCommand {
    /// Query text
    #[arg(allow_hyphen_values = true)]
    pub query: String,

    /// Field name, unescaped
    pub key: String,

    /// Comparison: = != =~ !~ > <
    #[arg(value_parser = parse_adhoc_operator)]
    pub operator: AdHocOperator,

    /// Value, unescaped
    #[arg(allow_hyphen_values = true)]
    pub value: String,
}

/// Arguments for `lq format`.
#[derive(Args, Debug, Clone)]
pub struct FormatCommand {
    /// Selected variable values
    pub values: Vec<String>,

    /// Treat the values as a multi-value selection even when there is only one
    #[arg(long)]
    pub multi: bool,

    /// Variable definition as JSON, e.g. '{"field":"host"}'
    #[arg(long)]
    pub variable_query: Option<String>,
}

/// Arguments for `lq init`.
#[derive(Args, Debug, Clone)]
pub struct InitCommand {
    /// Create global ~/.lq.toml instead
    #[arg(long)]
    pub global: bool,

    /// Overwrite existing configuration file
    #[arg(long)]
    pub force: bool,
}

/// Supported `lq` subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Parse a query and print its syntax tree
    #[command(after_help = "\
QUERY SYNTAX:
  term                Bare term in the default field
  field:value         Term in a field
  field:\"a phrase\"    Quoted phrase
  a b                 Both clauses (implicit AND)
  a AND b, a && b     Both clauses
  a OR b, a || b      Either clause
  -a, NOT a, !a       Clause must not match
  +a                  Clause must match
  (expr), f:(expr)    Grouping, optionally scoped to a field

EXAMPLES:
  lq parse 'level:error service:api'
  lq parse '(a:1 OR b:2) AND NOT c:3'
  lq parse --json 'host:(web OR db)'")]
    Parse(ParseCommand),

    /// Check that queries parse
    Check(CheckCommand),

    /// Print the first term matching a filter
    Find(FindCommand),

    /// Exit successfully if a query contains a filter
    Has(HasCommand),

    /// Add a filter unless it is already present
    #[command(after_help = "\
EXAMPLES:
  lq add 'service:api' level error             service:api level:\"error\"
  lq add 'service:api' level error --negate    service:api -level:\"error\"
  lq add 'service:api' level error -o AND      service:api AND level:\"error\"")]
    Add(AddCommand),

    /// Remove the first occurrence of a filter
    Remove(RemoveCommand),

    /// List every term in a query
    Terms(TermsCommand),

    /// Escape text for use in a query
    Escape(EscapeCommand),

    /// Append filter text to a query
    Concat(ConcatCommand),

    /// Apply a dashboard ad hoc filter (key, operator, value)
    #[command(name = "adhoc")]
    AdHoc(AdHocCommand),

    /// Render template variable values for interpolation
    Format(FormatCommand),

    /// Initialize lq configuration in current directory
    Init(InitCommand),

    /// Show effective configuration settings
    Config,
}

impl Commands {
    /// Whether the command reads `.lq.toml` settings.
    ///
    /// `init` must work even when an existing config file is invalid.
    pub fn needs_config(&self) -> bool {
        !matches!(self, Self::Init(_))
    }
}

/// Parses CLI arguments, printing a compact command list for top-level `--help`.
pub fn parse_cli() -> Cli {
    match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            if e.kind() == ErrorKind::DisplayHelp {
                let args: Vec<_> = env::args().collect();
                if args.len() <= 2 {
                    print_command_list();
                    exit(0);
                }
            }
            e.exit();
        }
    }
}

/// Prints custom top-level help listing each subcommand on one line.
fn print_command_list() {
    let cmd = Cli::command();
    let about = cmd.get_about().map(|s| s.to_string()).unwrap_or_default();

    println!("{about}");
    println!();
    println!("Usage: lq [OPTIONS] <COMMAND>");
    println!();
    println!("Commands:");

    for sub in cmd.get_subcommands() {
        let name = sub.get_name();
        if name == "help" {
            continue;
        }
        let about = sub.get_about().map(|s| s.to_string()).unwrap_or_default();
        println!("  {name:8} {about}");
    }

    println!(
        "  {:<8} Print this message or the help of the given subcommand(s)",
        "help"
    );
    println!();
    println!("Options:");
    println!("  -v, --verbose...  Log verbosity (-v for debug, -vv for trace)");
    println!("      --no-color    Disable colored output");
    println!("  -h, --help        Print help");
}
