//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::output::Format;

#[derive(Parser, Debug)]
#[command(
    name = "seekql",
    version,
    about = "Run seekql queries against a dataset file",
    disable_help_subcommand = true
)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        value_enum,
        default_value_t = Format::Json,
        help = "Output format"
    )]
    pub format: Format,

    #[arg(
        short,
        long,
        global = true,
        action = clap::ArgAction::Count,
        help = "Log more (-v debug, -vv trace); RUST_LOG takes precedence"
    )]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Filter the records of a model with a query
    Query(QueryCmd),
    /// Show the predicate a query compiles to
    Explain(ExplainCmd),
    /// Show the schema, optionally with suggestion options
    Describe(DescribeCmd),
    /// Show one page of suggestions for a field
    Suggest(SuggestCmd),
}

#[derive(Args, Debug)]
pub struct QueryCmd {
    #[arg(value_name = "DATASET")]
    pub dataset: PathBuf,

    #[arg(long, short, help = "Model to filter")]
    pub model: String,

    #[arg(value_name = "QUERY", default_value = "", help = "Query text; empty matches all")]
    pub query: String,

    #[arg(
        long,
        value_name = "FIELD",
        allow_hyphen_values = true,
        help = "Order by a field; prefix with '-' for descending. Repeatable"
    )]
    pub order: Vec<String>,

    #[arg(long, help = "Return at most this many records")]
    pub limit: Option<usize>,

    #[arg(long, help = "Skip this many records")]
    pub offset: Option<usize>,

    #[arg(long, help = "Fail on an invalid query instead of returning no records")]
    pub strict: bool,
}

#[derive(Args, Debug)]
pub struct ExplainCmd {
    #[arg(value_name = "DATASET")]
    pub dataset: PathBuf,

    #[arg(long, short, help = "Model the query is rooted at")]
    pub model: String,

    #[arg(value_name = "QUERY")]
    pub query: String,
}

#[derive(Args, Debug)]
pub struct DescribeCmd {
    #[arg(value_name = "DATASET")]
    pub dataset: PathBuf,

    #[arg(
        long,
        short,
        help = "Describe this model and the models reachable from it (default: all)"
    )]
    pub model: Option<String>,

    #[arg(
        long,
        requires = "model",
        help = "Embed the first suggestion page of suggestable fields"
    )]
    pub options: bool,
}

#[derive(Args, Debug)]
pub struct SuggestCmd {
    #[arg(value_name = "DATASET")]
    pub dataset: PathBuf,

    #[arg(value_name = "MODEL")]
    pub model: String,

    #[arg(value_name = "FIELD")]
    pub field: String,

    #[arg(long, help = "Page number, starting at 1")]
    pub page: Option<usize>,
}
