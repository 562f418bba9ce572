//! Command-line front end for seekql.
//!
//! Every command reads a dataset file (see [`dataset`]), builds the registry
//! and an in-memory store from it, and prints its result as JSON or YAML.
//!
//! ```text
//! seekql query books.yaml --model core.book 'author.username = "tema"' --order -rating
//! seekql explain books.yaml --model core.book 'not (genre = "Drama" or published = true)'
//! seekql describe books.yaml --model core.book --options
//! seekql suggest books.yaml core.book name --page 2
//! ```
//!
//! [`run`] returns the rendered output instead of printing it, so commands
//! can be exercised in-process.

pub mod cli;
pub mod dataset;
pub mod output;

use anyhow::{bail, Context, Result};
use seekql::{
    apply, compile, describe, describe_with_options, suggest, NotFoundError, Predicate, Registry,
};
use seekql_memory::{OrderBy, Record};
use serde::Serialize;
use tracing::warn;

pub use cli::{Cli, Command, DescribeCmd, ExplainCmd, QueryCmd, SuggestCmd};
pub use dataset::{Dataset, Loaded};
pub use output::{render, Format, OutputError};

/// Result of the `query` command.
#[derive(Debug, Serialize)]
pub struct QueryOutput<'a> {
    /// Matching records before limit and offset.
    pub count: usize,
    pub results: Vec<&'a Record>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Result of the `explain` command.
#[derive(Debug, Serialize)]
pub struct Explanation<'a> {
    pub model: &'a str,
    pub query: &'a str,
    /// Rendered predicate; null for an empty query.
    pub predicate: Option<String>,
    pub tree: Option<Predicate>,
}

/// Runs a parsed command line and returns its rendered output.
pub fn run(cli: &Cli) -> Result<String> {
    match &cli.command {
        Command::Query(cmd) => query(cmd, cli.format),
        Command::Explain(cmd) => explain(cmd, cli.format),
        Command::Describe(cmd) => describe_cmd(cmd, cli.format),
        Command::Suggest(cmd) => suggest_cmd(cmd, cli.format),
    }
}

fn query(cmd: &QueryCmd, format: Format) -> Result<String> {
    let Loaded { registry, store } = dataset::open(&cmd.dataset)?;
    require_model(&registry, &cmd.model)?;

    let mut queryset = store.query(&cmd.model);
    for spec in &cmd.order {
        let order = OrderBy::parse(spec);
        if order.field != "id" {
            registry.lookup_field(&cmd.model, &order.field)?;
        }
        queryset = queryset.order_by(&order.field, order.dir);
    }
    if let Some(offset) = cmd.offset {
        queryset = queryset.offset(offset);
    }
    if let Some(limit) = cmd.limit {
        queryset = queryset.limit(limit);
    }

    let output = match apply(queryset, &cmd.query, &cmd.model, &registry) {
        Ok(queryset) => QueryOutput {
            count: queryset.count(),
            results: queryset.fetch(),
            warning: None,
        },
        Err(err) if cmd.strict => {
            return Err(err).with_context(|| format!("invalid query: {}", cmd.query));
        }
        Err(err) => {
            warn!(query = %cmd.query, error = %err, "invalid query; returning no records");
            QueryOutput {
                count: 0,
                results: Vec::new(),
                warning: Some(err.to_string()),
            }
        }
    };
    Ok(render(&output, format)?)
}

fn explain(cmd: &ExplainCmd, format: Format) -> Result<String> {
    let Loaded { registry, .. } = dataset::open(&cmd.dataset)?;
    require_model(&registry, &cmd.model)?;
    let tree = compile(&cmd.query, &cmd.model, &registry)
        .with_context(|| format!("invalid query: {}", cmd.query))?;
    let explanation = Explanation {
        model: &cmd.model,
        query: &cmd.query,
        predicate: tree.as_ref().map(Predicate::to_string),
        tree,
    };
    Ok(render(&explanation, format)?)
}

fn describe_cmd(cmd: &DescribeCmd, format: Format) -> Result<String> {
    let Loaded { registry, store } = dataset::open(&cmd.dataset)?;
    let introspection = match (&cmd.model, cmd.options) {
        (Some(model), true) => describe_with_options(&registry, model, &store)?,
        (Some(model), false) => describe(&registry, model)?,
        (None, true) => bail!("--options needs --model"),
        (None, false) => registry.introspect(),
    };
    Ok(render(&introspection, format)?)
}

fn suggest_cmd(cmd: &SuggestCmd, format: Format) -> Result<String> {
    let Loaded { registry, store } = dataset::open(&cmd.dataset)?;
    let page = suggest(&registry, &store, &cmd.model, &cmd.field, cmd.page)?;
    Ok(render(&page, format)?)
}

fn require_model(registry: &Registry, model: &str) -> Result<()> {
    if registry.lookup_model(model).is_none() {
        return Err(NotFoundError::Model(model.to_string()).into());
    }
    Ok(())
}
