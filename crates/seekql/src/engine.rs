//! Entry points: compile and apply a query, describe the schema, suggest values.

use tracing::debug;

use crate::error::{NotFoundError, Result};
use crate::lexer::tokenize;
use crate::parser::parse;
use crate::predicate::{translate, Predicate};
use crate::resolve::resolve;
use crate::schema::{FieldKind, Introspection, Registry, SchemaField, SchemaModel};
use crate::suggest::{paginate, SuggestionPage};
use crate::traits::{Collection, DistinctValues};
use crate::value::Value;

/// Compiles query text into a predicate over `root_model`.
///
/// An empty or blank query compiles to `None`: no filter at all.
pub fn compile(query: &str, root_model: &str, registry: &Registry) -> Result<Option<Predicate>> {
    if query.trim().is_empty() {
        return Ok(None);
    }
    let tokens = tokenize(query)?;
    let ast = parse(&tokens)?;
    let resolved = resolve(&ast, root_model, registry)?;
    let predicate = translate(&resolved);
    debug!(model = root_model, query, %predicate, "compiled query");
    Ok(Some(predicate))
}

/// Filters `collection` with a query over `root_model`.
///
/// Errors are returned as-is; turning a failed search into an empty result is
/// up to the caller.
pub fn apply<C: Collection>(
    collection: C,
    query: &str,
    root_model: &str,
    registry: &Registry,
) -> Result<C> {
    Ok(match compile(query, root_model, registry)? {
        Some(predicate) => collection.filter(&predicate),
        None => collection,
    })
}

/// Introspection of `root_model` and the models reachable from it.
pub fn describe(registry: &Registry, root_model: &str) -> std::result::Result<Introspection, NotFoundError> {
    registry.describe(root_model)
}

/// Like [`describe`], with the first suggestion page of every suggestable
/// field embedded.
pub fn describe_with_options<P>(
    registry: &Registry,
    root_model: &str,
    provider: &P,
) -> std::result::Result<Introspection, NotFoundError>
where
    P: DistinctValues + ?Sized,
{
    let mut intro = registry.describe(root_model)?;
    for view in &mut intro.models {
        let Some(model) = registry.lookup_model(&view.name) else {
            continue;
        };
        for field_view in view.fields.iter_mut().filter(|f| f.suggestable) {
            if let Some(field) = model.field(&field_view.name) {
                field_view.options = Some(page_of(model, field, provider, None));
            }
        }
    }
    Ok(intro)
}

/// Suggestion page `page` (default 1) for `model.field`.
///
/// Enum fields suggest their declared choices in lexicographic order; other
/// fields ask `provider`. A field that is not suggestable yields an empty
/// page.
pub fn suggest<P>(
    registry: &Registry,
    provider: &P,
    model: &str,
    field: &str,
    page: Option<usize>,
) -> std::result::Result<SuggestionPage, NotFoundError>
where
    P: DistinctValues + ?Sized,
{
    let (schema_model, schema_field) = registry.lookup_field(model, field)?;
    let result = page_of(schema_model, schema_field, provider, page);
    debug!(
        model,
        field,
        page = page.unwrap_or(1),
        options = result.options.len(),
        has_more = result.has_more,
        "suggestion page"
    );
    Ok(result)
}

fn page_of<P>(
    model: &SchemaModel,
    field: &SchemaField,
    provider: &P,
    page: Option<usize>,
) -> SuggestionPage
where
    P: DistinctValues + ?Sized,
{
    if !field.suggestable {
        return SuggestionPage::empty();
    }
    match &field.kind {
        FieldKind::Enum { choices } => {
            let mut sorted: Vec<&String> = choices.iter().collect();
            sorted.sort();
            let values = sorted.into_iter().map(|c| Value::Text(c.clone()));
            paginate(field, page, values)
        }
        _ => paginate(field, page, provider.distinct_values(model, field)),
    }
}
