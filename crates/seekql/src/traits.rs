//! Seams to the storage collaborator and to model reflection.
//!
//! The engine never touches data itself. A storage backend implements
//! [`Collection`] to accept a translated [`Predicate`] and [`DistinctValues`]
//! to feed suggestions. Types that describe themselves to the registry
//! implement [`Model`], usually through `#[derive(Model)]`.

use crate::predicate::Predicate;
use crate::schema::{ModelDescription, SchemaField, SchemaModel};
use crate::value::Value;

/// A filterable collection of records of one model.
///
/// # Example
///
/// ```
/// use seekql::{Collection, Predicate};
///
/// struct Ids(Vec<i64>);
///
/// impl Collection for Ids {
///     fn filter(self, predicate: &Predicate) -> Self {
///         let _ = predicate;
///         self
///     }
/// }
/// ```
pub trait Collection: Sized {
    /// Returns the records of `self` for which `predicate` holds.
    fn filter(self, predicate: &Predicate) -> Self;
}

/// Source of the distinct values of a field, for suggestions.
///
/// Values must come in ascending order: lexicographic for text, numeric for
/// numbers, chronological for dates. Each call starts a fresh sequence.
///
/// Any `Fn(&SchemaModel, &SchemaField) -> Vec<Value>` is a source:
///
/// ```
/// use seekql::{DistinctValues, SchemaField, SchemaModel, Value};
///
/// let source = |_: &SchemaModel, field: &SchemaField| -> Vec<Value> {
///     match field.name.as_str() {
///         "name" => vec!["Dune".into(), "Emma".into()],
///         _ => Vec::new(),
///     }
/// };
/// # fn takes(_: &impl DistinctValues) {}
/// # takes(&source);
/// ```
pub trait DistinctValues {
    fn distinct_values<'a>(
        &'a self,
        model: &'a SchemaModel,
        field: &'a SchemaField,
    ) -> Box<dyn Iterator<Item = Value> + 'a>;
}

impl<F> DistinctValues for F
where
    F: Fn(&SchemaModel, &SchemaField) -> Vec<Value>,
{
    fn distinct_values<'a>(
        &'a self,
        model: &'a SchemaModel,
        field: &'a SchemaField,
    ) -> Box<dyn Iterator<Item = Value> + 'a> {
        Box::new(self(model, field).into_iter())
    }
}

/// A type that can describe itself as a model.
///
/// Implemented by `#[derive(Model)]` from `seekql-macros`; a manual
/// implementation works the same:
///
/// ```
/// use seekql::{FieldDescription, Model, ModelDescription, Registry};
///
/// struct Book;
///
/// impl Model for Book {
///     fn model_description() -> ModelDescription {
///         ModelDescription::new("core.book").field(FieldDescription::text("name"))
///     }
/// }
///
/// let registry = Registry::builder().model::<Book>().build().unwrap();
/// assert!(registry.lookup_model("core.book").is_some());
/// ```
pub trait Model {
    fn model_description() -> ModelDescription;
}
