//! Proc macros for seekql.
//!
//! - [`Model`] - Generate a `seekql::Model` implementation from struct
//!   field annotations
//!
//! The macro is re-exported by the `seekql` crate; depend on that instead of
//! using this crate directly.

mod model;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives the `Model` trait for a struct.
///
/// The generated `model_description()` lists every field that is not
/// skipped, with its kind taken from `#[field(...)]` or inferred from the
/// Rust type.
///
/// # Model Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `name = "..."` | Registry name (default: struct name in snake case) |
///
/// # Field Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `text`, `integer`, `float`, `boolean`, `date`, `datetime` | Field kind |
/// | `choices("A", "B")` | Enum field with the given choices |
/// | `relation = "model"` | Relation to another model |
/// | `nullable` | Field may be null (implied by `Option<T>`) |
/// | `suggest` / `suggest = false` | Override the suggestable default |
/// | `page_size = N` | Suggestion page size |
/// | `rename = "..."` | Use a custom name in queries |
/// | `skip` | Leave the field out of the model |
///
/// Without a kind attribute, `String`/`&str` map to text, integer types to
/// integer, `f32`/`f64` to float, `bool` to boolean, `NaiveDate` to date and
/// `NaiveDateTime`/`DateTime` to datetime. Any other type needs an attribute.
///
/// # Generated Code
///
/// 1. A `MODEL_NAME` constant and field name constants (e.g. `Book::NAME`)
/// 2. Implementation of `Model::model_description()`
///
/// # Example
///
/// ```ignore
/// use seekql::{Model, Registry};
///
/// #[derive(Model)]
/// #[model(name = "core.book")]
/// struct Book {
///     #[field(suggest, page_size = 25)]
///     name: String,
///
///     #[field(choices("Drama", "Comedy"))]
///     genre: String,
///
///     #[field(relation = "auth.user")]
///     author: Option<i64>,
///
///     #[field(skip)]
///     cover: Vec<u8>,
/// }
///
/// let registry = Registry::builder().model::<User>().model::<Book>().build()?;
/// assert_eq!(Book::GENRE, "genre");
/// ```
#[proc_macro_derive(Model, attributes(model, field))]
pub fn model_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    model::model_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
