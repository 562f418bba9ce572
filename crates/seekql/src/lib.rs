//! seekql - a small query language for filtering relational models.
//!
//! A query such as `author.username = "tema" and not genre in ["Drama"]` goes
//! through a fixed pipeline:
//!
//! ```text
//! text ─▶ tokenize ─▶ parse ─▶ resolve (Registry) ─▶ translate ─▶ Predicate
//! ```
//!
//! The resulting [`Predicate`] is backend-agnostic: a storage collaborator
//! implementing [`Collection`] evaluates it. Suggestions for autocompletion
//! are served page by page from a [`DistinctValues`] source.
//!
//! # Quick Start
//!
//! ```rust
//! use seekql::{compile, FieldDescription, ModelDescription, Predicate, Registry};
//!
//! let registry = Registry::build(vec![
//!     ModelDescription::new("auth.user").field(FieldDescription::text("username")),
//!     ModelDescription::new("core.book")
//!         .field(FieldDescription::enumeration("genre", ["Drama", "Comedy"]))
//!         .field(FieldDescription::boolean("published"))
//!         .field(FieldDescription::relation("author", "auth.user")),
//! ])
//! .unwrap();
//!
//! let predicate = compile(
//!     r#"genre = "Drama" and not author.username = "tema""#,
//!     "core.book",
//!     &registry,
//! )
//! .unwrap()
//! .unwrap();
//!
//! let Predicate::And(children) = &predicate else { unreachable!() };
//! assert_eq!(children.len(), 2);
//! assert_eq!(predicate.to_string(), r#"(genre = "Drama" and not author.username = "tema")"#);
//! ```
//!
//! # Operators
//!
//! | Kind | Operators |
//! |------|-----------|
//! | text | `=` `!=` `>` `>=` `<` `<=` `in` `not in` `~` `!~` |
//! | integer, float, date, datetime | `=` `!=` `>` `>=` `<` `<=` `in` `not in` |
//! | boolean | `=` `!=` `in` `not in` |
//! | enum | `=` `!=` `in` `not in` |
//!
//! Membership on non-enumerable kinds can be switched off with
//! [`MembershipPolicy::EnumerableOnly`]. `null` compares with `=` and `!=` on
//! nullable fields only.
//!
//! # Errors
//!
//! Each stage has its own error type ([`LexError`], [`SyntaxError`],
//! [`SchemaError`], [`ValueValidationError`]); [`apply`] and [`compile`]
//! fold them into [`SearchError`]. Lookups for introspection and suggestions
//! fail with [`NotFoundError`]. A page past the end of the suggestions is
//! not an error; it is an empty page.

mod ast;
mod coerce;
mod engine;
mod error;
mod lexer;
mod op;
mod parser;
mod predicate;
mod resolve;
mod schema;
mod suggest;
mod token;
mod traits;
mod value;

pub use ast::{Comparison, FieldPath, Literal, LogicalOp, Node};
pub use coerce::coerce_literal;
pub use engine::{apply, compile, describe, describe_with_options, suggest};
pub use error::{
    LexError, LexErrorReason, NotFoundError, ResolveError, Result, SchemaBuildError, SchemaError,
    SchemaPathError, SearchError, SyntaxError, ValueValidationError,
};
pub use lexer::tokenize;
pub use op::CompareOp;
pub use parser::{parse, parse_query, MAX_DEPTH};
pub use predicate::{translate, Condition, Predicate};
pub use resolve::{resolve, ResolvedComparison, ResolvedNode};
pub use schema::{
    FieldDescription, FieldKind, FieldView, Introspection, MembershipPolicy, ModelDescription,
    ModelView, Registry, RegistryBuilder, RelationHop, ResolvedPath, SchemaConfig, SchemaField,
    SchemaModel, DEFAULT_PAGE_SIZE,
};
pub use suggest::{paginate, SuggestionPage};
pub use token::{Token, TokenKind};
pub use traits::{Collection, DistinctValues, Model};
pub use value::Value;

// Derive macro, in the macro namespace next to the trait.
pub use seekql_macros::Model;

