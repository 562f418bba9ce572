//! In-memory storage for seekql.
//!
//! [`MemoryStore`] keeps typed [`Record`]s per model and plays both roles the
//! engine expects from a storage collaborator: its [`QuerySet`] is a
//! [`seekql::Collection`] that evaluates predicates (relation hops included),
//! and the store itself is a [`seekql::DistinctValues`] source for
//! suggestions.
//!
//! # Quick Start
//!
//! ```rust
//! use seekql::{apply, suggest, FieldDescription, ModelDescription, Registry, Value};
//! use seekql_memory::{MemoryStore, Record};
//!
//! let registry = Registry::build(vec![
//!     ModelDescription::new("auth.user")
//!         .field(FieldDescription::text("username").suggestable(true)),
//!     ModelDescription::new("core.book")
//!         .field(FieldDescription::text("name"))
//!         .field(FieldDescription::relation("author", "auth.user")),
//! ])
//! .unwrap();
//!
//! let mut store = MemoryStore::new();
//! store.insert("auth.user", Record::new(1).with("username", "tema")).unwrap();
//! store.insert("auth.user", Record::new(2).with("username", "ann")).unwrap();
//! store.insert("core.book", Record::new(1).with("name", "Dune").with("author", 1i64)).unwrap();
//! store.insert("core.book", Record::new(2).with("name", "Emma").with("author", 2i64)).unwrap();
//!
//! let books = apply(
//!     store.query("core.book"),
//!     r#"author.username = "tema""#,
//!     "core.book",
//!     &registry,
//! )
//! .unwrap();
//! assert_eq!(books.ids(), vec![1]);
//!
//! let page = suggest(&registry, &store, "auth.user", "username", None).unwrap();
//! assert_eq!(page.options, vec![Value::from("ann"), Value::from("tema")]);
//! ```

mod error;
mod load;
mod matcher;
mod ordering;
mod record;
mod store;

pub use error::{LoadError, Result};
pub use load::{load, RawRecords};
pub use matcher::holds;
pub use ordering::{compare_values, Dir, OrderBy};
pub use record::Record;
pub use store::{MemoryStore, QuerySet};
