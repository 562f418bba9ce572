//! Schema registry.
//!
//! A [`Registry`] is built once from a list of [`ModelDescription`]s and is
//! read-only afterwards. It owns every [`SchemaModel`]; relation fields refer
//! to their target model by name, so cyclic relation graphs need no shared
//! ownership.
//!
//! ```
//! use seekql::{FieldDescription, FieldPath, ModelDescription, Registry};
//!
//! let registry = Registry::build(vec![
//!     ModelDescription::new("auth.user").field(FieldDescription::text("username")),
//!     ModelDescription::new("core.book")
//!         .field(FieldDescription::text("name"))
//!         .field(FieldDescription::relation("author", "auth.user")),
//! ])
//! .unwrap();
//!
//! let resolved = registry
//!     .resolve_path("core.book", &FieldPath::parse_dotted("author.username"))
//!     .unwrap();
//! assert_eq!(resolved.model.name(), "auth.user");
//! assert_eq!(resolved.hops.len(), 1);
//! ```

mod config;
mod description;
mod field;
mod introspect;
mod registry;

pub use config::{MembershipPolicy, SchemaConfig, DEFAULT_PAGE_SIZE};
pub use description::{FieldDescription, ModelDescription};
pub use field::{FieldKind, SchemaField, SchemaModel};
pub use introspect::{FieldView, Introspection, ModelView};
pub use registry::{Registry, RegistryBuilder, RelationHop, ResolvedPath};
