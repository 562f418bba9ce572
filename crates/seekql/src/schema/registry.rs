//! The registry: construction, lookup and path resolution.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use serde::Serialize;
use tracing::debug;

use super::config::SchemaConfig;
use super::description::{FieldDescription, ModelDescription};
use super::field::{FieldKind, SchemaField, SchemaModel};
use super::introspect::Introspection;
use crate::ast::FieldPath;
use crate::error::{NotFoundError, SchemaBuildError, SchemaPathError};
use crate::traits::Model;

/// One traversal step from a model to a related model.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RelationHop {
    /// Model the hop starts from.
    pub model: String,
    /// Relation field followed.
    pub field: String,
    /// Model the hop lands on.
    pub target: String,
}

/// A field path walked through the registry.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPath<'r> {
    /// Relation hops in traversal order; empty for a field of the start model.
    pub hops: Vec<RelationHop>,
    /// Model owning the terminal field.
    pub model: &'r SchemaModel,
    /// The terminal field; never a relation.
    pub field: &'r SchemaField,
}

/// Read-only set of models, keyed by name.
///
/// Build it once and share it by reference; nothing mutates it after
/// [`Registry::build`] returns.
#[derive(Debug, Clone, PartialEq)]
pub struct Registry {
    models: BTreeMap<String, SchemaModel>,
    config: SchemaConfig,
}

impl Registry {
    /// Starts a builder, for a non-default [`SchemaConfig`].
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Builds a registry with the default configuration.
    pub fn build<I>(descriptions: I) -> Result<Self, SchemaBuildError>
    where
        I: IntoIterator<Item = ModelDescription>,
    {
        Registry::builder().models(descriptions).build()
    }

    pub fn config(&self) -> &SchemaConfig {
        &self.config
    }

    /// Looks up a model by name.
    pub fn lookup_model(&self, name: &str) -> Option<&SchemaModel> {
        self.models.get(name)
    }

    /// All models, ordered by name.
    pub fn models(&self) -> impl Iterator<Item = &SchemaModel> {
        self.models.values()
    }

    /// Looks up a field of a model, for introspection and suggestions.
    pub fn lookup_field(
        &self,
        model: &str,
        field: &str,
    ) -> Result<(&SchemaModel, &SchemaField), NotFoundError> {
        let schema_model = self
            .lookup_model(model)
            .ok_or_else(|| NotFoundError::Model(model.to_string()))?;
        let schema_field = schema_model
            .field(field)
            .ok_or_else(|| NotFoundError::Field {
                model: model.to_string(),
                field: field.to_string(),
            })?;
        Ok((schema_model, schema_field))
    }

    /// Walks `path` from the model named `start`.
    ///
    /// Every segment but the last must be a relation field; the last must not
    /// be one.
    pub fn resolve_path(
        &self,
        start: &str,
        path: &FieldPath,
    ) -> Result<ResolvedPath<'_>, SchemaPathError> {
        let mut model = self
            .lookup_model(start)
            .ok_or_else(|| SchemaPathError::UnknownModel(start.to_string()))?;
        let (last, init) = path
            .segments()
            .split_last()
            .ok_or(SchemaPathError::EmptyPath)?;

        let mut hops = Vec::with_capacity(init.len());
        for segment in init {
            let field = self.field_of(model, segment)?;
            let target = field
                .kind
                .relation_target()
                .ok_or_else(|| SchemaPathError::NotARelation {
                    model: model.name().to_string(),
                    field: segment.clone(),
                })?;
            hops.push(RelationHop {
                model: model.name().to_string(),
                field: segment.clone(),
                target: target.to_string(),
            });
            model = self
                .lookup_model(target)
                .ok_or_else(|| SchemaPathError::UnknownModel(target.to_string()))?;
        }

        let field = self.field_of(model, last)?;
        if field.kind.is_relation() {
            return Err(SchemaPathError::RelationNotTerminal {
                model: model.name().to_string(),
                field: last.clone(),
            });
        }
        Ok(ResolvedPath { hops, model, field })
    }

    fn field_of<'r>(
        &self,
        model: &'r SchemaModel,
        name: &str,
    ) -> Result<&'r SchemaField, SchemaPathError> {
        model.field(name).ok_or_else(|| SchemaPathError::UnknownField {
            model: model.name().to_string(),
            field: name.to_string(),
        })
    }

    /// Introspection of `root` and every model reachable from it through
    /// relation fields.
    pub fn describe(&self, root: &str) -> Result<Introspection, NotFoundError> {
        let root_model = self
            .lookup_model(root)
            .ok_or_else(|| NotFoundError::Model(root.to_string()))?;

        let mut seen = BTreeSet::new();
        let mut queue = VecDeque::from([root_model]);
        seen.insert(root_model.name());
        while let Some(model) = queue.pop_front() {
            for target in model.relations().filter_map(|f| f.kind.relation_target()) {
                if let Some(next) = self.lookup_model(target) {
                    if seen.insert(next.name()) {
                        queue.push_back(next);
                    }
                }
            }
        }

        let models = self.models().filter(|m| seen.contains(m.name()));
        Ok(Introspection::new(Some(root.to_string()), models))
    }

    /// Introspection of every registered model.
    pub fn introspect(&self) -> Introspection {
        Introspection::new(None, self.models())
    }
}

/// Builder for [`Registry`].
#[derive(Debug, Clone, Default)]
pub struct RegistryBuilder {
    config: SchemaConfig,
    descriptions: Vec<ModelDescription>,
}

impl RegistryBuilder {
    pub fn config(mut self, config: SchemaConfig) -> Self {
        self.config = config;
        self
    }

    /// Adds model descriptions.
    pub fn models<I>(mut self, descriptions: I) -> Self
    where
        I: IntoIterator<Item = ModelDescription>,
    {
        self.descriptions.extend(descriptions);
        self
    }

    /// Adds the description of a type implementing [`Model`].
    pub fn model<M: Model>(mut self) -> Self {
        self.descriptions.push(M::model_description());
        self
    }

    /// Validates the descriptions and builds the registry.
    ///
    /// Fails if a model or field name repeats, a relation points outside the
    /// described models, an enum has no choices, or a page size is zero.
    pub fn build(self) -> Result<Registry, SchemaBuildError> {
        let mut names = BTreeSet::new();
        for desc in &self.descriptions {
            if !names.insert(desc.name.as_str()) {
                return Err(SchemaBuildError::DuplicateModel(desc.name.clone()));
            }
        }

        let mut models = BTreeMap::new();
        for desc in &self.descriptions {
            let mut fields: Vec<SchemaField> = Vec::with_capacity(desc.fields.len());
            for field in &desc.fields {
                if fields.iter().any(|f| f.name == field.name) {
                    return Err(SchemaBuildError::DuplicateField {
                        model: desc.name.clone(),
                        field: field.name.clone(),
                    });
                }
                fields.push(self.schema_field(&desc.name, field, &names)?);
            }
            models.insert(desc.name.clone(), SchemaModel::new(desc.name.clone(), fields));
        }

        debug!(
            models = models.len(),
            membership = ?self.config.membership,
            "schema registry built"
        );
        Ok(Registry {
            models,
            config: self.config,
        })
    }

    fn schema_field(
        &self,
        model: &str,
        desc: &FieldDescription,
        models: &BTreeSet<&str>,
    ) -> Result<SchemaField, SchemaBuildError> {
        match &desc.kind {
            FieldKind::Relation { target } if !models.contains(target.as_str()) => {
                return Err(SchemaBuildError::UnknownRelationTarget {
                    model: model.to_string(),
                    field: desc.name.clone(),
                    target: target.clone(),
                });
            }
            FieldKind::Enum { choices } if choices.is_empty() => {
                return Err(SchemaBuildError::EmptyChoices {
                    model: model.to_string(),
                    field: desc.name.clone(),
                });
            }
            _ => {}
        }

        let page_size = desc.page_size.unwrap_or(self.config.default_page_size);
        if page_size == 0 {
            return Err(SchemaBuildError::ZeroPageSize {
                model: model.to_string(),
                field: desc.name.clone(),
            });
        }

        let suggestable = match &desc.kind {
            FieldKind::Relation { .. } => false,
            FieldKind::Enum { .. } => desc.suggestable.unwrap_or(true),
            _ => desc.suggestable.unwrap_or(false),
        };

        Ok(SchemaField {
            name: desc.name.clone(),
            kind: desc.kind.clone(),
            nullable: desc.nullable,
            suggestable,
            page_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::MembershipPolicy;

    fn library() -> Vec<ModelDescription> {
        vec![
            ModelDescription::new("auth.user")
                .field(FieldDescription::text("username").suggestable(true))
                .field(FieldDescription::relation("profile", "auth.profile").nullable()),
            ModelDescription::new("auth.profile").field(FieldDescription::text("bio")),
            ModelDescription::new("core.book")
                .field(FieldDescription::text("name"))
                .field(FieldDescription::enumeration("genre", ["Drama", "Comedy"]))
                .field(FieldDescription::relation("author", "auth.user")),
            ModelDescription::new("core.tag").field(FieldDescription::text("label")),
        ]
    }

    fn path(p: &str) -> FieldPath {
        FieldPath::parse_dotted(p)
    }

    #[test]
    fn build_applies_defaults() {
        let registry = Registry::build(library()).unwrap();
        let book = registry.lookup_model("core.book").unwrap();
        let genre = book.field("genre").unwrap();
        assert!(genre.suggestable);
        assert_eq!(genre.page_size, 100);
        assert!(!book.field("name").unwrap().suggestable);
        assert!(!book.field("author").unwrap().suggestable);
    }

    #[test]
    fn builder_config_sets_page_size() {
        let registry = Registry::builder()
            .config(SchemaConfig {
                default_page_size: 7,
                membership: MembershipPolicy::EnumerableOnly,
            })
            .models(library())
            .build()
            .unwrap();
        let (_, field) = registry.lookup_field("auth.user", "username").unwrap();
        assert_eq!(field.page_size, 7);
        assert_eq!(registry.config().membership, MembershipPolicy::EnumerableOnly);
    }

    #[test]
    fn dangling_relation_is_rejected() {
        let err = Registry::build(vec![ModelDescription::new("core.book")
            .field(FieldDescription::relation("author", "auth.user"))])
        .unwrap_err();
        assert_eq!(
            err,
            SchemaBuildError::UnknownRelationTarget {
                model: "core.book".into(),
                field: "author".into(),
                target: "auth.user".into(),
            }
        );
    }

    #[test]
    fn duplicates_are_rejected() {
        let err = Registry::build(vec![
            ModelDescription::new("a"),
            ModelDescription::new("a"),
        ])
        .unwrap_err();
        assert_eq!(err, SchemaBuildError::DuplicateModel("a".into()));

        let err = Registry::build(vec![ModelDescription::new("a")
            .field(FieldDescription::text("x"))
            .field(FieldDescription::integer("x"))])
        .unwrap_err();
        assert!(matches!(err, SchemaBuildError::DuplicateField { .. }));
    }

    #[test]
    fn invalid_field_settings_are_rejected() {
        let empty: [&str; 0] = [];
        let err = Registry::build(vec![
            ModelDescription::new("a").field(FieldDescription::enumeration("e", empty))
        ])
        .unwrap_err();
        assert!(matches!(err, SchemaBuildError::EmptyChoices { .. }));

        let err = Registry::build(vec![
            ModelDescription::new("a").field(FieldDescription::text("t").page_size(0))
        ])
        .unwrap_err();
        assert!(matches!(err, SchemaBuildError::ZeroPageSize { .. }));
    }

    #[test]
    fn self_referencing_model_builds() {
        let registry = Registry::build(vec![ModelDescription::new("node")
            .field(FieldDescription::text("label"))
            .field(FieldDescription::relation("parent", "node").nullable())])
        .unwrap();
        let resolved = registry
            .resolve_path("node", &path("parent.parent.label"))
            .unwrap();
        assert_eq!(resolved.hops.len(), 2);
        assert_eq!(resolved.field.name, "label");
    }

    #[test]
    fn resolve_path_through_two_hops() {
        let registry = Registry::build(library()).unwrap();
        let resolved = registry
            .resolve_path("core.book", &path("author.profile.bio"))
            .unwrap();
        assert_eq!(resolved.model.name(), "auth.profile");
        assert_eq!(
            resolved.hops,
            vec![
                RelationHop {
                    model: "core.book".into(),
                    field: "author".into(),
                    target: "auth.user".into(),
                },
                RelationHop {
                    model: "auth.user".into(),
                    field: "profile".into(),
                    target: "auth.profile".into(),
                },
            ]
        );
    }

    #[test]
    fn resolve_path_errors() {
        let registry = Registry::build(library()).unwrap();
        assert_eq!(
            registry.resolve_path("core.book", &path("nope")).unwrap_err(),
            SchemaPathError::UnknownField {
                model: "core.book".into(),
                field: "nope".into(),
            }
        );
        assert_eq!(
            registry
                .resolve_path("core.book", &path("name.length"))
                .unwrap_err(),
            SchemaPathError::NotARelation {
                model: "core.book".into(),
                field: "name".into(),
            }
        );
        assert!(matches!(
            registry.resolve_path("core.book", &path("author")),
            Err(SchemaPathError::RelationNotTerminal { .. })
        ));
        assert!(matches!(
            registry.resolve_path("core.book", &FieldPath::new(Vec::<String>::new())),
            Err(SchemaPathError::EmptyPath)
        ));
        assert!(matches!(
            registry.resolve_path("core.nope", &path("name")),
            Err(SchemaPathError::UnknownModel(_))
        ));
    }

    #[test]
    fn describe_covers_reachable_models_only() {
        let registry = Registry::build(library()).unwrap();
        let intro = registry.describe("core.book").unwrap();
        let names: Vec<_> = intro.models.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["auth.profile", "auth.user", "core.book"]);
        assert_eq!(intro.current_model.as_deref(), Some("core.book"));

        assert_eq!(registry.introspect().models.len(), 4);
        assert_eq!(
            registry.describe("missing").unwrap_err(),
            NotFoundError::Model("missing".into())
        );
    }

    #[test]
    fn lookup_field_not_found() {
        let registry = Registry::build(library()).unwrap();
        assert_eq!(
            registry.lookup_field("core.book", "isbn").unwrap_err(),
            NotFoundError::Field {
                model: "core.book".into(),
                field: "isbn".into(),
            }
        );
    }
}
