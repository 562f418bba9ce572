//! Serializable snapshot of the registry for client-side autocompletion.
//!
//! The serialized shape is:
//!
//! ```json
//! {
//!   "current_model": "core.book",
//!   "models": {
//!     "auth.user": {"username": {"type": "text", "nullable": false, "suggestable": true}},
//!     "core.book": {
//!       "genre": {"type": "enum", "nullable": false, "suggestable": true,
//!                 "options": ["Comedy", "Drama"], "has_more_options": false,
//!                 "next_options_page_number": null},
//!       "author": {"type": "relation", "nullable": false, "suggestable": false,
//!                  "relation": "auth.user"}
//!     }
//!   }
//! }
//! ```
//!
//! Models are ordered by name and fields by declaration. The option keys are
//! present only when options were requested.

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::field::{SchemaField, SchemaModel};
use crate::suggest::SuggestionPage;

/// Introspection of a set of models.
#[derive(Debug, Clone, PartialEq)]
pub struct Introspection {
    /// Model the snapshot was taken for, if any.
    pub current_model: Option<String>,
    /// Models in ascending name order.
    pub models: Vec<ModelView>,
}

/// One model of an [`Introspection`].
#[derive(Debug, Clone, PartialEq)]
pub struct ModelView {
    pub name: String,
    /// Fields in declaration order.
    pub fields: Vec<FieldView>,
}

/// One field of a [`ModelView`].
#[derive(Debug, Clone, PartialEq)]
pub struct FieldView {
    pub name: String,
    pub type_name: &'static str,
    pub nullable: bool,
    pub suggestable: bool,
    /// Target model of a relation field.
    pub relation: Option<String>,
    /// First suggestion page, when requested.
    pub options: Option<SuggestionPage>,
}

impl Introspection {
    pub(crate) fn new<'a>(
        current_model: Option<String>,
        models: impl Iterator<Item = &'a SchemaModel>,
    ) -> Self {
        Introspection {
            current_model,
            models: models.map(ModelView::from_model).collect(),
        }
    }

    pub fn model(&self, name: &str) -> Option<&ModelView> {
        self.models.iter().find(|m| m.name == name)
    }
}

impl ModelView {
    fn from_model(model: &SchemaModel) -> Self {
        ModelView {
            name: model.name().to_string(),
            fields: model.fields().iter().map(FieldView::from_field).collect(),
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldView> {
        self.fields.iter().find(|f| f.name == name)
    }
}

impl FieldView {
    fn from_field(field: &SchemaField) -> Self {
        FieldView {
            name: field.name.clone(),
            type_name: field.kind.type_name(),
            nullable: field.nullable,
            suggestable: field.suggestable,
            relation: field.kind.relation_target().map(str::to_string),
            options: None,
        }
    }
}

impl Serialize for Introspection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if let Some(current) = &self.current_model {
            map.serialize_entry("current_model", current)?;
        }
        map.serialize_entry("models", &Models(&self.models))?;
        map.end()
    }
}

struct Models<'a>(&'a [ModelView]);

impl Serialize for Models<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for model in self.0 {
            map.serialize_entry(&model.name, model)?;
        }
        map.end()
    }
}

impl Serialize for ModelView {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for field in &self.fields {
            map.serialize_entry(&field.name, field)?;
        }
        map.end()
    }
}

impl Serialize for FieldView {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("type", self.type_name)?;
        map.serialize_entry("nullable", &self.nullable)?;
        map.serialize_entry("suggestable", &self.suggestable)?;
        if let Some(target) = &self.relation {
            map.serialize_entry("relation", target)?;
        }
        if let Some(page) = &self.options {
            map.serialize_entry("options", &page.options)?;
            map.serialize_entry("has_more_options", &page.has_more)?;
            map.serialize_entry("next_options_page_number", &page.next_page)?;
        }
        map.end()
    }
}
