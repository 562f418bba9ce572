//! Model descriptions: the input the registry is built from.
//!
//! Descriptions come from three places: the `#[derive(Model)]` macro, a
//! YAML/JSON document, or the builder methods below. They are plain data; all
//! validation happens in [`Registry::build`](super::Registry::build).

use serde::{Deserialize, Serialize};

use super::field::FieldKind;

/// Description of one field.
///
/// `suggestable` and `page_size` fall back to registry defaults when unset:
/// enum fields are suggestable unless told otherwise, and the page size comes
/// from [`SchemaConfig`](super::SchemaConfig).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescription {
    pub name: String,
    #[serde(flatten)]
    pub kind: FieldKind,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<usize>,
}

impl FieldDescription {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        FieldDescription {
            name: name.into(),
            kind,
            nullable: false,
            suggestable: None,
            page_size: None,
        }
    }

    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Text)
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Integer)
    }

    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Float)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Boolean)
    }

    pub fn date(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Date)
    }

    pub fn datetime(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::DateTime)
    }

    /// Enum field with the given choice labels.
    pub fn enumeration<I, S>(name: impl Into<String>, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            name,
            FieldKind::Enum {
                choices: choices.into_iter().map(Into::into).collect(),
            },
        )
    }

    /// Relation to the model named `target`.
    pub fn relation(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(
            name,
            FieldKind::Relation {
                target: target.into(),
            },
        )
    }

    /// Marks the field as accepting `null`.
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Sets whether suggestions are served for the field.
    pub fn suggestable(mut self, suggestable: bool) -> Self {
        self.suggestable = Some(suggestable);
        self
    }

    /// Sets the suggestion page size for the field.
    pub fn page_size(mut self, size: usize) -> Self {
        self.page_size = Some(size);
        self
    }
}

/// Description of one model and its fields, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDescription {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldDescription>,
}

impl ModelDescription {
    pub fn new(name: impl Into<String>) -> Self {
        ModelDescription {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Appends a field.
    pub fn field(mut self, field: FieldDescription) -> Self {
        self.fields.push(field);
        self
    }
}
