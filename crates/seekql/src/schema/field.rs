//! Field kinds and the registry's model and field entries.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::config::MembershipPolicy;
use crate::op::CompareOp;

/// Declared type of a field.
///
/// Serialized with an internal `type` tag, so a description reads as
/// `{name: genre, type: enum, choices: [Drama, Comedy]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Integer,
    Float,
    Boolean,
    Date,
    #[serde(rename = "datetime")]
    DateTime,
    /// One of a fixed set of labels.
    Enum { choices: Vec<String> },
    /// Reference to a record of another model, named by `target`.
    Relation { target: String },
}

impl FieldKind {
    /// Name of the kind as shown in introspection output.
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Integer => "integer",
            FieldKind::Float => "float",
            FieldKind::Boolean => "boolean",
            FieldKind::Date => "date",
            FieldKind::DateTime => "datetime",
            FieldKind::Enum { .. } => "enum",
            FieldKind::Relation { .. } => "relation",
        }
    }

    pub fn is_relation(&self) -> bool {
        matches!(self, FieldKind::Relation { .. })
    }

    /// Target model of a relation field.
    pub fn relation_target(&self) -> Option<&str> {
        match self {
            FieldKind::Relation { target } => Some(target),
            _ => None,
        }
    }

    /// Declared choices of an enum field.
    pub fn choices(&self) -> Option<&[String]> {
        match self {
            FieldKind::Enum { choices } => Some(choices),
            _ => None,
        }
    }

    /// Returns `true` if a comparison with `op` is meaningful for this kind.
    ///
    /// | Kind | `=` `!=` | ordering | `in` `not in` | `~` `!~` |
    /// |------|----------|----------|---------------|----------|
    /// | text | yes | yes | policy | yes |
    /// | integer, float, date, datetime | yes | yes | policy | no |
    /// | boolean | yes | no | yes | no |
    /// | enum | yes | no | yes | no |
    /// | relation | no | no | no | no |
    pub fn supports(&self, op: CompareOp, membership: MembershipPolicy) -> bool {
        if op.is_equality() {
            !self.is_relation()
        } else if op.is_ordering() {
            matches!(
                self,
                FieldKind::Text
                    | FieldKind::Integer
                    | FieldKind::Float
                    | FieldKind::Date
                    | FieldKind::DateTime
            )
        } else if op.is_membership() {
            membership.allows(self)
        } else {
            matches!(self, FieldKind::Text)
        }
    }
}

/// A field of a registered model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaField {
    pub name: String,
    pub kind: FieldKind,
    pub nullable: bool,
    /// Whether suggestions are served for this field.
    pub suggestable: bool,
    /// Number of options per suggestion page; at least 1.
    pub page_size: usize,
}

/// A registered model: a name and its fields in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaModel {
    name: String,
    fields: Vec<SchemaField>,
    index: HashMap<String, usize>,
}

impl SchemaModel {
    pub(crate) fn new(name: String, fields: Vec<SchemaField>) -> Self {
        let index = fields
            .iter()
            .enumerate()
            .map(|(i, f)| (f.name.clone(), i))
            .collect();
        SchemaModel {
            name,
            fields,
            index,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[SchemaField] {
        &self.fields
    }

    /// Looks up a field by name.
    pub fn field(&self, name: &str) -> Option<&SchemaField> {
        self.index.get(name).map(|&i| &self.fields[i])
    }

    /// Relation fields of this model, in declaration order.
    pub fn relations(&self) -> impl Iterator<Item = &SchemaField> {
        self.fields.iter().filter(|f| f.kind.is_relation())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str, kind: FieldKind) -> SchemaField {
        SchemaField {
            name: name.into(),
            kind,
            nullable: false,
            suggestable: false,
            page_size: 10,
        }
    }

    #[test]
    fn kind_serializes_with_type_tag() {
        let kind = FieldKind::Enum {
            choices: vec!["A".into(), "B".into()],
        };
        assert_eq!(
            serde_json::to_string(&kind).unwrap(),
            r#"{"type":"enum","choices":["A","B"]}"#
        );
        assert_eq!(
            serde_json::to_string(&FieldKind::DateTime).unwrap(),
            r#"{"type":"datetime"}"#
        );
    }

    #[test]
    fn supports_ordering_only_on_ordered_kinds() {
        let policy = MembershipPolicy::AnyScalar;
        assert!(FieldKind::Integer.supports(CompareOp::Gt, policy));
        assert!(FieldKind::Date.supports(CompareOp::Lte, policy));
        assert!(!FieldKind::Boolean.supports(CompareOp::Gt, policy));
        let genre = FieldKind::Enum {
            choices: vec!["Drama".into()],
        };
        assert!(!genre.supports(CompareOp::Lt, policy));
        assert!(genre.supports(CompareOp::In, MembershipPolicy::EnumerableOnly));
    }

    #[test]
    fn containment_is_text_only() {
        let policy = MembershipPolicy::AnyScalar;
        assert!(FieldKind::Text.supports(CompareOp::Contains, policy));
        assert!(!FieldKind::Integer.supports(CompareOp::NotContains, policy));
    }

    #[test]
    fn relation_supports_nothing() {
        let kind = FieldKind::Relation {
            target: "auth.user".into(),
        };
        assert!(!kind.supports(CompareOp::Eq, MembershipPolicy::AnyScalar));
        assert!(!kind.supports(CompareOp::In, MembershipPolicy::AnyScalar));
    }

    #[test]
    fn model_field_lookup_keeps_order() {
        let model = SchemaModel::new(
            "core.book".into(),
            vec![
                field("name", FieldKind::Text),
                field("rating", FieldKind::Float),
                field(
                    "author",
                    FieldKind::Relation {
                        target: "auth.user".into(),
                    },
                ),
            ],
        );
        let names: Vec<_> = model.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["name", "rating", "author"]);
        assert_eq!(model.field("rating").map(|f| &f.kind), Some(&FieldKind::Float));
        assert!(model.field("missing").is_none());
        assert_eq!(model.relations().count(), 1);
    }
}
