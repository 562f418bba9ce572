//! Filling a store from JSON-shaped records.
//!
//! Records are objects keyed by field name. `id` is optional and defaults
//! to one past the largest id seen so far. Values are checked against the
//! registry with the same coercion rules as query literals, so a date field
//! takes `"2001-09-09"` and an enum field takes one of its choices. A
//! relation field takes the related record's id, or a list of ids.

use std::collections::BTreeMap;

use seekql::{coerce_literal, FieldKind, Literal, Registry, SchemaModel, ValueValidationError};
use serde_json::{Map, Value as Json};
use tracing::debug;

use crate::error::{LoadError, Result};
use crate::record::Record;
use crate::store::MemoryStore;

/// Records of each model, as read from a dataset file.
pub type RawRecords = BTreeMap<String, Vec<Json>>;

/// Builds a store from `records`, validating every value against `registry`.
pub fn load(registry: &Registry, records: &RawRecords) -> Result<MemoryStore> {
    let mut store = MemoryStore::new();
    for (model_name, rows) in records {
        let model = registry
            .lookup_model(model_name)
            .ok_or_else(|| LoadError::UnknownModel(model_name.clone()))?;
        // None once an explicit id of i64::MAX leaves no room for another.
        let mut next_id = Some(1);
        for (index, row) in rows.iter().enumerate() {
            let object = row.as_object().ok_or_else(|| LoadError::NotAnObject {
                model: model_name.clone(),
                index,
            })?;
            let record = record(model, index, object, next_id)?;
            next_id = next_id.and_then(|next| Some(next.max(record.id.checked_add(1)?)));
            store.insert(model_name, record)?;
        }
        debug!(model = %model_name, records = rows.len(), "loaded records");
    }
    check_relations(registry, &store)?;
    Ok(store)
}

fn record(
    model: &SchemaModel,
    index: usize,
    object: &Map<String, Json>,
    next_id: Option<i64>,
) -> Result<Record> {
    let id = match object.get("id") {
        None | Some(Json::Null) => next_id.ok_or_else(|| LoadError::IdOverflow {
            model: model.name().to_string(),
            index,
        })?,
        Some(raw) => raw.as_i64().ok_or_else(|| LoadError::InvalidId {
            model: model.name().to_string(),
            index,
        })?,
    };

    let mut record = Record::new(id);
    for (name, raw) in object {
        if name == "id" {
            continue;
        }
        let field = model.field(name).ok_or_else(|| LoadError::UnknownField {
            model: model.name().to_string(),
            field: name.clone(),
        })?;
        let label = format!("{}.{}", model.name(), name);
        let literal = literal(&label, raw)?;
        let value = match (&field.kind, &literal) {
            (FieldKind::Relation { .. }, Literal::List(ids)) => ids
                .iter()
                .map(|id| coerce_literal(&label, field, id))
                .collect::<std::result::Result<Vec<_>, _>>()
                .map(seekql::Value::List)?,
            _ => coerce_literal(&label, field, &literal)?,
        };
        record.values.insert(name.clone(), value);
    }
    Ok(record)
}

/// Converts a JSON value to the literal it would be written as in a query.
fn literal(label: &str, raw: &Json) -> std::result::Result<Literal, ValueValidationError> {
    Ok(match raw {
        Json::Null => Literal::Null,
        Json::Bool(b) => Literal::Bool(*b),
        Json::Number(n) => match n.as_i64() {
            Some(i) => Literal::Integer(i),
            None => Literal::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        Json::String(s) => Literal::String(s.clone()),
        Json::Array(items) => Literal::List(
            items
                .iter()
                .map(|item| literal(label, item))
                .collect::<std::result::Result<_, _>>()?,
        ),
        Json::Object(_) => {
            return Err(ValueValidationError {
                field: label.to_string(),
                raw_value: raw.to_string(),
                reason: "objects are not supported as field values".to_string(),
            })
        }
    })
}

fn check_relations(registry: &Registry, store: &MemoryStore) -> Result<()> {
    for model in registry.models() {
        for field in model.relations() {
            let Some(target) = field.kind.relation_target() else {
                continue;
            };
            for record in store.records(model.name()) {
                for target_id in record.related_ids(&field.name) {
                    if store.get(target, target_id).is_none() {
                        return Err(LoadError::DanglingRelation {
                            model: model.name().to_string(),
                            field: field.name.clone(),
                            id: record.id,
                            target: target.to_string(),
                            target_id,
                        });
                    }
                }
            }
        }
    }
    Ok(())
}
