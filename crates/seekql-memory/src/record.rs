//! Stored records.

use std::collections::BTreeMap;

use serde::ser::{Serialize, SerializeMap, Serializer};
use seekql::Value;

/// One record of a model: an id and its field values.
///
/// A relation field holds the related record's id as [`Value::Integer`], or a
/// [`Value::List`] of ids for a to-many relation. Missing fields read as
/// [`Value::Null`].
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: i64,
    pub values: BTreeMap<String, Value>,
}

static NULL: Value = Value::Null;

impl Record {
    /// Creates a record whose `id` field reads as `id`.
    pub fn new(id: i64) -> Self {
        Record {
            id,
            values: BTreeMap::from([("id".to_string(), Value::Integer(id))]),
        }
    }

    /// Sets a field value.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(field.into(), value.into());
        self
    }

    /// Value of `field`, or null if unset.
    pub fn get(&self, field: &str) -> &Value {
        self.values.get(field).unwrap_or(&NULL)
    }

    /// Ids referenced by a relation field.
    pub fn related_ids(&self, field: &str) -> Vec<i64> {
        match self.get(field) {
            Value::Integer(id) => vec![*id],
            Value::List(items) => items.iter().filter_map(Value::as_i64).collect(),
            _ => Vec::new(),
        }
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("id", &self.id)?;
        for (field, value) in self.values.iter().filter(|(k, _)| k.as_str() != "id") {
            map.serialize_entry(field, value)?;
        }
        map.end()
    }
}
