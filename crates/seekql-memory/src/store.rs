//! The store and its query sets.

use std::collections::{BTreeMap, HashMap};

use seekql::{Collection, DistinctValues, Predicate, SchemaField, SchemaModel, Value};
use tracing::debug;

use crate::error::{LoadError, Result};
use crate::matcher::matches;
use crate::ordering::{compare_records, Dir, OrderBy};
use crate::record::Record;

#[derive(Debug, Clone, Default)]
struct Table {
    records: Vec<Record>,
    by_id: HashMap<i64, usize>,
}

/// Records of every model, kept in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: BTreeMap<String, Table>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Adds a record to the table of `model`.
    ///
    /// Fails if the table already holds a record with the same id.
    pub fn insert(&mut self, model: &str, record: Record) -> Result<()> {
        let table = self.tables.entry(model.to_string()).or_default();
        if table.by_id.contains_key(&record.id) {
            return Err(LoadError::DuplicateId {
                model: model.to_string(),
                id: record.id,
            });
        }
        table.by_id.insert(record.id, table.records.len());
        table.records.push(record);
        Ok(())
    }

    /// Looks up a record by id.
    pub fn get(&self, model: &str, id: i64) -> Option<&Record> {
        let table = self.tables.get(model)?;
        table.by_id.get(&id).map(|&i| &table.records[i])
    }

    /// Records of `model` in insertion order.
    pub fn records(&self, model: &str) -> &[Record] {
        self.tables
            .get(model)
            .map(|t| t.records.as_slice())
            .unwrap_or(&[])
    }

    /// Number of records of `model`.
    pub fn len(&self, model: &str) -> usize {
        self.records(model).len()
    }

    /// Returns `true` if no model has any record.
    pub fn is_empty(&self) -> bool {
        self.tables.values().all(|t| t.records.is_empty())
    }

    /// Starts a query over every record of `model`.
    pub fn query(&self, model: &str) -> QuerySet<'_> {
        QuerySet {
            store: self,
            model: model.to_string(),
            rows: (0..self.len(model)).collect(),
            orderings: Vec::new(),
            limit: None,
            offset: None,
        }
    }
}

impl DistinctValues for MemoryStore {
    /// Distinct non-null values of the field, in ascending order.
    fn distinct_values<'a>(
        &'a self,
        model: &'a SchemaModel,
        field: &'a SchemaField,
    ) -> Box<dyn Iterator<Item = Value> + 'a> {
        let mut values: Vec<Value> = self
            .records(model.name())
            .iter()
            .map(|r| r.get(&field.name))
            .filter(|v| !v.is_null())
            .cloned()
            .collect();
        values.sort_by(Value::total_cmp);
        values.dedup();
        Box::new(values.into_iter())
    }
}

/// A filtered, ordered view over the records of one model.
///
/// Filtering goes through [`Collection::filter`], usually via
/// [`seekql::apply`]; ordering and slicing apply when records are fetched.
#[derive(Debug, Clone)]
pub struct QuerySet<'s> {
    store: &'s MemoryStore,
    model: String,
    rows: Vec<usize>,
    orderings: Vec<OrderBy>,
    limit: Option<usize>,
    offset: Option<usize>,
}

impl<'s> QuerySet<'s> {
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Adds an ordering; earlier orderings take precedence.
    pub fn order_by(mut self, field: &str, dir: Dir) -> Self {
        self.orderings.push(OrderBy::new(field, dir));
        self
    }

    /// Adds an ascending ordering.
    pub fn order_asc(self, field: &str) -> Self {
        self.order_by(field, Dir::Asc)
    }

    /// Adds a descending ordering.
    pub fn order_desc(self, field: &str) -> Self {
        self.order_by(field, Dir::Desc)
    }

    /// Keeps at most `n` records.
    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    /// Skips the first `n` records.
    pub fn offset(mut self, n: usize) -> Self {
        self.offset = Some(n);
        self
    }

    /// Number of matching records, ignoring limit and offset.
    pub fn count(&self) -> usize {
        self.rows.len()
    }

    /// Matching records, ordered and sliced.
    pub fn fetch(&self) -> Vec<&'s Record> {
        let records = self.store.records(&self.model);
        let mut out: Vec<&'s Record> = self.rows.iter().map(|&i| &records[i]).collect();
        if !self.orderings.is_empty() {
            out.sort_by(|a, b| compare_records(a, b, &self.orderings));
        }
        out.into_iter()
            .skip(self.offset.unwrap_or(0))
            .take(self.limit.unwrap_or(usize::MAX))
            .collect()
    }

    /// Ids of [`fetch`](Self::fetch)ed records.
    pub fn ids(&self) -> Vec<i64> {
        self.fetch().into_iter().map(|r| r.id).collect()
    }
}

impl Collection for QuerySet<'_> {
    fn filter(mut self, predicate: &Predicate) -> Self {
        let records = self.store.records(&self.model);
        let before = self.rows.len();
        self.rows
            .retain(|&i| matches(self.store, &records[i], predicate));
        debug!(model = %self.model, before, after = self.rows.len(), "filtered records");
        self
    }
}
