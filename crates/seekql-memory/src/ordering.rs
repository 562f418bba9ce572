//! Result ordering.
//!
//! Provides [`Dir`] for sort direction and [`OrderBy`] for field-based ordering.

use std::cmp::Ordering;

use seekql::Value;

use crate::record::Record;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dir {
    /// Smallest first.
    #[default]
    Asc,
    /// Largest first.
    Desc,
}

impl Dir {
    /// Applies this direction to an ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Dir::Asc => ordering,
            Dir::Desc => ordering.reverse(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Dir::Asc => "asc",
            Dir::Desc => "desc",
        }
    }
}

impl std::fmt::Display for Dir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A field and the direction to sort it in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub field: String,
    pub dir: Dir,
}

impl OrderBy {
    pub fn new(field: impl Into<String>, dir: Dir) -> Self {
        OrderBy {
            field: field.into(),
            dir,
        }
    }

    pub fn asc(field: impl Into<String>) -> Self {
        OrderBy::new(field, Dir::Asc)
    }

    pub fn desc(field: impl Into<String>) -> Self {
        OrderBy::new(field, Dir::Desc)
    }

    /// Parses `field` as ascending and `-field` as descending.
    pub fn parse(spec: &str) -> Self {
        match spec.strip_prefix('-') {
            Some(field) => OrderBy::desc(field),
            None => OrderBy::asc(spec),
        }
    }

    /// Compares two values according to this ordering.
    pub fn compare(&self, a: &Value, b: &Value) -> Ordering {
        self.dir.apply(compare_values(a, b))
    }
}

/// Total order over field values: natural order within a type, nulls last.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    a.total_cmp(b)
}

/// Compares two records field by field, falling back to their ids.
pub(crate) fn compare_records(a: &Record, b: &Record, orderings: &[OrderBy]) -> Ordering {
    for order_by in orderings {
        let ordering = order_by.compare(a.get(&order_by.field), b.get(&order_by.field));
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    a.id.cmp(&b.id)
}
