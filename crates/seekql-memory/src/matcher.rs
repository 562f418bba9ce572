//! Predicate evaluation against stored records.
//!
//! A [`Condition`] is decided in two steps: its relation hops are followed to
//! the related records, then `field op value` is tested on each of them. A
//! hop through a to-many relation holds if any related record matches. When
//! a hop leads nowhere, the field reads as null, as with an outer join.

use std::cmp::Ordering;

use seekql::{CompareOp, Condition, Predicate, Value};
use tracing::trace;

use crate::record::Record;
use crate::store::MemoryStore;

/// Returns `true` if `record` satisfies `predicate`.
pub(crate) fn matches(store: &MemoryStore, record: &Record, predicate: &Predicate) -> bool {
    let mut leaf = |cond: &Condition| condition_holds(store, record, cond);
    let result = predicate.evaluate(&mut leaf);
    trace!(id = record.id, result, "evaluated record");
    result
}

fn condition_holds(store: &MemoryStore, record: &Record, cond: &Condition) -> bool {
    if cond.hops.is_empty() {
        return holds(cond.op, record.get(&cond.field), &cond.value);
    }

    let mut frontier = vec![record];
    for hop in &cond.hops {
        frontier = frontier
            .into_iter()
            .flat_map(|r| r.related_ids(&hop.field))
            .filter_map(|id| store.get(&hop.target, id))
            .collect();
        if frontier.is_empty() {
            return holds(cond.op, &Value::Null, &cond.value);
        }
    }
    frontier
        .into_iter()
        .any(|r| holds(cond.op, r.get(&cond.field), &cond.value))
}

/// Tests `actual op expected`, without negation.
///
/// `=` and `!=` treat null as a value of its own: `null = null` holds and
/// `null != "x"` holds. Ordering and containment never hold on null.
pub fn holds(op: CompareOp, actual: &Value, expected: &Value) -> bool {
    match op {
        CompareOp::Eq => equals(actual, expected),
        CompareOp::Ne => !equals(actual, expected),
        CompareOp::Gt | CompareOp::Gte | CompareOp::Lt | CompareOp::Lte => actual
            .compare(expected)
            .is_some_and(|ordering| op.eval_ordering(ordering)),
        CompareOp::In => member(actual, expected),
        CompareOp::NotIn => !member(actual, expected),
        CompareOp::Contains => contains(actual, expected),
        CompareOp::NotContains => !contains(actual, expected),
    }
}

fn equals(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::Null, Value::Null) => true,
        (Value::Null, _) | (_, Value::Null) => false,
        _ => actual.compare(expected) == Some(Ordering::Equal),
    }
}

fn member(actual: &Value, set: &Value) -> bool {
    set.as_list()
        .is_some_and(|items| items.iter().any(|item| equals(actual, item)))
}

fn contains(actual: &Value, needle: &Value) -> bool {
    match (actual.as_str(), needle.as_str()) {
        (Some(haystack), Some(needle)) => haystack
            .to_lowercase()
            .contains(&needle.to_lowercase()),
        _ => false,
    }
}
