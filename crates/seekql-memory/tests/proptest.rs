//! Property-based tests for filtering stored records.

use proptest::prelude::*;
use seekql::{apply, FieldDescription, ModelDescription, Registry, Value};
use seekql_memory::{holds, MemoryStore, Record};

// ============================================================================
// Test helpers
// ============================================================================

fn registry() -> Registry {
    Registry::build(vec![ModelDescription::new("item")
        .field(FieldDescription::integer("size").nullable())
        .field(FieldDescription::text("label"))])
    .unwrap()
}

fn store(rows: &[(Option<i64>, String)]) -> MemoryStore {
    let mut store = MemoryStore::new();
    for (i, (size, label)) in rows.iter().enumerate() {
        let size = size.map(Value::Integer).unwrap_or(Value::Null);
        store
            .insert(
                "item",
                Record::new(i as i64 + 1)
                    .with("size", size)
                    .with("label", label.as_str()),
            )
            .unwrap();
    }
    store
}

fn rows() -> impl Strategy<Value = Vec<(Option<i64>, String)>> {
    prop::collection::vec((prop::option::of(0..5i64), "[ab]{0,3}"), 0..20)
}

fn condition() -> impl Strategy<Value = String> {
    prop_oneof![
        (prop::sample::select(vec!["=", "!=", "<", "<=", ">", ">="]), 0..5i64)
            .prop_map(|(op, k)| format!("size {op} {k}")),
        Just("size = null".to_string()),
        "[ab]{0,2}".prop_map(|s| format!("label ~ \"{s}\"")),
    ]
}

fn ids(store: &MemoryStore, query: &str) -> Vec<i64> {
    apply(store.query("item"), query, "item", &registry())
        .unwrap()
        .ids()
}

// ============================================================================
// Filtering
// ============================================================================

proptest! {
    #[test]
    fn filter_never_adds_records(rows in rows(), cond in condition()) {
        let store = store(&rows);
        let kept = ids(&store, &cond);
        prop_assert!(kept.len() <= rows.len());
        prop_assert!(kept.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn negation_is_the_complement(rows in rows(), cond in condition()) {
        let store = store(&rows);
        let mut both = ids(&store, &cond);
        both.extend(ids(&store, &format!("not ({cond})")));
        both.sort_unstable();
        let all: Vec<i64> = (1..=rows.len() as i64).collect();
        prop_assert_eq!(both, all);
    }

    #[test]
    fn conjunction_is_intersection(rows in rows(), l in condition(), r in condition()) {
        let store = store(&rows);
        let left = ids(&store, &l);
        let right = ids(&store, &r);
        let expected: Vec<i64> = left.into_iter().filter(|id| right.contains(id)).collect();
        prop_assert_eq!(ids(&store, &format!("({l}) and ({r})")), expected);
    }

    #[test]
    fn ordering_comparisons_skip_nulls(rows in rows(), k in 0..5i64) {
        let store = store(&rows);
        let kept = ids(&store, &format!("size >= {k}"));
        for id in kept {
            let size = store.get("item", id).unwrap().get("size");
            prop_assert!(holds(seekql::CompareOp::Gte, size, &Value::Integer(k)));
            prop_assert!(!size.is_null());
        }
    }
}
