//! Literal to typed value coercion.

use chrono::{NaiveDate, NaiveDateTime};

use crate::ast::Literal;
use crate::error::ValueValidationError;
use crate::schema::{FieldKind, SchemaField};
use crate::value::{Value, DATE_FORMAT};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Coerces a scalar literal to the declared type of `field`.
///
/// `label` names the field in error messages, usually the path as written in
/// the query. `null` is accepted only for nullable fields. Lists are never
/// accepted here; membership operands are coerced element by element.
///
/// Relation fields take an integer: the id of the related record.
pub fn coerce_literal(
    label: &str,
    field: &SchemaField,
    literal: &Literal,
) -> Result<Value, ValueValidationError> {
    let fail = |reason: String| ValueValidationError::new(label, literal.to_string(), reason);

    match (literal, &field.kind) {
        (Literal::Null, _) if field.nullable => Ok(Value::Null),
        (Literal::Null, _) => Err(fail(format!("'{label}' is not nullable"))),
        (Literal::List(_), _) => Err(fail("expected a single value, found a list".into())),

        (Literal::String(s), FieldKind::Text) => Ok(Value::Text(s.clone())),
        (Literal::Integer(n), FieldKind::Integer) => Ok(Value::Integer(*n)),
        (Literal::Integer(n), FieldKind::Float) => Ok(Value::Float(*n as f64)),
        (Literal::Float(n), FieldKind::Float) => Ok(Value::Float(*n)),
        (Literal::Bool(b), FieldKind::Boolean) => Ok(Value::Bool(*b)),
        (Literal::String(s), FieldKind::Date) => parse_date(s)
            .map(Value::Date)
            .ok_or_else(|| fail("expected a date in YYYY-MM-DD format".into())),
        (Literal::String(s), FieldKind::DateTime) => parse_datetime(s)
            .map(Value::DateTime)
            .ok_or_else(|| fail("expected a datetime in YYYY-MM-DD HH:MM[:SS] format".into())),
        (Literal::String(s), FieldKind::Enum { choices }) => {
            if choices.iter().any(|c| c == s) {
                Ok(Value::Text(s.clone()))
            } else {
                Err(fail(format!("expected one of: {}", choices.join(", "))))
            }
        }
        (Literal::Integer(n), FieldKind::Relation { .. }) => Ok(Value::Integer(*n)),

        (_, kind) => Err(fail(expected(kind))),
    }
}

fn expected(kind: &FieldKind) -> String {
    match kind {
        FieldKind::Text => "expected a string".into(),
        FieldKind::Integer => "expected an integer".into(),
        FieldKind::Float => "expected a number".into(),
        FieldKind::Boolean => "expected true or false".into(),
        FieldKind::Date => "expected a date string".into(),
        FieldKind::DateTime => "expected a datetime string".into(),
        FieldKind::Enum { choices } => format!("expected one of: {}", choices.join(", ")),
        FieldKind::Relation { .. } => "expected a record id".into(),
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}

fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| parse_date(s).and_then(|d| d.and_hms_opt(0, 0, 0)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(kind: FieldKind) -> SchemaField {
        SchemaField {
            name: "f".into(),
            kind,
            nullable: false,
            suggestable: false,
            page_size: 100,
        }
    }

    fn string(s: &str) -> Literal {
        Literal::String(s.into())
    }

    #[test]
    fn numbers() {
        assert_eq!(
            coerce_literal("n", &field(FieldKind::Integer), &Literal::Integer(3)).unwrap(),
            Value::Integer(3)
        );
        assert_eq!(
            coerce_literal("n", &field(FieldKind::Float), &Literal::Integer(3)).unwrap(),
            Value::Float(3.0)
        );
        let err = coerce_literal("rating", &field(FieldKind::Float), &string("abc")).unwrap_err();
        assert_eq!(err.field, "rating");
        assert_eq!(err.raw_value, "\"abc\"");
        assert_eq!(err.reason, "expected a number");
        assert!(coerce_literal("n", &field(FieldKind::Integer), &Literal::Float(1.5)).is_err());
    }

    #[test]
    fn dates() {
        let date = coerce_literal("d", &field(FieldKind::Date), &string("2020-02-29")).unwrap();
        assert_eq!(
            date,
            Value::Date(NaiveDate::from_ymd_opt(2020, 2, 29).unwrap())
        );
        assert!(coerce_literal("d", &field(FieldKind::Date), &string("2021-02-29")).is_err());
        assert!(coerce_literal("d", &field(FieldKind::Date), &string("29/02/2020")).is_err());
    }

    #[test]
    fn datetimes_accept_several_layouts() {
        let kind = field(FieldKind::DateTime);
        let expected = NaiveDate::from_ymd_opt(2021, 3, 4)
            .unwrap()
            .and_hms_opt(5, 6, 0)
            .unwrap();
        for raw in ["2021-03-04 05:06", "2021-03-04T05:06:00", "2021-03-04 05:06:00"] {
            assert_eq!(
                coerce_literal("t", &kind, &string(raw)).unwrap(),
                Value::DateTime(expected),
                "{raw}"
            );
        }
        let midnight = coerce_literal("t", &kind, &string("2021-03-04")).unwrap();
        assert_eq!(
            midnight,
            Value::DateTime(NaiveDate::from_ymd_opt(2021, 3, 4).unwrap().and_hms_opt(0, 0, 0).unwrap())
        );
    }

    #[test]
    fn enums_match_declared_choices() {
        let kind = field(FieldKind::Enum {
            choices: vec!["Drama".into(), "Comedy".into()],
        });
        assert_eq!(
            coerce_literal("genre", &kind, &string("Drama")).unwrap(),
            Value::from("Drama")
        );
        let err = coerce_literal("genre", &kind, &string("drama")).unwrap_err();
        assert_eq!(err.reason, "expected one of: Drama, Comedy");
    }

    #[test]
    fn null_requires_nullable() {
        let mut f = field(FieldKind::Text);
        assert!(coerce_literal("t", &f, &Literal::Null).is_err());
        f.nullable = true;
        assert_eq!(coerce_literal("t", &f, &Literal::Null).unwrap(), Value::Null);
    }

    #[test]
    fn lists_are_rejected() {
        let err = coerce_literal("t", &field(FieldKind::Text), &Literal::List(vec![])).unwrap_err();
        assert!(err.reason.contains("list"));
    }

    #[test]
    fn mismatched_kinds() {
        assert!(coerce_literal("b", &field(FieldKind::Boolean), &string("true")).is_err());
        assert!(coerce_literal("t", &field(FieldKind::Text), &Literal::Integer(1)).is_err());
    }
}
