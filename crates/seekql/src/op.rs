//! Comparison operators of the query language.
//!
//! The [`CompareOp`] enum lists every operator a comparison can use. Which
//! operators a field accepts depends on its kind; the resolver enforces that
//! using the predicates defined here.

use std::cmp::Ordering;

use serde::Serialize;

/// Comparison operator between a field path and a value.
///
/// Operators are grouped by what they ask of the field:
/// - **Equality**: `=`, `!=` - every field kind
/// - **Ordering**: `>`, `>=`, `<`, `<=` - ordered kinds (text, numbers, dates)
/// - **Membership**: `in`, `not in` - value must be a list literal
/// - **Containment**: `~`, `!~` - case-insensitive substring match on text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareOp {
    /// `=`
    Eq,
    /// `!=`
    Ne,
    /// `>`
    Gt,
    /// `>=`
    Gte,
    /// `<`
    Lt,
    /// `<=`
    Lte,
    /// `in`
    In,
    /// `not in`
    NotIn,
    /// `~`
    Contains,
    /// `!~`
    NotContains,
}

impl CompareOp {
    /// Returns `true` for `=` and `!=`.
    pub fn is_equality(self) -> bool {
        matches!(self, CompareOp::Eq | CompareOp::Ne)
    }

    /// Returns `true` for the ordering operators `>`, `>=`, `<`, `<=`.
    pub fn is_ordering(self) -> bool {
        matches!(
            self,
            CompareOp::Gt | CompareOp::Gte | CompareOp::Lt | CompareOp::Lte
        )
    }

    /// Returns `true` for `in` and `not in`.
    pub fn is_membership(self) -> bool {
        matches!(self, CompareOp::In | CompareOp::NotIn)
    }

    /// Returns `true` for `~` and `!~`.
    pub fn is_containment(self) -> bool {
        matches!(self, CompareOp::Contains | CompareOp::NotContains)
    }

    /// Evaluates an ordering-based comparison.
    ///
    /// `ordering` is the result of comparing the field value against the
    /// literal. Non-ordering operators other than `=`/`!=` return `false`.
    pub fn eval_ordering(self, ordering: Ordering) -> bool {
        match self {
            CompareOp::Eq => ordering == Ordering::Equal,
            CompareOp::Ne => ordering != Ordering::Equal,
            CompareOp::Gt => ordering == Ordering::Greater,
            CompareOp::Gte => ordering != Ordering::Less,
            CompareOp::Lt => ordering == Ordering::Less,
            CompareOp::Lte => ordering != Ordering::Greater,
            _ => false,
        }
    }

    /// Returns the operator as written in a query.
    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "!=",
            CompareOp::Gt => ">",
            CompareOp::Gte => ">=",
            CompareOp::Lt => "<",
            CompareOp::Lte => "<=",
            CompareOp::In => "in",
            CompareOp::NotIn => "not in",
            CompareOp::Contains => "~",
            CompareOp::NotContains => "!~",
        }
    }
}

impl std::fmt::Display for CompareOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn op_groups() {
        assert!(CompareOp::Eq.is_equality());
        assert!(CompareOp::Ne.is_equality());
        assert!(!CompareOp::Gt.is_equality());

        assert!(CompareOp::Gt.is_ordering());
        assert!(CompareOp::Lte.is_ordering());
        assert!(!CompareOp::In.is_ordering());

        assert!(CompareOp::In.is_membership());
        assert!(CompareOp::NotIn.is_membership());
        assert!(!CompareOp::Contains.is_membership());

        assert!(CompareOp::Contains.is_containment());
        assert!(CompareOp::NotContains.is_containment());
        assert!(!CompareOp::Eq.is_containment());
    }

    #[test]
    fn op_eval_ordering() {
        assert!(CompareOp::Eq.eval_ordering(Ordering::Equal));
        assert!(!CompareOp::Eq.eval_ordering(Ordering::Less));

        assert!(CompareOp::Ne.eval_ordering(Ordering::Greater));
        assert!(!CompareOp::Ne.eval_ordering(Ordering::Equal));

        assert!(CompareOp::Gt.eval_ordering(Ordering::Greater));
        assert!(!CompareOp::Gt.eval_ordering(Ordering::Equal));

        assert!(CompareOp::Gte.eval_ordering(Ordering::Equal));
        assert!(!CompareOp::Gte.eval_ordering(Ordering::Less));

        assert!(CompareOp::Lt.eval_ordering(Ordering::Less));
        assert!(!CompareOp::Lt.eval_ordering(Ordering::Greater));

        assert!(CompareOp::Lte.eval_ordering(Ordering::Equal));
        assert!(!CompareOp::Lte.eval_ordering(Ordering::Greater));

        assert!(!CompareOp::In.eval_ordering(Ordering::Equal));
    }

    #[test]
    fn op_display() {
        assert_eq!(CompareOp::Gte.to_string(), ">=");
        assert_eq!(CompareOp::NotIn.to_string(), "not in");
        assert_eq!(CompareOp::NotContains.to_string(), "!~");
    }
}
