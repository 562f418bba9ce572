//! Backend-agnostic predicate tree and the translation that produces it.
//!
//! Translation pushes every `not` down to the leaves with De Morgan's laws,
//! so the logical layer of a [`Predicate`] holds only `and`/`or` and each
//! [`Condition`] carries its own `negated` flag. Directly nested groups of
//! the same kind are flattened.

use std::fmt;

use serde::Serialize;

use crate::ast::LogicalOp;
use crate::op::CompareOp;
use crate::resolve::{ResolvedComparison, ResolvedNode};
use crate::schema::RelationHop;
use crate::value::Value;

/// Filter handed to the storage collaborator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    /// Every child must hold.
    And(Vec<Predicate>),
    /// At least one child must hold.
    Or(Vec<Predicate>),
    Condition(Condition),
}

/// A leaf comparison of one field, reached through `hops`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Condition {
    /// Relation hops from the root model, in traversal order.
    pub hops: Vec<RelationHop>,
    /// Field compared on the last model of the chain.
    pub field: String,
    pub op: CompareOp,
    pub value: Value,
    /// The comparison holds when `field op value` does not.
    pub negated: bool,
}

impl Condition {
    /// Dotted path from the root model, e.g. `author.username`.
    pub fn path(&self) -> String {
        let mut path = String::new();
        for hop in &self.hops {
            path.push_str(&hop.field);
            path.push('.');
        }
        path.push_str(&self.field);
        path
    }
}

impl Predicate {
    /// Evaluates the tree, deciding each leaf with `leaf`.
    ///
    /// `leaf` answers whether `field op value` holds; the `negated` flag is
    /// applied here.
    pub fn evaluate<F>(&self, leaf: &mut F) -> bool
    where
        F: FnMut(&Condition) -> bool,
    {
        match self {
            Predicate::And(children) => children.iter().all(|c| c.evaluate(&mut *leaf)),
            Predicate::Or(children) => children.iter().any(|c| c.evaluate(&mut *leaf)),
            Predicate::Condition(cond) => leaf(cond) != cond.negated,
        }
    }

    /// Leaf conditions in tree order.
    pub fn conditions(&self) -> Vec<&Condition> {
        let mut out = Vec::new();
        self.collect_conditions(&mut out);
        out
    }

    fn collect_conditions<'a>(&'a self, out: &mut Vec<&'a Condition>) {
        match self {
            Predicate::And(children) | Predicate::Or(children) => {
                for child in children {
                    child.collect_conditions(out);
                }
            }
            Predicate::Condition(cond) => out.push(cond),
        }
    }
}

/// Translates a resolved query into a predicate tree.
pub fn translate(node: &ResolvedNode<'_>) -> Predicate {
    lower(node, false)
}

fn lower(node: &ResolvedNode<'_>, negate: bool) -> Predicate {
    match node {
        ResolvedNode::Comparison(cmp) => Predicate::Condition(condition(cmp, negate)),
        // `not` over several children reads as `not (a and b ...)`.
        ResolvedNode::Logical {
            op: LogicalOp::Not,
            children,
        } => lower_group(true, children, !negate),
        ResolvedNode::Logical { op, children } => {
            lower_group(*op == LogicalOp::And, children, negate)
        }
    }
}

fn lower_group(conjunction: bool, children: &[ResolvedNode<'_>], negate: bool) -> Predicate {
    // not (a and b) == not a or not b; not (a or b) == not a and not b
    let conjunction = conjunction != negate;
    let mut parts = Vec::with_capacity(children.len());
    for child in children {
        match (lower(child, negate), conjunction) {
            (Predicate::And(inner), true) | (Predicate::Or(inner), false) => parts.extend(inner),
            (other, _) => parts.push(other),
        }
    }
    if parts.len() == 1 {
        if let Some(only) = parts.pop() {
            return only;
        }
    }
    if conjunction {
        Predicate::And(parts)
    } else {
        Predicate::Or(parts)
    }
}

fn condition(cmp: &ResolvedComparison<'_>, negated: bool) -> Condition {
    Condition {
        hops: cmp.hops.clone(),
        field: cmp.field.name.clone(),
        op: cmp.op,
        value: cmp.value.clone(),
        negated,
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            f.write_str("not ")?;
        }
        write!(f, "{} {} {}", self.path(), self.op, self.value)
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (children, sep) = match self {
            Predicate::Condition(cond) => return write!(f, "{cond}"),
            Predicate::And(children) => (children, " and "),
            Predicate::Or(children) => (children, " or "),
        };
        f.write_str("(")?;
        for (i, child) in children.iter().enumerate() {
            if i > 0 {
                f.write_str(sep)?;
            }
            write!(f, "{child}")?;
        }
        f.write_str(")")
    }
}
