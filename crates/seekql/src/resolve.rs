//! Semantic resolution of a parsed query against the registry.
//!
//! Resolution checks, per comparison and in this order: that the field path
//! walks through the registry, that the operator is allowed for the field's
//! kind, and that the literal coerces to the field's type. Nothing is
//! evaluated against data.

use tracing::trace;

use crate::ast::{Comparison, FieldPath, Literal, LogicalOp, Node};
use crate::coerce::coerce_literal;
use crate::error::{ResolveError, SchemaError, SchemaPathError, ValueValidationError};
use crate::op::CompareOp;
use crate::schema::{Registry, RelationHop, SchemaField, SchemaModel};
use crate::value::Value;

/// Query tree whose leaves are checked against the registry.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedNode<'r> {
    Comparison(ResolvedComparison<'r>),
    Logical {
        op: LogicalOp,
        children: Vec<ResolvedNode<'r>>,
    },
}

/// A comparison annotated with its field and relation hops.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedComparison<'r> {
    /// Path as written in the query.
    pub path: FieldPath,
    /// Hops from the root model to `model`.
    pub hops: Vec<RelationHop>,
    /// Model owning `field`.
    pub model: &'r SchemaModel,
    pub field: &'r SchemaField,
    pub op: CompareOp,
    /// Literal coerced to the field's type; a [`Value::List`] for membership.
    pub value: Value,
    /// Byte offset of the comparison in the query text.
    pub offset: usize,
}

/// Resolves `ast` starting from the model named `root_model`.
pub fn resolve<'r>(
    ast: &Node,
    root_model: &str,
    registry: &'r Registry,
) -> Result<ResolvedNode<'r>, ResolveError> {
    if registry.lookup_model(root_model).is_none() {
        return Err(SchemaError::from(SchemaPathError::UnknownModel(root_model.to_string())).into());
    }
    Resolver {
        root: root_model,
        registry,
    }
    .node(ast)
}

struct Resolver<'a, 'r> {
    root: &'a str,
    registry: &'r Registry,
}

impl<'r> Resolver<'_, 'r> {
    fn node(&self, node: &Node) -> Result<ResolvedNode<'r>, ResolveError> {
        match node {
            Node::Comparison(cmp) => self.comparison(cmp).map(ResolvedNode::Comparison),
            Node::Logical { op, children } => {
                let children = children
                    .iter()
                    .map(|child| self.node(child))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(ResolvedNode::Logical { op: *op, children })
            }
        }
    }

    fn comparison(&self, cmp: &Comparison) -> Result<ResolvedComparison<'r>, ResolveError> {
        let resolved = self
            .registry
            .resolve_path(self.root, &cmp.path)
            .map_err(SchemaError::from)?;
        let label = cmp.path.to_string();
        let field = resolved.field;

        if !field
            .kind
            .supports(cmp.op, self.registry.config().membership)
        {
            return Err(SchemaError::UnsupportedOperator {
                field: label,
                op: cmp.op,
                kind: field.kind.type_name(),
            }
            .into());
        }

        let value = operand(&label, field, cmp.op, &cmp.value)?;
        trace!(path = %label, op = %cmp.op, value = %value, hops = resolved.hops.len(), "resolved comparison");

        Ok(ResolvedComparison {
            path: cmp.path.clone(),
            hops: resolved.hops,
            model: resolved.model,
            field,
            op: cmp.op,
            value,
            offset: cmp.offset,
        })
    }
}

/// Coerces the right-hand side of a comparison.
fn operand(
    label: &str,
    field: &SchemaField,
    op: CompareOp,
    literal: &Literal,
) -> Result<Value, ValueValidationError> {
    let fail = |reason: &str| ValueValidationError::new(label, literal.to_string(), reason);

    if op.is_membership() {
        let Literal::List(items) = literal else {
            return Err(fail("expected a list of values"));
        };
        return items
            .iter()
            .map(|item| match item {
                Literal::List(_) => Err(fail("nested lists are not allowed")),
                Literal::Null => Err(fail("null is not allowed in a list")),
                scalar => coerce_literal(label, field, scalar),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Value::List);
    }

    match literal {
        Literal::List(_) => Err(fail("a list is only allowed with 'in' or 'not in'")),
        Literal::Null if !op.is_equality() => Err(fail("null can only be compared with '=' or '!='")),
        _ => coerce_literal(label, field, literal),
    }
}
