//! Recursive-descent parser.
//!
//! Grammar, lowest precedence first:
//!
//! ```text
//! or-expr      := and-expr ("or" and-expr)*
//! and-expr     := unary-expr ("and" unary-expr)*
//! unary-expr   := "not" unary-expr | comparison | "(" or-expr ")"
//! comparison   := field-path operator value
//! field-path   := identifier ("." identifier)*
//! value        := literal | list-literal
//! list-literal := "[" (value ("," value)*)? "]"
//! ```
//!
//! The parser looks one token ahead and stops at the first unexpected token.
//! `not` and parentheses may nest at most [`MAX_DEPTH`] levels deep.

use crate::ast::{Comparison, FieldPath, Literal, LogicalOp, Node};
use crate::error::SyntaxError;
use crate::lexer::tokenize;
use crate::token::{Token, TokenKind};
use crate::SearchError;

/// Deepest nesting of `not` and parentheses a query may use.
pub const MAX_DEPTH: usize = 256;

/// Parses a token stream into a syntax tree.
///
/// The stream is expected to end with [`TokenKind::Eof`], as produced by
/// [`tokenize`]; a missing terminator is treated as end of input.
pub fn parse(tokens: &[Token]) -> Result<Node, SyntaxError> {
    let mut parser = Parser::new(tokens);
    let node = parser.or_expr()?;
    parser.expect_end()?;
    Ok(node)
}

/// Tokenizes and parses query text in one step.
pub fn parse_query(input: &str) -> Result<Node, SearchError> {
    let tokens = tokenize(input)?;
    Ok(parse(&tokens)?)
}

struct Parser<'t> {
    tokens: &'t [Token],
    pos: usize,
    depth: usize,
    eof: Token,
}

impl<'t> Parser<'t> {
    fn new(tokens: &'t [Token]) -> Self {
        let end = tokens
            .last()
            .map(|t| t.offset + t.text.len())
            .unwrap_or(0);
        Parser {
            tokens,
            pos: 0,
            depth: 0,
            eof: Token::new(TokenKind::Eof, "", end),
        }
    }

    fn peek(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&self.eof)
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }

    fn error(&self, expected: &str) -> SyntaxError {
        let token = self.peek();
        SyntaxError {
            offset: token.offset,
            expected: expected.to_string(),
            found: token.kind.describe(),
        }
    }

    fn enter(&mut self) -> Result<(), SyntaxError> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error("shallower nesting"));
        }
        self.depth += 1;
        Ok(())
    }

    fn expect_end(&self) -> Result<(), SyntaxError> {
        if self.peek().is_eof() {
            Ok(())
        } else {
            Err(self.error("'and', 'or' or end of input"))
        }
    }

    fn or_expr(&mut self) -> Result<Node, SyntaxError> {
        let first = self.and_expr()?;
        let mut children = vec![first];
        while self.peek().kind == TokenKind::Or {
            self.advance();
            children.push(self.and_expr()?);
        }
        Ok(group(LogicalOp::Or, children))
    }

    fn and_expr(&mut self) -> Result<Node, SyntaxError> {
        let first = self.unary_expr()?;
        let mut children = vec![first];
        while self.peek().kind == TokenKind::And {
            self.advance();
            children.push(self.unary_expr()?);
        }
        Ok(group(LogicalOp::And, children))
    }

    fn unary_expr(&mut self) -> Result<Node, SyntaxError> {
        match self.peek().kind {
            TokenKind::Not => {
                self.enter()?;
                self.advance();
                let operand = self.unary_expr()?;
                self.depth -= 1;
                Ok(Node::not(operand))
            }
            TokenKind::ParenOpen => {
                self.enter()?;
                self.advance();
                let inner = self.or_expr()?;
                if self.peek().kind != TokenKind::ParenClose {
                    return Err(self.error("')'"));
                }
                self.advance();
                self.depth -= 1;
                Ok(inner)
            }
            TokenKind::Ident(_) => self.comparison(),
            _ => Err(self.error("field name, 'not' or '('")),
        }
    }

    fn comparison(&mut self) -> Result<Node, SyntaxError> {
        let offset = self.peek().offset;
        let path = self.field_path()?;
        let op = match self.peek().kind {
            TokenKind::Op(op) => op,
            _ => return Err(self.error("comparison operator")),
        };
        self.advance();
        let value = self.value()?;
        Ok(Node::Comparison(Comparison {
            path,
            op,
            value,
            offset,
        }))
    }

    fn field_path(&mut self) -> Result<FieldPath, SyntaxError> {
        let mut segments = vec![self.ident()?];
        while self.peek().kind == TokenKind::Dot {
            self.advance();
            segments.push(self.ident()?);
        }
        Ok(FieldPath::new(segments))
    }

    fn ident(&mut self) -> Result<String, SyntaxError> {
        match &self.peek().kind {
            TokenKind::Ident(name) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            _ => Err(self.error("field name")),
        }
    }

    fn value(&mut self) -> Result<Literal, SyntaxError> {
        if self.peek().kind == TokenKind::ListOpen {
            return self.list();
        }
        let literal = match &self.peek().kind {
            TokenKind::String(s) => Literal::String(s.clone()),
            TokenKind::Integer(n) => Literal::Integer(*n),
            TokenKind::Float(n) => Literal::Float(*n),
            TokenKind::Bool(b) => Literal::Bool(*b),
            TokenKind::Null => Literal::Null,
            _ => return Err(self.error("value")),
        };
        self.advance();
        Ok(literal)
    }

    fn list(&mut self) -> Result<Literal, SyntaxError> {
        self.advance();
        let mut items = Vec::new();
        if self.peek().kind == TokenKind::ListClose {
            self.advance();
            return Ok(Literal::List(items));
        }
        loop {
            items.push(self.value()?);
            match self.peek().kind {
                TokenKind::Comma => {
                    self.advance();
                }
                TokenKind::ListClose => {
                    self.advance();
                    return Ok(Literal::List(items));
                }
                _ => return Err(self.error("',' or ']'")),
            }
        }
    }
}

/// Wraps two or more operands in a logical node; a single operand is returned as is.
fn group(op: LogicalOp, mut children: Vec<Node>) -> Node {
    if children.len() == 1 {
        children.remove(0)
    } else {
        Node::Logical { op, children }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::op::CompareOp;

    fn cmp(path: &str, op: CompareOp, value: Literal, offset: usize) -> Node {
        Node::Comparison(Comparison {
            path: FieldPath::parse_dotted(path),
            op,
            value,
            offset,
        })
    }

    fn syntax_error(input: &str) -> SyntaxError {
        match parse_query(input) {
            Err(SearchError::Syntax(err)) => err,
            other => panic!("expected syntax error for {input:?}, got {other:?}"),
        }
    }

    #[test]
    fn single_comparison() {
        let node = parse_query(r#"genre = "Drama""#).unwrap();
        assert_eq!(
            node,
            cmp("genre", CompareOp::Eq, Literal::String("Drama".into()), 0)
        );
    }

    #[test]
    fn and_of_two_comparisons() {
        let node = parse_query(r#"genre = "Drama" and published = true"#).unwrap();
        assert_eq!(
            node,
            Node::and(vec![
                cmp("genre", CompareOp::Eq, Literal::String("Drama".into()), 0),
                cmp("published", CompareOp::Eq, Literal::Bool(true), 20),
            ])
        );
    }

    #[test]
    fn and_binds_tighter_than_or() {
        let node = parse_query("a = 1 or b = 2 and c = 3").unwrap();
        assert_eq!(
            node,
            Node::or(vec![
                cmp("a", CompareOp::Eq, Literal::Integer(1), 0),
                Node::and(vec![
                    cmp("b", CompareOp::Eq, Literal::Integer(2), 9),
                    cmp("c", CompareOp::Eq, Literal::Integer(3), 19),
                ]),
            ])
        );
    }

    #[test]
    fn not_binds_tighter_than_and() {
        let node = parse_query("not a = 1 and b = 2").unwrap();
        assert_eq!(
            node,
            Node::and(vec![
                Node::not(cmp("a", CompareOp::Eq, Literal::Integer(1), 4)),
                cmp("b", CompareOp::Eq, Literal::Integer(2), 14),
            ])
        );
    }

    #[test]
    fn parentheses_override_precedence() {
        let node = parse_query("(a = 1 or b = 2) and c = 3").unwrap();
        assert_eq!(
            node,
            Node::and(vec![
                Node::or(vec![
                    cmp("a", CompareOp::Eq, Literal::Integer(1), 1),
                    cmp("b", CompareOp::Eq, Literal::Integer(2), 10),
                ]),
                cmp("c", CompareOp::Eq, Literal::Integer(3), 21),
            ])
        );
    }

    #[test]
    fn chained_operands_are_flat() {
        let node = parse_query("a = 1 and b = 2 and c = 3").unwrap();
        match node {
            Node::Logical { op, children } => {
                assert_eq!(op, LogicalOp::And);
                assert_eq!(children.len(), 3);
            }
            _ => panic!("expected logical node"),
        }
    }

    #[test]
    fn double_not() {
        let node = parse_query("not not a = 1").unwrap();
        assert_eq!(
            node,
            Node::not(Node::not(cmp("a", CompareOp::Eq, Literal::Integer(1), 8)))
        );
    }

    #[test]
    fn dotted_path_and_lists() {
        let node = parse_query(r#"author.username not in ["a", "b"]"#).unwrap();
        assert_eq!(
            node,
            cmp(
                "author.username",
                CompareOp::NotIn,
                Literal::List(vec![
                    Literal::String("a".into()),
                    Literal::String("b".into())
                ]),
                0
            )
        );
    }

    #[test]
    fn empty_and_nested_lists() {
        let node = parse_query("id in []").unwrap();
        assert_eq!(node, cmp("id", CompareOp::In, Literal::List(vec![]), 0));

        let node = parse_query("id in [[1], 2]").unwrap();
        assert_eq!(
            node,
            cmp(
                "id",
                CompareOp::In,
                Literal::List(vec![
                    Literal::List(vec![Literal::Integer(1)]),
                    Literal::Integer(2)
                ]),
                0
            )
        );
    }

    #[test]
    fn missing_value_reports_end_of_input() {
        let err = syntax_error("genre = ");
        assert_eq!(err.offset, 8);
        assert_eq!(err.expected, "value");
        assert_eq!(err.found, "end of input");
    }

    #[test]
    fn missing_operator() {
        let err = syntax_error("genre \"Drama\"");
        assert_eq!(err.offset, 6);
        assert_eq!(err.expected, "comparison operator");
    }

    #[test]
    fn unclosed_paren() {
        let err = syntax_error("(a = 1");
        assert_eq!(err.offset, 6);
        assert_eq!(err.expected, "')'");
    }

    #[test]
    fn trailing_tokens() {
        let err = syntax_error("a = 1 b = 2");
        assert_eq!(err.offset, 6);
        assert_eq!(err.found, "identifier 'b'");
    }

    #[test]
    fn dangling_dot() {
        let err = syntax_error("author. = 1");
        assert_eq!(err.offset, 8);
        assert_eq!(err.expected, "field name");
    }

    #[test]
    fn stray_list_close() {
        let err = syntax_error("a = ]");
        assert_eq!(err.offset, 4);
        assert_eq!(err.found, "']'");
    }

    #[test]
    fn list_missing_comma() {
        let err = syntax_error("a in [1 2]");
        assert_eq!(err.offset, 8);
        assert_eq!(err.expected, "',' or ']'");
    }

    #[test]
    fn empty_query_is_a_syntax_error() {
        let err = syntax_error("");
        assert_eq!(err.offset, 0);
        assert_eq!(err.found, "end of input");
    }

    #[test]
    fn deep_not_chain_is_rejected() {
        let input = format!("{}n = 1", "not ".repeat(10_000));
        let err = syntax_error(&input);
        assert_eq!(err.expected, "shallower nesting");
        assert_eq!(err.offset, MAX_DEPTH * 4);
        assert_eq!(err.found, "'not'");
    }

    #[test]
    fn deep_parentheses_are_rejected() {
        let input = format!("{}n = 1{}", "(".repeat(10_000), ")".repeat(10_000));
        let err = syntax_error(&input);
        assert_eq!(err.expected, "shallower nesting");
        assert_eq!(err.offset, MAX_DEPTH);
    }

    #[test]
    fn nesting_up_to_the_limit_parses() {
        let input = format!("{}n = 1", "not ".repeat(MAX_DEPTH));
        assert!(parse_query(&input).is_ok());

        let input = format!(
            "{}n = 1{} and {}m = 2{}",
            "(".repeat(MAX_DEPTH),
            ")".repeat(MAX_DEPTH),
            "(".repeat(MAX_DEPTH),
            ")".repeat(MAX_DEPTH)
        );
        assert!(parse_query(&input).is_ok());
    }

    #[test]
    fn parse_without_eof_token() {
        let mut tokens = tokenize("a = 1").unwrap();
        tokens.pop();
        assert!(parse(&tokens).is_ok());
    }
}
