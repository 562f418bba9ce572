//! Tokens produced by the lexer.

use crate::op::CompareOp;

/// Kind of a token, with the decoded payload for literals.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Identifier, one segment of a field path.
    Ident(String),
    /// `.` between field path segments.
    Dot,
    /// Comparison operator, including the two-word `not in`.
    Op(CompareOp),
    /// Quoted string with escapes already decoded.
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
    ListOpen,
    ListClose,
    Comma,
    ParenOpen,
    ParenClose,
    And,
    Or,
    Not,
    /// End of input; always the last token of a stream.
    Eof,
}

impl TokenKind {
    /// Human-readable description used in syntax errors.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Ident(name) => format!("identifier '{name}'"),
            TokenKind::Dot => "'.'".to_string(),
            TokenKind::Op(op) => format!("operator '{op}'"),
            TokenKind::String(s) => format!("string {s:?}"),
            TokenKind::Integer(n) => format!("number {n}"),
            TokenKind::Float(n) => format!("number {n}"),
            TokenKind::Bool(b) => format!("'{b}'"),
            TokenKind::Null => "'null'".to_string(),
            TokenKind::ListOpen => "'['".to_string(),
            TokenKind::ListClose => "']'".to_string(),
            TokenKind::Comma => "','".to_string(),
            TokenKind::ParenOpen => "'('".to_string(),
            TokenKind::ParenClose => "')'".to_string(),
            TokenKind::And => "'and'".to_string(),
            TokenKind::Or => "'or'".to_string(),
            TokenKind::Not => "'not'".to_string(),
            TokenKind::Eof => "end of input".to_string(),
        }
    }
}

/// A token with its source text and byte offset.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Source text exactly as written (quotes and escapes included).
    pub text: String,
    pub offset: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, offset: usize) -> Self {
        Token {
            kind,
            text: text.into(),
            offset,
        }
    }

    pub fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }
}
