//! Error types for the seekql engine.
//!
//! Each stage of the pipeline has its own error type so callers can tell a
//! malformed token from a grammar violation from a schema mismatch. The
//! search entry points fold them into [`SearchError`].

use thiserror::Error;

use crate::op::CompareOp;

/// Why the lexer rejected the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexErrorReason {
    /// A character that cannot start any token.
    UnexpectedChar(char),
    /// A string literal without its closing quote.
    UnterminatedString,
    /// A `[` that is never closed.
    UnterminatedList,
    /// An unknown or malformed escape sequence inside a string.
    InvalidEscape(String),
    /// A numeric literal that does not fit the supported range.
    InvalidNumber(String),
}

impl std::fmt::Display for LexErrorReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LexErrorReason::UnexpectedChar(c) => write!(f, "unexpected character {c:?}"),
            LexErrorReason::UnterminatedString => f.write_str("unterminated string literal"),
            LexErrorReason::UnterminatedList => f.write_str("unterminated list literal"),
            LexErrorReason::InvalidEscape(seq) => write!(f, "invalid escape sequence '{seq}'"),
            LexErrorReason::InvalidNumber(raw) => write!(f, "invalid number '{raw}'"),
        }
    }
}

/// The query text contains something that is not a token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason} at offset {offset}")]
pub struct LexError {
    /// Byte offset into the query text.
    pub offset: usize,
    pub reason: LexErrorReason,
}

impl LexError {
    pub(crate) fn new(offset: usize, reason: LexErrorReason) -> Self {
        LexError { offset, reason }
    }
}

/// The token stream does not follow the grammar.
///
/// Parsing stops at the first error; `offset` points at the offending token
/// (or at the end of the input when the query stops too early).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("syntax error at offset {offset}: expected {expected}, found {found}")]
pub struct SyntaxError {
    pub offset: usize,
    pub expected: String,
    pub found: String,
}

/// The model descriptions handed to the registry are inconsistent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaBuildError {
    #[error("model '{0}' is described more than once")]
    DuplicateModel(String),

    #[error("field '{field}' is declared more than once on model '{model}'")]
    DuplicateField { model: String, field: String },

    #[error("relation '{model}.{field}' points to undescribed model '{target}'")]
    UnknownRelationTarget {
        model: String,
        field: String,
        target: String,
    },

    #[error("enum field '{model}.{field}' has no choices")]
    EmptyChoices { model: String, field: String },

    #[error("suggestion page size of '{model}.{field}' must be at least 1")]
    ZeroPageSize { model: String, field: String },
}

/// A dotted field path could not be walked through the registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaPathError {
    #[error("unknown model '{0}'")]
    UnknownModel(String),

    #[error("unknown field '{field}' on model '{model}'")]
    UnknownField { model: String, field: String },

    #[error("'{field}' on model '{model}' is not a relation and cannot be traversed")]
    NotARelation { model: String, field: String },

    #[error("'{field}' on model '{model}' is a relation; compare one of its fields instead")]
    RelationNotTerminal { model: String, field: String },

    #[error("empty field path")]
    EmptyPath,
}

/// The query refers to the schema in a way the schema does not allow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error(transparent)]
    Path(#[from] SchemaPathError),

    #[error("operator '{op}' is not supported for {kind} field '{field}'")]
    UnsupportedOperator {
        field: String,
        op: CompareOp,
        kind: &'static str,
    },
}

/// A literal cannot be coerced to the declared type of its field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid value {raw_value} for field '{field}': {reason}")]
pub struct ValueValidationError {
    /// Field path as written in the query.
    pub field: String,
    /// The literal as it appeared in the query.
    pub raw_value: String,
    pub reason: String,
}

impl ValueValidationError {
    pub(crate) fn new(
        field: impl Into<String>,
        raw_value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        ValueValidationError {
            field: field.into(),
            raw_value: raw_value.into(),
            reason: reason.into(),
        }
    }
}

/// Failure of the semantic resolver.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Value(#[from] ValueValidationError),
}

/// Introspection or suggestion lookup on something the registry lacks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotFoundError {
    #[error("model not found: '{0}'")]
    Model(String),

    #[error("no such field '{field}' on model '{model}'")]
    Field { model: String, field: String },
}

/// Any failure of the search entry point.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Value(#[from] ValueValidationError),
}

impl From<ResolveError> for SearchError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::Schema(e) => SearchError::Schema(e),
            ResolveError::Value(e) => SearchError::Value(e),
        }
    }
}

/// Result type for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;
