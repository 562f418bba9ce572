//! Error types for the in-memory store.

use seekql::ValueValidationError;
use thiserror::Error;

/// Errors raised while filling a [`MemoryStore`](crate::MemoryStore).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoadError {
    /// Records were given for a model the registry does not know.
    #[error("unknown model '{0}'")]
    UnknownModel(String),

    /// A record is not a JSON object.
    #[error("record #{index} of '{model}' is not an object")]
    NotAnObject { model: String, index: usize },

    /// A record's `id` is not an integer.
    #[error("record #{index} of '{model}' has a non-integer id")]
    InvalidId { model: String, index: usize },

    /// A record without an id follows one with the largest possible id.
    #[error("record #{index} of '{model}' needs an id past the largest integer")]
    IdOverflow { model: String, index: usize },

    /// Two records of one model share an id.
    #[error("duplicate id {id} in '{model}'")]
    DuplicateId { model: String, id: i64 },

    /// A record sets a field its model does not declare.
    #[error("'{model}' has no field '{field}'")]
    UnknownField { model: String, field: String },

    /// A field value does not fit the field's declared type.
    #[error(transparent)]
    InvalidValue(#[from] ValueValidationError),

    /// A relation points at a record that does not exist.
    #[error("'{model}.{field}' of record {id} refers to missing '{target}' record {target_id}")]
    DanglingRelation {
        model: String,
        field: String,
        id: i64,
        target: String,
        target_id: i64,
    },
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, LoadError>;
