//! Error types for the sounding store.

use thiserror::Error;

/// Errors that can occur reading, writing, or combining sounding files.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed sounding file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Missing variable: {0}")]
    MissingVariable(String),

    #[error("Missing dimension: {0}")]
    MissingDim(String),

    #[error("Variable {name}: {len} values for shape {shape:?}")]
    ShapeMismatch {
        name: String,
        len: usize,
        shape: Vec<usize>,
    },

    #[error("Variable {name} is not record-dimensioned along {record_dim}")]
    NotRecordVar { name: String, record_dim: String },

    #[error("Variable {0} has the wrong type (expected integer time codes)")]
    WrongType(String),

    #[error("Files do not share a schema: {0}")]
    SchemaMismatch(String),
}

/// Result type for sounding store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
