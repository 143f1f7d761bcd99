//! Error types for schema parsing.

use thiserror::Error;

/// Errors returned while reading or interpreting a schema document.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Reading a schema file failed.
    #[error("failed to read schema: {0}")]
    ReadFailed(#[from] std::io::Error),
    /// Parsing a schema document failed.
    #[error("failed to parse schema: {0}")]
    ParseFailed(#[from] json5::Error),
    /// A schema node is malformed.
    #[error("invalid schema at {path}: {message}")]
    InvalidSchema { path: String, message: String },
}
