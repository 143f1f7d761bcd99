//! Error types for config resolution.

use crate::CoercionIssue;
use thiserror::Error;
use validenv_schema::{SchemaError, ValidationError};

/// Errors returned while loading sources or resolving a config.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading a config source failed.
    #[error("failed to read config: {0}")]
    ReadFailed(#[from] std::io::Error),
    /// Parsing a JSON/JSON5 config document failed.
    #[error("failed to parse config: {0}")]
    ParseFailed(#[from] json5::Error),
    /// Converting JSON values failed.
    #[error("failed to decode config: {0}")]
    DecodeFailed(#[from] serde_json::Error),
    /// Parsing a dotenv file failed.
    #[error("failed to parse dotenv file: {0}")]
    Dotenv(#[from] dotenvy::Error),
    /// The schema document is unusable.
    #[error(transparent)]
    Schema(#[from] SchemaError),
    /// Numeric coercion failed under full conformance.
    #[error("full conformance failed: {} value(s) could not be coerced", .issues.len())]
    Conformance { issues: Vec<CoercionIssue> },
    /// The merged config does not satisfy the schema.
    #[error(
        "failed to validate config against schema: {}",
        join_errors(.errors)
    )]
    Validation { errors: Vec<ValidationError> },
    /// Generic invalid input.
    #[error("invalid config: {0}")]
    Invalid(String),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
