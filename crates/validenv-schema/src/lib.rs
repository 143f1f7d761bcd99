//! Schema model, default extraction and validation for validenv.
//!
//! Schemas are a JSON Schema subset: `type`, `properties`, `default`,
//! `required` and `enum` per node. Nodes are parsed once and treated as
//! read-only by everything downstream.

mod defaults;
mod error;
mod model;
mod path;
mod sample;
mod validate;

/// Default extraction.
pub use defaults::extract_defaults;
/// Schema parsing error type.
pub use error::SchemaError;
/// Schema model types.
pub use model::{Properties, SchemaNode, SchemaType};
/// Namespace path used for diagnostics.
pub use path::NamespacePath;
/// Sample config rendering.
pub use sample::render_sample_config;
/// Validator capability and built-in implementation.
pub use validate::{SchemaValidator, ValidationError, Validator};
