//! Validator capability and the built-in structural validator.

use crate::{NamespacePath, SchemaNode, SchemaType};
use serde_json::Value;
use std::fmt;

/// A single validation failure attributed to a namespace path.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Location of the offending value, including its key.
    pub path: NamespacePath,
    /// Human-readable description.
    pub message: String,
}

impl ValidationError {
    pub fn new(path: NamespacePath, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Checks a candidate value against a schema.
///
/// An empty result means the candidate is valid. Errors are returned in the
/// order the implementation discovers them; callers must not reorder them.
pub trait Validator: Send + Sync {
    fn validate(&self, schema: &SchemaNode, candidate: &Value) -> Vec<ValidationError>;
}

/// Validator covering `type`, `enum`, `required` and nested `properties`.
///
/// A `null` under a property that is not declared `null` is treated as an
/// absent key: it is not type-checked and it does not satisfy `required`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaValidator;

impl SchemaValidator {
    pub fn new() -> Self {
        Self
    }
}

impl Validator for SchemaValidator {
    fn validate(&self, schema: &SchemaNode, candidate: &Value) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        validate_node(schema, candidate, &NamespacePath::root(), &mut errors);
        errors
    }
}

fn validate_node(
    schema: &SchemaNode,
    value: &Value,
    path: &NamespacePath,
    errors: &mut Vec<ValidationError>,
) {
    if !matches_type(schema.kind, value) {
        errors.push(ValidationError::new(
            path.clone(),
            format!("must be {}", schema.kind),
        ));
        return;
    }

    if let Some(allowed) = &schema.enumeration {
        if !allowed.contains(value) {
            let rendered = allowed
                .iter()
                .map(Value::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            errors.push(ValidationError::new(
                path.clone(),
                format!("must be equal to one of the allowed values: {rendered}"),
            ));
        }
    }

    let Value::Object(map) = value else {
        return;
    };

    for key in &schema.required {
        let declared_null = schema
            .property(key)
            .is_some_and(|child| child.kind == SchemaType::Null);
        let present = match map.get(key) {
            Some(Value::Null) => declared_null,
            Some(_) => true,
            None => false,
        };
        if !present {
            errors.push(ValidationError::new(
                path.child(key),
                "missing required property",
            ));
        }
    }

    if let Some(properties) = &schema.properties {
        for (key, child) in properties.iter() {
            match map.get(key) {
                None => {}
                Some(Value::Null) if child.kind != SchemaType::Null => {}
                Some(nested) => validate_node(child, nested, &path.child(key), errors),
            }
        }
    }
}

fn matches_type(kind: SchemaType, value: &Value) -> bool {
    match kind {
        SchemaType::String => value.is_string(),
        SchemaType::Integer => match value {
            Value::Number(number) => {
                number.is_i64()
                    || number.is_u64()
                    || number
                        .as_f64()
                        .is_some_and(|float| float.is_finite() && float.fract() == 0.0)
            }
            _ => false,
        },
        SchemaType::Number => value.is_number(),
        SchemaType::Boolean => value.is_boolean(),
        SchemaType::Object => value.is_object(),
        SchemaType::Array => value.is_array(),
        SchemaType::Null => value.is_null(),
        SchemaType::Untyped => true,
    }
}
