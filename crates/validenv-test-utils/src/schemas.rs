//! Schema documents used as fixtures.
//!
//! Fixtures are plain JSON values so any crate can parse them with its own
//! schema types.

use serde_json::{Value, json};

/// Flat schema with one property of each scalar type, all defaulted.
pub fn scalar_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "MY_STRING_ENVVAR": { "type": "string", "default": "blahblah" },
            "MY_INTEGER_ENVVAR": { "type": "integer", "default": 123 },
            "MY_FLOAT_ENVVAR": { "type": "number", "default": 4.56 },
            "MY_BOOLEAN_ENVVAR": { "type": "boolean", "default": true }
        }
    })
}

/// Nested object schema with a required key that has no default.
pub fn food_truck_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "foodTruck": {
                "type": "object",
                "properties": {
                    "numberOfWheels": { "type": "number", "default": 4 },
                    "cuisine": { "type": "string" }
                },
                "required": ["numberOfWheels", "cuisine"]
            }
        }
    })
}

/// Two levels of nesting plus array and boolean defaults.
pub fn boat_schema() -> Value {
    json!({
        "properties": {
            "boat": {
                "type": "object",
                "properties": {
                    "color": { "type": "string", "default": "blue" },
                    "speed": {
                        "type": "object",
                        "properties": {
                            "magnitude": { "type": "number", "default": 23 },
                            "referenceFrame": { "type": "string" }
                        }
                    }
                }
            },
            "flags": { "type": "array", "default": [1, 2, 3] },
            "callSign": { "type": "array" },
            "superDuck": { "type": "boolean", "default": true }
        }
    })
}

/// Flat schema where several keys are required and most lack defaults.
pub fn required_keys_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "FOO": { "type": "string", "default": "bar" },
            "BLUE": { "type": "number" },
            "URL": { "type": "string" },
            "DATABASE_NAME": { "type": "string" },
            "ENV_USER": { "type": "string" }
        },
        "required": ["FOO", "DATABASE_NAME", "ENV_USER"]
    })
}

/// Schema with an enumerated key and a description, for rendering.
pub fn enum_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "LOG_LEVEL": {
                "type": "string",
                "description": "Verbosity of the service.\nOne of the listed levels.",
                "default": "info",
                "enum": ["debug", "info", "warn"]
            },
            "PORT": { "type": "integer", "default": 8080 },
            "API_TOKEN": { "type": "string" }
        },
        "required": ["LOG_LEVEL"]
    })
}
