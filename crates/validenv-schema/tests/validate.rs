//! Tests for the built-in schema validator.

use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use validenv_schema::{NamespacePath, SchemaNode, SchemaValidator, ValidationError, Validator};
use validenv_test_utils::{enum_schema, food_truck_schema, required_keys_schema};

fn validate(schema: Value, candidate: Value) -> Vec<ValidationError> {
    let schema = SchemaNode::from_value(&schema).expect("schema");
    SchemaValidator::new().validate(&schema, &candidate)
}

fn paths(errors: &[ValidationError]) -> Vec<String> {
    errors.iter().map(|error| error.path.to_string()).collect()
}

#[test]
fn accepts_conforming_nested_config() {
    let errors = validate(
        food_truck_schema(),
        json!({ "foodTruck": { "numberOfWheels": 4, "cuisine": "martian" } }),
    );
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
}

/// Missing required keys are attributed to their nested path.
#[test]
fn reports_missing_nested_required_key() {
    let errors = validate(food_truck_schema(), json!({ "foodTruck": { "numberOfWheels": 4 } }));
    assert_eq!(
        errors,
        vec![ValidationError::new(
            ["foodTruck", "cuisine"].into_iter().collect::<NamespacePath>(),
            "missing required property",
        )]
    );
    assert_eq!(errors[0].to_string(), "foodTruck/cuisine: missing required property");
}

/// Null is the absent marker: it neither satisfies required nor fails type checks.
#[test]
fn null_counts_as_absent() {
    let errors = validate(
        required_keys_schema(),
        json!({
            "FOO": "bar",
            "BLUE": null,
            "URL": null,
            "DATABASE_NAME": "hello.db",
            "ENV_USER": null
        }),
    );
    assert_eq!(paths(&errors), vec!["ENV_USER".to_string()]);
}

#[test]
fn reports_type_mismatch() {
    let errors = validate(
        required_keys_schema(),
        json!({ "FOO": "bar", "DATABASE_NAME": 9, "ENV_USER": "me" }),
    );
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].to_string(), "DATABASE_NAME: must be string");
}

#[test]
fn integer_accepts_integral_floats_only() {
    let schema = json!({ "properties": { "N": { "type": "integer" } } });
    assert!(validate(schema.clone(), json!({ "N": 3.0 })).is_empty());
    assert_eq!(paths(&validate(schema, json!({ "N": 3.5 }))), vec!["N".to_string()]);
}

#[test]
fn reports_enum_mismatch() {
    let errors = validate(enum_schema(), json!({ "LOG_LEVEL": "trace", "PORT": 8080 }));
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].message,
        "must be equal to one of the allowed values: \"debug\", \"info\", \"warn\""
    );
}

/// Errors come back in schema declaration order.
#[test]
fn errors_follow_declaration_order() {
    let errors = validate(
        json!({
            "properties": {
                "A": { "type": "integer" },
                "B": { "type": "boolean" },
                "C": { "type": "string" }
            }
        }),
        json!({ "C": 1, "A": "x", "B": "maybe" }),
    );
    assert_eq!(paths(&errors), vec!["A", "B", "C"]);
}

#[test]
fn open_objects_accept_anything() {
    let errors = validate(
        json!({ "properties": { "extras": { "type": "object" } } }),
        json!({ "extras": { "any": { "deep": [1, 2] } } }),
    );
    assert!(errors.is_empty());
}

#[test]
fn root_type_mismatch_is_reported_at_root() {
    let errors = validate(json!({ "type": "object" }), json!("nope"));
    assert_eq!(errors[0].to_string(), "root: must be object");
}
