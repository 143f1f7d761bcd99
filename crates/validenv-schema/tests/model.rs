//! Tests for schema parsing and sample rendering.

use pretty_assertions::assert_eq;
use serde_json::json;
use validenv_schema::{SchemaError, SchemaNode, SchemaType, render_sample_config};
use validenv_test_utils::{enum_schema, food_truck_schema};

#[test]
fn parses_nested_schema() {
    let schema = SchemaNode::from_value(&food_truck_schema()).expect("schema");
    assert_eq!(schema.kind, SchemaType::Object);

    let truck = schema.property("foodTruck").expect("foodTruck");
    assert_eq!(truck.kind, SchemaType::Object);
    assert_eq!(truck.required, vec!["numberOfWheels", "cuisine"]);
    assert_eq!(
        truck.properties.as_ref().expect("props").keys().collect::<Vec<_>>(),
        vec!["numberOfWheels", "cuisine"]
    );
    assert_eq!(truck.property("numberOfWheels").and_then(|n| n.default.clone()), Some(json!(4)));
}

#[test]
fn parses_json5_documents() {
    let schema = SchemaNode::from_json5_str(
        r#"{
            // comments and trailing commas are fine
            properties: {
                PORT: { type: 'integer', default: 8080, },
            },
        }"#,
    )
    .expect("schema");
    assert_eq!(schema.kind, SchemaType::Untyped);
    assert_eq!(schema.property("PORT").map(|node| node.kind), Some(SchemaType::Integer));
}

#[test]
fn rejects_unknown_type_keyword() {
    let err = SchemaNode::from_value(&json!({
        "properties": { "X": { "type": "decimal" } }
    }))
    .unwrap_err();
    match err {
        SchemaError::InvalidSchema { path, message } => {
            assert_eq!(path, "properties.X.type");
            assert!(message.contains("decimal"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn rejects_type_unions() {
    let err = SchemaNode::from_value(&json!({ "type": ["string", "null"] })).unwrap_err();
    assert!(format!("{err}").contains("type unions"));
}

#[test]
fn rejects_non_object_node() {
    let err = SchemaNode::from_value(&json!({ "properties": { "X": true } })).unwrap_err();
    assert_eq!(format!("{err}"), "invalid schema at properties.X: expected object");
}

#[test]
fn open_object_detection() {
    let schema = SchemaNode::from_value(&json!({ "type": "object" })).expect("schema");
    assert!(schema.is_open_object());
    assert!(!schema.is_closed_object());

    let empty = SchemaNode::from_value(&json!({ "type": "object", "properties": {} }))
        .expect("schema");
    assert!(empty.is_open_object());
    assert!(SchemaNode::object().is_open_object());

    let closed = SchemaNode::object().with_property("name", SchemaNode::new(SchemaType::String));
    assert!(closed.is_closed_object());
    assert!(!closed.is_open_object());
    assert!(!SchemaNode::new(SchemaType::String).is_closed_object());
}

#[test]
fn renders_sample_config() {
    let schema = SchemaNode::from_value(&enum_schema()).expect("schema");
    assert_eq!(
        render_sample_config(&schema),
        [
            "# Verbosity of the service.",
            "# One of the listed levels.",
            "LOG_LEVEL=info  # <string>(debug | info | warn)",
            "PORT=8080  # <integer>",
            "API_TOKEN=  # <string>",
        ]
        .join("\n")
    );
}
