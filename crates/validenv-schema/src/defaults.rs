//! Default extraction from schema nodes.

use crate::SchemaNode;
use serde_json::{Map, Value};

/// Collect every declared default of a schema into a value tree.
///
/// Returns `None` when the node has no `properties` map. Closed object
/// properties are recursed into and stored even when their subtree is empty;
/// open objects are treated like leaves. When `preserve_keys_without_default` is set, properties
/// without a default are stored as `null`, the absent marker; otherwise they
/// are omitted.
pub fn extract_defaults(
    schema: &SchemaNode,
    preserve_keys_without_default: bool,
) -> Option<Map<String, Value>> {
    let properties = schema.properties.as_ref()?;
    let mut out = Map::new();
    for (key, child) in properties.iter() {
        if child.is_closed_object() {
            let nested = extract_defaults(child, preserve_keys_without_default)
                .map(Value::Object)
                .unwrap_or(Value::Null);
            out.insert(key.to_string(), nested);
        } else if let Some(default) = &child.default {
            out.insert(key.to_string(), default.clone());
        } else if preserve_keys_without_default {
            out.insert(key.to_string(), Value::Null);
        }
    }
    Some(out)
}
