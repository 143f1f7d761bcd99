//! Sample dotenv rendering for a schema.

use crate::SchemaNode;
use serde_json::Value;

/// Render a dotenv-style template listing every root property.
///
/// Each entry is preceded by its description as `#` comment lines and
/// annotated with its type and, when present, its allowed values.
pub fn render_sample_config(schema: &SchemaNode) -> String {
    let Some(properties) = &schema.properties else {
        return String::new();
    };

    let mut out = Vec::new();
    for (key, node) in properties.iter() {
        if let Some(description) = &node.description {
            out.extend(description.lines().map(|line| format!("# {line}")));
        }

        let default = node.default.as_ref().map(render_value).unwrap_or_default();
        let mut line = format!("{key}={default}  # <{}>", node.kind);
        if let Some(allowed) = &node.enumeration {
            let choices = allowed.iter().map(render_value).collect::<Vec<_>>();
            line.push_str(&format!("({})", choices.join(" | ")));
        }
        out.push(line);
    }
    out.join("\n")
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
