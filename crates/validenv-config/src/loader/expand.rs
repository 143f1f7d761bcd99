//! Shell-style `$VAR` / `${VAR}` expansion of string values.

use crate::ConfigSource;
use serde_json::{Map, Value};
use validenv_schema::{SchemaNode, SchemaType};

/// Variables visible to expansion: the override source first, then the base.
///
/// Unknown variables expand to an empty string, matching dotenv files.
pub(crate) struct Variables<'a> {
    pub(crate) overrides: &'a ConfigSource,
    pub(crate) base: &'a ConfigSource,
}

impl Variables<'_> {
    fn lookup(&self, name: &str) -> Option<String> {
        self.overrides
            .get_str(name)
            .or_else(|| self.base.get_str(name))
            .map(str::to_string)
    }

    pub(crate) fn expand(&self, text: &str) -> String {
        shellexpand::env_with_context_no_errors(text, |name| {
            Some(self.lookup(name).unwrap_or_default())
        })
        .into_owned()
    }

    /// Expand string defaults of string-typed schema nodes.
    pub(crate) fn expand_defaults(
        &self,
        schema: &SchemaNode,
        defaults: &Map<String, Value>,
    ) -> Map<String, Value> {
        let mut out = Map::new();
        for (key, value) in defaults {
            let child = schema.property(key);
            let expanded = match (child, value) {
                (Some(child), Value::Object(nested)) if child.is_closed_object() => {
                    Value::Object(self.expand_defaults(child, nested))
                }
                (Some(child), Value::String(text)) if child.kind == SchemaType::String => {
                    Value::String(self.expand(text))
                }
                _ => value.clone(),
            };
            out.insert(key.clone(), expanded);
        }
        out
    }

    /// Expand every string leaf of a base source, nested objects included.
    pub(crate) fn expand_values(&self, values: &Map<String, Value>) -> Map<String, Value> {
        values
            .iter()
            .map(|(key, value)| {
                let expanded = match value {
                    Value::String(text) => Value::String(self.expand(text)),
                    Value::Object(nested) => Value::Object(self.expand_values(nested)),
                    other => other.clone(),
                };
                (key.clone(), expanded)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn overrides_shadow_base_and_unknowns_are_empty() {
        let overrides = ConfigSource::from_pairs([("HOST", "env-host")]);
        let base = ConfigSource::from_pairs([("HOST", "base-host"), ("PORT", "5432")]);
        let vars = Variables {
            overrides: &overrides,
            base: &base,
        };

        assert_eq!(vars.expand("${HOST}:$PORT"), "env-host:5432");
        assert_eq!(vars.expand("${VALIDENV_UNSET_VARIABLE}/data"), "/data");
        assert_eq!(vars.expand("plain"), "plain");
    }

    #[test]
    fn only_string_nodes_are_expanded_in_defaults() {
        let schema = SchemaNode::from_value(&json!({
            "properties": {
                "DATA_DIR": { "type": "string", "default": "${ROOT}/data" },
                "PATTERN": { "type": "array", "default": ["${ROOT}"] },
                "db": {
                    "type": "object",
                    "properties": { "url": { "type": "string", "default": "pg://${ROOT}" } }
                }
            }
        }))
        .expect("schema");
        let overrides = ConfigSource::from_pairs([("ROOT", "/srv")]);
        let base = ConfigSource::new();
        let vars = Variables {
            overrides: &overrides,
            base: &base,
        };
        let defaults = json!({
            "DATA_DIR": "${ROOT}/data",
            "PATTERN": ["${ROOT}"],
            "db": { "url": "pg://${ROOT}" }
        });

        let expanded = vars.expand_defaults(&schema, defaults.as_object().expect("map"));
        assert_eq!(
            Value::Object(expanded),
            json!({
                "DATA_DIR": "/srv/data",
                "PATTERN": ["${ROOT}"],
                "db": { "url": "pg:///srv" }
            })
        );
    }
}
