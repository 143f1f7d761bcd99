//! Precedence merging of defaults, base source and environment overrides.

use super::coerce::{Coerced, CoercionIssue, coerce};
use super::{MissingKeyPolicy, ResolveOptions, UnknownKeyPolicy};
use crate::ConfigSource;
use log::debug;
use serde_json::{Map, Value};
use validenv_schema::{NamespacePath, SchemaNode, SchemaType};

/// Merge one schema level and everything below it.
///
/// Precedence per declared key, highest first: environment override (when
/// present and non-empty), overlay value (when non-null), default. Leaf
/// candidates are coerced in that order and the first usable one wins, so a
/// failed numeric coercion falls back to the next layer instead of replacing
/// it. Object properties with declared properties are merged recursively
/// under `path + key`. Unresolved keys and undeclared overlay keys follow the
/// policies in `options`. Inputs are never mutated.
pub fn merge(
    schema: &SchemaNode,
    defaults: &Map<String, Value>,
    overlay: &Map<String, Value>,
    env_overrides: &ConfigSource,
    path: &NamespacePath,
    options: &ResolveOptions,
) -> (Map<String, Value>, Vec<CoercionIssue>) {
    let merger = Merger {
        env: env_overrides,
        options,
    };
    let mut issues = Vec::new();
    let merged = merger.merge_level(schema, defaults, overlay, path, &mut issues);
    (merged, issues)
}

struct Merger<'a> {
    env: &'a ConfigSource,
    options: &'a ResolveOptions,
}

impl Merger<'_> {
    fn merge_level(
        &self,
        schema: &SchemaNode,
        defaults: &Map<String, Value>,
        overlay: &Map<String, Value>,
        path: &NamespacePath,
        issues: &mut Vec<CoercionIssue>,
    ) -> Map<String, Value> {
        let mut merged = Map::new();

        if let Some(properties) = &schema.properties {
            for (key, child) in properties.iter() {
                let key_path = path.child(key);
                let default = present(defaults.get(key));
                let supplied = present(overlay.get(key));

                let resolved = if child.is_closed_object() {
                    Some(self.merge_object(child, default, supplied, &key_path, issues))
                } else {
                    let env = self.env_override(path, key);
                    resolve_leaf(child.kind, [env, supplied, default], &key_path, issues)
                };

                match resolved {
                    Some(value) => {
                        merged.insert(key.to_string(), value);
                    }
                    None if self.options.missing_keys == MissingKeyPolicy::Retain => {
                        merged.insert(key.to_string(), Value::Null);
                    }
                    None => {
                        debug!("dropping unresolved key {key_path}");
                    }
                }
            }
        }

        if self.options.unknown_keys == UnknownKeyPolicy::PassThrough {
            for (key, value) in overlay {
                let declared = schema
                    .properties
                    .as_ref()
                    .is_some_and(|props| props.contains_key(key));
                if !declared {
                    merged.insert(key.clone(), value.clone());
                }
            }
        }

        merged
    }

    /// Object branch: recurse with the nested defaults and overlay subtrees.
    fn merge_object(
        &self,
        schema: &SchemaNode,
        default: Option<&Value>,
        supplied: Option<&Value>,
        path: &NamespacePath,
        issues: &mut Vec<CoercionIssue>,
    ) -> Value {
        let empty = Map::new();
        let nested_overlay = match supplied {
            Some(Value::Object(map)) => map,
            // Keep the mismatched value so validation reports it.
            Some(other) => return other.clone(),
            None => &empty,
        };
        let nested_defaults = match default {
            Some(Value::Object(map)) => map,
            _ => &empty,
        };
        Value::Object(self.merge_level(schema, nested_defaults, nested_overlay, path, issues))
    }

    fn env_override(&self, path: &NamespacePath, key: &str) -> Option<&Value> {
        match self.env.get(&self.options.env_key(path, key)) {
            Some(Value::String(text)) if text.is_empty() => None,
            other => present(other),
        }
    }
}

fn resolve_leaf(
    kind: SchemaType,
    candidates: [Option<&Value>; 3],
    path: &NamespacePath,
    issues: &mut Vec<CoercionIssue>,
) -> Option<Value> {
    for candidate in candidates.into_iter().flatten() {
        let (coerced, issue) = coerce(candidate, kind);
        if let Some(kind) = issue {
            issues.push(CoercionIssue {
                path: path.clone(),
                raw: raw_text(candidate),
                kind,
            });
        }
        match coerced {
            Coerced::Value(value) => return Some(value),
            Coerced::Failed => continue,
        }
    }
    None
}

fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|value| !value.is_null())
}

fn raw_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
