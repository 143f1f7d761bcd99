//! Key-presence diff between input sources and the schema.

use super::ResolveOptions;
use crate::ConfigSource;
use serde_json::{Map, Value};
use std::fmt;
use validenv_schema::{NamespacePath, SchemaNode};

/// A declared key that no input source supplied.
#[derive(Debug, Clone, PartialEq)]
pub struct MissingKey {
    pub path: NamespacePath,
    /// Value the merged config ended up with, usually the default.
    pub fallback: Option<Value>,
}

impl fmt::Display for MissingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} exists in schema but not in source", self.path)?;
        if let Some(fallback) = &self.fallback {
            write!(f, " => using default: {fallback}")?;
        }
        Ok(())
    }
}

/// Keys declared but not supplied, and keys supplied but not declared.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyPresenceReport {
    pub missing_from_source: Vec<MissingKey>,
    pub undeclared_in_schema: Vec<NamespacePath>,
}

impl KeyPresenceReport {
    pub fn is_empty(&self) -> bool {
        self.missing_from_source.is_empty() && self.undeclared_in_schema.is_empty()
    }
}

/// Compare the base source and environment overrides with the schema.
///
/// Only the base source is scanned for undeclared keys; environment
/// overrides are consulted per declared key. Nested objects with declared
/// properties are compared recursively; open objects accept anything.
pub fn key_presence(
    schema: &SchemaNode,
    merged: &Map<String, Value>,
    base: &Map<String, Value>,
    env_overrides: &ConfigSource,
    options: &ResolveOptions,
) -> KeyPresenceReport {
    let mut report = KeyPresenceReport::default();
    walk(
        schema,
        Some(merged),
        Some(base),
        env_overrides,
        options,
        &NamespacePath::root(),
        &mut report,
    );
    report
}

fn walk(
    schema: &SchemaNode,
    merged: Option<&Map<String, Value>>,
    base: Option<&Map<String, Value>>,
    env: &ConfigSource,
    options: &ResolveOptions,
    path: &NamespacePath,
    report: &mut KeyPresenceReport,
) {
    let Some(properties) = &schema.properties else {
        return;
    };

    for (key, child) in properties.iter() {
        let key_path = path.child(key);
        let merged_value = merged.and_then(|map| map.get(key));
        let base_value = base.and_then(|map| map.get(key));

        if child.is_closed_object() {
            walk(
                child,
                merged_value.and_then(Value::as_object),
                base_value.and_then(Value::as_object),
                env,
                options,
                &key_path,
                report,
            );
            continue;
        }

        let from_base = base_value.is_some_and(is_supplied);
        let from_env = env.get(&options.env_key(path, key)).is_some_and(is_supplied);
        if !from_base && !from_env {
            report.missing_from_source.push(MissingKey {
                path: key_path,
                fallback: merged_value.filter(|value| !value.is_null()).cloned(),
            });
        }
    }

    if let Some(base) = base {
        for key in base.keys() {
            if !properties.contains_key(key) {
                report.undeclared_in_schema.push(path.child(key));
            }
        }
    }
}

fn is_supplied(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(text) => !text.is_empty(),
        _ => true,
    }
}
