//! In-memory schema model.
//!
//! A [`SchemaNode`] is parsed from a JSON-Schema-like document. Only the
//! keywords the resolver acts on are kept (`type`, `properties`, `default`,
//! `required`, `enum`, `description`); any other keyword is ignored.

use crate::SchemaError;
use log::debug;
use serde_json::{Map, Value};
use std::fmt;
use std::fs;
use std::path::Path;

/// Declared type tag of a schema node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaType {
    String,
    Integer,
    Number,
    Boolean,
    Object,
    Array,
    Null,
    /// No `type` keyword; any value is accepted.
    Untyped,
}

impl SchemaType {
    /// Parse a JSON Schema type keyword.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "string" => Some(Self::String),
            "integer" => Some(Self::Integer),
            "number" => Some(Self::Number),
            "boolean" => Some(Self::Boolean),
            "object" => Some(Self::Object),
            "array" => Some(Self::Array),
            "null" => Some(Self::Null),
            _ => None,
        }
    }

    /// The keyword as it appears in a schema document.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Array => "array",
            Self::Null => "null",
            Self::Untyped => "any",
        }
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered property map of an object schema.
///
/// Declaration order is preserved so reports and rendered samples follow the
/// schema document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties {
    entries: Vec<(String, SchemaNode)>,
}

impl Properties {
    /// Create an empty property map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a property.
    pub fn insert(&mut self, key: impl Into<String>, node: SchemaNode) {
        let key = key.into();
        match self.entries.iter_mut().find(|(name, _)| *name == key) {
            Some((_, existing)) => *existing = node,
            None => self.entries.push((key, node)),
        }
    }

    /// Look up a property by key.
    pub fn get(&self, key: &str) -> Option<&SchemaNode> {
        self.entries
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, node)| node)
    }

    /// Whether a key is declared.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterate over properties in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SchemaNode)> {
        self.entries.iter().map(|(name, node)| (name.as_str(), node))
    }

    /// Iterate over declared keys in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One node of a configuration schema.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaNode {
    /// Declared type.
    pub kind: SchemaType,
    /// Nested properties; `None` or empty for non-object nodes and open
    /// objects.
    pub properties: Option<Properties>,
    /// Declared default value.
    pub default: Option<Value>,
    /// Keys that must be present when this node is an object.
    pub required: Vec<String>,
    /// Allowed literal values.
    pub enumeration: Option<Vec<Value>>,
    /// Human-readable description, used when rendering samples.
    pub description: Option<String>,
}

impl Default for SchemaNode {
    fn default() -> Self {
        Self::new(SchemaType::Untyped)
    }
}

impl SchemaNode {
    /// Create a node of the given type with no constraints.
    pub fn new(kind: SchemaType) -> Self {
        Self {
            kind,
            properties: None,
            default: None,
            required: Vec::new(),
            enumeration: None,
            description: None,
        }
    }

    /// Create an object node with an empty property map.
    pub fn object() -> Self {
        let mut node = Self::new(SchemaType::Object);
        node.properties = Some(Properties::new());
        node
    }

    /// Add a nested property, turning this node into a closed object.
    pub fn with_property(mut self, key: impl Into<String>, node: SchemaNode) -> Self {
        self.properties
            .get_or_insert_with(Properties::new)
            .insert(key, node);
        self
    }

    /// Set the declared default.
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Mark a nested key as required.
    pub fn with_required(mut self, key: impl Into<String>) -> Self {
        self.required.push(key.into());
        self
    }

    /// Restrict the node to a set of literal values.
    pub fn with_enum(mut self, values: Vec<Value>) -> Self {
        self.enumeration = Some(values);
        self
    }

    /// Look up a declared nested property.
    pub fn property(&self, key: &str) -> Option<&SchemaNode> {
        self.properties.as_ref().and_then(|props| props.get(key))
    }

    /// Whether at least one nested property is declared.
    pub fn has_declared_properties(&self) -> bool {
        self.properties.as_ref().is_some_and(|props| !props.is_empty())
    }

    /// Whether the node is an object that accepts arbitrary nested keys.
    ///
    /// Both a missing and an empty `properties` map leave the object open.
    pub fn is_open_object(&self) -> bool {
        self.kind == SchemaType::Object && !self.has_declared_properties()
    }

    /// Whether the node is an object resolved key by key against its
    /// declared properties.
    pub fn is_closed_object(&self) -> bool {
        self.kind == SchemaType::Object && !self.is_open_object()
    }

    /// Parse a schema from JSON or JSON5 text.
    pub fn from_json5_str(contents: &str) -> Result<Self, SchemaError> {
        debug!("parsing schema from raw contents (len={})", contents.len());
        let value: Value = json5::from_str(contents)?;
        Self::from_value(&value)
    }

    /// Read and parse a schema document from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        debug!("loading schema from path: {}", path.as_ref().display());
        let contents = fs::read_to_string(path)?;
        Self::from_json5_str(&contents)
    }

    /// Build a schema from an already parsed JSON value.
    pub fn from_value(value: &Value) -> Result<Self, SchemaError> {
        parse_node(value, "")
    }
}

fn parse_node(value: &Value, path: &str) -> Result<SchemaNode, SchemaError> {
    let map = expect_object(value, path)?;

    let kind = match map.get("type") {
        None => SchemaType::Untyped,
        Some(Value::String(keyword)) => SchemaType::from_keyword(keyword).ok_or_else(|| {
            invalid_schema(&join_path(path, "type"), &format!("unknown type {keyword:?}"))
        })?,
        Some(Value::Array(_)) => {
            return Err(invalid_schema(
                &join_path(path, "type"),
                "type unions are not supported",
            ));
        }
        Some(_) => return Err(invalid_schema(&join_path(path, "type"), "expected string")),
    };

    let properties = match map.get("properties") {
        None => None,
        Some(value) => {
            let props_path = join_path(path, "properties");
            let entries = expect_object(value, &props_path)?;
            let mut properties = Properties::new();
            for (key, child) in entries {
                properties.insert(key.clone(), parse_node(child, &join_path(&props_path, key))?);
            }
            Some(properties)
        }
    };

    let required = match map.get("required") {
        None => Vec::new(),
        Some(Value::Array(items)) => {
            let mut required = Vec::with_capacity(items.len());
            for (idx, item) in items.iter().enumerate() {
                match item.as_str() {
                    Some(key) => required.push(key.to_string()),
                    None => {
                        return Err(invalid_schema(
                            &format!("{}[{idx}]", join_path(path, "required")),
                            "expected string",
                        ));
                    }
                }
            }
            required
        }
        Some(_) => return Err(invalid_schema(&join_path(path, "required"), "expected array")),
    };

    let enumeration = match map.get("enum") {
        None => None,
        Some(Value::Array(items)) => Some(items.clone()),
        Some(_) => return Err(invalid_schema(&join_path(path, "enum"), "expected array")),
    };

    let description = match map.get("description") {
        None => None,
        Some(Value::String(text)) => Some(text.clone()),
        Some(_) => {
            return Err(invalid_schema(
                &join_path(path, "description"),
                "expected string",
            ));
        }
    };

    Ok(SchemaNode {
        kind,
        properties,
        default: map.get("default").cloned(),
        required,
        enumeration,
        description,
    })
}

fn expect_object<'a>(value: &'a Value, path: &str) -> Result<&'a Map<String, Value>, SchemaError> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(invalid_schema(path, "expected object")),
    }
}

fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

fn invalid_schema(path: &str, message: &str) -> SchemaError {
    let normalized_path = if path.is_empty() { "root" } else { path };
    SchemaError::InvalidSchema {
        path: normalized_path.to_string(),
        message: message.to_string(),
    }
}
