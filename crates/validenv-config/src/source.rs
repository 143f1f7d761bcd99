//! Config sources: one precedence layer each.
//!
//! A [`ConfigSource`] is captured once per resolution and never mutated by
//! the resolver. [`EnvSource`] implementations produce flat string-keyed
//! sources from dotenv files or the process environment.

use crate::ConfigError;
use log::{debug, warn};
use serde_json::{Map, Value};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Default dotenv filename looked up in the working directory.
pub const DEFAULT_DOTENV_FILE: &str = ".env";

/// Ordered, string-keyed map of raw values forming one precedence layer.
///
/// Values are usually strings (dotenv files, environment variables) but typed
/// JSON values are accepted for base configs supplied in code or documents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigSource {
    values: Map<String, Value>,
}

impl ConfigSource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a source of string values from key/value pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let values = pairs
            .into_iter()
            .map(|(key, value)| (key.into(), Value::String(value.into())))
            .collect();
        Self { values }
    }

    /// Wrap an already built map.
    pub fn from_map(values: Map<String, Value>) -> Self {
        Self { values }
    }

    /// Build a source from a JSON value, which must be an object.
    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        match value {
            Value::Object(values) => Ok(Self { values }),
            other => Err(ConfigError::Invalid(format!(
                "config source must be an object, found {other}"
            ))),
        }
    }

    /// Parse a JSON or JSON5 document into a source.
    pub fn from_json5_str(contents: &str) -> Result<Self, ConfigError> {
        debug!("parsing config source (len={})", contents.len());
        let value: Value = json5::from_str(contents)?;
        Self::from_value(value)
    }

    /// Read a JSON or JSON5 document from disk.
    pub fn from_json5_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("loading config source from path: {}", path.as_ref().display());
        let contents = fs::read_to_string(path)?;
        Self::from_json5_str(&contents)
    }

    /// Add or replace a value, returning the updated source.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Look up a string value.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Keys in source order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ConfigSource {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

/// Producer of a flat, string-keyed source.
pub trait EnvSource {
    /// Capture the source's current contents.
    fn load(&self) -> Result<ConfigSource, ConfigError>;

    /// Short label used in log lines.
    fn describe(&self) -> String;
}

impl EnvSource for ConfigSource {
    fn load(&self) -> Result<ConfigSource, ConfigError> {
        Ok(self.clone())
    }

    fn describe(&self) -> String {
        format!("in-memory source ({} keys)", self.values.len())
    }
}

/// A dotenv file with `KEY=value` lines.
///
/// Parsing and `${VAR}` substitution are handled by `dotenvy`. A missing file
/// is not an error: it is logged and loads as an empty source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DotenvFile {
    path: PathBuf,
}

impl DotenvFile {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// `.env` in the current working directory.
    pub fn in_current_dir() -> Result<Self, ConfigError> {
        Ok(Self::new(env::current_dir()?.join(DEFAULT_DOTENV_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EnvSource for DotenvFile {
    fn load(&self) -> Result<ConfigSource, ConfigError> {
        if !self.path.exists() {
            warn!("no dotenv file found in {}", self.path.display());
            return Ok(ConfigSource::new());
        }

        let mut values = Map::new();
        for item in dotenvy::from_path_iter(&self.path)? {
            let (key, value) = item?;
            values.insert(key, Value::String(value));
        }
        debug!(
            "loaded dotenv file (path={}, keys={})",
            self.path.display(),
            values.len()
        );
        Ok(ConfigSource { values })
    }

    fn describe(&self) -> String {
        format!("dotenv({})", self.path.display())
    }
}

/// Snapshot of the process environment.
///
/// Variables whose name or value is not valid unicode are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn load(&self) -> Result<ConfigSource, ConfigError> {
        let values = env::vars_os()
            .filter_map(|(key, value)| {
                Some((key.into_string().ok()?, Value::String(value.into_string().ok()?)))
            })
            .collect();
        Ok(ConfigSource { values })
    }

    fn describe(&self) -> String {
        "process environment".to_string()
    }
}
