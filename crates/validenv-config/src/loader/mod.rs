//! Schema-driven config resolution.
//!
//! Extracts schema defaults, merges base source and environment overrides by
//! precedence with type coercion, applies the strictness policy, validates
//! the merged tree and produces a [`ResolvedConfig`].

pub(crate) mod coerce;
mod expand;
pub(crate) mod merge;
pub(crate) mod presence;


use crate::{ConfigError, ConfigSource, EnvSource, Strictness, STRICTNESS_ENV_VAR};
use coerce::CoercionIssue;
use expand::Variables;
use log::{debug, info, warn};
use presence::KeyPresenceReport;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use validenv_schema::{NamespacePath, SchemaNode, SchemaValidator, Validator, extract_defaults};

/// Default separator joining nested keys into environment variable names.
const DEFAULT_ENV_SEPARATOR: &str = "__";

/// What happens to a declared key that no layer supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingKeyPolicy {
    /// Leave the key out of the merged config.
    #[default]
    Drop,
    /// Keep the key with a `null` absent marker.
    Retain,
}

/// What happens to base-source keys the schema does not declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownKeyPolicy {
    /// Carry them through unchanged.
    #[default]
    PassThrough,
    /// Leave them out of the merged config.
    Drop,
}

/// Options controlling a resolution call.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolveOptions {
    /// Explicit strictness; when unset it is read from the override source.
    pub strictness: Option<Strictness>,
    pub missing_keys: MissingKeyPolicy,
    pub unknown_keys: UnknownKeyPolicy,
    /// Separator for nested override names, e.g. `DB__PORT`.
    pub env_separator: String,
    /// Expand `$VAR` / `${VAR}` in string defaults and base values.
    pub expand_variables: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            strictness: None,
            missing_keys: MissingKeyPolicy::default(),
            unknown_keys: UnknownKeyPolicy::default(),
            env_separator: DEFAULT_ENV_SEPARATOR.to_string(),
            expand_variables: true,
        }
    }
}

impl ResolveOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strictness(mut self, strictness: Strictness) -> Self {
        self.strictness = Some(strictness);
        self
    }

    pub fn with_missing_keys(mut self, policy: MissingKeyPolicy) -> Self {
        self.missing_keys = policy;
        self
    }

    pub fn with_unknown_keys(mut self, policy: UnknownKeyPolicy) -> Self {
        self.unknown_keys = policy;
        self
    }

    pub fn with_env_separator(mut self, separator: impl Into<String>) -> Self {
        self.env_separator = separator.into();
        self
    }

    pub fn with_variable_expansion(mut self, enabled: bool) -> Self {
        self.expand_variables = enabled;
        self
    }

    /// Environment variable name consulted for `key` under `path`.
    pub fn env_key(&self, path: &NamespacePath, key: &str) -> String {
        if path.is_root() {
            key.to_string()
        } else {
            format!(
                "{}{sep}{key}",
                path.join(&self.env_separator),
                sep = self.env_separator
            )
        }
    }
}

/// The merged, validated configuration tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MergedConfig {
    values: Map<String, Value>,
}

impl MergedConfig {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Look up a nested value.
    pub fn get_path(&self, path: &NamespacePath) -> Option<&Value> {
        let (first, rest) = path.segments().split_first()?;
        rest.iter()
            .try_fold(self.values.get(first)?, |value, key| value.get(key))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.values
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.values
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.values)
    }

    /// Decode into a caller-defined typed config.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, ConfigError> {
        Ok(serde_json::from_value(Value::Object(self.values.clone()))?)
    }
}

/// Merged config plus the diagnostics gathered while resolving it.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub config: MergedConfig,
    /// Strictness the call ran under.
    pub strictness: Strictness,
    /// Values that failed coercion, in discovery order.
    pub coercion_issues: Vec<CoercionIssue>,
    /// Present only when the strictness level computes it.
    pub key_presence: Option<KeyPresenceReport>,
}

/// Caller-owned handle holding the schema a process resolves against.
///
/// Cheap to clone and safe to share across threads; every call captures
/// its own sources.
#[derive(Clone)]
pub struct ConfigContext {
    schema: Arc<SchemaNode>,
    validator: Arc<dyn Validator>,
    options: ResolveOptions,
}

impl fmt::Debug for ConfigContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigContext")
            .field("schema", &self.schema)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl ConfigContext {
    /// Create a context using the built-in validator and default options.
    pub fn new(schema: SchemaNode) -> Self {
        Self {
            schema: Arc::new(schema),
            validator: Arc::new(SchemaValidator::new()),
            options: ResolveOptions::default(),
        }
    }

    /// Create a context from a schema document held as JSON.
    pub fn from_schema_value(value: &Value) -> Result<Self, ConfigError> {
        Ok(Self::new(SchemaNode::from_value(value)?))
    }

    /// Create a context from a JSON/JSON5 schema file.
    pub fn from_schema_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Ok(Self::new(SchemaNode::from_path(path)?))
    }

    /// Replace the validator.
    pub fn with_validator(mut self, validator: impl Validator + 'static) -> Self {
        self.validator = Arc::new(validator);
        self
    }

    pub fn with_options(mut self, options: ResolveOptions) -> Self {
        self.options = options;
        self
    }

    pub fn schema(&self) -> &SchemaNode {
        &self.schema
    }

    pub fn options(&self) -> &ResolveOptions {
        &self.options
    }

    /// Schema defaults alone, shaped per the missing-key policy.
    pub fn defaults(&self) -> MergedConfig {
        let preserve = self.options.missing_keys == MissingKeyPolicy::Retain;
        MergedConfig {
            values: extract_defaults(&self.schema, preserve).unwrap_or_default(),
        }
    }

    /// Resolve a config from an explicit base source and override source.
    ///
    /// When variable expansion is enabled, string defaults and string base
    /// values are expanded against the overrides, then the base itself.
    pub fn resolve(
        &self,
        base: &ConfigSource,
        env_overrides: &ConfigSource,
    ) -> Result<ResolvedConfig, ConfigError> {
        let strictness = self.strictness_for(env_overrides);
        self.resolve_with(base, env_overrides, &self.options, strictness, true)
    }

    /// Resolve with a dotenv-style base layer and environment overrides.
    ///
    /// Dotenv values arrive already expanded, so only string defaults are
    /// expanded here.
    pub fn load_dotenv(
        &self,
        dotenv: &dyn EnvSource,
        env: &dyn EnvSource,
    ) -> Result<ResolvedConfig, ConfigError> {
        info!(
            "loading config from {} with overrides from {}",
            dotenv.describe(),
            env.describe()
        );
        let base = dotenv.load()?;
        let env_overrides = env.load()?;
        let strictness = self.strictness_for(&env_overrides);
        self.resolve_with(&base, &env_overrides, &self.options, strictness, false)
    }

    /// Resolve straight from the process environment.
    ///
    /// The environment is the only layer. Declared keys nobody supplied are
    /// retained as `null`, undeclared variables are dropped, and strictness
    /// is `none` unless the context sets one explicitly. Only string defaults
    /// are expanded; environment values are taken as-is.
    pub fn load_process_env(&self, env: &dyn EnvSource) -> Result<ResolvedConfig, ConfigError> {
        info!("loading config from {}", env.describe());
        let base = env.load()?;
        let options = ResolveOptions {
            missing_keys: MissingKeyPolicy::Retain,
            unknown_keys: UnknownKeyPolicy::Drop,
            ..self.options.clone()
        };
        let strictness = self.options.strictness.unwrap_or(Strictness::None);
        self.resolve_with(&base, &ConfigSource::new(), &options, strictness, false)
    }

    /// Keys of a source that the schema does not declare at its root.
    pub fn check_unknown_keys(&self, source: &ConfigSource) -> Vec<String> {
        let unknown = source
            .keys()
            .filter(|key| self.schema.property(key).is_none())
            .map(str::to_string)
            .collect::<Vec<_>>();
        for key in &unknown {
            warn!("key \"{key}\" exists in source but not in schema");
        }
        unknown
    }

    fn strictness_for(&self, env_overrides: &ConfigSource) -> Strictness {
        self.options
            .strictness
            .unwrap_or_else(|| Strictness::from_source(env_overrides))
    }

    fn resolve_with(
        &self,
        base: &ConfigSource,
        env_overrides: &ConfigSource,
        options: &ResolveOptions,
        strictness: Strictness,
        expand_base: bool,
    ) -> Result<ResolvedConfig, ConfigError> {
        debug!(
            "resolving config (strictness={strictness}, base_keys={}, override_keys={})",
            base.len(),
            env_overrides.len()
        );
        let preserve = options.missing_keys == MissingKeyPolicy::Retain;
        let mut defaults = extract_defaults(&self.schema, preserve).unwrap_or_default();
        let mut overlay = base.as_map().clone();
        if options.expand_variables {
            let variables = Variables {
                overrides: env_overrides,
                base,
            };
            defaults = variables.expand_defaults(&self.schema, &defaults);
            if expand_base {
                overlay = variables.expand_values(&overlay);
            }
        }
        let (merged, coercion_issues) = merge::merge(
            &self.schema,
            &defaults,
            &overlay,
            env_overrides,
            &NamespacePath::root(),
            options,
        );

        report_coercion_issues(strictness, &coercion_issues)?;

        let key_presence = strictness.reports_key_presence().then(|| {
            presence::key_presence(&self.schema, &merged, base.as_map(), env_overrides, options)
        });
        if let Some(report) = &key_presence {
            report_key_presence(report);
        }

        let errors = self
            .validator
            .validate(&self.schema, &Value::Object(merged.clone()));
        if !errors.is_empty() {
            for error in &errors {
                warn!("validation failure: {error}");
            }
            return Err(ConfigError::Validation { errors });
        }

        info!(
            "config resolved (keys={}, coercion_issues={})",
            merged.len(),
            coercion_issues.len()
        );
        Ok(ResolvedConfig {
            config: MergedConfig { values: merged },
            strictness,
            coercion_issues,
            key_presence,
        })
    }
}

fn report_coercion_issues(
    strictness: Strictness,
    issues: &[CoercionIssue],
) -> Result<(), ConfigError> {
    if issues.is_empty() || !strictness.logs_issues() {
        return Ok(());
    }
    for issue in issues {
        warn!("{issue}");
    }
    if strictness.fails_on_coercion() && issues.iter().any(|issue| issue.kind.is_failure()) {
        return Err(ConfigError::Conformance {
            issues: issues.to_vec(),
        });
    }
    Ok(())
}

fn report_key_presence(report: &KeyPresenceReport) {
    if report.is_empty() {
        return;
    }
    warn!(
        "*** WARNINGS FOUND; to change the warning level, set the {STRICTNESS_ENV_VAR} environment variable ***"
    );
    for missing in &report.missing_from_source {
        warn!("{missing}");
    }
    for path in &report.undeclared_in_schema {
        warn!("{path} exists in source but not in schema");
    }
}
