//! Library entry point for the validenv command-line tool.
//!
//! Renders sample dotenv templates from a schema and checks dotenv files
//! against one. The binary is a thin wrapper around [`sample_config`] and
//! [`check_dotenv`].

use anyhow::{Context, bail};
use log::{debug, info};
use std::path::Path;
use validenv_config::{
    ConfigContext, DotenvFile, EnvSource, ResolveOptions, ResolvedConfig, Strictness,
};
use validenv_schema::{SchemaNode, render_sample_config};

/// Outcome of checking a dotenv file against a schema.
#[derive(Debug)]
pub struct CheckReport {
    /// Dotenv keys the schema does not declare.
    pub unknown_keys: Vec<String>,
    pub resolved: ResolvedConfig,
}

impl CheckReport {
    /// Merged config as pretty-printed JSON.
    pub fn to_pretty_json(&self) -> anyhow::Result<String> {
        serde_json::to_string_pretty(&self.resolved.config).context("failed to render config")
    }
}

/// Load a JSON or JSON5 schema document.
pub fn load_schema(path: &Path) -> anyhow::Result<SchemaNode> {
    if !path.exists() {
        bail!("schema file does not exist at: {}", path.display());
    }
    SchemaNode::from_path(path)
        .with_context(|| format!("error in parsing json schema: {}", path.display()))
}

/// Render the sample dotenv template for a schema file.
pub fn sample_config(schema_path: &Path) -> anyhow::Result<String> {
    let schema = load_schema(schema_path)?;
    debug!(
        "rendering sample config (properties={})",
        schema.properties.as_ref().map_or(0, |props| props.len())
    );
    Ok(render_sample_config(&schema))
}

/// Check a dotenv file against a schema, with `env` supplying overrides.
///
/// When `strictness` is `None` the level is read from the override source.
pub fn check_dotenv(
    schema_path: &Path,
    dotenv_path: &Path,
    strictness: Option<Strictness>,
    env: &dyn EnvSource,
) -> anyhow::Result<CheckReport> {
    if !dotenv_path.exists() {
        bail!("dotenv file does not exist at: {}", dotenv_path.display());
    }
    let schema = load_schema(schema_path)?;
    let mut options = ResolveOptions::new();
    options.strictness = strictness;
    let context = ConfigContext::new(schema).with_options(options);

    let dotenv = DotenvFile::new(dotenv_path);
    let base = dotenv.load().context("failed to load dotenv file")?;
    let unknown_keys = context.check_unknown_keys(&base);

    let resolved = context
        .load_dotenv(&dotenv, env)
        .with_context(|| format!("config in {} does not match schema", dotenv_path.display()))?;
    info!(
        "dotenv file checked (unknown_keys={}, coercion_issues={})",
        unknown_keys.len(),
        resolved.coercion_issues.len()
    );
    Ok(CheckReport {
        unknown_keys,
        resolved,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;
    use validenv_config::{ConfigError, ConfigSource};
    use validenv_test_utils::{enum_schema, scalar_schema, write_dotenv};

    fn write_schema(dir: &Path, schema: &serde_json::Value) -> std::path::PathBuf {
        let path = dir.join("schema.json");
        fs::write(&path, schema.to_string()).expect("write schema");
        path
    }

    #[test]
    fn renders_sample_from_schema_file() {
        let temp = TempDir::new().expect("tmp");
        let schema_path = write_schema(temp.path(), &enum_schema());

        let sample = sample_config(&schema_path).expect("sample");
        assert!(sample.contains("LOG_LEVEL=info  # <string>(debug | info | warn)"));
        assert!(sample.contains("API_TOKEN=  # <string>"));
    }

    #[test]
    fn checks_dotenv_and_reports_unknown_keys() {
        let temp = TempDir::new().expect("tmp");
        let schema_path = write_schema(temp.path(), &scalar_schema());
        let dotenv_path = write_dotenv(temp.path(), "MY_INTEGER_ENVVAR=999\nMY_EXTRA_KEY=find-me\n");
        let env = ConfigSource::from_pairs([("MY_BOOLEAN_ENVVAR", "false")]);

        let report =
            check_dotenv(&schema_path, &dotenv_path, Some(Strictness::Warn), &env).expect("check");
        assert_eq!(report.unknown_keys, vec!["MY_EXTRA_KEY".to_string()]);

        let rendered: serde_json::Value =
            serde_json::from_str(&report.to_pretty_json().expect("json")).expect("parse");
        assert_eq!(
            rendered,
            json!({
                "MY_STRING_ENVVAR": "blahblah",
                "MY_INTEGER_ENVVAR": 999,
                "MY_FLOAT_ENVVAR": 4.56,
                "MY_BOOLEAN_ENVVAR": false,
                "MY_EXTRA_KEY": "find-me"
            })
        );
    }

    #[test]
    fn conformance_failure_surfaces_config_error() {
        let temp = TempDir::new().expect("tmp");
        let schema_path = write_schema(temp.path(), &scalar_schema());
        let dotenv_path = write_dotenv(temp.path(), "MY_FLOAT_ENVVAR=notNumber\n");

        let err = check_dotenv(
            &schema_path,
            &dotenv_path,
            Some(Strictness::Full),
            &ConfigSource::new(),
        )
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::Conformance { .. })
        ));
    }

    #[test]
    fn validation_failure_names_the_key() {
        let temp = TempDir::new().expect("tmp");
        let schema_path = write_schema(
            temp.path(),
            &json!({
                "properties": {
                    "NAME": { "type": "string" },
                    "PORT": { "type": "integer" }
                },
                "required": ["NAME"]
            }),
        );
        let dotenv_path = write_dotenv(temp.path(), "PORT=80\n");

        let err = check_dotenv(&schema_path, &dotenv_path, None, &ConfigSource::new())
            .unwrap_err();
        let rendered = format!("{err:#}");
        assert!(
            rendered.contains("NAME: missing required property"),
            "{rendered}"
        );
    }

    #[test]
    fn missing_files_are_errors() {
        let temp = TempDir::new().expect("tmp");
        let schema_path = write_schema(temp.path(), &scalar_schema());

        let err = sample_config(&temp.path().join("nope.json")).unwrap_err();
        assert!(err.to_string().contains("schema file does not exist"));

        let err = check_dotenv(
            &schema_path,
            &temp.path().join("nope.env"),
            None,
            &ConfigSource::new(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("dotenv file does not exist"));
    }
}
