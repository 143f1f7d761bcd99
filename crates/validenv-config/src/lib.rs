//! Layered, schema-validated config resolution.
//!
//! This crate merges schema defaults, a base source (typically a dotenv
//! file) and environment overrides by precedence, coerces string values into
//! their declared types, and validates the result against the schema.

mod error;
mod loader;
mod source;
mod strictness;

/// Public error type returned by loading and resolution APIs.
pub use error::ConfigError;
/// Coercion of raw values into declared types.
pub use loader::coerce::{Coerced, CoercionIssue, CoercionIssueKind, coerce};
/// Precedence merging.
pub use loader::merge::merge;
/// Key-presence diff types.
pub use loader::presence::{KeyPresenceReport, MissingKey, key_presence};
/// Resolution context, options and results.
pub use loader::{
    ConfigContext, MergedConfig, MissingKeyPolicy, ResolveOptions, ResolvedConfig,
    UnknownKeyPolicy,
};
/// Config sources.
pub use source::{ConfigSource, DEFAULT_DOTENV_FILE, DotenvFile, EnvSource, ProcessEnv};
/// Strictness policy.
pub use strictness::{STRICTNESS_ENV_VAR, Strictness};
