//! Public surface for validenv.
//!
//! This crate re-exports the schema and config building blocks and provides a
//! small initialization helper to keep consumer setup consistent.

/// Re-export for convenience.
pub use validenv_config as config;
/// Re-export for convenience.
pub use validenv_schema as schema;

pub use validenv_config::{
    ConfigContext, ConfigError, ConfigSource, DotenvFile, MergedConfig, ProcessEnv,
    ResolveOptions, ResolvedConfig, Strictness,
};
pub use validenv_schema::SchemaNode;

#[inline]
/// Initialize logging using env_logger if the "logging" feature is enabled.
///
/// This is a no-op if the feature is not enabled. Binaries are still expected
/// to call this early in startup to ensure log output is wired up.
pub fn init_logging() {
    #[cfg(feature = "logging")]
    {
        let _ = env_logger::try_init();
    }
    log::debug!("validenv logging initialized");
}
