//! Strictness policy for coercion failures and key-presence mismatches.

use crate::{ConfigError, ConfigSource};
use std::fmt;
use std::str::FromStr;

/// Environment variable selecting the strictness level.
pub const STRICTNESS_ENV_VAR: &str = "VALIDATED_CONFIG_STRICTNESS_LEVEL";

/// How coercion failures and key-presence mismatches are reported.
///
/// Schema validation failures are fatal at every level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strictness {
    /// Any numeric coercion failure is fatal.
    Full,
    /// Log coercion issues and the key-presence diff, then continue.
    #[default]
    Warn,
    /// Best effort: no diff, never fatal on coercion.
    None,
}

impl Strictness {
    /// Interpret the control variable's value.
    ///
    /// Matching is case-insensitive; unset or unrecognized values select
    /// [`Strictness::Warn`].
    pub fn from_control_value(value: Option<&str>) -> Self {
        value
            .and_then(|value| value.parse().ok())
            .unwrap_or_default()
    }

    /// Read the control variable from a source.
    pub fn from_source(source: &ConfigSource) -> Self {
        Self::from_control_value(source.get_str(STRICTNESS_ENV_VAR))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Warn => "warn",
            Self::None => "none",
        }
    }

    /// Whether numeric coercion failures abort resolution.
    pub fn fails_on_coercion(&self) -> bool {
        matches!(self, Self::Full)
    }

    /// Whether coercion issues are logged.
    pub fn logs_issues(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// Whether the key-presence diff is computed and logged.
    pub fn reports_key_presence(&self) -> bool {
        matches!(self, Self::Warn)
    }
}

impl FromStr for Strictness {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "warn" => Ok(Self::Warn),
            "none" => Ok(Self::None),
            other => Err(ConfigError::Invalid(format!(
                "unknown strictness level {other:?} (expected full, warn or none)"
            ))),
        }
    }
}

impl fmt::Display for Strictness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
