//! Coercion of raw source values into schema-declared types.

use serde_json::{Number, Value};
use std::fmt;
use validenv_schema::{NamespacePath, SchemaType};

/// Result of coercing one raw value.
#[derive(Debug, Clone, PartialEq)]
pub enum Coerced {
    /// Usable value, either converted or passed through.
    Value(Value),
    /// Numeric parse failure; must never replace an earlier valid value.
    Failed,
}

/// What went wrong while coercing a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoercionIssueKind {
    InvalidInteger,
    InvalidNumber,
    /// Lenient: the raw value is kept and the issue is only a warning.
    InvalidBoolean,
}

impl CoercionIssueKind {
    /// Numeric failures can abort resolution; boolean ones never do.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::InvalidInteger | Self::InvalidNumber)
    }

    fn label(&self) -> &'static str {
        match self {
            Self::InvalidInteger => "integer",
            Self::InvalidNumber => "number",
            Self::InvalidBoolean => "boolean",
        }
    }
}

/// A value that could not be coerced, with the key it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct CoercionIssue {
    /// Full path of the key, including the key itself.
    pub path: NamespacePath,
    /// The raw value as supplied.
    pub raw: String,
    pub kind: CoercionIssueKind,
}

impl fmt::Display for CoercionIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "failed to parse {} for {}: {:?}",
            self.kind.label(),
            self.path,
            self.raw
        )
    }
}

/// Convert a raw value into the declared type.
///
/// Only strings are converted; anything else passes through unchanged, so
/// coercing an already typed value is a no-op. Objects are left to the
/// namespace recursion in the merger.
pub fn coerce(raw: &Value, kind: SchemaType) -> (Coerced, Option<CoercionIssueKind>) {
    let Value::String(text) = raw else {
        return (Coerced::Value(raw.clone()), None);
    };

    match kind {
        SchemaType::Integer => match parse_integer(text) {
            Some(number) => (Coerced::Value(Value::Number(number)), None),
            None => (Coerced::Failed, Some(CoercionIssueKind::InvalidInteger)),
        },
        SchemaType::Number => match parse_number(text) {
            Some(number) => (Coerced::Value(Value::Number(number)), None),
            None => (Coerced::Failed, Some(CoercionIssueKind::InvalidNumber)),
        },
        SchemaType::Boolean => match text.trim() {
            "true" => (Coerced::Value(Value::Bool(true)), None),
            "false" => (Coerced::Value(Value::Bool(false)), None),
            _ => (
                Coerced::Value(raw.clone()),
                Some(CoercionIssueKind::InvalidBoolean),
            ),
        },
        SchemaType::String
        | SchemaType::Object
        | SchemaType::Array
        | SchemaType::Null
        | SchemaType::Untyped => (Coerced::Value(raw.clone()), None),
    }
}

fn parse_integer(text: &str) -> Option<Number> {
    let text = text.trim();
    if let Ok(value) = text.parse::<i64>() {
        return Some(Number::from(value));
    }
    text.parse::<u64>().ok().map(Number::from)
}

fn parse_number(text: &str) -> Option<Number> {
    parse_integer(text).or_else(|| {
        text.trim()
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn parses_integers() {
        assert_eq!(
            coerce(&json!("999"), SchemaType::Integer),
            (Coerced::Value(json!(999)), None)
        );
        assert_eq!(
            coerce(&json!(" -7 "), SchemaType::Integer),
            (Coerced::Value(json!(-7)), None)
        );
    }

    #[test]
    fn integer_failure_is_sentinel() {
        assert_eq!(
            coerce(&json!("3.5"), SchemaType::Integer),
            (Coerced::Failed, Some(CoercionIssueKind::InvalidInteger))
        );
        assert_eq!(
            coerce(&json!(""), SchemaType::Integer),
            (Coerced::Failed, Some(CoercionIssueKind::InvalidInteger))
        );
    }

    #[test]
    fn parses_numbers() {
        assert_eq!(
            coerce(&json!("3.14"), SchemaType::Number),
            (Coerced::Value(json!(3.14)), None)
        );
        assert_eq!(
            coerce(&json!("4"), SchemaType::Number),
            (Coerced::Value(json!(4)), None)
        );
    }

    #[test]
    fn non_finite_numbers_fail() {
        for raw in ["notNumber", "NaN", "inf"] {
            assert_eq!(
                coerce(&json!(raw), SchemaType::Number),
                (Coerced::Failed, Some(CoercionIssueKind::InvalidNumber)),
                "raw value {raw}"
            );
        }
    }

    /// Boolean failures keep the raw value and only warn.
    #[test]
    fn boolean_failure_is_lenient() {
        assert_eq!(
            coerce(&json!("false"), SchemaType::Boolean),
            (Coerced::Value(json!(false)), None)
        );
        let (value, issue) = coerce(&json!("yes"), SchemaType::Boolean);
        assert_eq!(value, Coerced::Value(json!("yes")));
        assert_eq!(issue, Some(CoercionIssueKind::InvalidBoolean));
        assert!(!CoercionIssueKind::InvalidBoolean.is_failure());
    }

    #[test]
    fn typed_values_pass_through() {
        for (value, kind) in [
            (json!(12), SchemaType::Integer),
            (json!(1.5), SchemaType::Number),
            (json!(true), SchemaType::Boolean),
            (json!({ "a": 1 }), SchemaType::Object),
            (json!([1, 2]), SchemaType::Array),
        ] {
            let (coerced, issue) = coerce(&value, kind);
            assert_eq!(coerced, Coerced::Value(value.clone()));
            assert_eq!(issue, None);
            let (again, _) = coerce(&value, kind);
            assert_eq!(again, coerced);
        }
    }

    #[test]
    fn strings_are_not_touched_for_other_types() {
        for kind in [SchemaType::String, SchemaType::Array, SchemaType::Untyped] {
            assert_eq!(
                coerce(&json!("42"), kind),
                (Coerced::Value(json!("42")), None)
            );
        }
    }

    #[test]
    fn issue_display_names_path() {
        let issue = CoercionIssue {
            path: ["db", "PORT"].into_iter().collect(),
            raw: "abc".to_string(),
            kind: CoercionIssueKind::InvalidInteger,
        };
        assert_eq!(issue.to_string(), "failed to parse integer for db/PORT: \"abc\"");
    }
}
