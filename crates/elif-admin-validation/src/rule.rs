//! Declarative validation rules attached to field descriptors

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// The closed set of built-in rule names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RuleName {
    Required,
    Email,
    Url,
    Min,
    Max,
    MinLength,
    MaxLength,
    Pattern,
    /// Enforced by the persistence layer
    Unique,
    /// Enforced by the persistence layer
    Exists,
}

impl RuleName {
    /// Wire name used by the frontend rule registry
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Email => "email",
            Self::Url => "url",
            Self::Min => "min",
            Self::Max => "max",
            Self::MinLength => "minLength",
            Self::MaxLength => "maxLength",
            Self::Pattern => "pattern",
            Self::Unique => "unique",
            Self::Exists => "exists",
        }
    }

    /// Returns true for rules that are only markers for the persistence layer
    pub fn is_declarative(self) -> bool {
        matches!(self, Self::Unique | Self::Exists)
    }
}

impl fmt::Display for RuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `{name, message, parameters}` rule triple
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationRule {
    pub name: RuleName,
    /// Custom message; a default is generated when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub parameters: Map<String, Value>,
}

impl ValidationRule {
    /// Create a rule without parameters
    pub fn new(name: RuleName) -> Self {
        Self {
            name,
            message: None,
            parameters: Map::new(),
        }
    }

    pub fn required() -> Self {
        Self::new(RuleName::Required)
    }

    pub fn email() -> Self {
        Self::new(RuleName::Email)
    }

    pub fn url() -> Self {
        Self::new(RuleName::Url)
    }

    /// Inclusive numeric lower bound
    pub fn min(bound: f64) -> Self {
        Self::new(RuleName::Min).with_parameter("value", number(bound))
    }

    /// Inclusive numeric upper bound
    pub fn max(bound: f64) -> Self {
        Self::new(RuleName::Max).with_parameter("value", number(bound))
    }

    /// Inclusive lower bound on character count
    pub fn min_length(length: usize) -> Self {
        Self::new(RuleName::MinLength).with_parameter("value", Value::from(length))
    }

    /// Inclusive upper bound on character count
    pub fn max_length(length: usize) -> Self {
        Self::new(RuleName::MaxLength).with_parameter("value", Value::from(length))
    }

    /// Literal regular expression the value must match
    pub fn pattern(regex: impl Into<String>) -> Self {
        Self::new(RuleName::Pattern).with_parameter("pattern", Value::String(regex.into()))
    }

    /// Uniqueness marker for `table.column`
    pub fn unique(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self::new(RuleName::Unique)
            .with_parameter("table", Value::String(table.into()))
            .with_parameter("column", Value::String(column.into()))
    }

    /// Existence marker for `table.column`
    pub fn exists(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self::new(RuleName::Exists)
            .with_parameter("table", Value::String(table.into()))
            .with_parameter("column", Value::String(column.into()))
    }

    /// Set custom error message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Set a single parameter
    pub fn with_parameter(mut self, key: impl Into<String>, value: Value) -> Self {
        self.parameters.insert(key.into(), value);
        self
    }

    /// Numeric bound stored under `value`
    pub fn bound(&self) -> Option<f64> {
        self.parameters.get("value").and_then(Value::as_f64)
    }

    /// Length bound stored under `value`
    pub fn length_bound(&self) -> Option<usize> {
        self.parameters
            .get("value")
            .and_then(Value::as_u64)
            .and_then(|v| usize::try_from(v).ok())
    }

    /// Regular expression stored under `pattern`
    pub fn regex(&self) -> Option<&str> {
        self.parameters.get("pattern").and_then(Value::as_str)
    }
}

fn number(bound: f64) -> Value {
    serde_json::Number::from_f64(bound)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}
