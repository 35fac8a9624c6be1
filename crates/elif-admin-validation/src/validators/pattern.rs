//! Pattern-based validator using the rule's literal regular expression

use crate::error::ValidationError;
use super::{coerce_to_string, Validator};
use regex::Regex;
use serde_json::Value;

/// Validator for custom regular expression patterns
#[derive(Debug, Clone)]
pub struct PatternValidator {
    pattern: Regex,
    /// Custom error message
    pub message: Option<String>,
}

impl PatternValidator {
    /// Create a new pattern validator
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            message: None,
        })
    }

    /// Set custom error message
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Get the pattern string
    pub fn pattern_string(&self) -> &str {
        self.pattern.as_str()
    }
}

impl Validator for PatternValidator {
    fn validate(&self, value: &Value, field: &str) -> Result<(), ValidationError> {
        let text = coerce_to_string(value);

        if !self.pattern.is_match(&text) {
            let message = self
                .message
                .clone()
                .unwrap_or_else(|| format!("{} does not match the required pattern", field));

            return Err(ValidationError::with_code(field, message, "pattern")
                .context(serde_json::json!({ "pattern": self.pattern.as_str() })));
        }

        Ok(())
    }

    fn rule_name(&self) -> &'static str {
        "pattern"
    }
}
