//! String length validators

use crate::error::ValidationError;
use super::{coerce_to_string, Validator};
use serde_json::Value;

/// Validator for inclusive character-count bounds
#[derive(Debug, Clone, Default)]
pub struct LengthValidator {
    /// Minimum length (inclusive)
    pub min: Option<usize>,
    /// Maximum length (inclusive)
    pub max: Option<usize>,
    /// Custom error message
    pub message: Option<String>,
}

impl LengthValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set minimum length constraint
    pub fn min(mut self, min: usize) -> Self {
        self.min = Some(min);
        self
    }

    /// Set maximum length constraint
    pub fn max(mut self, max: usize) -> Self {
        self.max = Some(max);
        self
    }

    /// Set custom error message
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    fn create_error_message(&self, field: &str) -> String {
        if let Some(ref custom_message) = self.message {
            return custom_message.clone();
        }

        match (self.min, self.max) {
            (Some(min), Some(max)) => {
                format!("{} must be between {} and {} characters long", field, min, max)
            }
            (Some(min), None) => format!("{} must be at least {} characters long", field, min),
            (None, Some(max)) => format!("{} must be at most {} characters long", field, max),
            (None, None) => format!("{} has invalid length", field),
        }
    }
}

impl Validator for LengthValidator {
    fn validate(&self, value: &Value, field: &str) -> Result<(), ValidationError> {
        // Unicode-aware length
        let length = coerce_to_string(value).chars().count();

        if let Some(min) = self.min {
            if length < min {
                return Err(ValidationError::with_code(field, self.create_error_message(field), "minLength"));
            }
        }

        if let Some(max) = self.max {
            if length > max {
                return Err(ValidationError::with_code(field, self.create_error_message(field), "maxLength"));
            }
        }

        Ok(())
    }

    fn rule_name(&self) -> &'static str {
        "length"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_max_length_is_inclusive() {
        let validator = LengthValidator::new().max(5);
        assert!(validator.validate(&json!("hello"), "slug").is_ok());

        let error = validator.validate(&json!("hello!"), "slug").unwrap_err();
        assert_eq!(error.code, "maxLength");
        assert_eq!(error.message, "slug must be at most 5 characters long");
    }

    #[test]
    fn test_min_length_is_inclusive() {
        let validator = LengthValidator::new().min(3);
        assert!(validator.validate(&json!("abc"), "code").is_ok());
        assert!(validator.validate(&json!("ab"), "code").is_err());
        assert!(validator.validate(&Value::Null, "code").is_err());
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        let validator = LengthValidator::new().max(5);
        assert!(validator.validate(&json!("héllo"), "name").is_ok());
        assert!(validator.validate(&json!("日本語"), "name").is_ok());
    }
}
