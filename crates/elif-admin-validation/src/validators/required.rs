//! Required field validator

use crate::error::ValidationError;
use super::Validator;
use serde_json::Value;

/// Validator that rejects null and the empty string
#[derive(Debug, Clone, Default)]
pub struct RequiredValidator {
    /// Custom error message
    pub message: Option<String>,
}

impl RequiredValidator {
    /// Create a new required validator with default message
    pub fn new() -> Self {
        Self { message: None }
    }

    /// Create a required validator with custom message
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    fn is_empty(&self, value: &Value) -> bool {
        match value {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            _ => false,
        }
    }
}

impl Validator for RequiredValidator {
    fn validate(&self, value: &Value, field: &str) -> Result<(), ValidationError> {
        if self.is_empty(value) {
            let message = self
                .message
                .clone()
                .unwrap_or_else(|| format!("{} is required", field));

            Err(ValidationError::with_code(field, message, "required"))
        } else {
            Ok(())
        }
    }

    fn rule_name(&self) -> &'static str {
        "required"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_required_rejects_null_and_empty_string() {
        let validator = RequiredValidator::new();
        assert!(validator.validate(&Value::Null, "email").is_err());
        assert!(validator.validate(&json!(""), "name").is_err());
    }

    #[test]
    fn test_required_accepts_present_values() {
        let validator = RequiredValidator::new();
        assert!(validator.validate(&json!("John"), "name").is_ok());
        // Numbers and booleans are never considered empty
        assert!(validator.validate(&json!(0), "count").is_ok());
        assert!(validator.validate(&json!(false), "active").is_ok());
        assert!(validator.validate(&json!([]), "tags").is_ok());
    }

    #[test]
    fn test_required_custom_message() {
        let validator = RequiredValidator::with_message("This field cannot be empty");
        let error = validator.validate(&Value::Null, "email").unwrap_err();
        assert_eq!(error.message, "This field cannot be empty");
        assert_eq!(error.code, "required");
    }
}
