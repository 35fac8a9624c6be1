//! Numeric bound validators

use crate::error::ValidationError;
use super::Validator;
use serde_json::Value;

/// Validator for inclusive numeric bounds
#[derive(Debug, Clone, Default)]
pub struct NumericValidator {
    /// Minimum value (inclusive)
    pub min: Option<f64>,
    /// Maximum value (inclusive)
    pub max: Option<f64>,
    /// Custom error message
    pub message: Option<String>,
}

impl NumericValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set minimum value constraint
    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    /// Set maximum value constraint
    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    /// Set custom error message
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Extract numeric value from JSON Value
    fn get_numeric_value(&self, value: &Value) -> Option<f64> {
        match value {
            Value::Number(num) => num.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    fn failure(&self, field: &str, default_message: String, code: &str) -> ValidationError {
        let message = self.message.clone().unwrap_or(default_message);
        ValidationError::with_code(field, message, code)
    }
}

impl Validator for NumericValidator {
    fn validate(&self, value: &Value, field: &str) -> Result<(), ValidationError> {
        let num = match self.get_numeric_value(value) {
            Some(n) if n.is_finite() => n,
            _ => {
                return Err(ValidationError::with_code(
                    field,
                    format!("{} must be a numeric value", field),
                    "invalid_type",
                ));
            }
        };

        if let Some(min) = self.min {
            if num < min {
                return Err(self.failure(field, format!("{} must be at least {}", field, min), "min"));
            }
        }

        if let Some(max) = self.max {
            if num > max {
                return Err(self.failure(field, format!("{} must be at most {}", field, max), "max"));
            }
        }

        Ok(())
    }

    fn rule_name(&self) -> &'static str {
        "numeric"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_min_is_inclusive() {
        let validator = NumericValidator::new().min(10.0);
        assert!(validator.validate(&json!(10), "age").is_ok());
        assert!(validator.validate(&json!(15), "age").is_ok());

        let error = validator.validate(&json!(5), "age").unwrap_err();
        assert_eq!(error.code, "min");
        assert_eq!(error.message, "age must be at least 10");
    }

    #[test]
    fn test_max_is_inclusive() {
        let validator = NumericValidator::new().max(100.0);
        assert!(validator.validate(&json!(100), "price").is_ok());
        assert!(validator.validate(&json!(99.5), "price").is_ok());
        assert_eq!(validator.validate(&json!(100.01), "price").unwrap_err().code, "max");
    }

    #[test]
    fn test_numeric_strings_and_invalid_types() {
        let validator = NumericValidator::new().min(1.0);
        assert!(validator.validate(&json!("42"), "qty").is_ok());
        assert_eq!(validator.validate(&json!("abc"), "qty").unwrap_err().code, "invalid_type");
        assert_eq!(validator.validate(&Value::Null, "qty").unwrap_err().code, "invalid_type");
        assert_eq!(validator.validate(&json!(true), "qty").unwrap_err().code, "invalid_type");
    }
}
