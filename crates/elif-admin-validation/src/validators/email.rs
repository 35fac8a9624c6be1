//! Email format validator

use crate::error::ValidationError;
use super::{coerce_to_string, Validator};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

// ASCII-only with TLD requirement (no leading/trailing dots in either part)
static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9]([a-zA-Z0-9._%+-]*[a-zA-Z0-9])?@[a-zA-Z0-9]([a-zA-Z0-9.-]*[a-zA-Z0-9])?\.[a-zA-Z]{2,}$",
    )
    .expect("email pattern is valid")
});

/// Validator for email address format
#[derive(Debug, Clone, Default)]
pub struct EmailValidator {
    /// Custom error message
    pub message: Option<String>,
}

impl EmailValidator {
    pub fn new() -> Self {
        Self { message: None }
    }

    /// Set custom error message
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    fn validate_email_format(&self, email: &str) -> bool {
        let Some((local_part, domain_part)) = email.split_once('@') else {
            return false;
        };

        // RFC 5321 limits
        if local_part.is_empty() || local_part.len() > 64 {
            return false;
        }
        if domain_part.is_empty() || domain_part.len() > 255 || domain_part.contains("..") {
            return false;
        }

        EMAIL_PATTERN.is_match(email)
    }
}

impl Validator for EmailValidator {
    fn validate(&self, value: &Value, field: &str) -> Result<(), ValidationError> {
        let email = coerce_to_string(value);

        if !self.validate_email_format(&email) {
            let message = self
                .message
                .clone()
                .unwrap_or_else(|| format!("{} must be a valid email address", field));

            return Err(ValidationError::with_code(field, message, "email"));
        }

        Ok(())
    }

    fn rule_name(&self) -> &'static str {
        "email"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_emails() {
        let validator = EmailValidator::new();
        for email in ["user@example.com", "first.last+tag@mail.example.org", "a1@b2.io"] {
            assert!(validator.validate(&json!(email), "email").is_ok(), "{email} should be valid");
        }
    }

    #[test]
    fn test_invalid_emails() {
        let validator = EmailValidator::new();
        for email in ["", "plainaddress", "@example.com", "user@", "user@@example.com", "user@example", "user@exa..mple.com"] {
            assert!(validator.validate(&json!(email), "email").is_err(), "{email} should be invalid");
        }
    }

    #[test]
    fn test_null_coerces_to_empty_string() {
        let validator = EmailValidator::new();
        let error = validator.validate(&Value::Null, "email").unwrap_err();
        assert_eq!(error.code, "email");
        assert_eq!(error.message, "email must be a valid email address");
    }
}
