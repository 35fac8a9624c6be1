//! URL format validator

use crate::error::ValidationError;
use super::{coerce_to_string, Validator};
use serde_json::Value;
use url::Url;

/// Validator for absolute http(s) URLs
#[derive(Debug, Clone, Default)]
pub struct UrlValidator {
    /// Custom error message
    pub message: Option<String>,
}

impl UrlValidator {
    pub fn new() -> Self {
        Self { message: None }
    }

    /// Set custom error message
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    fn validate_url_format(&self, text: &str) -> bool {
        match Url::parse(text) {
            Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some_and(|h| !h.is_empty()),
            Err(_) => false,
        }
    }
}

impl Validator for UrlValidator {
    fn validate(&self, value: &Value, field: &str) -> Result<(), ValidationError> {
        let text = coerce_to_string(value);

        if !self.validate_url_format(&text) {
            let message = self
                .message
                .clone()
                .unwrap_or_else(|| format!("{} must be a valid URL", field));

            return Err(ValidationError::with_code(field, message, "url"));
        }

        Ok(())
    }

    fn rule_name(&self) -> &'static str {
        "url"
    }
}
