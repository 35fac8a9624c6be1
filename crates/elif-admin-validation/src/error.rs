//! Rule failures and their per-field collection

use std::collections::BTreeMap;
use std::fmt;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type ValidationResult<T> = Result<T, ValidationErrors>;

/// One rule that rejected one field value
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Error)]
pub struct ValidationError {
    /// Key of the field the rule was attached to
    pub field: String,
    /// Message shown next to the field
    pub message: String,
    /// Rule code for programmatic handling (`required`, `min`, ...)
    pub code: String,
    /// Rule parameters that produced the failure
    pub context: Option<serde_json::Value>,
}

impl ValidationError {
    /// A failure with the generic `validation_failed` code
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with_code(field, message, "validation_failed")
    }

    pub fn with_code(field: impl Into<String>, message: impl Into<String>, code: impl Into<String>) -> Self {
        ValidationError {
            code: code.into(),
            message: message.into(),
            field: field.into(),
            context: None,
        }
    }

    /// Attach the rule parameters
    pub fn context(mut self, context: serde_json::Value) -> Self {
        self.context = Some(context);
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Failures grouped by field key, fields in sorted order
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Error)]
pub struct ValidationErrors {
    pub errors: BTreeMap<String, Vec<ValidationError>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one failure under its field
    pub fn add(&mut self, error: ValidationError) {
        let bucket = self.errors.entry(error.field.clone()).or_default();
        bucket.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of fields with at least one failure
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Number of failures across every field
    pub fn total_errors(&self) -> usize {
        self.errors.values().map(Vec::len).sum()
    }

    pub fn get_field_errors(&self, field: &str) -> Option<&Vec<ValidationError>> {
        self.errors.get(field)
    }

    pub fn has_field_errors(&self, field: &str) -> bool {
        self.errors.get(field).is_some_and(|errors| !errors.is_empty())
    }

    /// Rule codes that failed for `field`, in rule order
    pub fn codes_for(&self, field: &str) -> Vec<&str> {
        self.errors
            .get(field)
            .map(|errors| errors.iter().map(|error| error.code.as_str()).collect())
            .unwrap_or_default()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.keys().map(String::as_str)
    }

    /// Append the failures of `other`, keeping per-field order
    pub fn merge(&mut self, other: ValidationErrors) {
        other
            .errors
            .into_iter()
            .for_each(|(field, errors)| self.errors.entry(field).or_default().extend(errors));
    }

    /// Turn the collection into a result, `Ok` when nothing was recorded
    pub fn into_result(self) -> ValidationResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// Convert to the JSON shape returned to the admin frontend
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": "validation_failed",
                "message": "Validation failed",
                "fields": self.errors
            }
        })
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut failures = self.errors.values().flatten();
        match failures.next() {
            None => f.write_str("no rule failed"),
            Some(first) => {
                write!(f, "{} field(s) failed validation: {}", self.errors.len(), first)?;
                failures.try_for_each(|error| write!(f, "; {}", error))
            }
        }
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        let mut collected = ValidationErrors::default();
        collected.add(error);
        collected
    }
}
