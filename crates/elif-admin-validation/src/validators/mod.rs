//! Built-in validators backing each rule family

pub mod email;
pub mod length;
pub mod numeric;
pub mod pattern;
pub mod required;
pub mod url;

pub use email::EmailValidator;
pub use length::LengthValidator;
pub use numeric::NumericValidator;
pub use pattern::PatternValidator;
pub use required::RequiredValidator;
pub use self::url::UrlValidator;

use crate::error::ValidationError;
use serde_json::Value;

/// A pure predicate over a single value
pub trait Validator {
    /// Validate a single value, producing one error on failure
    fn validate(&self, value: &Value, field: &str) -> Result<(), ValidationError>;

    /// Get the validation rule name/type
    fn rule_name(&self) -> &'static str;
}

/// Coerce a value to the string form format rules are checked against
pub fn coerce_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}
