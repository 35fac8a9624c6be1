//! # elif-admin-validation
//!
//! Declarative validation rules for admin field descriptors. A rule is a
//! `{name, message, parameters}` triple drawn from a closed set; applying it
//! is a pure function of the rule and a single value.

pub mod apply;
pub mod error;
pub mod rule;
pub mod validators;

// Re-exports for easy access
pub use apply::{apply_all, apply_validation_rule};
pub use error::{ValidationError, ValidationErrors, ValidationResult};
pub use rule::{RuleName, ValidationRule};

// Built-in validators
pub use validators::{
    coerce_to_string, EmailValidator, LengthValidator, NumericValidator, PatternValidator,
    RequiredValidator, UrlValidator, Validator,
};
