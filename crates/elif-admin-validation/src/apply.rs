//! Rule-name dispatch from declarative rules to validators

use crate::error::{ValidationError, ValidationErrors, ValidationResult};
use crate::rule::{RuleName, ValidationRule};
use crate::validators::*;
use serde_json::Value;

/// Apply one rule to one value
///
/// Produces a single error on failure; callers run every applicable rule
/// and collect failures themselves (see [`apply_all`]).
pub fn apply_validation_rule(rule: &ValidationRule, field: &str, value: &Value) -> Result<(), ValidationError> {
    let result = match rule.name {
        RuleName::Required => with_message(RequiredValidator::new(), rule).validate(value, field),
        RuleName::Email => with_message(EmailValidator::new(), rule).validate(value, field),
        RuleName::Url => with_message(UrlValidator::new(), rule).validate(value, field),
        RuleName::Min => {
            let validator = match rule.bound() {
                Some(bound) => NumericValidator::new().min(bound),
                None => NumericValidator::new(),
            };
            with_message(validator, rule).validate(value, field)
        }
        RuleName::Max => {
            let validator = match rule.bound() {
                Some(bound) => NumericValidator::new().max(bound),
                None => NumericValidator::new(),
            };
            with_message(validator, rule).validate(value, field)
        }
        RuleName::MinLength => {
            let validator = LengthValidator::new().min(rule.length_bound().unwrap_or(0));
            with_message(validator, rule).validate(value, field)
        }
        RuleName::MaxLength => {
            let validator = match rule.length_bound() {
                Some(bound) => LengthValidator::new().max(bound),
                None => LengthValidator::new(),
            };
            with_message(validator, rule).validate(value, field)
        }
        RuleName::Pattern => {
            let regex = rule.regex().unwrap_or_default();
            match PatternValidator::new(regex) {
                Ok(validator) => with_message(validator, rule).validate(value, field),
                Err(err) => {
                    tracing::warn!("Invalid pattern '{}' on field '{}': {}", regex, field, err);
                    Err(ValidationError::with_code(
                        field,
                        format!("{} has an invalid validation pattern", field),
                        "invalid_pattern",
                    ))
                }
            }
        }
        RuleName::Unique | RuleName::Exists => Ok(()),
    };

    result.map_err(|error| {
        if rule.parameters.is_empty() {
            error
        } else {
            error.context(Value::Object(rule.parameters.clone()))
        }
    })
}

/// Apply every rule and collect the failures
pub fn apply_all<'a, I>(rules: I, field: &str, value: &Value) -> ValidationResult<()>
where
    I: IntoIterator<Item = &'a ValidationRule>,
{
    let mut errors = ValidationErrors::new();

    for rule in rules {
        if let Err(error) = apply_validation_rule(rule, field, value) {
            errors.add(error);
        }
    }

    errors.into_result()
}

/// Carry the rule's custom message onto the validator
fn with_message<V: MessageOverride>(validator: V, rule: &ValidationRule) -> V {
    match rule.message {
        Some(ref message) => validator.override_message(message.clone()),
        None => validator,
    }
}

trait MessageOverride: Validator + Sized {
    fn override_message(self, message: String) -> Self;
}

macro_rules! message_override {
    ($($validator:ty),* $(,)?) => {
        $(
            impl MessageOverride for $validator {
                fn override_message(mut self, message: String) -> Self {
                    self.message = Some(message);
                    self
                }
            }
        )*
    };
}

message_override!(
    RequiredValidator,
    EmailValidator,
    UrlValidator,
    NumericValidator,
    LengthValidator,
    PatternValidator,
);
