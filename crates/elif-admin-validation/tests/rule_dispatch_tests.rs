//! Integration tests for declarative rule dispatch
//!
//! Rules are applied one value at a time; `apply_all` collects every
//! failure for a field instead of stopping at the first.

use elif_admin_validation::{apply_all, apply_validation_rule, RuleName, ValidationRule};
use serde_json::json;

#[test]
fn test_numeric_bounds_are_inclusive() {
    let min = ValidationRule::min(10.0);
    assert!(apply_validation_rule(&min, "quantity", &json!(10)).is_ok());
    assert!(apply_validation_rule(&min, "quantity", &json!(15)).is_ok());
    assert!(apply_validation_rule(&min, "quantity", &json!(5)).is_err());

    let max = ValidationRule::max(100.0);
    assert!(apply_validation_rule(&max, "quantity", &json!(100)).is_ok());
    assert!(apply_validation_rule(&max, "quantity", &json!(100.5)).is_err());
}

#[test]
fn test_length_bounds_are_inclusive() {
    let max = ValidationRule::max_length(5);
    assert!(apply_validation_rule(&max, "slug", &json!("hello")).is_ok());
    assert!(apply_validation_rule(&max, "slug", &json!("hello!")).is_err());

    let min = ValidationRule::min_length(3);
    assert!(apply_validation_rule(&min, "slug", &json!("abc")).is_ok());
    assert!(apply_validation_rule(&min, "slug", &json!("ab")).is_err());
}

#[test]
fn test_pattern_uses_the_literal_regex() {
    let rule = ValidationRule::pattern("^[a-z]+$");
    assert!(apply_validation_rule(&rule, "handle", &json!("hello")).is_ok());

    let err = apply_validation_rule(&rule, "handle", &json!("Hello123")).unwrap_err();
    assert_eq!(err.field, "handle");
    assert_eq!(err.code, "pattern");
}

#[test]
fn test_required_rejects_null_and_empty_string() {
    let rule = ValidationRule::required();
    assert!(apply_validation_rule(&rule, "title", &json!(null)).is_err());
    assert!(apply_validation_rule(&rule, "title", &json!("")).is_err());
    assert!(apply_validation_rule(&rule, "title", &json!(0)).is_ok());
}

#[test]
fn test_persistence_markers_always_pass() {
    let unique = ValidationRule::unique("users", "email");
    let exists = ValidationRule::exists("roles", "id");
    assert!(unique.name.is_declarative());
    assert!(apply_validation_rule(&unique, "email", &json!("taken@example.com")).is_ok());
    assert!(apply_validation_rule(&exists, "role_id", &json!(999)).is_ok());
}

#[test]
fn test_apply_all_collects_every_failure() {
    let rules = vec![
        ValidationRule::min_length(10),
        ValidationRule::email().with_message("Enter a valid address"),
        ValidationRule::pattern("^[a-z@.]+$"),
    ];

    let errors = apply_all(&rules, "email", &json!("Nope")).unwrap_err();
    let field_errors = errors.get_field_errors("email").unwrap();
    assert_eq!(field_errors.len(), 3);
    assert!(field_errors.iter().any(|e| e.message == "Enter a valid address"));

    assert!(apply_all(&rules, "email", &json!("someone@example.com")).is_ok());
}

#[test]
fn test_rules_round_trip_through_json() {
    let rule: ValidationRule = serde_json::from_value(json!({ "name": "maxLength", "parameters": { "value": 5 } })).unwrap();
    assert_eq!(rule.name, RuleName::MaxLength);
    assert!(apply_validation_rule(&rule, "code", &json!("hello!")).is_err());
}
