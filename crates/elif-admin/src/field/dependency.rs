//! Dependency rules between fields of the same record

use crate::record::{resolve, Record};
use elif_admin_validation::coerce_to_string;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Comparison applied to the watched field's value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyOperator {
    Equals,
    NotEquals,
    /// Watched value is one of the listed values
    In,
    NotIn,
    /// Watched value is present and not blank
    Filled,
    Empty,
    GreaterThan,
    LessThan,
}

impl DependencyOperator {
    /// Evaluate `actual` against `expected`
    pub fn matches(self, actual: &Value, expected: &Value) -> bool {
        match self {
            Self::Equals => loosely_equal(actual, expected),
            Self::NotEquals => !loosely_equal(actual, expected),
            Self::In => contains(expected, actual),
            Self::NotIn => !contains(expected, actual),
            Self::Filled => !is_blank(actual),
            Self::Empty => is_blank(actual),
            Self::GreaterThan => compare(actual, expected).is_some_and(|(a, b)| a > b),
            Self::LessThan => compare(actual, expected).is_some_and(|(a, b)| a < b),
        }
    }
}

/// What happens to the dependent field when the condition holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyEffect {
    /// Render only while the condition holds
    Show,
    Hide,
    Require,
    ReadOnly,
}

/// "This field is affected when `field` meets a condition"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependencyRule {
    /// Key of the watched field
    pub field: String,
    pub operator: DependencyOperator,
    #[serde(default)]
    pub value: Value,
    pub effect: DependencyEffect,
}

impl DependencyRule {
    pub fn new(
        field: impl Into<String>,
        operator: DependencyOperator,
        value: impl Into<Value>,
        effect: DependencyEffect,
    ) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
            effect,
        }
    }

    /// Show while `field` equals `value`
    pub fn visible_when(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, DependencyOperator::Equals, value, DependencyEffect::Show)
    }

    /// Hide while `field` equals `value`
    pub fn hidden_when(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, DependencyOperator::Equals, value, DependencyEffect::Hide)
    }

    /// Require while `field` equals `value`
    pub fn required_when(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, DependencyOperator::Equals, value, DependencyEffect::Require)
    }

    /// Require while `field` is filled
    pub fn required_with(field: impl Into<String>) -> Self {
        Self::new(field, DependencyOperator::Filled, Value::Null, DependencyEffect::Require)
    }

    /// Whether the watched value on `record` meets the condition
    ///
    /// A watched field that cannot be resolved is treated as null.
    pub fn is_satisfied(&self, record: &dyn Record) -> bool {
        let actual = resolve(record, &self.field).unwrap_or(Value::Null);
        self.operator.matches(&actual, &self.value)
    }
}

/// Overrides produced by folding a field's dependency rules over one record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DependencyState {
    pub visible: bool,
    pub required: bool,
    pub read_only: bool,
}

impl DependencyState {
    pub(crate) fn fold(
        rules: &[DependencyRule],
        required: bool,
        read_only: bool,
        record: &dyn Record,
    ) -> Self {
        let mut state = Self {
            visible: true,
            required,
            read_only,
        };

        for rule in rules {
            let satisfied = rule.is_satisfied(record);
            match rule.effect {
                DependencyEffect::Show if !satisfied => state.visible = false,
                DependencyEffect::Hide if satisfied => state.visible = false,
                DependencyEffect::Require if satisfied => state.required = true,
                DependencyEffect::ReadOnly if satisfied => state.read_only = true,
                _ => {}
            }
        }

        state
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

// "1" == 1 and "true" == true for form payloads
fn loosely_equal(actual: &Value, expected: &Value) -> bool {
    actual == expected || (!actual.is_null() && coerce_to_string(actual) == coerce_to_string(expected))
}

fn contains(haystack: &Value, needle: &Value) -> bool {
    match haystack {
        Value::Array(items) => items.iter().any(|item| loosely_equal(needle, item)),
        other => loosely_equal(needle, other),
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn compare(actual: &Value, expected: &Value) -> Option<(f64, f64)> {
    Some((as_number(actual)?, as_number(expected)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_operators() {
        assert!(DependencyOperator::Equals.matches(&json!("1"), &json!(1)));
        assert!(DependencyOperator::NotEquals.matches(&json!("draft"), &json!("published")));
        assert!(DependencyOperator::In.matches(&json!("b"), &json!(["a", "b"])));
        assert!(DependencyOperator::NotIn.matches(&json!("c"), &json!(["a", "b"])));
        assert!(DependencyOperator::Filled.matches(&json!("x"), &Value::Null));
        assert!(DependencyOperator::Empty.matches(&json!("  "), &Value::Null));
        assert!(DependencyOperator::GreaterThan.matches(&json!(10), &json!("5")));
        assert!(!DependencyOperator::LessThan.matches(&json!("abc"), &json!(5)));
        assert!(!DependencyOperator::Equals.matches(&Value::Null, &json!("")));
    }

    #[test]
    fn test_rule_against_record() {
        let record = json!({ "type": "company", "vat": "" });
        assert!(DependencyRule::visible_when("type", "company").is_satisfied(&record));
        assert!(!DependencyRule::required_with("vat").is_satisfied(&record));
        // Unresolvable watched fields are null
        assert!(!DependencyRule::visible_when("missing", "x").is_satisfied(&record));
    }

    #[test]
    fn test_fold_state() {
        let record = json!({ "type": "person", "locked": true });
        let rules = vec![
            DependencyRule::visible_when("type", "company"),
            DependencyRule::new("locked", DependencyOperator::Equals, true, DependencyEffect::ReadOnly),
        ];

        let state = DependencyState::fold(&rules, false, false, &record);
        assert!(!state.visible);
        assert!(!state.required);
        assert!(state.read_only);

        let state = DependencyState::fold(&[DependencyRule::required_when("type", "person")], false, false, &record);
        assert!(state.visible && state.required);
    }

    #[test]
    fn test_rule_serialization() {
        let json = serde_json::to_value(DependencyRule::hidden_when("status", "archived")).unwrap();
        assert_eq!(json, json!({ "field": "status", "operator": "equals", "value": "archived", "effect": "hide" }));
    }
}
