//! Query descriptions handed to the persistence backend

use crate::record::{resolve, Record};
use elif_admin_validation::coerce_to_string;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;

/// Constraint operators for relationship queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstraintOperator {
    Equal,
    NotEqual,
    GreaterThan,
    LessThan,
    GreaterThanOrEqual,
    LessThanOrEqual,
    In,
    NotIn,
    Like,
    IsNull,
    IsNotNull,
}

impl ConstraintOperator {
    /// Convert the operator to its SQL representation
    pub fn to_sql(self) -> &'static str {
        match self {
            Self::Equal => "=",
            Self::NotEqual => "!=",
            Self::GreaterThan => ">",
            Self::LessThan => "<",
            Self::GreaterThanOrEqual => ">=",
            Self::LessThanOrEqual => "<=",
            Self::In => "IN",
            Self::NotIn => "NOT IN",
            Self::Like => "LIKE",
            Self::IsNull => "IS NULL",
            Self::IsNotNull => "IS NOT NULL",
        }
    }

    /// Evaluate in memory; `Like` supports `%` wildcards only
    pub fn matches(self, actual: &Value, expected: &Value) -> bool {
        match self {
            Self::Equal => same(actual, expected),
            Self::NotEqual => !same(actual, expected),
            Self::GreaterThan => order(actual, expected) == Some(Ordering::Greater),
            Self::LessThan => order(actual, expected) == Some(Ordering::Less),
            Self::GreaterThanOrEqual => {
                matches!(order(actual, expected), Some(Ordering::Greater | Ordering::Equal))
            }
            Self::LessThanOrEqual => {
                matches!(order(actual, expected), Some(Ordering::Less | Ordering::Equal))
            }
            Self::In => expected
                .as_array()
                .is_some_and(|items| items.iter().any(|item| same(actual, item))),
            Self::NotIn => !Self::In.matches(actual, expected),
            Self::Like => like(&coerce_to_string(actual), &coerce_to_string(expected)),
            Self::IsNull => actual.is_null(),
            Self::IsNotNull => !actual.is_null(),
        }
    }
}

// Keys arrive as both numbers and strings depending on the source
fn same(actual: &Value, expected: &Value) -> bool {
    actual == expected
        || (!actual.is_null() && !expected.is_null() && coerce_to_string(actual) == coerce_to_string(expected))
}

fn order(actual: &Value, expected: &Value) -> Option<Ordering> {
    match (actual.as_f64(), expected.as_f64()) {
        (Some(a), Some(b)) => a.partial_cmp(&b),
        _ => match (actual.as_str(), expected.as_str()) {
            (Some(a), Some(b)) => Some(a.cmp(b)),
            _ => None,
        },
    }
}

fn like(text: &str, pattern: &str) -> bool {
    let text = text.to_lowercase();
    let pattern = pattern.to_lowercase();
    let parts: Vec<&str> = pattern.split('%').collect();

    if parts.len() == 1 {
        return text == pattern;
    }

    let mut rest = text.as_str();
    for (index, part) in parts.iter().enumerate() {
        if part.is_empty() {
            continue;
        }
        if index == 0 {
            match rest.strip_prefix(part) {
                Some(tail) => rest = tail,
                None => return false,
            }
        } else if index == parts.len() - 1 {
            return rest.ends_with(part);
        } else {
            match rest.find(part) {
                Some(pos) => rest = &rest[pos + part.len()..],
                None => return false,
            }
        }
    }
    true
}

/// A single `column <op> value` filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    pub column: String,
    pub operator: ConstraintOperator,
    pub value: Value,
}

impl Constraint {
    pub fn new(column: impl Into<String>, operator: ConstraintOperator, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            operator,
            value: value.into(),
        }
    }

    /// Evaluate against an in-memory record
    pub fn matches(&self, record: &dyn Record) -> bool {
        let actual = resolve(record, &self.column).unwrap_or(Value::Null);
        self.operator.matches(&actual, &self.value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn to_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Traversal of a many-to-many pivot table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotJoin {
    pub table: String,
    /// Pivot column holding the parent key
    pub parent_column: String,
    /// Pivot column holding the related key
    pub related_column: String,
    /// Related-side column the pivot points at
    pub related_key: String,
    pub parent_value: Value,
    /// Extra pivot filters, such as the morph type column
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<Constraint>,
}

/// Everything the backend needs to load related records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationQuery {
    /// Slug of the resource being queried
    pub resource: String,
    #[serde(default)]
    pub constraints: Vec<Constraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pivot: Option<PivotJoin>,
    #[serde(default)]
    pub order_by: Vec<(String, SortDirection)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl RelationQuery {
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            constraints: Vec::new(),
            pivot: None,
            order_by: Vec::new(),
            limit: None,
        }
    }

    pub fn filter(mut self, column: impl Into<String>, operator: ConstraintOperator, value: impl Into<Value>) -> Self {
        self.constraints.push(Constraint::new(column, operator, value));
        self
    }

    pub fn where_eq(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter(column, ConstraintOperator::Equal, value)
    }

    pub fn where_in(self, column: impl Into<String>, values: Vec<Value>) -> Self {
        self.filter(column, ConstraintOperator::In, Value::Array(values))
    }

    pub fn through(mut self, pivot: PivotJoin) -> Self {
        self.pivot = Some(pivot);
        self
    }

    pub fn order_by(mut self, column: impl Into<String>, direction: SortDirection) -> Self {
        self.order_by.push((column.into(), direction));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether `record` passes every constraint
    pub fn matches(&self, record: &dyn Record) -> bool {
        self.constraints.iter().all(|constraint| constraint.matches(record))
    }

    /// Compare two records by the query's ordering
    pub fn compare(&self, a: &dyn Record, b: &dyn Record) -> Ordering {
        for (column, direction) in &self.order_by {
            let left = resolve(a, column).unwrap_or(Value::Null);
            let right = resolve(b, column).unwrap_or(Value::Null);
            let ordering = order(&left, &right).unwrap_or(Ordering::Equal);
            let ordering = match direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }
}
