//! Error types for the admin field layer
//!
//! Attribute resolution never fails: a missing attribute is an absent value.
//! Errors here cover relationship preconditions, the persistence
//! collaborator, validation and configuration.

use crate::config::ConfigError;
use crate::relationships::RelationshipKind;
use elif_admin_validation::ValidationErrors;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Result type alias for admin operations
pub type AdminResult<T> = Result<T, AdminError>;

/// Error type for admin operations
#[derive(Debug, Error)]
pub enum AdminError {
    #[error(transparent)]
    Relationship(#[from] RelationshipError),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AdminError {
    /// Returns true when retrying the operation could succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, AdminError::Backend(err) if err.is_transient())
    }
}

/// A relationship precondition violation
#[derive(Debug, Clone, PartialEq, Error)]
pub struct RelationshipError {
    /// Key of the relationship field
    pub field: String,
    pub kind: RelationshipKind,
    /// Human-readable message
    pub message: String,
    /// Extra payload such as the related resource identity
    pub context: Value,
}

impl RelationshipError {
    pub fn new(
        field: impl Into<String>,
        kind: RelationshipKind,
        message: impl Into<String>,
        context: Value,
    ) -> Self {
        Self {
            field: field.into(),
            kind,
            message: message.into(),
            context,
        }
    }

    /// A required association has no value
    pub fn missing_value(field: &str, kind: RelationshipKind, resource: &str) -> Self {
        Self::new(
            field,
            kind,
            format!("{} requires a related {} record", field, resource),
            serde_json::json!({ "resource": resource }),
        )
    }

    /// A polymorphic relationship declares no resolvable types
    pub fn no_morph_types(field: &str, kind: RelationshipKind) -> Self {
        Self::new(
            field,
            kind,
            format!("{} must register at least one morph type", field),
            serde_json::json!({ "types": [] }),
        )
    }

    /// A stored discriminator is not part of the type mapping
    pub fn unknown_morph_type(field: &str, kind: RelationshipKind, discriminator: &str, known: Vec<String>) -> Self {
        Self::new(
            field,
            kind,
            format!("{} has no morph type registered for '{}'", field, discriminator),
            serde_json::json!({ "type": discriminator, "types": known }),
        )
    }

    /// The referenced record does not exist in the related resource
    pub fn related_not_found(field: &str, kind: RelationshipKind, resource: &str, value: &Value) -> Self {
        Self::new(
            field,
            kind,
            format!("{} references a missing {} record", field, resource),
            serde_json::json!({ "resource": resource, "value": value }),
        )
    }
}

impl fmt::Display for RelationshipError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Relationship error on '{}' ({}): {}", self.field, self.kind, self.message)
    }
}

/// Failures raised by the persistence collaborator
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BackendError {
    #[error("Backend unavailable: {message}")]
    Unavailable { message: String },

    #[error("Backend operation '{operation}' timed out after {millis}ms")]
    Timeout { operation: String, millis: u64 },

    #[error("Backend query failed: {message}")]
    Query { message: String },
}

impl BackendError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Connection and timeout failures are transient, query failures are not
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable { .. } | Self::Timeout { .. })
    }
}
