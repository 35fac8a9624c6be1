//! Inverse polymorphic relationship, the target type is stored per record

use super::config::{MorphConfig, RelationshipConfig};
use super::kind::RelationshipKind;
use super::query::RelationQuery;
use super::{parent_key, serialize_relationship};
use crate::error::RelationshipError;
use crate::field::{Field, FieldKind};
use crate::record::{resolve, Record};
use serde_json::{json, Value};

/// `comments.commentable_type + commentable_id -> posts | videos`
#[derive(Debug, Clone)]
pub struct MorphTo {
    pub(crate) field: Field,
    pub(crate) config: RelationshipConfig,
    pub(crate) morph: MorphConfig,
}

relationship_variant!(MorphTo, MorphTo);

impl MorphTo {
    /// Columns default to `<key>_type` and `<key>_id`; no types are registered
    pub fn new(name: impl Into<String>, key: impl Into<String>) -> Self {
        let field = Field::new(FieldKind::Relationship(RelationshipKind::MorphTo), name, key);
        let morph = MorphConfig::new(field.key());
        let config = RelationshipConfig::new("", morph.id_column.as_str());
        Self { field, config, morph }
    }

    /// Map a stored discriminator to a related resource slug
    pub fn morph_type(mut self, discriminator: impl Into<String>, resource: impl Into<String>) -> Self {
        self.morph.register(discriminator, resource);
        self
    }

    pub fn types<I, D, R>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = (D, R)>,
        D: Into<String>,
        R: Into<String>,
    {
        for (discriminator, resource) in types {
            self.morph.register(discriminator, resource);
        }
        self
    }

    pub fn type_column(mut self, column: impl Into<String>) -> Self {
        self.morph.type_column = column.into();
        self
    }

    pub fn id_column(mut self, column: impl Into<String>) -> Self {
        self.morph.id_column = column.into();
        self.config.foreign_key = self.morph.id_column.clone();
        self
    }

    pub fn morph(&self) -> &MorphConfig {
        &self.morph
    }

    /// At least one type must be registered
    pub fn validate_types(&self) -> Result<(), RelationshipError> {
        self.morph.validate_types(self.field.key(), RelationshipKind::MorphTo)
    }

    /// Capture the loaded association, or `{type, id}` from the morph columns
    pub fn extract(&mut self, record: &dyn Record) {
        self.field.extract(record);
        if !self.field.data().is_null() {
            return;
        }

        let discriminator = resolve(record, &self.morph.type_column).unwrap_or(Value::Null);
        if discriminator.is_null() {
            return;
        }
        let id = resolve(record, &self.morph.id_column).unwrap_or(Value::Null);
        let resource = discriminator
            .as_str()
            .and_then(|d| self.morph.resource_for(d))
            .map(Value::from)
            .unwrap_or(Value::Null);

        self.field.set_data(json!({ "type": discriminator, "id": id, "resource": resource }));
    }

    /// The single record the stored discriminator and id point at
    pub fn query_for(&self, parent: &dyn Record) -> Result<Option<RelationQuery>, RelationshipError> {
        self.validate_types()?;

        let Some(discriminator) = parent_key(parent, &self.morph.type_column) else {
            return Ok(None);
        };
        let discriminator = match discriminator {
            Value::String(s) => s,
            other => other.to_string(),
        };
        let resource = self
            .morph
            .resolve_type(self.field.key(), RelationshipKind::MorphTo, &discriminator)?;

        let Some(id) = parent_key(parent, &self.morph.id_column) else {
            return Ok(None);
        };

        let query = RelationQuery::new(resource).where_eq(self.config.owner_key(), id).limit(1);
        Ok(Some(self.config.apply_query(query)))
    }

    pub fn json_serialize(&self) -> Value {
        serialize_relationship(
            &self.field,
            &self.config,
            RelationshipKind::MorphTo,
            morph_props(&self.morph),
        )
    }
}

pub(crate) fn morph_props(morph: &MorphConfig) -> Vec<(&'static str, Value)> {
    vec![
        ("morph_type_column", Value::from(morph.type_column.as_str())),
        ("morph_id_column", Value::from(morph.id_column.as_str())),
        ("morph_types", json!(morph.types)),
    ]
}
