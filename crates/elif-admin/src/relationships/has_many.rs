//! One-to-many relationship through a foreign key on the related records

use super::config::RelationshipConfig;
use super::kind::RelationshipKind;
use super::query::RelationQuery;
use super::resource::RelatedResource;
use super::{parent_key, serialize_relationship};
use crate::error::RelationshipError;
use crate::field::{Field, FieldKind};
use crate::record::Record;
use serde_json::Value;

/// `posts.id <- comments.post_id`
#[derive(Debug, Clone)]
pub struct HasMany {
    pub(crate) field: Field,
    pub(crate) config: RelationshipConfig,
}

relationship_variant!(HasMany, HasMany);

impl HasMany {
    /// The foreign key column on the related records is set with
    /// [`RelationshipBuilder::foreign_key`](super::RelationshipBuilder::foreign_key)
    pub fn new(name: impl Into<String>, key: impl Into<String>, related: impl Into<RelatedResource>) -> Self {
        Self {
            field: Field::new(FieldKind::Relationship(RelationshipKind::HasMany), name, key),
            config: RelationshipConfig::new(related, ""),
        }
    }

    pub fn extract(&mut self, record: &dyn Record) {
        self.field.extract(record);
    }

    /// Related records whose foreign key holds the parent's owner key
    pub fn query_for(&self, parent: &dyn Record) -> Result<Option<RelationQuery>, RelationshipError> {
        has_query(&self.field, &self.config, RelationshipKind::HasMany, parent)
    }

    pub fn json_serialize(&self) -> Value {
        serialize_relationship(&self.field, &self.config, RelationshipKind::HasMany, Vec::new())
    }
}

pub(crate) fn has_query(
    field: &Field,
    config: &RelationshipConfig,
    kind: RelationshipKind,
    parent: &dyn Record,
) -> Result<Option<RelationQuery>, RelationshipError> {
    if config.foreign_key().trim().is_empty() {
        return Err(RelationshipError::new(
            field.key(),
            kind,
            format!("{} has no foreign key configured", field.key()),
            serde_json::json!({ "resource": config.related_slug() }),
        ));
    }

    let Some(owner) = parent_key(parent, config.owner_key()) else {
        return Ok(None);
    };

    let query = RelationQuery::new(config.related_slug()).where_eq(config.foreign_key(), owner);
    Ok(Some(config.apply_query(query)))
}
