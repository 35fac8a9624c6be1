//! One-to-one relationship through a foreign key on the related record

use super::config::RelationshipConfig;
use super::has_many::has_query;
use super::kind::RelationshipKind;
use super::query::RelationQuery;
use super::resource::RelatedResource;
use super::serialize_relationship;
use crate::error::RelationshipError;
use crate::field::{Field, FieldKind};
use crate::record::Record;
use serde_json::Value;

/// `users.id <- profiles.user_id`
#[derive(Debug, Clone)]
pub struct HasOne {
    pub(crate) field: Field,
    pub(crate) config: RelationshipConfig,
}

relationship_variant!(HasOne, HasOne);

impl HasOne {
    pub fn new(name: impl Into<String>, key: impl Into<String>, related: impl Into<RelatedResource>) -> Self {
        Self {
            field: Field::new(FieldKind::Relationship(RelationshipKind::HasOne), name, key),
            config: RelationshipConfig::new(related, ""),
        }
    }

    pub fn extract(&mut self, record: &dyn Record) {
        self.field.extract(record);
    }

    /// At most one related record whose foreign key holds the owner key
    pub fn query_for(&self, parent: &dyn Record) -> Result<Option<RelationQuery>, RelationshipError> {
        Ok(has_query(&self.field, &self.config, RelationshipKind::HasOne, parent)?.map(|query| query.limit(1)))
    }

    pub fn json_serialize(&self) -> Value {
        serialize_relationship(&self.field, &self.config, RelationshipKind::HasOne, Vec::new())
    }
}
