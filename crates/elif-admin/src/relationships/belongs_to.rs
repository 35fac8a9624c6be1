//! Many-to-one relationship through a foreign key on this record

use super::config::RelationshipConfig;
use super::kind::RelationshipKind;
use super::resource::RelatedResource;
use super::title::resolve_title;
use super::serialize_relationship;
use crate::field::{Field, FieldKind};
use crate::record::{camel_case, find_member_ci, Record};
use serde_json::{json, Value};

/// `post.author_id -> authors.id`
#[derive(Debug, Clone)]
pub struct BelongsTo {
    pub(crate) field: Field,
    pub(crate) config: RelationshipConfig,
}

relationship_variant!(BelongsTo, BelongsTo);

impl BelongsTo {
    /// `foreign_key` is both the field key and the foreign key column
    pub fn new(
        name: impl Into<String>,
        foreign_key: impl Into<String>,
        related: impl Into<RelatedResource>,
    ) -> Self {
        let field = Field::new(
            FieldKind::Relationship(RelationshipKind::BelongsTo),
            name,
            foreign_key,
        );
        let config = RelationshipConfig::new(related, field.key());
        Self { field, config }
    }

    /// Capture the foreign key and, when possible, the related title
    ///
    /// With a display callback, or without a resource object, only the raw
    /// foreign key is exposed. Otherwise the eagerly loaded association is
    /// located by the foreign key stem and the value becomes
    /// `{id, title}`, or null when the association is not loaded.
    pub fn extract(&mut self, record: &dyn Record) {
        self.field.extract(record);

        if self.field.has_display_callback() {
            return;
        }
        let Some(resource) = self.config.related().resource() else {
            return;
        };

        let id = self.field.data().clone();
        let data = match self.association(record) {
            Some(associated) => {
                let title = resolve_title(Some(resource), &associated, &id);
                json!({ "id": id, "title": title })
            }
            None => {
                tracing::trace!("Association for '{}' is not loaded", self.field.key());
                Value::Null
            }
        };
        self.field.set_data(data);
    }

    /// The loaded association member, if present and not empty
    fn association(&self, record: &dyn Record) -> Option<Value> {
        let stem = foreign_key_stem(self.config.foreign_key());
        if stem.is_empty() {
            return None;
        }

        find_member_ci(record, stem)
            .or_else(|| find_member_ci(record, &camel_case(stem)))
            .filter(|value| !is_empty(value))
    }

    pub fn json_serialize(&self) -> Value {
        serialize_relationship(&self.field, &self.config, RelationshipKind::BelongsTo, Vec::new())
    }
}

/// `author_id`, `AuthorId` and `AuthorID` all become `author`/`Author`
pub(crate) fn foreign_key_stem(foreign_key: &str) -> &str {
    foreign_key
        .strip_suffix("_id")
        .or_else(|| foreign_key.strip_suffix("Id"))
        .or_else(|| foreign_key.strip_suffix("ID"))
        .unwrap_or(foreign_key)
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}
