//! Display formatting of loaded related records

use super::loader::Loaded;
use super::title::resolve_title;
use super::Relationship;
use crate::record::{resolve, Record};
use elif_admin_validation::coerce_to_string;
use serde_json::{json, Value};

pub struct RelationshipDisplay;

impl RelationshipDisplay {
    /// Title of one related record
    ///
    /// A display key other than the owner key is used when it resolves to a
    /// non-empty value; otherwise the resource title and its fallbacks apply.
    pub fn title(relationship: &Relationship, record: &dyn Record) -> String {
        let config = relationship.config();
        let id = resolve(record, config.owner_key()).unwrap_or(Value::Null);

        if config.display_key() != config.owner_key() {
            let shown = resolve(record, config.display_key())
                .filter(|value| !value.is_null())
                .map(|value| coerce_to_string(&value))
                .filter(|text| !text.is_empty());
            if let Some(shown) = shown {
                return shown;
            }
        }

        resolve_title(config.related().resource(), record, &id)
    }

    /// `{id, title}` entries shaped by the relationship's cardinality
    ///
    /// Singular relationships yield one entry or null, collections an array.
    pub fn display(relationship: &Relationship, loaded: &Loaded) -> Value {
        let entry = |record: &Value| {
            let id = resolve(record, relationship.config().owner_key()).unwrap_or(Value::Null);
            json!({ "id": id, "title": Self::title(relationship, record) })
        };

        match relationship {
            Relationship::BelongsTo(_) | Relationship::HasOne(_) | Relationship::MorphTo(_) => loaded
                .records()
                .first()
                .map(|record| entry(*record))
                .unwrap_or(Value::Null),
            Relationship::HasMany(_) | Relationship::BelongsToMany(_) | Relationship::MorphToMany(_) => {
                Value::Array(loaded.records().into_iter().map(entry).collect())
            }
        }
    }
}
