//! Relationship fields
//!
//! Six descriptor variants layer related-resource identity, key columns,
//! pivot tables and polymorphic type maps on top of a base [`Field`].
//! [`Relationship`] closes over them so every dispatch site matches
//! exhaustively. Anything that would touch the data store goes through an
//! injected [`RelationshipBackend`].

use crate::field::{Field, FieldBuilder};
use crate::record::{resolve, Record};
use serde_json::Value;
use std::sync::Arc;

/// Implements the builder traits and the `Relationship` conversion
macro_rules! relationship_variant {
    ($ty:ident, $variant:ident) => {
        impl $crate::field::FieldBuilder for $ty {
            fn field(&self) -> &$crate::field::Field {
                &self.field
            }

            fn field_mut(&mut self) -> &mut $crate::field::Field {
                &mut self.field
            }
        }

        impl $crate::relationships::RelationshipBuilder for $ty {
            const KIND: $crate::relationships::RelationshipKind =
                $crate::relationships::RelationshipKind::$variant;

            fn config(&self) -> &$crate::relationships::RelationshipConfig {
                &self.config
            }

            fn config_mut(&mut self) -> &mut $crate::relationships::RelationshipConfig {
                &mut self.config
            }
        }

        impl From<$ty> for $crate::relationships::Relationship {
            fn from(relationship: $ty) -> Self {
                $crate::relationships::Relationship::$variant(relationship)
            }
        }
    };
}

pub mod backend;
pub mod belongs_to;
pub mod belongs_to_many;
pub mod config;
pub mod counting;
pub mod display;
pub mod has_many;
pub mod has_one;
pub mod kind;
pub mod loader;
pub mod morph_to;
pub mod morph_to_many;
pub mod query;
pub mod resource;
pub mod sort;
pub mod title;
pub mod validator;

pub use backend::{MemoryBackend, NullBackend, RelationshipBackend};
pub use belongs_to::BelongsTo;
pub use belongs_to_many::BelongsToMany;
pub use config::{MorphConfig, PivotTable, QueryCallback, RelationshipConfig};
pub use counting::RelationshipCounting;
pub use display::RelationshipDisplay;
pub use has_many::HasMany;
pub use has_one::HasOne;
pub use kind::{LoadingStrategy, RelationshipKind};
pub use loader::{Loaded, RelationshipLoader};
pub use morph_to::MorphTo;
pub use morph_to_many::MorphToMany;
pub use query::{Constraint, ConstraintOperator, PivotJoin, RelationQuery, SortDirection};
pub use resource::{RelatedResource, Resource};
pub use sort::{RelationshipSort, SortPlan};
pub use title::{fallback_title, resolve_title, FALLBACK_TITLE_MEMBERS};
pub use validator::RelationshipValidator;

use crate::config::AdminConfig;
use crate::error::{AdminResult, RelationshipError};

/// Relationship-specific fluent setters
pub trait RelationshipBuilder: FieldBuilder {
    const KIND: RelationshipKind;

    fn config(&self) -> &RelationshipConfig;

    fn config_mut(&mut self) -> &mut RelationshipConfig;

    fn relationship_kind(&self) -> RelationshipKind {
        Self::KIND
    }

    /// On a `BelongsTo` the field key follows, both name the same column
    fn foreign_key(mut self, column: impl Into<String>) -> Self {
        let column = column.into();
        if Self::KIND == RelationshipKind::BelongsTo {
            self.field_mut().key = column.clone();
        }
        self.config_mut().foreign_key = column;
        self
    }

    fn owner_key(mut self, column: impl Into<String>) -> Self {
        self.config_mut().owner_key = column.into();
        self
    }

    /// Related column shown as the record title
    fn display_key(mut self, column: impl Into<String>) -> Self {
        self.config_mut().display_key = column.into();
        self
    }

    /// Related columns eligible for type-ahead search
    fn search_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config_mut().searchable = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Characters typed before the type-ahead search is sent
    fn search_min_chars(mut self, chars: usize) -> Self {
        self.config_mut().search_min_chars = Some(chars);
        self
    }

    fn loading(mut self, strategy: LoadingStrategy) -> Self {
        self.config_mut().loading = Some(strategy);
        self
    }

    fn eager(self) -> Self {
        self.loading(LoadingStrategy::Eager)
    }

    fn lazy(self) -> Self {
        self.loading(LoadingStrategy::Lazy)
    }

    /// Customise the relationship query before it reaches the backend
    fn modify_query<F>(mut self, callback: F) -> Self
    where
        F: Fn(RelationQuery) -> RelationQuery + Send + Sync + 'static,
    {
        self.config_mut().query = Some(Arc::new(callback));
        self
    }
}

/// One of the six relationship variants
#[derive(Debug, Clone)]
pub enum Relationship {
    BelongsTo(BelongsTo),
    HasMany(HasMany),
    HasOne(HasOne),
    BelongsToMany(BelongsToMany),
    MorphTo(MorphTo),
    MorphToMany(MorphToMany),
}

impl Relationship {
    pub fn kind(&self) -> RelationshipKind {
        match self {
            Self::BelongsTo(_) => RelationshipKind::BelongsTo,
            Self::HasMany(_) => RelationshipKind::HasMany,
            Self::HasOne(_) => RelationshipKind::HasOne,
            Self::BelongsToMany(_) => RelationshipKind::BelongsToMany,
            Self::MorphTo(_) => RelationshipKind::MorphTo,
            Self::MorphToMany(_) => RelationshipKind::MorphToMany,
        }
    }

    pub fn field(&self) -> &Field {
        match self {
            Self::BelongsTo(r) => &r.field,
            Self::HasMany(r) => &r.field,
            Self::HasOne(r) => &r.field,
            Self::BelongsToMany(r) => &r.field,
            Self::MorphTo(r) => &r.field,
            Self::MorphToMany(r) => &r.field,
        }
    }

    pub fn config(&self) -> &RelationshipConfig {
        match self {
            Self::BelongsTo(r) => &r.config,
            Self::HasMany(r) => &r.config,
            Self::HasOne(r) => &r.config,
            Self::BelongsToMany(r) => &r.config,
            Self::MorphTo(r) => &r.config,
            Self::MorphToMany(r) => &r.config,
        }
    }

    pub(crate) fn field_mut(&mut self) -> &mut Field {
        match self {
            Self::BelongsTo(r) => &mut r.field,
            Self::HasMany(r) => &mut r.field,
            Self::HasOne(r) => &mut r.field,
            Self::BelongsToMany(r) => &mut r.field,
            Self::MorphTo(r) => &mut r.field,
            Self::MorphToMany(r) => &mut r.field,
        }
    }

    pub(crate) fn config_mut(&mut self) -> &mut RelationshipConfig {
        match self {
            Self::BelongsTo(r) => &mut r.config,
            Self::HasMany(r) => &mut r.config,
            Self::HasOne(r) => &mut r.config,
            Self::BelongsToMany(r) => &mut r.config,
            Self::MorphTo(r) => &mut r.config,
            Self::MorphToMany(r) => &mut r.config,
        }
    }

    pub fn morph(&self) -> Option<&MorphConfig> {
        match self {
            Self::MorphTo(r) => Some(&r.morph),
            Self::MorphToMany(r) => Some(&r.morph),
            Self::BelongsTo(_) | Self::HasMany(_) | Self::HasOne(_) | Self::BelongsToMany(_) => None,
        }
    }

    pub fn pivot(&self) -> Option<&PivotTable> {
        match self {
            Self::BelongsToMany(r) => r.pivot.as_ref(),
            Self::MorphToMany(r) => r.pivot.as_ref(),
            Self::BelongsTo(_) | Self::HasMany(_) | Self::HasOne(_) | Self::MorphTo(_) => None,
        }
    }

    pub fn extract(&mut self, record: &dyn Record) {
        match self {
            Self::BelongsTo(r) => r.extract(record),
            Self::HasMany(r) => r.extract(record),
            Self::HasOne(r) => r.extract(record),
            Self::BelongsToMany(r) => r.extract(record),
            Self::MorphTo(r) => r.extract(record),
            Self::MorphToMany(r) => r.extract(record),
        }
    }

    /// Structural preconditions checked at use time
    ///
    /// Polymorphic variants must register at least one type.
    pub fn validate_relationship(&self) -> Result<(), RelationshipError> {
        match self {
            Self::MorphTo(r) => r.validate_types(),
            Self::MorphToMany(r) => r.validate_types(),
            Self::BelongsTo(_) | Self::HasMany(_) | Self::HasOne(_) | Self::BelongsToMany(_) => Ok(()),
        }
    }

    /// Query for the records related to `parent`; collection queries carry no limit
    ///
    /// `None` means there is nothing to load, such as a null foreign key.
    pub fn query_for(&self, parent: &dyn Record) -> Result<Option<RelationQuery>, RelationshipError> {
        match self {
            Self::BelongsTo(r) => {
                let config = &r.config;
                Ok(parent_key(parent, config.foreign_key()).map(|id| {
                    config.apply_query(
                        RelationQuery::new(config.related_slug())
                            .where_eq(config.owner_key(), id)
                            .limit(1),
                    )
                }))
            }
            Self::HasMany(r) => r.query_for(parent),
            Self::HasOne(r) => r.query_for(parent),
            Self::BelongsToMany(r) => r.query_for(parent),
            Self::MorphTo(r) => r.query_for(parent),
            Self::MorphToMany(r) => r.query_for(parent),
        }
    }

    /// Load the related records of `parent` through `backend`
    pub async fn resolve_relationship(
        &self,
        backend: &dyn RelationshipBackend,
        config: &AdminConfig,
        parent: &(dyn Record + Sync),
    ) -> AdminResult<Loaded> {
        RelationshipLoader::new(backend, config).load(self, parent).await
    }

    pub fn json_serialize(&self) -> Value {
        match self {
            Self::BelongsTo(r) => r.json_serialize(),
            Self::HasMany(r) => r.json_serialize(),
            Self::HasOne(r) => r.json_serialize(),
            Self::BelongsToMany(r) => r.json_serialize(),
            Self::MorphTo(r) => r.json_serialize(),
            Self::MorphToMany(r) => r.json_serialize(),
        }
    }
}

/// Base payload with the relationship keys merged into `props`
///
/// Props set explicitly on the field take precedence.
pub(crate) fn serialize_relationship(
    field: &Field,
    config: &RelationshipConfig,
    kind: RelationshipKind,
    extra: Vec<(&'static str, Value)>,
) -> Value {
    let mut payload = field.json_serialize();
    if let Some(Value::Object(props)) = payload.get_mut("props") {
        for (key, value) in config.to_props(kind).into_iter().chain(extra) {
            props.entry(key).or_insert(value);
        }
    }
    payload
}

/// A key value on `parent` usable in a query; null and empty strings are absent
pub(crate) fn parent_key(parent: &dyn Record, column: &str) -> Option<Value> {
    resolve(parent, column).filter(|value| match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::DataType;
    use serde_json::json;

    fn all() -> Vec<Relationship> {
        vec![
            BelongsTo::new("Author", "author_id", "authors").into(),
            HasMany::new("Comments", "comments", "comments").foreign_key("post_id").into(),
            HasOne::new("Cover", "cover", "images").foreign_key("post_id").into(),
            BelongsToMany::new("Tags", "tags", "tags")
                .through(PivotTable::new("post_tag", "post_id", "tag_id"))
                .into(),
            MorphTo::new("Commentable", "commentable").into(),
            MorphToMany::new("Labels", "labels", "labels", "labelable")
                .through(PivotTable::new("labelables", "labelable_id", "label_id"))
                .into(),
        ]
    }

    #[test]
    fn test_kind_dispatch() {
        let kinds: Vec<_> = all().iter().map(Relationship::kind).collect();
        assert_eq!(kinds, RelationshipKind::ALL.to_vec());

        for relationship in all() {
            assert_eq!(relationship.field().data_type(), DataType::from(relationship.kind()));
        }
    }

    #[test]
    fn test_validate_relationship_only_checks_morph_types() {
        let failures: Vec<_> = all()
            .iter()
            .filter_map(|r| r.validate_relationship().err())
            .map(|err| err.kind)
            .collect();
        assert_eq!(failures, vec![RelationshipKind::MorphTo, RelationshipKind::MorphToMany]);
    }

    #[test]
    fn test_belongs_to_query() {
        let relationship: Relationship = BelongsTo::new("Author", "author_id", "authors").into();
        let query = relationship.query_for(&json!({ "author_id": 3 })).unwrap().unwrap();
        assert_eq!(query.resource, "authors");
        assert_eq!(query.constraints[0].column, "id");
        assert!(relationship.query_for(&json!({ "author_id": null })).unwrap().is_none());
    }

    #[test]
    fn test_relationship_builder_accessors() {
        let field = HasMany::new("Comments", "comments", "comments")
            .foreign_key("post_id")
            .search_columns(["body"])
            .eager();

        assert_eq!(field.relationship_kind(), RelationshipKind::HasMany);
        assert_eq!(field.config().searchable_columns(), ["body".to_string()]);
        assert_eq!(field.config().loading(), LoadingStrategy::Eager);
    }

    #[test]
    fn test_user_props_win_over_relationship_props() {
        let relationship: Relationship = BelongsTo::new("Author", "author_id", "authors")
            .prop("resource", "people")
            .into();
        assert_eq!(relationship.json_serialize()["props"]["resource"], "people");
    }

    #[test]
    fn test_serialization_is_idempotent() {
        for relationship in all() {
            assert_eq!(relationship.json_serialize(), relationship.json_serialize());
        }
    }
}
