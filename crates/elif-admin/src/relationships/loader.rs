//! Loading related records through the backend

use super::backend::RelationshipBackend;
use super::kind::LoadingStrategy;
use super::query::RelationQuery;
use super::Relationship;
use crate::config::AdminConfig;
use crate::error::AdminResult;
use crate::record::Record;
use serde::Serialize;
use serde_json::Value;

/// Result of loading one relationship
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Loaded {
    /// Singular relationships: belongs-to, has-one, morph-to
    One(Option<Value>),
    Many(Vec<Value>),
}

impl Loaded {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::One(record) => record.is_none(),
            Self::Many(records) => records.is_empty(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::One(record) => usize::from(record.is_some()),
            Self::Many(records) => records.len(),
        }
    }

    /// Records as a list, whatever the cardinality
    pub fn records(&self) -> Vec<&Value> {
        match self {
            Self::One(record) => record.iter().collect(),
            Self::Many(records) => records.iter().collect(),
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            Self::One(record) => record.unwrap_or(Value::Null),
            Self::Many(records) => Value::Array(records),
        }
    }
}

/// Loads related records for a parent record
pub struct RelationshipLoader<'a> {
    backend: &'a dyn RelationshipBackend,
    config: &'a AdminConfig,
}

impl<'a> RelationshipLoader<'a> {
    pub fn new(backend: &'a dyn RelationshipBackend, config: &'a AdminConfig) -> Self {
        Self { backend, config }
    }

    /// Load the records `relationship` points at from `parent`
    ///
    /// Collections are capped at the configured page size.
    pub async fn load(&self, relationship: &Relationship, parent: &(dyn Record + Sync)) -> AdminResult<Loaded> {
        let query = relationship.query_for(parent)?;

        tracing::debug!(
            "Loading {} relationship '{}'",
            relationship.kind(),
            relationship.field().key()
        );

        match relationship {
            Relationship::BelongsTo(_) | Relationship::HasOne(_) | Relationship::MorphTo(_) => {
                self.load_one(query).await
            }
            Relationship::HasMany(_) | Relationship::BelongsToMany(_) | Relationship::MorphToMany(_) => {
                self.load_many(query).await
            }
        }
    }

    /// Whether `relationship` should be loaded alongside its parent
    pub fn is_eager(&self, relationship: &Relationship) -> bool {
        relationship.config().loading_or(self.config.default_loading()) == LoadingStrategy::Eager
    }

    /// Load every eager relationship, keyed by field key
    pub async fn load_eager(
        &self,
        relationships: &[Relationship],
        parent: &(dyn Record + Sync),
    ) -> AdminResult<Vec<(String, Loaded)>> {
        let mut loaded = Vec::new();
        for relationship in relationships.iter().filter(|r| self.is_eager(r)) {
            let records = self.load(relationship, parent).await?;
            loaded.push((relationship.field().key().to_string(), records));
        }
        Ok(loaded)
    }

    async fn load_one(&self, query: Option<RelationQuery>) -> AdminResult<Loaded> {
        let Some(query) = query else {
            return Ok(Loaded::One(None));
        };
        let query = query.limit(1);
        let records = self.backend.fetch(&query).await.map_err(|err| {
            tracing::warn!("Fetching '{}' failed: {}", query.resource, err);
            err
        })?;
        Ok(Loaded::One(records.into_iter().next()))
    }

    async fn load_many(&self, query: Option<RelationQuery>) -> AdminResult<Loaded> {
        let Some(mut query) = query else {
            return Ok(Loaded::Many(Vec::new()));
        };
        let page = self.config.relationship_page_size();
        query.limit = Some(query.limit.map_or(page, |limit| limit.min(page)));

        let records = self.backend.fetch(&query).await.map_err(|err| {
            tracing::warn!("Fetching '{}' failed: {}", query.resource, err);
            err
        })?;
        Ok(Loaded::Many(records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relationships::{BelongsTo, HasMany, MemoryBackend, NullBackend, RelationshipBuilder};
    use serde_json::json;

    fn backend() -> MemoryBackend {
        MemoryBackend::new()
            .with_rows("authors", vec![json!({ "id": 1, "name": "Ada" })])
            .with_rows(
                "comments",
                (1..=5).map(|n| json!({ "id": n, "post_id": 9 })).collect(),
            )
    }

    #[tokio::test]
    async fn test_load_one_and_many() {
        let backend = backend();
        let config = AdminConfig::builder().relationship_page_size(3).build_config().unwrap();
        let loader = RelationshipLoader::new(&backend, &config);
        let parent = json!({ "id": 9, "author_id": 1 });

        let author: Relationship = BelongsTo::new("Author", "author_id", "authors").into();
        let loaded = loader.load(&author, &parent).await.unwrap();
        assert_eq!(loaded, Loaded::One(Some(json!({ "id": 1, "name": "Ada" }))));

        let comments: Relationship = HasMany::new("Comments", "comments", "comments")
            .foreign_key("post_id")
            .into();
        let loaded = loader.load(&comments, &parent).await.unwrap();
        assert_eq!(loaded.len(), 3);
    }

    #[tokio::test]
    async fn test_null_backend_yields_empty_results() {
        let config = AdminConfig::default();
        let loader = RelationshipLoader::new(&NullBackend, &config);
        let author: Relationship = BelongsTo::new("Author", "author_id", "authors").into();

        let loaded = loader.load(&author, &json!({ "author_id": 1 })).await.unwrap();
        assert!(loaded.is_empty());
        assert_eq!(loaded.into_value(), Value::Null);
    }

    #[tokio::test]
    async fn test_eager_only() {
        let backend = backend();
        let config = AdminConfig::default();
        let loader = RelationshipLoader::new(&backend, &config);

        let relationships: Vec<Relationship> = vec![
            BelongsTo::new("Author", "author_id", "authors").eager().into(),
            HasMany::new("Comments", "comments", "comments").foreign_key("post_id").into(),
        ];

        let loaded = loader
            .load_eager(&relationships, &json!({ "id": 9, "author_id": 1 }))
            .await
            .unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].0, "author_id");
    }

    #[test]
    fn test_loaded_serializes_untagged() {
        assert_eq!(serde_json::to_value(Loaded::One(None)).unwrap(), Value::Null);
        assert_eq!(serde_json::to_value(Loaded::Many(vec![json!(1)])).unwrap(), json!([1]));
    }
}
