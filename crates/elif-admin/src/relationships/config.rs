//! Key configuration shared by the relationship variants

use super::kind::{LoadingStrategy, RelationshipKind};
use super::query::RelationQuery;
use super::resource::RelatedResource;
use crate::error::RelationshipError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Customises the query built for a relationship before it is executed
pub type QueryCallback = Arc<dyn Fn(RelationQuery) -> RelationQuery + Send + Sync>;

/// Related resource and key columns of one relationship
#[derive(Clone)]
pub struct RelationshipConfig {
    related: RelatedResource,
    pub(crate) foreign_key: String,
    pub(crate) owner_key: String,
    pub(crate) display_key: String,
    pub(crate) searchable: Vec<String>,
    pub(crate) search_min_chars: Option<usize>,
    pub(crate) loading: Option<LoadingStrategy>,
    pub(crate) query: Option<QueryCallback>,
}

impl RelationshipConfig {
    /// Owner and display keys default to `id`
    pub fn new(related: impl Into<RelatedResource>, foreign_key: impl Into<String>) -> Self {
        Self {
            related: related.into(),
            foreign_key: foreign_key.into(),
            owner_key: "id".to_string(),
            display_key: "id".to_string(),
            searchable: Vec::new(),
            search_min_chars: None,
            loading: None,
            query: None,
        }
    }

    pub fn related(&self) -> &RelatedResource {
        &self.related
    }

    pub fn related_slug(&self) -> &str {
        self.related.slug()
    }

    pub fn foreign_key(&self) -> &str {
        &self.foreign_key
    }

    pub fn owner_key(&self) -> &str {
        &self.owner_key
    }

    pub fn display_key(&self) -> &str {
        &self.display_key
    }

    pub fn searchable_columns(&self) -> &[String] {
        &self.searchable
    }

    pub fn search_min_chars(&self) -> Option<usize> {
        self.search_min_chars
    }

    /// Declared strategy, lazy when none was declared
    pub fn loading(&self) -> LoadingStrategy {
        self.loading.unwrap_or_default()
    }

    /// Declared strategy, `default` when none was declared
    pub fn loading_or(&self, default: LoadingStrategy) -> LoadingStrategy {
        self.loading.unwrap_or(default)
    }

    pub fn query_callback(&self) -> Option<&QueryCallback> {
        self.query.as_ref()
    }

    /// Run the query callback, if any
    pub fn apply_query(&self, query: RelationQuery) -> RelationQuery {
        match &self.query {
            Some(callback) => callback(query),
            None => query,
        }
    }

    pub(crate) fn to_props(&self, kind: RelationshipKind) -> Vec<(&'static str, Value)> {
        vec![
            ("relationship", Value::from(kind.as_str())),
            ("resource", Value::from(self.related.slug())),
            ("foreign_key", Value::from(self.foreign_key.as_str())),
            ("owner_key", Value::from(self.owner_key.as_str())),
            ("display_key", Value::from(self.display_key.as_str())),
            ("searchable", json!(self.searchable)),
            ("search_min_chars", json!(self.search_min_chars)),
            ("loading", Value::from(self.loading().as_str())),
        ]
    }
}

impl fmt::Debug for RelationshipConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelationshipConfig")
            .field("related", &self.related)
            .field("foreign_key", &self.foreign_key)
            .field("owner_key", &self.owner_key)
            .field("display_key", &self.display_key)
            .field("searchable", &self.searchable)
            .field("search_min_chars", &self.search_min_chars)
            .field("loading", &self.loading)
            .field("has_query_callback", &self.query.is_some())
            .finish()
    }
}

/// Pivot table of a many-to-many relationship
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PivotTable {
    pub table: String,
    /// Pivot column pointing at the parent record
    pub foreign_pivot_key: String,
    /// Pivot column pointing at the related record
    pub related_pivot_key: String,
    /// Extra pivot columns exposed as pivot fields
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub timestamps: bool,
}

impl PivotTable {
    pub fn new(
        table: impl Into<String>,
        foreign_pivot_key: impl Into<String>,
        related_pivot_key: impl Into<String>,
    ) -> Self {
        Self {
            table: table.into(),
            foreign_pivot_key: foreign_pivot_key.into(),
            related_pivot_key: related_pivot_key.into(),
            columns: Vec::new(),
            timestamps: false,
        }
    }

    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_timestamps(mut self) -> Self {
        self.timestamps = true;
        self
    }

    /// Table and both key columns must be named and distinct
    pub fn validate(&self, field: &str, kind: RelationshipKind) -> Result<(), RelationshipError> {
        let problem = if self.table.trim().is_empty() {
            Some("pivot table name cannot be empty")
        } else if self.foreign_pivot_key.trim().is_empty() || self.related_pivot_key.trim().is_empty() {
            Some("pivot key columns cannot be empty")
        } else if self.foreign_pivot_key == self.related_pivot_key {
            Some("pivot key columns must be different")
        } else {
            None
        };

        match problem {
            Some(message) => Err(RelationshipError::new(
                field,
                kind,
                format!("{} {}", field, message),
                json!({ "pivot": self.table }),
            )),
            None => Ok(()),
        }
    }
}

/// Polymorphic columns and the discriminator to resource mapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MorphConfig {
    /// Column storing the discriminator
    pub type_column: String,
    /// Column storing the related id
    pub id_column: String,
    /// Discriminator to related resource slug
    #[serde(default)]
    pub types: BTreeMap<String, String>,
}

impl MorphConfig {
    /// `<name>_type` and `<name>_id` columns with no registered types
    pub fn new(name: &str) -> Self {
        Self {
            type_column: format!("{}_type", name),
            id_column: format!("{}_id", name),
            types: BTreeMap::new(),
        }
    }

    pub fn register(&mut self, discriminator: impl Into<String>, resource: impl Into<String>) {
        self.types.insert(discriminator.into(), resource.into());
    }

    pub fn resource_for(&self, discriminator: &str) -> Option<&str> {
        self.types.get(discriminator).map(String::as_str)
    }

    pub fn discriminators(&self) -> Vec<String> {
        self.types.keys().cloned().collect()
    }

    /// At least one type must be registered before use
    pub fn validate_types(&self, field: &str, kind: RelationshipKind) -> Result<(), RelationshipError> {
        if self.types.is_empty() {
            return Err(RelationshipError::no_morph_types(field, kind));
        }
        Ok(())
    }

    /// Resolve a stored discriminator to its resource slug
    pub fn resolve_type(
        &self,
        field: &str,
        kind: RelationshipKind,
        discriminator: &str,
    ) -> Result<&str, RelationshipError> {
        self.resource_for(discriminator).ok_or_else(|| {
            tracing::warn!("Unknown morph type '{}' on '{}'", discriminator, field);
            RelationshipError::unknown_morph_type(field, kind, discriminator, self.discriminators())
        })
    }
}
