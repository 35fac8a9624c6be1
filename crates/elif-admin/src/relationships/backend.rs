//! Persistence collaborator used by relationship loading, counting and validation

use super::query::RelationQuery;
use crate::error::BackendError;
use crate::record::resolve;
use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;

/// Executes relationship queries against a data store
#[async_trait]
pub trait RelationshipBackend: Send + Sync {
    /// Related records matching `query`
    async fn fetch(&self, query: &RelationQuery) -> Result<Vec<Value>, BackendError>;

    /// Number of related records matching `query`, ignoring its limit
    async fn count(&self, query: &RelationQuery) -> Result<u64, BackendError>;

    /// Whether at least one record matches `query`
    async fn exists(&self, query: &RelationQuery) -> Result<bool, BackendError> {
        Ok(self.count(query).await? > 0)
    }
}

/// Backend that executes nothing
///
/// Fetches are empty, counts are zero and every reference is assumed to
/// exist, so relationship validation never fails on it.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullBackend;

#[async_trait]
impl RelationshipBackend for NullBackend {
    async fn fetch(&self, query: &RelationQuery) -> Result<Vec<Value>, BackendError> {
        tracing::trace!("NullBackend fetch on '{}'", query.resource);
        Ok(Vec::new())
    }

    async fn count(&self, _query: &RelationQuery) -> Result<u64, BackendError> {
        Ok(0)
    }

    async fn exists(&self, _query: &RelationQuery) -> Result<bool, BackendError> {
        Ok(true)
    }
}

/// In-memory backend keyed by resource slug and pivot table name
#[derive(Debug, Default)]
pub struct MemoryBackend {
    tables: RwLock<HashMap<String, Vec<Value>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append rows to a resource or pivot table
    pub fn with_rows(self, table: impl Into<String>, rows: Vec<Value>) -> Self {
        self.insert(table, rows);
        self
    }

    pub fn insert(&self, table: impl Into<String>, rows: Vec<Value>) {
        self.tables.write().entry(table.into()).or_default().extend(rows);
    }

    fn rows(&self, table: &str) -> Vec<Value> {
        self.tables.read().get(table).cloned().unwrap_or_default()
    }

    fn matching(&self, query: &RelationQuery) -> Result<Vec<Value>, BackendError> {
        let mut rows: Vec<Value> = self
            .rows(&query.resource)
            .into_iter()
            .filter(|row| query.matches(row))
            .collect();

        if let Some(pivot) = &query.pivot {
            let related_ids: Vec<Value> = self
                .rows(&pivot.table)
                .into_iter()
                .filter(|link| {
                    resolve(link, &pivot.parent_column)
                        .is_some_and(|value| same_key(&value, &pivot.parent_value))
                        && pivot.constraints.iter().all(|constraint| constraint.matches(link))
                })
                .filter_map(|link| resolve(&link, &pivot.related_column))
                .collect();

            rows.retain(|row| {
                resolve(row, &pivot.related_key)
                    .is_some_and(|key| related_ids.iter().any(|id| same_key(id, &key)))
            });
        }

        rows.sort_by(|a, b| query.compare(a, b));
        Ok(rows)
    }
}

fn same_key(a: &Value, b: &Value) -> bool {
    super::query::ConstraintOperator::Equal.matches(a, b)
}

#[async_trait]
impl RelationshipBackend for MemoryBackend {
    async fn fetch(&self, query: &RelationQuery) -> Result<Vec<Value>, BackendError> {
        let mut rows = self.matching(query)?;
        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }
        tracing::debug!("Fetched {} rows from '{}'", rows.len(), query.resource);
        Ok(rows)
    }

    async fn count(&self, query: &RelationQuery) -> Result<u64, BackendError> {
        Ok(self.matching(query)?.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relationships::query::{PivotJoin, SortDirection};
    use serde_json::json;

    fn backend() -> MemoryBackend {
        MemoryBackend::new()
            .with_rows(
                "tags",
                vec![
                    json!({ "id": 1, "name": "rust" }),
                    json!({ "id": 2, "name": "go" }),
                    json!({ "id": 3, "name": "zig" }),
                ],
            )
            .with_rows(
                "post_tag",
                vec![
                    json!({ "post_id": 10, "tag_id": 1 }),
                    json!({ "post_id": 10, "tag_id": 3 }),
                    json!({ "post_id": 11, "tag_id": 2 }),
                ],
            )
    }

    #[tokio::test]
    async fn test_null_backend() {
        let query = RelationQuery::new("authors");
        assert!(NullBackend.fetch(&query).await.unwrap().is_empty());
        assert_eq!(NullBackend.count(&query).await.unwrap(), 0);
        assert!(NullBackend.exists(&query).await.unwrap());
    }

    #[tokio::test]
    async fn test_memory_backend_filters_and_orders() {
        let backend = backend();
        let query = RelationQuery::new("tags")
            .filter("id", crate::relationships::ConstraintOperator::GreaterThan, 1)
            .order_by("name", SortDirection::Desc);

        let rows = backend.fetch(&query).await.unwrap();
        assert_eq!(rows, vec![json!({ "id": 3, "name": "zig" }), json!({ "id": 2, "name": "go" })]);
        assert_eq!(backend.count(&query.clone().limit(1)).await.unwrap(), 2);
        assert_eq!(backend.fetch(&query.limit(1)).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_memory_backend_pivot() {
        let query = RelationQuery::new("tags").through(PivotJoin {
            table: "post_tag".into(),
            parent_column: "post_id".into(),
            related_column: "tag_id".into(),
            related_key: "id".into(),
            parent_value: json!(10),
            constraints: Vec::new(),
        });

        let rows = backend().fetch(&query).await.unwrap();
        let names: Vec<_> = rows.iter().map(|row| row["name"].clone()).collect();
        assert_eq!(names, vec![json!("rust"), json!("zig")]);
    }

    #[tokio::test]
    async fn test_rows_survive_a_panicking_writer() {
        let backend = std::sync::Arc::new(backend());

        let writer = std::sync::Arc::clone(&backend);
        let outcome = std::thread::spawn(move || {
            let _tables = writer.tables.write();
            panic!("writer failed mid-update");
        })
        .join();
        assert!(outcome.is_err());

        backend.insert("tags", vec![json!({ "id": 4, "name": "nim" })]);
        let rows = backend.fetch(&RelationQuery::new("tags").where_eq("id", 4)).await.unwrap();
        assert_eq!(rows, vec![json!({ "id": 4, "name": "nim" })]);
    }

    #[tokio::test]
    async fn test_exists_defaults_to_count() {
        let backend = backend();
        assert!(backend.exists(&RelationQuery::new("tags").where_eq("id", "2")).await.unwrap());
        assert!(!backend.exists(&RelationQuery::new("tags").where_eq("id", 9)).await.unwrap());
    }
}
