//! Counting related records

use super::backend::RelationshipBackend;
use super::Relationship;
use crate::error::AdminResult;
use crate::record::Record;

/// Counts related records through the backend
pub struct RelationshipCounting<'a> {
    backend: &'a dyn RelationshipBackend,
}

impl<'a> RelationshipCounting<'a> {
    pub fn new(backend: &'a dyn RelationshipBackend) -> Self {
        Self { backend }
    }

    /// Number of records related to `parent`
    ///
    /// Singular relationships count at most one.
    pub async fn count(&self, relationship: &Relationship, parent: &(dyn Record + Sync)) -> AdminResult<u64> {
        let Some(mut query) = relationship.query_for(parent)? else {
            return Ok(0);
        };
        query.limit = None;

        let count = self.backend.count(&query).await.map_err(|err| {
            tracing::warn!("Counting '{}' failed: {}", query.resource, err);
            err
        })?;
        tracing::trace!("Counted {} records for '{}'", count, relationship.field().key());

        Ok(match relationship {
            Relationship::BelongsTo(_) | Relationship::HasOne(_) | Relationship::MorphTo(_) => count.min(1),
            Relationship::HasMany(_) | Relationship::BelongsToMany(_) | Relationship::MorphToMany(_) => count,
        })
    }
}
