//! Validating submitted relationship values

use super::backend::RelationshipBackend;
use super::kind::RelationshipKind;
use super::query::RelationQuery;
use super::Relationship;
use crate::error::{AdminResult, RelationshipError};
use serde_json::Value;

/// Checks relationship values against their preconditions and the backend
pub struct RelationshipValidator<'a> {
    backend: &'a dyn RelationshipBackend,
}

impl<'a> RelationshipValidator<'a> {
    pub fn new(backend: &'a dyn RelationshipBackend) -> Self {
        Self { backend }
    }

    /// Validate a submitted `value` for `relationship`
    ///
    /// - belongs-to: a required blank value is a missing value; a present
    ///   value must reference an existing related record
    /// - morph-to: types must be registered and a submitted `{type, id}`
    ///   must use a known discriminator
    /// - morph-to-many: types must be registered
    /// - the remaining kinds accept any value
    pub async fn validate(&self, relationship: &Relationship, value: &Value) -> AdminResult<()> {
        match relationship {
            Relationship::BelongsTo(r) => {
                let field = &r.field;
                let config = &r.config;

                if is_blank(value) {
                    if field.is_required() {
                        return Err(RelationshipError::missing_value(
                            field.key(),
                            RelationshipKind::BelongsTo,
                            config.related_slug(),
                        )
                        .into());
                    }
                    return Ok(());
                }

                let query = config.apply_query(
                    RelationQuery::new(config.related_slug())
                        .where_eq(config.owner_key(), value.clone())
                        .limit(1),
                );
                let exists = self.backend.exists(&query).await.map_err(|err| {
                    tracing::warn!("Existence check on '{}' failed: {}", query.resource, err);
                    err
                })?;
                if !exists {
                    tracing::debug!(
                        "'{}' references missing {} record {}",
                        field.key(),
                        config.related_slug(),
                        value
                    );
                    return Err(RelationshipError::related_not_found(
                        field.key(),
                        RelationshipKind::BelongsTo,
                        config.related_slug(),
                        value,
                    )
                    .into());
                }
                Ok(())
            }
            Relationship::MorphTo(r) => {
                r.validate_types()?;
                if let Some(discriminator) = value.get("type").and_then(Value::as_str) {
                    r.morph
                        .resolve_type(r.field.key(), RelationshipKind::MorphTo, discriminator)?;
                }
                Ok(())
            }
            Relationship::MorphToMany(r) => Ok(r.validate_types()?),
            Relationship::HasMany(_) | Relationship::HasOne(_) | Relationship::BelongsToMany(_) => Ok(()),
        }
    }
}

fn is_blank(value: &Value) -> bool {
    matches!(value, Value::Null) || value.as_str().is_some_and(|s| s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AdminError;
    use crate::field::FieldBuilder;
    use crate::relationships::{BelongsTo, HasMany, MemoryBackend, MorphTo, MorphToMany, NullBackend};
    use serde_json::json;

    fn authors() -> MemoryBackend {
        MemoryBackend::new().with_rows("authors", vec![json!({ "id": 1 })])
    }

    #[tokio::test]
    async fn test_required_belongs_to_without_value() {
        let backend = authors();
        let validator = RelationshipValidator::new(&backend);
        let author: Relationship = BelongsTo::new("Author", "author_id", "authors").required().into();

        let err = validator.validate(&author, &Value::Null).await.unwrap_err();
        match err {
            AdminError::Relationship(err) => {
                assert_eq!(err.field, "author_id");
                assert_eq!(err.kind, RelationshipKind::BelongsTo);
                assert_eq!(err.context["resource"], "authors");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_optional_belongs_to_accepts_blank() {
        let backend = authors();
        let validator = RelationshipValidator::new(&backend);
        let author: Relationship = BelongsTo::new("Author", "author_id", "authors").into();
        assert!(validator.validate(&author, &json!("")).await.is_ok());
    }

    #[tokio::test]
    async fn test_belongs_to_checks_existence() {
        let backend = authors();
        let validator = RelationshipValidator::new(&backend);
        let author: Relationship = BelongsTo::new("Author", "author_id", "authors").into();

        assert!(validator.validate(&author, &json!(1)).await.is_ok());
        assert!(validator.validate(&author, &json!("1")).await.is_ok());

        let err = validator.validate(&author, &json!(2)).await.unwrap_err();
        assert!(matches!(err, AdminError::Relationship(ref e) if e.context["value"] == json!(2)));

        // The placeholder backend assumes every reference exists
        let validator = RelationshipValidator::new(&NullBackend);
        assert!(validator.validate(&author, &json!(2)).await.is_ok());
    }

    #[tokio::test]
    async fn test_morph_types_must_be_registered() {
        let validator = RelationshipValidator::new(&NullBackend);

        let empty: Relationship = MorphTo::new("Commentable", "commentable").into();
        assert!(validator.validate(&empty, &Value::Null).await.is_err());

        let commentable: Relationship = MorphTo::new("Commentable", "commentable").morph_type("post", "posts").into();
        assert!(validator.validate(&commentable, &json!({ "type": "post", "id": 1 })).await.is_ok());
        assert!(validator.validate(&commentable, &json!({ "type": "video", "id": 1 })).await.is_err());

        let empty_many: Relationship = MorphToMany::new("Tags", "tags", "tags", "taggable").into();
        assert!(validator.validate(&empty_many, &json!([])).await.is_err());
    }

    #[tokio::test]
    async fn test_collections_accept_anything() {
        let validator = RelationshipValidator::new(&NullBackend);
        let comments: Relationship = HasMany::new("Comments", "comments", "comments").required().into();
        assert!(validator.validate(&comments, &Value::Null).await.is_ok());
    }
}
