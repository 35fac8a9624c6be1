//! Many-to-many relationship through a pivot table

use super::config::{PivotTable, RelationshipConfig};
use super::kind::RelationshipKind;
use super::query::{PivotJoin, RelationQuery};
use super::resource::RelatedResource;
use super::{parent_key, serialize_relationship};
use crate::error::RelationshipError;
use crate::field::{Field, FieldBuilder, FieldKind};
use crate::record::Record;
use serde_json::{json, Value};

/// `posts <- post_tag -> tags`
#[derive(Debug, Clone)]
pub struct BelongsToMany {
    pub(crate) field: Field,
    pub(crate) config: RelationshipConfig,
    pub(crate) pivot: Option<PivotTable>,
    pub(crate) pivot_fields: Vec<Field>,
}

relationship_variant!(BelongsToMany, BelongsToMany);

impl BelongsToMany {
    pub fn new(name: impl Into<String>, key: impl Into<String>, related: impl Into<RelatedResource>) -> Self {
        Self {
            field: Field::new(FieldKind::Relationship(RelationshipKind::BelongsToMany), name, key),
            config: RelationshipConfig::new(related, ""),
            pivot: None,
            pivot_fields: Vec::new(),
        }
    }

    /// Declare the pivot table; its parent column doubles as the foreign key
    pub fn through(mut self, pivot: PivotTable) -> Self {
        self.config.foreign_key = pivot.foreign_pivot_key.clone();
        self.pivot = Some(pivot);
        self
    }

    /// Editable columns of the pivot row, each marked as a pivot field
    pub fn pivot_fields(mut self, fields: Vec<Field>) -> Self {
        self.pivot_fields = fields.into_iter().map(FieldBuilder::pivot).collect();
        self
    }

    pub fn pivot_table(&self) -> Option<&PivotTable> {
        self.pivot.as_ref()
    }

    pub fn pivot_field_list(&self) -> &[Field] {
        &self.pivot_fields
    }

    pub fn extract(&mut self, record: &dyn Record) {
        self.field.extract(record);
    }

    /// Related records linked to the parent through the pivot table
    pub fn query_for(&self, parent: &dyn Record) -> Result<Option<RelationQuery>, RelationshipError> {
        pivot_query(
            &self.field,
            &self.config,
            self.pivot.as_ref(),
            RelationshipKind::BelongsToMany,
            parent,
            Vec::new(),
        )
    }

    pub fn json_serialize(&self) -> Value {
        serialize_relationship(
            &self.field,
            &self.config,
            RelationshipKind::BelongsToMany,
            pivot_props(self.pivot.as_ref(), &self.pivot_fields),
        )
    }
}

pub(crate) fn require_pivot<'p>(
    field: &Field,
    pivot: Option<&'p PivotTable>,
    kind: RelationshipKind,
) -> Result<&'p PivotTable, RelationshipError> {
    let pivot = pivot.ok_or_else(|| {
        RelationshipError::new(
            field.key(),
            kind,
            format!("{} requires a pivot table", field.key()),
            json!({ "pivot": null }),
        )
    })?;
    pivot.validate(field.key(), kind)?;
    Ok(pivot)
}

pub(crate) fn pivot_query(
    field: &Field,
    config: &RelationshipConfig,
    pivot: Option<&PivotTable>,
    kind: RelationshipKind,
    parent: &dyn Record,
    pivot_constraints: Vec<super::query::Constraint>,
) -> Result<Option<RelationQuery>, RelationshipError> {
    let pivot = require_pivot(field, pivot, kind)?;

    let Some(owner) = parent_key(parent, config.owner_key()) else {
        return Ok(None);
    };

    let query = RelationQuery::new(config.related_slug()).through(PivotJoin {
        table: pivot.table.clone(),
        parent_column: pivot.foreign_pivot_key.clone(),
        related_column: pivot.related_pivot_key.clone(),
        related_key: config.owner_key().to_string(),
        parent_value: owner,
        constraints: pivot_constraints,
    });
    Ok(Some(config.apply_query(query)))
}

pub(crate) fn pivot_props(pivot: Option<&PivotTable>, fields: &[Field]) -> Vec<(&'static str, Value)> {
    let mut props = Vec::new();
    if let Some(pivot) = pivot {
        props.push(("pivot_table", Value::from(pivot.table.as_str())));
        props.push(("foreign_pivot_key", Value::from(pivot.foreign_pivot_key.as_str())));
        props.push(("related_pivot_key", Value::from(pivot.related_pivot_key.as_str())));
    }
    props.push((
        "pivot_fields",
        Value::Array(fields.iter().map(Field::json_serialize).collect()),
    ));
    props
}
