//! Polymorphic many-to-many relationship through a pivot table

use super::belongs_to_many::{pivot_props, pivot_query};
use super::config::{MorphConfig, PivotTable, RelationshipConfig};
use super::kind::RelationshipKind;
use super::morph_to::morph_props;
use super::query::{Constraint, ConstraintOperator, RelationQuery};
use super::resource::RelatedResource;
use super::serialize_relationship;
use crate::error::RelationshipError;
use crate::field::{Field, FieldBuilder, FieldKind};
use crate::record::Record;
use serde_json::Value;

/// `posts <- taggables (taggable_type, taggable_id) -> tags`
#[derive(Debug, Clone)]
pub struct MorphToMany {
    pub(crate) field: Field,
    pub(crate) config: RelationshipConfig,
    pub(crate) morph: MorphConfig,
    pub(crate) pivot: Option<PivotTable>,
    pub(crate) pivot_fields: Vec<Field>,
}

relationship_variant!(MorphToMany, MorphToMany);

impl MorphToMany {
    /// `morph_name` names the pivot's morph columns (`taggable` ->
    /// `taggable_type`, `taggable_id`)
    pub fn new(
        name: impl Into<String>,
        key: impl Into<String>,
        related: impl Into<RelatedResource>,
        morph_name: &str,
    ) -> Self {
        let morph = MorphConfig::new(morph_name);
        Self {
            field: Field::new(FieldKind::Relationship(RelationshipKind::MorphToMany), name, key),
            config: RelationshipConfig::new(related, morph.id_column.as_str()),
            morph,
            pivot: None,
            pivot_fields: Vec::new(),
        }
    }

    pub fn morph_type(mut self, discriminator: impl Into<String>, resource: impl Into<String>) -> Self {
        self.morph.register(discriminator, resource);
        self
    }

    pub fn types<I, D, R>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = (D, R)>,
        D: Into<String>,
        R: Into<String>,
    {
        for (discriminator, resource) in types {
            self.morph.register(discriminator, resource);
        }
        self
    }

    pub fn through(mut self, pivot: PivotTable) -> Self {
        self.config.foreign_key = pivot.foreign_pivot_key.clone();
        self.pivot = Some(pivot);
        self
    }

    pub fn pivot_fields(mut self, fields: Vec<Field>) -> Self {
        self.pivot_fields = fields.into_iter().map(FieldBuilder::pivot).collect();
        self
    }

    pub fn morph(&self) -> &MorphConfig {
        &self.morph
    }

    pub fn pivot_table(&self) -> Option<&PivotTable> {
        self.pivot.as_ref()
    }

    pub fn validate_types(&self) -> Result<(), RelationshipError> {
        self.morph.validate_types(self.field.key(), RelationshipKind::MorphToMany)
    }

    pub fn extract(&mut self, record: &dyn Record) {
        self.field.extract(record);
    }

    /// Related records linked through pivot rows of a registered type
    pub fn query_for(&self, parent: &dyn Record) -> Result<Option<RelationQuery>, RelationshipError> {
        self.validate_types()?;

        let discriminators = self
            .morph
            .discriminators()
            .into_iter()
            .map(Value::String)
            .collect::<Vec<_>>();

        pivot_query(
            &self.field,
            &self.config,
            self.pivot.as_ref(),
            RelationshipKind::MorphToMany,
            parent,
            vec![Constraint::new(
                self.morph.type_column.as_str(),
                ConstraintOperator::In,
                Value::Array(discriminators),
            )],
        )
    }

    pub fn json_serialize(&self) -> Value {
        let mut extra = morph_props(&self.morph);
        extra.extend(pivot_props(self.pivot.as_ref(), &self.pivot_fields));
        serialize_relationship(&self.field, &self.config, RelationshipKind::MorphToMany, extra)
    }
}
