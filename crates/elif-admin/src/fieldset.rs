//! Ordered collections of fields and relationships
//!
//! A [`FieldSet`] is what a resource hands to the admin frontend: it filters
//! its elements by context and record, serializes one record into the
//! payload array and validates submitted request data.

use crate::config::AdminConfig;
use crate::field::{Field, FieldBuilder, VisibilityContext};
use crate::record::{resolve, Record};
use crate::relationships::Relationship;
use elif_admin_validation::{ValidationErrors, ValidationResult};
use serde_json::Value;

/// One entry of a field set
#[derive(Debug, Clone)]
pub enum Element {
    Field(Field),
    Relationship(Relationship),
}

impl Element {
    /// The base descriptor, for relationships too
    pub fn field(&self) -> &Field {
        match self {
            Self::Field(field) => field,
            Self::Relationship(relationship) => relationship.field(),
        }
    }

    pub fn key(&self) -> &str {
        self.field().key()
    }

    pub fn as_relationship(&self) -> Option<&Relationship> {
        match self {
            Self::Relationship(relationship) => Some(relationship),
            Self::Field(_) => None,
        }
    }

    pub fn is_visible_for(&self, context: VisibilityContext, record: &dyn Record) -> bool {
        self.field().is_visible_for(context, record)
    }

    pub fn extract(&mut self, record: &dyn Record) {
        match self {
            Self::Field(field) => field.extract(record),
            Self::Relationship(relationship) => relationship.extract(record),
        }
    }

    pub fn json_serialize(&self) -> Value {
        match self {
            Self::Field(field) => field.json_serialize(),
            Self::Relationship(relationship) => relationship.json_serialize(),
        }
    }

    fn field_mut(&mut self) -> &mut Field {
        match self {
            Self::Field(field) => field,
            Self::Relationship(relationship) => relationship.field_mut(),
        }
    }
}

impl From<Field> for Element {
    fn from(field: Field) -> Self {
        Self::Field(field)
    }
}

impl From<Relationship> for Element {
    fn from(relationship: Relationship) -> Self {
        Self::Relationship(relationship)
    }
}

macro_rules! element_from_relationship {
    ($($ty:ident),*) => {
        $(
            impl From<crate::relationships::$ty> for Element {
                fn from(relationship: crate::relationships::$ty) -> Self {
                    Self::Relationship(relationship.into())
                }
            }
        )*
    };
}

element_from_relationship!(BelongsTo, HasMany, HasOne, BelongsToMany, MorphTo, MorphToMany);

/// Elements in declaration order
#[derive(Debug, Clone, Default)]
pub struct FieldSet {
    elements: Vec<Element>,
}

impl FieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, element: impl Into<Element>) -> Self {
        self.elements.push(element.into());
        self
    }

    /// Fill in configured defaults the elements left unset
    ///
    /// Attachment fields get the upload size and disk, relationships the
    /// loading strategy and the search threshold.
    pub fn with_config(mut self, config: &AdminConfig) -> Self {
        for element in &mut self.elements {
            let field = element.field_mut();
            if field.kind().is_attachment() {
                let attachment = field.extensions.attachment.get_or_insert_with(Default::default);
                attachment.max_size.get_or_insert(config.max_upload_size());
                attachment
                    .disk
                    .get_or_insert_with(|| config.default_disk().to_string());
            }

            if let Element::Relationship(relationship) = element {
                let relationship = relationship.config_mut();
                relationship.loading.get_or_insert(config.default_loading());
                relationship
                    .search_min_chars
                    .get_or_insert(config.search_min_chars());
            }
        }
        self
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Plain fields, relationships excluded
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.elements.iter().filter_map(|element| match element {
            Element::Field(field) => Some(field),
            Element::Relationship(_) => None,
        })
    }

    pub fn relationships(&self) -> impl Iterator<Item = &Relationship> {
        self.elements.iter().filter_map(Element::as_relationship)
    }

    pub fn get(&self, key: &str) -> Option<&Element> {
        self.elements.iter().find(|element| element.key() == key)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Elements shown for `record` in `context`
    pub fn visible<'a>(
        &'a self,
        context: VisibilityContext,
        record: &'a dyn Record,
    ) -> impl Iterator<Item = &'a Element> + 'a {
        self.elements
            .iter()
            .filter(move |element| element.is_visible_for(context, record))
    }

    /// Serialize `record` as the payload array for `context`
    ///
    /// Each visible element is copied, populated from the record and
    /// serialized; dependency overrides are reflected in `required` and
    /// `read_only`. The set itself is left untouched.
    pub fn serialize_record(&self, context: VisibilityContext, record: &dyn Record) -> Value {
        let payload = self
            .visible(context, record)
            .map(|element| {
                let state = element.field().dependency_state(record);
                let mut element = element.clone();
                element.extract(record);

                let mut json = element.json_serialize();
                if let Value::Object(entry) = &mut json {
                    entry.insert("required".into(), Value::Bool(state.required));
                    entry.insert("read_only".into(), Value::Bool(state.read_only));
                }
                json
            })
            .collect::<Vec<_>>();

        tracing::trace!(
            "Serialized {} of {} elements for {:?}",
            payload.len(),
            self.elements.len(),
            context
        );
        Value::Array(payload)
    }

    /// Run the rules of every field a form would submit over `data`
    ///
    /// Fields visible in neither form context, hidden by the payload itself
    /// or read-only after dependencies are skipped. Dependencies that require
    /// a field attach the `required` rule for this pass.
    pub fn validate(&self, data: &Value) -> ValidationResult<()> {
        let mut errors = ValidationErrors::new();

        for element in &self.elements {
            let field = element.field();
            let submitted = [VisibilityContext::Create, VisibilityContext::Update]
                .into_iter()
                .any(|context| field.is_visible_for(context, data));
            if !submitted {
                continue;
            }

            let state = field.dependency_state(data);
            if state.read_only {
                continue;
            }

            let value = resolve(data, field.key()).unwrap_or(Value::Null);
            let result = if state.required && !field.is_required() {
                field.clone().required().validate(&value)
            } else {
                field.validate(&value)
            };

            if let Err(field_errors) = result {
                errors.merge(field_errors);
            }
        }

        if !errors.is_empty() {
            tracing::debug!("Request data failed validation with {} errors", errors.total_errors());
        }
        errors.into_result()
    }
}
