//! Field descriptors
//!
//! A [`Field`] describes how one attribute of a record is rendered,
//! validated and serialized for the frontend. Descriptors are configured
//! once through [`FieldBuilder`] and treated as read-only afterwards.

pub mod builder;
pub mod catalog;
pub mod context;
pub mod dependency;
pub mod extensions;
mod serialize;

pub use builder::FieldBuilder;
pub use catalog::FieldKind;
pub use context::{is_visible, ElementContext, VisibilityContext};
pub use dependency::{DependencyEffect, DependencyOperator, DependencyRule, DependencyState};
pub use extensions::{
    AttachmentConstraints, BadgeMapping, EditorSettings, Extensions, RepeaterBounds, SelectOption,
    SuggestionSource, WizardStep,
};

use crate::record::{resolve, Record};
use crate::relationships::RelationshipKind;
use convert_case::{Case, Casing};
use elif_admin_validation::{apply_all, ValidationResult, ValidationRule};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Transform applied to the extracted value before display
pub type DisplayCallback = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

/// Record-level visibility predicate
pub type VisibilityPredicate = Arc<dyn Fn(&dyn Record) -> bool + Send + Sync>;

/// Primitive or relationship data type of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    String,
    Text,
    Number,
    Boolean,
    Date,
    DateTime,
    Time,
    File,
    Json,
    Array,
    BelongsTo,
    HasMany,
    HasOne,
    BelongsToMany,
    MorphTo,
    MorphToMany,
}

impl DataType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Text => "text",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::DateTime => "date_time",
            Self::Time => "time",
            Self::File => "file",
            Self::Json => "json",
            Self::Array => "array",
            Self::BelongsTo => "belongs_to",
            Self::HasMany => "has_many",
            Self::HasOne => "has_one",
            Self::BelongsToMany => "belongs_to_many",
            Self::MorphTo => "morph_to",
            Self::MorphToMany => "morph_to_many",
        }
    }

    pub fn is_relationship(self) -> bool {
        matches!(
            self,
            Self::BelongsTo
                | Self::HasMany
                | Self::HasOne
                | Self::BelongsToMany
                | Self::MorphTo
                | Self::MorphToMany
        )
    }
}

impl From<RelationshipKind> for DataType {
    fn from(kind: RelationshipKind) -> Self {
        match kind {
            RelationshipKind::BelongsTo => Self::BelongsTo,
            RelationshipKind::HasMany => Self::HasMany,
            RelationshipKind::HasOne => Self::HasOne,
            RelationshipKind::BelongsToMany => Self::BelongsToMany,
            RelationshipKind::MorphTo => Self::MorphTo,
            RelationshipKind::MorphToMany => Self::MorphToMany,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl TextAlign {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }
}

/// Behavior flags of a descriptor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldFlags {
    pub read_only: bool,
    pub disabled: bool,
    /// Editable on create, read-only afterwards
    pub immutable: bool,
    pub required: bool,
    pub nullable: bool,
    pub filterable: bool,
    pub sortable: bool,
    /// Included in the global search
    pub searchable: bool,
    pub stacked: bool,
}

/// Metadata for one displayable and editable attribute
#[derive(Clone)]
pub struct Field {
    pub(crate) name: String,
    pub(crate) key: String,
    view: String,
    pub(crate) kind: FieldKind,
    pub(crate) data_type: DataType,
    pub(crate) context: Option<ElementContext>,
    pub(crate) visible_when: Option<VisibilityPredicate>,
    pub(crate) placeholder: String,
    pub(crate) label: String,
    pub(crate) help_text: String,
    pub(crate) flags: FieldFlags,
    pub(crate) text_align: TextAlign,
    pub(crate) props: Map<String, Value>,
    pub(crate) data: Value,
    pub(crate) rules: Vec<ValidationRule>,
    pub(crate) display: Option<DisplayCallback>,
    pub(crate) dependencies: Vec<DependencyRule>,
    pub(crate) extensions: Extensions,
}

impl Field {
    /// Create a descriptor of `kind`; the view component is fixed here
    ///
    /// An empty `key` is derived from `name` in snake case.
    pub fn new(kind: FieldKind, name: impl Into<String>, key: impl Into<String>) -> Self {
        Self::with_view(kind, kind.view_component(), name, key)
    }

    /// Create a descriptor rendered by a custom frontend component
    pub fn with_view(
        kind: FieldKind,
        view: impl Into<String>,
        name: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        let name = name.into();
        let mut key = key.into();
        if key.trim().is_empty() {
            key = name.to_case(Case::Snake);
        }
        if key.is_empty() {
            tracing::warn!("Field '{}' was created without a key", name);
        }

        Self {
            label: name.clone(),
            name,
            key,
            view: view.into(),
            kind,
            data_type: kind.data_type(),
            context: None,
            visible_when: None,
            placeholder: String::new(),
            help_text: String::new(),
            flags: FieldFlags::default(),
            text_align: TextAlign::default(),
            props: Map::new(),
            data: Value::Null,
            rules: Vec::new(),
            display: None,
            dependencies: Vec::new(),
            extensions: Extensions::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn view(&self) -> &str {
        &self.view
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// Stored context override, if any
    pub fn context_override(&self) -> Option<ElementContext> {
        self.context
    }

    pub fn flags(&self) -> FieldFlags {
        self.flags
    }

    pub fn is_required(&self) -> bool {
        self.flags.required
    }

    pub fn alignment(&self) -> TextAlign {
        self.text_align
    }

    pub fn display_label(&self) -> &str {
        &self.label
    }

    pub fn props(&self) -> &Map<String, Value> {
        &self.props
    }

    pub fn rules(&self) -> &[ValidationRule] {
        &self.rules
    }

    pub fn dependencies(&self) -> &[DependencyRule] {
        &self.dependencies
    }

    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    pub fn is_pivot(&self) -> bool {
        self.extensions.pivot
    }

    /// The current value slot
    pub fn data(&self) -> &Value {
        &self.data
    }

    pub(crate) fn set_data(&mut self, data: Value) {
        self.data = data;
    }

    pub fn has_display_callback(&self) -> bool {
        self.display.is_some()
    }

    /// Resolve this field's value on `record` without storing it
    ///
    /// Dialogs and wizards collect their nested fields into one object.
    pub fn resolve_value(&self, record: &dyn Record) -> Value {
        match self.kind {
            FieldKind::Dialog => collect_nested(self.extensions.children.iter(), record),
            FieldKind::Wizard => collect_nested(
                self.extensions.steps.iter().flat_map(|step| step.fields.iter()),
                record,
            ),
            _ => resolve(record, &self.key).unwrap_or(Value::Null),
        }
    }

    /// Store the value resolved on `record` in the current value slot
    ///
    /// The display callback is not consulted here.
    pub fn extract(&mut self, record: &dyn Record) {
        self.data = self.resolve_value(record);
    }

    /// The current value passed through the display callback
    pub fn display_value(&self) -> Value {
        match &self.display {
            Some(callback) => callback(&self.data),
            None => self.data.clone(),
        }
    }

    /// Run every attached rule over `value`, collecting failures
    ///
    /// A blank value on a non-required field passes without running rules.
    pub fn validate(&self, value: &Value) -> ValidationResult<()> {
        let blank = matches!(value, Value::Null) || value.as_str() == Some("");
        if blank && !self.flags.required {
            return Ok(());
        }
        apply_all(&self.rules, &self.key, value)
    }

    pub fn is_visible_in_context(&self, requested: VisibilityContext) -> bool {
        is_visible(self.context, requested)
    }

    /// Context table, record predicate and dependency rules combined
    pub fn is_visible_for(&self, requested: VisibilityContext, record: &dyn Record) -> bool {
        self.is_visible_in_context(requested)
            && self.visible_when.as_ref().map_or(true, |predicate| predicate(record))
            && self.dependency_state(record).visible
    }

    /// Fold the dependency rules over `record`
    pub fn dependency_state(&self, record: &dyn Record) -> DependencyState {
        DependencyState::fold(
            &self.dependencies,
            self.flags.required,
            self.flags.read_only,
            record,
        )
    }
}

fn collect_nested<'a>(fields: impl Iterator<Item = &'a Field>, record: &dyn Record) -> Value {
    let values = fields
        .map(|field| (field.key.clone(), field.resolve_value(record)))
        .collect::<Map<String, Value>>();
    Value::Object(values)
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("key", &self.key)
            .field("view", &self.view)
            .field("kind", &self.kind)
            .field("context", &self.context)
            .field("flags", &self.flags)
            .field("rules", &self.rules.len())
            .field("has_display_callback", &self.display.is_some())
            .field("has_visibility_predicate", &self.visible_when.is_some())
            .finish()
    }
}
