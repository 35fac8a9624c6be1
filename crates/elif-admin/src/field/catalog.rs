//! The field-type catalog

use super::extensions::{
    AttachmentConstraints, BadgeMapping, EditorSettings, RepeaterBounds, SelectOption,
    SuggestionSource, WizardStep,
};
use super::{DataType, Field};
use crate::relationships::RelationshipKind;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Every kind of field the admin layer can render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Textarea,
    Number,
    Password,
    Email,
    Url,
    Tel,
    Color,
    Hidden,
    Slug,
    Boolean,
    Switch,
    Select,
    Radio,
    CheckboxList,
    Date,
    DateTime,
    Time,
    File,
    Image,
    RichText,
    Markdown,
    Code,
    KeyValue,
    Tags,
    Repeater,
    Badge,
    Dialog,
    Wizard,
    Relationship(RelationshipKind),
}

impl FieldKind {
    /// Frontend component tag rendering this kind
    pub fn view_component(self) -> &'static str {
        match self {
            Self::Text => "text-field",
            Self::Textarea => "textarea-field",
            Self::Number => "number-field",
            Self::Password => "password-field",
            Self::Email => "email-field",
            Self::Url => "url-field",
            Self::Tel => "tel-field",
            Self::Color => "color-field",
            Self::Hidden => "hidden-field",
            Self::Slug => "slug-field",
            Self::Boolean => "boolean-field",
            Self::Switch => "switch-field",
            Self::Select => "select-field",
            Self::Radio => "radio-field",
            Self::CheckboxList => "checkbox-list-field",
            Self::Date => "date-field",
            Self::DateTime => "datetime-field",
            Self::Time => "time-field",
            Self::File => "file-field",
            Self::Image => "image-field",
            Self::RichText => "rich-text-field",
            Self::Markdown => "markdown-field",
            Self::Code => "code-field",
            Self::KeyValue => "key-value-field",
            Self::Tags => "tags-field",
            Self::Repeater => "repeater-field",
            Self::Badge => "badge-field",
            Self::Dialog => "dialog-field",
            Self::Wizard => "wizard-field",
            Self::Relationship(kind) => match kind {
                RelationshipKind::BelongsTo => "belongs-to-field",
                RelationshipKind::HasMany => "has-many-field",
                RelationshipKind::HasOne => "has-one-field",
                RelationshipKind::BelongsToMany => "belongs-to-many-field",
                RelationshipKind::MorphTo => "morph-to-field",
                RelationshipKind::MorphToMany => "morph-to-many-field",
            },
        }
    }

    pub fn data_type(self) -> DataType {
        match self {
            Self::Text
            | Self::Password
            | Self::Email
            | Self::Url
            | Self::Tel
            | Self::Color
            | Self::Hidden
            | Self::Slug
            | Self::Select
            | Self::Radio
            | Self::Badge => DataType::String,
            Self::Textarea | Self::RichText | Self::Markdown | Self::Code => DataType::Text,
            Self::Number => DataType::Number,
            Self::Boolean | Self::Switch => DataType::Boolean,
            Self::Date => DataType::Date,
            Self::DateTime => DataType::DateTime,
            Self::Time => DataType::Time,
            Self::File | Self::Image => DataType::File,
            Self::KeyValue | Self::Dialog | Self::Wizard => DataType::Json,
            Self::CheckboxList | Self::Tags | Self::Repeater => DataType::Array,
            Self::Relationship(kind) => kind.into(),
        }
    }

    pub fn is_attachment(self) -> bool {
        matches!(self, Self::File | Self::Image)
    }

    pub fn is_editor(self) -> bool {
        matches!(self, Self::RichText | Self::Markdown | Self::Code)
    }

    pub fn has_options(self) -> bool {
        matches!(self, Self::Select | Self::Radio | Self::CheckboxList)
    }
}

macro_rules! catalog {
    ($($(#[$doc:meta])* $ctor:ident => $kind:ident),* $(,)?) => {
        impl Field {
            $(
                $(#[$doc])*
                pub fn $ctor(name: impl Into<String>, key: impl Into<String>) -> Self {
                    Self::new(FieldKind::$kind, name, key)
                }
            )*
        }
    };
}

catalog! {
    text => Text,
    textarea => Textarea,
    number => Number,
    password => Password,
    email => Email,
    url => Url,
    tel => Tel,
    color => Color,
    hidden => Hidden,
    /// Slug derived from another field on the frontend
    slug => Slug,
    boolean => Boolean,
    switch => Switch,
    select => Select,
    radio => Radio,
    checkbox_list => CheckboxList,
    date => Date,
    datetime => DateTime,
    time => Time,
    file => File,
    image => Image,
    rich_text => RichText,
    markdown => Markdown,
    code => Code,
    key_value => KeyValue,
    tags => Tags,
    /// Repeated group of nested fields stored as an array of objects
    repeater => Repeater,
    /// Colored status label
    badge => Badge,
    /// Nested fields edited in a modal dialog
    dialog => Dialog,
    /// Nested fields split into sequential steps
    wizard => Wizard,
}

// Kind-specific setters. They are accepted on any kind and only
// serialized for the kinds that own the block.
impl Field {
    /// Choices of a select, radio or checkbox-list field
    pub fn options<I, O>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = O>,
        O: Into<SelectOption>,
    {
        self.extensions.options = options.into_iter().map(Into::into).collect();
        self
    }

    pub fn accepted_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attachment_mut().accepted_types = types.into_iter().map(Into::into).collect();
        self
    }

    /// Maximum upload size in bytes
    pub fn max_size(mut self, bytes: u64) -> Self {
        self.attachment_mut().max_size = Some(bytes);
        self
    }

    pub fn disk(mut self, disk: impl Into<String>) -> Self {
        self.attachment_mut().disk = Some(disk.into());
        self
    }

    pub fn directory(mut self, directory: impl Into<String>) -> Self {
        self.attachment_mut().directory = Some(directory.into());
        self
    }

    pub fn multiple(mut self) -> Self {
        self.attachment_mut().multiple = true;
        self
    }

    pub fn min_items(mut self, count: usize) -> Self {
        self.extensions.repeater.get_or_insert_with(RepeaterBounds::default).min_items = Some(count);
        self
    }

    pub fn max_items(mut self, count: usize) -> Self {
        self.extensions.repeater.get_or_insert_with(RepeaterBounds::default).max_items = Some(count);
        self
    }

    pub fn toolbar<I, S>(mut self, buttons: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.editor_mut().toolbar = buttons.into_iter().map(Into::into).collect();
        self
    }

    pub fn editor_height(mut self, pixels: u32) -> Self {
        self.editor_mut().height = Some(pixels);
        self
    }

    /// Syntax highlighting language of a code field
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.editor_mut().language = Some(language.into());
        self
    }

    pub fn allow_uploads(mut self) -> Self {
        self.editor_mut().allow_uploads = true;
        self
    }

    pub fn badge_color(mut self, value: impl Into<String>, color: impl Into<String>) -> Self {
        self.badge_mut().colors.insert(value.into(), color.into());
        self
    }

    pub fn badge_label(mut self, value: impl Into<String>, label: impl Into<String>) -> Self {
        self.badge_mut().labels.insert(value.into(), label.into());
        self
    }

    pub fn default_badge_color(mut self, color: impl Into<String>) -> Self {
        self.badge_mut().default_color = color.into();
        self
    }

    /// Static type-ahead suggestions
    pub fn suggestions<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.extensions.suggestions = Some(SuggestionSource::Static(values.into_iter().map(Into::into).collect()));
        self
    }

    /// Suggestions fetched from `endpoint` as the user types
    pub fn suggestions_from(mut self, endpoint: impl Into<String>) -> Self {
        self.extensions.suggestions = Some(SuggestionSource::Endpoint(endpoint.into()));
        self
    }

    /// Nested fields of a dialog or repeater
    pub fn fields(mut self, fields: Vec<Field>) -> Self {
        self.extensions.children = fields;
        self
    }

    pub fn step(mut self, title: impl Into<String>, fields: Vec<Field>) -> Self {
        self.extensions.steps.push(WizardStep::new(title, fields));
        self
    }

    fn attachment_mut(&mut self) -> &mut AttachmentConstraints {
        self.extensions.attachment.get_or_insert_with(AttachmentConstraints::default)
    }

    fn editor_mut(&mut self) -> &mut EditorSettings {
        self.extensions.editor.get_or_insert_with(EditorSettings::default)
    }

    fn badge_mut(&mut self) -> &mut BadgeMapping {
        self.extensions.badge.get_or_insert_with(BadgeMapping::default)
    }
}
