//! Optional configuration blocks owned by specific field kinds

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::Field;

/// Upload constraints for file and image fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttachmentConstraints {
    /// Accepted MIME types, `image/*` style wildcards allowed
    #[serde(default)]
    pub accepted_types: Vec<String>,
    /// Maximum size in bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disk: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,
    #[serde(default)]
    pub multiple: bool,
}

impl AttachmentConstraints {
    /// An empty accept list accepts everything
    pub fn accepts(&self, mime: &str) -> bool {
        if self.accepted_types.is_empty() {
            return true;
        }

        self.accepted_types.iter().any(|accepted| {
            match accepted.strip_suffix("/*") {
                Some(family) => mime
                    .split_once('/')
                    .is_some_and(|(prefix, _)| prefix.eq_ignore_ascii_case(family)),
                None => accepted.eq_ignore_ascii_case(mime),
            }
        })
    }

    pub fn within_size(&self, bytes: u64) -> bool {
        self.max_size.map_or(true, |max| bytes <= max)
    }
}

/// Item count bounds for repeater fields
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepeaterBounds {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<usize>,
}

impl RepeaterBounds {
    pub fn allows(&self, count: usize) -> bool {
        self.min_items.map_or(true, |min| count >= min) && self.max_items.map_or(true, |max| count <= max)
    }
}

/// Rich text, markdown and code editor settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditorSettings {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub toolbar: Vec<String>,
    /// Editor height in pixels
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Syntax highlighting language for code editors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default)]
    pub allow_uploads: bool,
}

/// Value to color mapping for badge and status fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BadgeMapping {
    pub colors: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    pub default_color: String,
}

impl Default for BadgeMapping {
    fn default() -> Self {
        Self {
            colors: BTreeMap::new(),
            labels: BTreeMap::new(),
            default_color: "gray".to_string(),
        }
    }
}

impl BadgeMapping {
    pub fn color_for(&self, value: &Value) -> &str {
        self.colors
            .get(&badge_key(value))
            .map(String::as_str)
            .unwrap_or(&self.default_color)
    }

    /// Mapped label, falling back to the value itself
    pub fn label_for(&self, value: &Value) -> String {
        let key = badge_key(value);
        self.labels.get(&key).cloned().unwrap_or(key)
    }
}

fn badge_key(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Where type-ahead suggestions come from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", content = "value", rename_all = "snake_case")]
pub enum SuggestionSource {
    /// Fixed list shipped with the descriptor
    Static(Vec<Value>),
    /// Endpoint the frontend queries as the user types
    Endpoint(String),
}

/// One choice of a select, radio or checkbox-list field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: Value,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<Value>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

impl<V: Into<Value>, L: Into<String>> From<(V, L)> for SelectOption {
    fn from((value, label): (V, L)) -> Self {
        Self::new(value, label)
    }
}

/// A titled group of fields rendered as one wizard step
#[derive(Debug, Clone)]
pub struct WizardStep {
    pub title: String,
    pub fields: Vec<Field>,
}

impl WizardStep {
    pub fn new(title: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            title: title.into(),
            fields,
        }
    }
}

/// Kind-specific configuration carried by a descriptor
///
/// Only the blocks a kind needs are populated.
#[derive(Debug, Clone, Default)]
pub struct Extensions {
    pub attachment: Option<AttachmentConstraints>,
    pub repeater: Option<RepeaterBounds>,
    pub editor: Option<EditorSettings>,
    pub badge: Option<BadgeMapping>,
    pub suggestions: Option<SuggestionSource>,
    pub options: Vec<SelectOption>,
    /// Nested fields of dialogs and repeaters
    pub children: Vec<Field>,
    pub steps: Vec<WizardStep>,
    /// Marks a field stored on a many-to-many pivot row
    pub pivot: bool,
}
