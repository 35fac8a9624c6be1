//! Frontend JSON contract of a descriptor

use super::{Field, FieldKind};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

impl Field {
    /// Serialize into the fixed frontend payload
    ///
    /// Keys are always `view`, `type`, `key`, `name`, `data`, `props`,
    /// `context`, `placeholder`, `label`, `help_text`, `read_only`,
    /// `disabled`, `required`, `nullable`, `sortable`, `filterable`,
    /// `stacked` and `text_align`. Kind-specific blocks are merged into
    /// `props`; other extension blocks are left out.
    pub fn json_serialize(&self) -> Value {
        let mut payload = Map::new();

        payload.insert("view".into(), Value::String(self.view().to_string()));
        payload.insert("type".into(), Value::String(self.data_type.as_str().to_string()));
        payload.insert("key".into(), Value::String(self.key.clone()));
        payload.insert("name".into(), Value::String(self.name.clone()));
        payload.insert("data".into(), self.data.clone());
        payload.insert("props".into(), Value::Object(self.merged_props()));
        payload.insert(
            "context".into(),
            self.context
                .map(|context| Value::String(context.as_str().to_string()))
                .unwrap_or(Value::Null),
        );
        payload.insert("placeholder".into(), Value::String(self.placeholder.clone()));
        payload.insert("label".into(), Value::String(self.label.clone()));
        payload.insert("help_text".into(), Value::String(self.help_text.clone()));
        payload.insert("read_only".into(), Value::Bool(self.flags.read_only));
        payload.insert("disabled".into(), Value::Bool(self.flags.disabled));
        payload.insert("required".into(), Value::Bool(self.flags.required));
        payload.insert("nullable".into(), Value::Bool(self.flags.nullable));
        payload.insert("sortable".into(), Value::Bool(self.flags.sortable));
        payload.insert("filterable".into(), Value::Bool(self.flags.filterable));
        payload.insert("stacked".into(), Value::Bool(self.flags.stacked));
        payload.insert("text_align".into(), Value::String(self.text_align.as_str().to_string()));

        Value::Object(payload)
    }

    /// User props plus the blocks owned by this kind
    ///
    /// User props win over generated entries with the same name.
    fn merged_props(&self) -> Map<String, Value> {
        let mut props = self.kind_props();
        for (key, value) in &self.props {
            props.insert(key.clone(), value.clone());
        }
        props
    }

    fn kind_props(&self) -> Map<String, Value> {
        let mut props = Map::new();
        let ext = &self.extensions;

        match self.kind {
            FieldKind::File | FieldKind::Image => {
                if let Some(attachment) = &ext.attachment {
                    extend(&mut props, to_object(attachment));
                }
            }
            FieldKind::Select | FieldKind::Radio | FieldKind::CheckboxList => {
                props.insert("options".into(), to_value(&ext.options));
            }
            FieldKind::RichText | FieldKind::Markdown | FieldKind::Code => {
                if let Some(editor) = &ext.editor {
                    props.insert("editor".into(), to_value(editor));
                }
            }
            FieldKind::Badge => {
                if let Some(badge) = &ext.badge {
                    extend(&mut props, to_object(badge));
                }
            }
            FieldKind::Repeater => {
                if let Some(bounds) = &ext.repeater {
                    extend(&mut props, to_object(bounds));
                }
                props.insert("fields".into(), serialize_all(&ext.children));
            }
            FieldKind::Dialog => {
                props.insert("fields".into(), serialize_all(&ext.children));
            }
            FieldKind::Wizard => {
                let steps = ext
                    .steps
                    .iter()
                    .map(|step| {
                        serde_json::json!({
                            "title": step.title,
                            "fields": serialize_all(&step.fields),
                        })
                    })
                    .collect();
                props.insert("steps".into(), Value::Array(steps));
            }
            FieldKind::Text | FieldKind::Tags | FieldKind::Email | FieldKind::Url => {
                if let Some(suggestions) = &ext.suggestions {
                    props.insert("suggestions".into(), to_value(suggestions));
                }
            }
            _ => {}
        }

        if ext.pivot {
            props.insert("pivot".into(), Value::Bool(true));
        }

        props
    }
}

impl Serialize for Field {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.json_serialize().serialize(serializer)
    }
}

fn serialize_all(fields: &[Field]) -> Value {
    Value::Array(fields.iter().map(Field::json_serialize).collect())
}

// Extension blocks are plain data, serializing them cannot fail
fn to_value<T: Serialize>(block: &T) -> Value {
    serde_json::to_value(block).unwrap_or(Value::Null)
}

fn to_object<T: Serialize>(block: &T) -> Map<String, Value> {
    match to_value(block) {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

fn extend(props: &mut Map<String, Value>, entries: Map<String, Value>) {
    for (key, value) in entries {
        props.insert(key, value);
    }
}

#[cfg(test)]
mod tests {
    use crate::field::{Field, FieldBuilder};
    use serde_json::json;

    const KEYS: [&str; 18] = [
        "view", "type", "key", "name", "data", "props", "context", "placeholder", "label",
        "help_text", "read_only", "disabled", "required", "nullable", "sortable", "filterable",
        "stacked", "text_align",
    ];

    #[test]
    fn test_fixed_key_set() {
        let json = Field::text("Title", "title").json_serialize();
        let object = json.as_object().unwrap();

        assert_eq!(object.len(), KEYS.len());
        for key in KEYS {
            assert!(object.contains_key(key), "missing key {}", key);
        }
        assert_eq!(json["view"], "text-field");
        assert_eq!(json["type"], "string");
        assert_eq!(json["context"], json!(null));
        assert_eq!(json["text_align"], "left");
    }

    #[test]
    fn test_serialization_is_idempotent() {
        let field = Field::select("Status", "status")
            .options([("draft", "Draft")])
            .required()
            .hide_on_list()
            .prop("clearable", true);

        assert_eq!(field.json_serialize(), field.json_serialize());
        assert_eq!(serde_json::to_value(&field).unwrap(), field.json_serialize());
    }

    #[test]
    fn test_extension_blocks_only_for_owning_kind() {
        let image = Field::image("Avatar", "avatar").max_size(1024).disk("public");
        let json = image.json_serialize();
        assert_eq!(json["props"]["max_size"], 1024);
        assert_eq!(json["props"]["disk"], "public");

        // Same setters on a text field are accepted but not serialized
        let text = Field::text("Title", "title").max_size(1024);
        assert!(text.json_serialize()["props"].get("max_size").is_none());

        // Rules and dependencies never appear in the payload
        let with_rules = Field::text("Slug", "slug").pattern("^[a-z]+$");
        assert_eq!(with_rules.json_serialize()["props"], json!({}));
    }

    #[test]
    fn test_user_props_override_generated() {
        let field = Field::image("Avatar", "avatar").disk("s3").prop("disk", "local");
        assert_eq!(field.json_serialize()["props"]["disk"], "local");
    }

    #[test]
    fn test_nested_fields_serialize() {
        let repeater = Field::repeater("Links", "links")
            .max_items(3)
            .fields(vec![Field::url("Url", "url"), Field::text("Label", "label")]);
        let json = repeater.json_serialize();

        assert_eq!(json["props"]["max_items"], 3);
        assert_eq!(json["props"]["fields"][0]["view"], "url-field");
        assert_eq!(json["props"]["fields"][1]["key"], "label");
    }

    #[test]
    fn test_extracted_data_is_serialized() {
        let mut field = Field::number("Views", "views");
        field.extract(&json!({ "views": 42 }));
        assert_eq!(field.json_serialize()["data"], 42);
    }
}
