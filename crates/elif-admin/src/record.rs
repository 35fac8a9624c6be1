//! Record access - locating a named attribute on an arbitrary record
//!
//! Records expose themselves through [`Record::shape`], either as a keyed
//! mapping or as a list of struct members carrying their exported name and
//! serialization tag. [`resolve`] applies the name and tag conventions in a
//! fixed order and never fails: an attribute that cannot be located is
//! simply absent.

use convert_case::{Case, Casing};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// How a record presents its attributes
pub enum RecordShape<'a> {
    /// Absent record
    Null,
    /// One level of indirection to another record
    Indirect(&'a dyn Record),
    /// Keyed mapping, looked up directly
    Mapping(&'a dyn Mapping),
    /// Structured record described by its members
    Struct(Vec<Member>),
    /// Scalar or anything without attributes
    Opaque,
}

/// Capability implemented by every record the admin layer can read
pub trait Record {
    fn shape(&self) -> RecordShape<'_>;
}

/// A keyed mapping of attribute names to values
pub trait Mapping {
    fn lookup(&self, key: &str) -> Option<Value>;

    fn keys(&self) -> Vec<String>;
}

/// One member of a structured record
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    /// Exported member name, PascalCase by convention (`AuthorID`)
    pub name: String,
    /// Serialization tag, options after the first comma are ignored
    pub tag: Option<String>,
    /// Whether the member may be read from outside the record
    pub exported: bool,
    pub value: Value,
}

impl Member {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            tag: None,
            exported: true,
            value: value.into(),
        }
    }

    /// Attach a serialization tag such as `"author_id,omitempty"`
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Mark the member as not externally readable
    pub fn private(mut self) -> Self {
        self.exported = false;
        self
    }
}

/// Locate `key` on `record`
///
/// First match wins:
/// 1. an absent record has nothing
/// 2. one level of indirection is followed
/// 3. mappings are looked up by `key` directly
/// 4. struct members are matched by the camel-cased key (`author_id` -> `AuthorId`)
/// 5. then by the all-caps id suffix (`AuthorId` -> `AuthorID`)
/// 6. then by the bare name of each member's tag
/// 7. a matched member that is not exported counts as not found
pub fn resolve(record: &dyn Record, key: &str) -> Option<Value> {
    match deref_once(record) {
        RecordShape::Mapping(mapping) => mapping.lookup(key),
        RecordShape::Struct(members) => resolve_member(&members, key),
        _ => {
            tracing::trace!("Record has no attributes, '{}' not resolved", key);
            None
        }
    }
}

/// Locate a member or mapping key whose name equals `name` ignoring ASCII case
pub fn find_member_ci(record: &dyn Record, name: &str) -> Option<Value> {
    match deref_once(record) {
        RecordShape::Mapping(mapping) => mapping
            .keys()
            .into_iter()
            .find(|key| key.eq_ignore_ascii_case(name))
            .and_then(|key| mapping.lookup(&key)),
        RecordShape::Struct(members) => members
            .into_iter()
            .find(|member| member.name.eq_ignore_ascii_case(name))
            .filter(|member| member.exported)
            .map(|member| member.value),
        _ => None,
    }
}

/// Camel-case a data-source key the way exported member names are spelled
pub fn camel_case(key: &str) -> String {
    key.to_case(Case::Pascal)
}

/// Bare name of a serialization tag, without trailing options
pub fn tag_name(tag: &str) -> &str {
    tag.split(',').next().unwrap_or_default().trim()
}

fn deref_once(record: &dyn Record) -> RecordShape<'_> {
    match record.shape() {
        RecordShape::Indirect(inner) => inner.shape(),
        shape => shape,
    }
}

fn resolve_member(members: &[Member], key: &str) -> Option<Value> {
    let camel = camel_case(key);

    let member = members
        .iter()
        .find(|member| member.name == camel)
        .or_else(|| {
            let upper = id_suffix_variant(&camel)?;
            members.iter().find(|member| member.name == upper)
        })
        .or_else(|| {
            members
                .iter()
                .find(|member| member.tag.as_deref().map(tag_name) == Some(key))
        });

    match member {
        Some(member) if member.exported => Some(member.value.clone()),
        Some(member) => {
            tracing::trace!("Member '{}' matched '{}' but is not exported", member.name, key);
            None
        }
        None => {
            tracing::trace!("No member matched '{}'", key);
            None
        }
    }
}

fn id_suffix_variant(camel: &str) -> Option<String> {
    camel.strip_suffix("Id").map(|stem| format!("{}ID", stem))
}

impl Record for Value {
    fn shape(&self) -> RecordShape<'_> {
        match self {
            Value::Null => RecordShape::Null,
            Value::Object(map) => RecordShape::Mapping(map),
            _ => RecordShape::Opaque,
        }
    }
}

impl Mapping for Map<String, Value> {
    fn lookup(&self, key: &str) -> Option<Value> {
        self.get(key).cloned()
    }

    fn keys(&self) -> Vec<String> {
        Map::keys(self).cloned().collect()
    }
}

impl Record for Map<String, Value> {
    fn shape(&self) -> RecordShape<'_> {
        RecordShape::Mapping(self)
    }
}

impl Mapping for HashMap<String, Value> {
    fn lookup(&self, key: &str) -> Option<Value> {
        self.get(key).cloned()
    }

    fn keys(&self) -> Vec<String> {
        HashMap::keys(self).cloned().collect()
    }
}

impl Record for HashMap<String, Value> {
    fn shape(&self) -> RecordShape<'_> {
        RecordShape::Mapping(self)
    }
}

impl Mapping for BTreeMap<String, Value> {
    fn lookup(&self, key: &str) -> Option<Value> {
        self.get(key).cloned()
    }

    fn keys(&self) -> Vec<String> {
        BTreeMap::keys(self).cloned().collect()
    }
}

impl Record for BTreeMap<String, Value> {
    fn shape(&self) -> RecordShape<'_> {
        RecordShape::Mapping(self)
    }
}

impl<T: Record> Record for Option<T> {
    fn shape(&self) -> RecordShape<'_> {
        match self {
            Some(inner) => RecordShape::Indirect(inner),
            None => RecordShape::Null,
        }
    }
}

impl<T: Record> Record for Box<T> {
    fn shape(&self) -> RecordShape<'_> {
        RecordShape::Indirect(self.as_ref())
    }
}

impl<T: Record> Record for Arc<T> {
    fn shape(&self) -> RecordShape<'_> {
        RecordShape::Indirect(self.as_ref())
    }
}

impl<T: Record + ?Sized> Record for &T {
    fn shape(&self) -> RecordShape<'_> {
        (**self).shape()
    }
}

/// Typed-mapping container for records without a static shape
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DynamicRecord {
    values: Map<String, Value>,
}

impl DynamicRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from any value serializing to a JSON object
    pub fn from_serialize<T: Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        match serde_json::to_value(value)? {
            Value::Object(values) => Ok(Self { values }),
            other => Err(<serde_json::Error as serde::ser::Error>::custom(format!(
                "expected an object, found {}",
                other
            ))),
        }
    }

    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.values)
    }
}

impl Record for DynamicRecord {
    fn shape(&self) -> RecordShape<'_> {
        RecordShape::Mapping(&self.values)
    }
}

impl From<Map<String, Value>> for DynamicRecord {
    fn from(values: Map<String, Value>) -> Self {
        Self { values }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Post;

    impl Record for Post {
        fn shape(&self) -> RecordShape<'_> {
            RecordShape::Struct(vec![
                Member::new("Title", "Hello"),
                Member::new("AuthorID", 7),
                Member::new("PublishedAt", "2024-01-01").tag("published_on,omitempty"),
                Member::new("Secret", "hidden").private(),
                Member::new("CategoryId", 3),
            ])
        }
    }

    #[test]
    fn test_null_record_is_not_found() {
        assert_eq!(resolve(&Value::Null, "title"), None);
        assert_eq!(resolve(&None::<Value>, "title"), None);
    }

    #[test]
    fn test_mapping_lookup() {
        let record = json!({ "title": "Hello", "views": 10 });
        assert_eq!(resolve(&record, "title"), Some(json!("Hello")));
        assert_eq!(resolve(&record, "missing"), None);

        let mut map = HashMap::new();
        map.insert("status".to_string(), json!("draft"));
        assert_eq!(resolve(&map, "status"), Some(json!("draft")));
    }

    #[test]
    fn test_struct_camel_case_match() {
        assert_eq!(resolve(&Post, "title"), Some(json!("Hello")));
        assert_eq!(resolve(&Post, "category_id"), Some(json!(3)));
    }

    #[test]
    fn test_struct_id_suffix_fixup() {
        assert_eq!(resolve(&Post, "author_id"), Some(json!(7)));
    }

    #[test]
    fn test_struct_tag_match_ignores_options() {
        assert_eq!(resolve(&Post, "published_on"), Some(json!("2024-01-01")));
    }

    #[test]
    fn test_unexported_member_is_not_found() {
        assert_eq!(resolve(&Post, "secret"), None);
    }

    #[test]
    fn test_unknown_member_is_not_found() {
        assert_eq!(resolve(&Post, "body"), None);
        assert_eq!(resolve(&json!(42), "anything"), None);
    }

    #[test]
    fn test_single_indirection_is_followed() {
        assert_eq!(resolve(&Some(Post), "title"), Some(json!("Hello")));
        assert_eq!(resolve(&Box::new(Post), "author_id"), Some(json!(7)));
        assert_eq!(resolve(&Arc::new(json!({ "a": 1 })), "a"), Some(json!(1)));
        // Only one level is dereferenced
        assert_eq!(resolve(&Some(Box::new(Post)), "title"), None);
    }

    #[test]
    fn test_find_member_ci() {
        assert_eq!(find_member_ci(&Post, "title"), Some(json!("Hello")));
        assert_eq!(find_member_ci(&Post, "secret"), None);
        assert_eq!(find_member_ci(&json!({ "Author": { "Name": "Ada" } }), "author"), Some(json!({ "Name": "Ada" })));
    }

    #[test]
    fn test_helpers() {
        assert_eq!(camel_case("author_id"), "AuthorId");
        assert_eq!(camel_case("title"), "Title");
        assert_eq!(tag_name("author_id,omitempty"), "author_id");
        assert_eq!(tag_name("name"), "name");
    }

    #[test]
    fn test_dynamic_record() {
        #[derive(Serialize)]
        struct Tag {
            id: u32,
            label: &'static str,
        }

        let record = DynamicRecord::from_serialize(&Tag { id: 1, label: "rust" }).unwrap();
        assert_eq!(resolve(&record, "label"), Some(json!("rust")));
        assert!(DynamicRecord::from_serialize(&"scalar").is_err());

        let built = DynamicRecord::new().set("id", 5).set("name", "Widget");
        assert_eq!(resolve(&built, "name"), Some(json!("Widget")));
        assert_eq!(built.get("id"), Some(&json!(5)));
    }
}
