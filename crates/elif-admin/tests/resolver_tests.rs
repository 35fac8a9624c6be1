//! Integration tests for attribute resolution
//!
//! Covers mappings, structured records described by their members, the id
//! suffix fix-up, tag matching and the silent not-found path.

use elif_admin::record::{find_member_ci, Mapping};
use elif_admin::{resolve, DynamicRecord, Member, Record, RecordShape};
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// A typed record exposing its members explicitly
struct Post {
    id: u64,
    author_id: u64,
    title: String,
    secret: String,
}

impl Record for Post {
    fn shape(&self) -> RecordShape<'_> {
        RecordShape::Struct(vec![
            Member::new("ID", self.id),
            Member::new("AuthorID", self.author_id),
            Member::new("Headline", self.title.clone()).tag("title,omitempty"),
            Member::new("Secret", self.secret.clone()).private(),
        ])
    }
}

fn post() -> Post {
    Post {
        id: 7,
        author_id: 3,
        title: "Hello".to_string(),
        secret: "hunter2".to_string(),
    }
}

#[test]
fn test_mapping_lookup() {
    let record = json!({ "title": "Hello", "author_id": 3 });
    assert_eq!(resolve(&record, "title"), Some(json!("Hello")));
    assert_eq!(resolve(&record, "missing"), None);

    let mut map: HashMap<String, Value> = HashMap::new();
    map.insert("views".into(), json!(12));
    assert_eq!(resolve(&map, "views"), Some(json!(12)));
    assert_eq!(Mapping::keys(&map), vec!["views".to_string()]);
}

#[test]
fn test_struct_members_by_name_suffix_and_tag() {
    let record = post();

    // `author_id` camel-cases to `AuthorId` and is retried as `AuthorID`
    assert_eq!(resolve(&record, "author_id"), Some(json!(3)));
    // `id` camel-cases to `Id` and is retried as `ID`
    assert_eq!(resolve(&record, "id"), Some(json!(7)));
    // No member is named `Title`, but one is tagged `title`
    assert_eq!(resolve(&record, "title"), Some(json!("Hello")));
}

#[test]
fn test_unexported_members_are_not_found() {
    let record = post();
    assert_eq!(resolve(&record, "secret"), None);
    assert_eq!(find_member_ci(&record, "secret"), None);
}

#[test]
fn test_null_and_opaque_records() {
    assert_eq!(resolve(&Value::Null, "id"), None);
    assert_eq!(resolve(&json!(42), "id"), None);

    let absent: Option<Post> = None;
    assert_eq!(resolve(&absent, "id"), None);
}

#[test]
fn test_one_level_of_indirection() {
    let wrapped = Some(post());
    assert_eq!(resolve(&wrapped, "author_id"), Some(json!(3)));

    let shared = Arc::new(json!({ "id": 1 }));
    assert_eq!(resolve(&shared, "id"), Some(json!(1)));

    let boxed = Box::new(post());
    assert_eq!(resolve(&boxed, "title"), Some(json!("Hello")));
}

#[test]
fn test_dynamic_record_from_serialize() {
    #[derive(Serialize)]
    struct Product {
        sku: String,
        price: f64,
    }

    let record = DynamicRecord::from_serialize(&Product {
        sku: "A-1".into(),
        price: 9.5,
    })
    .unwrap()
    .set("stock", 4);

    assert_eq!(resolve(&record, "sku"), Some(json!("A-1")));
    assert_eq!(resolve(&record, "stock"), Some(json!(4)));
    assert_eq!(record.get("price"), Some(&json!(9.5)));
}
