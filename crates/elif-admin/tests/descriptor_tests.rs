//! Integration tests for field and relationship descriptors
//!
//! Exercises the public surface the way a resource definition does:
//! building descriptors, extracting values from records, checking
//! visibility and serializing the frontend payload.

use elif_admin::prelude::*;
use elif_admin::relationships::{MorphTo, MorphToMany, RelationshipSort, Resource, SortDirection, SortPlan};
use elif_admin::{ElementContext, Member, RecordShape, RelationshipError, RelationshipKind};
use serde_json::{json, Value};
use std::sync::Arc;

/// A product resource whose title capability returns a fixed string
struct Products {
    title: &'static str,
}

impl Resource for Products {
    fn slug(&self) -> String {
        "products".to_string()
    }

    fn record_title(&self, _record: &dyn Record) -> Option<String> {
        Some(self.title.to_string())
    }
}

/// An order line with its product association loaded
struct OrderLine {
    product_id: u64,
    product: Value,
}

impl Record for OrderLine {
    fn shape(&self) -> RecordShape<'_> {
        RecordShape::Struct(vec![
            Member::new("ProductID", self.product_id),
            Member::new("Product", self.product.clone()),
        ])
    }
}

fn extract_product(title: &'static str) -> Value {
    let line = OrderLine {
        product_id: 10,
        product: json!({ "ID": 10, "Name": "Product Name" }),
    };
    let mut product = BelongsTo::new("Product", "product_id", Arc::new(Products { title }));
    product.extract(&line);
    product.field().data().clone()
}

#[test]
fn test_belongs_to_title_fallback() {
    assert_eq!(extract_product("10"), json!({ "id": 10, "title": "Product Name" }));
    assert_eq!(extract_product("#10"), json!({ "id": 10, "title": "Product Name" }));
    assert_eq!(extract_product(""), json!({ "id": 10, "title": "Product Name" }));
    assert_eq!(extract_product("Custom Title"), json!({ "id": 10, "title": "Custom Title" }));
}

#[test]
fn test_belongs_to_without_loaded_association() {
    let line = OrderLine {
        product_id: 10,
        product: Value::Null,
    };
    let mut product = BelongsTo::new("Product", "product_id", Arc::new(Products { title: "x" }));
    product.extract(&line);
    assert_eq!(product.field().data(), &Value::Null);

    // A slug-only relationship exposes the raw foreign key
    let mut product = BelongsTo::new("Product", "product_id", "products");
    product.extract(&line);
    assert_eq!(product.field().data(), &json!(10));
}

#[test]
fn test_visibility_truth_table() {
    let hidden_on_list = Field::text("Title", "title").hide_on_list();
    assert!(!hidden_on_list.is_visible_in_context(VisibilityContext::List));
    assert!(hidden_on_list.is_visible_in_context(VisibilityContext::Detail));
    assert!(hidden_on_list.is_visible_in_context(VisibilityContext::Create));
    assert!(hidden_on_list.is_visible_in_context(VisibilityContext::Update));

    let form_only = Field::text("Password", "password").only_on_form();
    assert_eq!(form_only.context_override(), Some(ElementContext::OnlyOnForm));
    let visible: Vec<VisibilityContext> = VisibilityContext::ALL
        .into_iter()
        .filter(|context| form_only.is_visible_in_context(*context))
        .collect();
    assert_eq!(visible, vec![VisibilityContext::Create, VisibilityContext::Update]);

    let everywhere = Field::text("Name", "name");
    assert!(VisibilityContext::ALL
        .into_iter()
        .all(|context| everywhere.is_visible_in_context(context)));
}

#[test]
fn test_morph_type_mapping_validation() {
    let commentable = MorphTo::new("Commentable", "commentable");
    let err: RelationshipError = commentable.validate_types().unwrap_err();
    assert_eq!(err.kind, RelationshipKind::MorphTo);
    assert_eq!(err.field, "commentable");
    assert!(commentable.morph_type("post", "posts").validate_types().is_ok());

    let tags = MorphToMany::new("Tags", "tags", "tags", "taggable");
    assert!(tags.validate_types().is_err());
    let tags = tags.types([("post", "posts"), ("video", "videos")]);
    assert!(tags.validate_types().is_ok());

    let relationship: Relationship = tags.into();
    assert!(relationship.validate_relationship().is_ok());
}

#[test]
fn test_serialization_is_idempotent() {
    let title = Field::text("Title", "title")
        .required()
        .placeholder("Post title")
        .max_length(120)
        .prop("autofocus", true);
    assert_eq!(title.json_serialize(), title.json_serialize());

    let author: Relationship = BelongsTo::new("Author", "author_id", "authors")
        .display_key("name")
        .search_columns(["name", "email"])
        .into();
    assert_eq!(author.json_serialize(), author.json_serialize());
}

#[test]
fn test_payload_keys_are_fixed() {
    let payload = Field::number("Price", "price").min(0.0).json_serialize();
    let mut keys: Vec<&str> = payload.as_object().unwrap().keys().map(String::as_str).collect();
    keys.sort_unstable();

    let mut expected = vec![
        "view", "type", "key", "name", "data", "props", "context", "placeholder", "label", "help_text",
        "read_only", "disabled", "required", "nullable", "sortable", "filterable", "stacked", "text_align",
    ];
    expected.sort_unstable();
    assert_eq!(keys, expected);

    assert_eq!(payload["view"], "number-field");
    assert_eq!(payload["context"], Value::Null);
    assert!(payload.get("rules").is_none());
}

#[test]
fn test_relationship_props() {
    let author: Relationship = BelongsTo::new("Author", "author_id", "authors")
        .display_key("name")
        .eager()
        .into();
    let payload = author.json_serialize();

    assert_eq!(payload["view"], "belongs-to-field");
    assert_eq!(payload["key"], "author_id");
    assert_eq!(payload["props"]["resource"], "authors");
    assert_eq!(payload["props"]["display_key"], "name");
    assert_eq!(payload["props"]["loading"], "eager");
}

#[test]
fn test_belongs_to_foreign_key_override_is_consistent() {
    let writer: Relationship = BelongsTo::new("Author", "author_id", "authors")
        .foreign_key("writer_id")
        .sortable()
        .into();
    let record = json!({ "author_id": 1, "writer_id": 4 });

    let query = writer.query_for(&record).unwrap().unwrap();
    assert_eq!(query.constraints[0].value, json!(4));

    let payload = writer.json_serialize();
    assert_eq!(payload["key"], "writer_id");
    assert_eq!(payload["props"]["foreign_key"], "writer_id");

    match RelationshipSort::plan(&writer, SortDirection::Asc) {
        SortPlan::Join { local_column, .. } => assert_eq!(local_column, "writer_id"),
        plan => panic!("unexpected plan {:?}", plan),
    }
}
