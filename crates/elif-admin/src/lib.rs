//! # elif-admin
//!
//! Fluent field and relationship descriptors for elif admin panels.
//! Descriptors read attribute values off arbitrary records, decide where
//! they are shown, validate submitted values and serialize into the JSON
//! payload the admin frontend renders. Relationship loading goes through an
//! injected [`RelationshipBackend`].
//!
//! ```
//! use elif_admin::prelude::*;
//! use serde_json::json;
//!
//! let fields = FieldSet::new()
//!     .push(Field::text("Title", "title").required().max_length(120))
//!     .push(BelongsTo::new("Author", "author_id", "authors").display_key("name"));
//!
//! let record = json!({ "title": "Hello", "author_id": 1 });
//! let payload = fields.serialize_record(VisibilityContext::Detail, &record);
//! assert_eq!(payload[0]["data"], "Hello");
//! ```

pub mod config;
pub mod error;
pub mod field;
pub mod fieldset;
pub mod record;
pub mod relationships;

// Re-exports for easy access
pub use config::{AdminConfig, AdminConfigBuilder, ConfigError};
pub use error::{AdminError, AdminResult, BackendError, RelationshipError};
pub use field::{
    DataType, DependencyRule, ElementContext, Field, FieldBuilder, FieldKind, VisibilityContext,
};
pub use fieldset::{Element, FieldSet};
pub use record::{resolve, DynamicRecord, Member, Record, RecordShape};
pub use relationships::{
    BelongsTo, BelongsToMany, HasMany, HasOne, Loaded, MorphTo, MorphToMany, PivotTable,
    Relationship, RelationshipBackend, RelationshipBuilder, RelationshipKind,
};

pub use elif_admin_validation::{ValidationError, ValidationErrors, ValidationRule};

/// Everything needed to declare field sets
pub mod prelude {
    pub use crate::config::AdminConfig;
    pub use crate::error::{AdminError, AdminResult};
    pub use crate::field::{DependencyRule, Field, FieldBuilder, VisibilityContext};
    pub use crate::fieldset::{Element, FieldSet};
    pub use crate::record::{resolve, Record};
    pub use crate::relationships::{
        BelongsTo, BelongsToMany, HasMany, HasOne, LoadingStrategy, MorphTo, MorphToMany, PivotTable,
        Relationship, RelationshipBackend, RelationshipBuilder,
    };
    pub use elif_admin_validation::ValidationRule;
}
