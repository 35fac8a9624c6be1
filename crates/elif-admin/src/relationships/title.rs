//! Human-readable titles for related records

use super::resource::Resource;
use crate::record::{find_member_ci, Record};
use elif_admin_validation::coerce_to_string;
use serde_json::Value;

/// Members consulted, in order, when a resource title is uninformative
///
/// Names match case-insensitively, so a `name` or `fullname` key on a
/// mapping counts as `Name` or `FullName`.
pub const FALLBACK_TITLE_MEMBERS: [&str; 6] =
    ["Name", "Title", "Label", "FullName", "DisplayName", "Slug"];

/// Title of `associated`, whose identifier is `id`
///
/// The resource's own title wins unless it is empty, equals the id, or
/// equals `#` followed by the id. In that case the first non-empty fallback
/// member is used; if none exists the resource title is kept as is.
pub fn resolve_title(resource: Option<&dyn Resource>, associated: &dyn Record, id: &Value) -> String {
    let title = resource
        .and_then(|resource| resource.record_title(associated))
        .unwrap_or_default();

    if !is_uninformative(&title, id) {
        return title;
    }

    match fallback_title(associated) {
        Some(fallback) => fallback,
        None => {
            tracing::debug!("No fallback title member found for related record {}", id);
            title
        }
    }
}

fn is_uninformative(title: &str, id: &Value) -> bool {
    let id = coerce_to_string(id);
    title.is_empty() || title == id || title == format!("#{}", id)
}

/// First non-empty value among [`FALLBACK_TITLE_MEMBERS`]
pub fn fallback_title(associated: &dyn Record) -> Option<String> {
    FALLBACK_TITLE_MEMBERS.iter().find_map(|name| {
        find_member_ci(associated, name)
            .filter(|value| !value.is_null())
            .map(|value| coerce_to_string(&value))
            .filter(|text| !text.is_empty())
    })
}
