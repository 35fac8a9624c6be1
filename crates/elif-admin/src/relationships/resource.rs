//! Related resource identity

use crate::record::Record;
use std::fmt;
use std::sync::Arc;

/// A resource definition another field can point at
pub trait Resource: Send + Sync {
    /// Stable slug identifying the resource (`"products"`)
    fn slug(&self) -> String;

    /// Human-readable title for one of this resource's records
    ///
    /// Returning `None` or an uninformative title (empty, the id, `#id`)
    /// lets the caller fall back to common name members.
    fn record_title(&self, _record: &dyn Record) -> Option<String> {
        None
    }
}

/// The related side of a relationship
///
/// Built from a literal slug or from a resource object. The slug is
/// resolved once; the object is retained for title resolution.
#[derive(Clone)]
pub struct RelatedResource {
    slug: String,
    resource: Option<Arc<dyn Resource>>,
}

impl RelatedResource {
    pub fn named(slug: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            resource: None,
        }
    }

    pub fn from_resource(resource: Arc<dyn Resource>) -> Self {
        Self {
            slug: resource.slug(),
            resource: Some(resource),
        }
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn resource(&self) -> Option<&dyn Resource> {
        self.resource.as_deref()
    }

    pub fn has_resource(&self) -> bool {
        self.resource.is_some()
    }
}

impl fmt::Debug for RelatedResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelatedResource")
            .field("slug", &self.slug)
            .field("has_resource", &self.resource.is_some())
            .finish()
    }
}

impl PartialEq for RelatedResource {
    fn eq(&self, other: &Self) -> bool {
        self.slug == other.slug
    }
}

impl From<&str> for RelatedResource {
    fn from(slug: &str) -> Self {
        Self::named(slug)
    }
}

impl From<String> for RelatedResource {
    fn from(slug: String) -> Self {
        Self::named(slug)
    }
}

impl<R: Resource + 'static> From<Arc<R>> for RelatedResource {
    fn from(resource: Arc<R>) -> Self {
        Self::from_resource(resource)
    }
}
