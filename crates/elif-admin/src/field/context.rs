//! Where a field renders

use serde::{Deserialize, Serialize};

/// Context override stored on a field descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ElementContext {
    HideOnList,
    HideOnDetail,
    HideOnCreate,
    HideOnUpdate,
    /// Hidden on both create and update forms
    HideOnForm,
    OnlyOnList,
    OnlyOnDetail,
    OnlyOnCreate,
    OnlyOnUpdate,
    /// Shown on create and update forms only
    OnlyOnForm,
}

impl ElementContext {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::HideOnList => "HIDE_ON_LIST",
            Self::HideOnDetail => "HIDE_ON_DETAIL",
            Self::HideOnCreate => "HIDE_ON_CREATE",
            Self::HideOnUpdate => "HIDE_ON_UPDATE",
            Self::HideOnForm => "HIDE_ON_FORM",
            Self::OnlyOnList => "ONLY_ON_LIST",
            Self::OnlyOnDetail => "ONLY_ON_DETAIL",
            Self::OnlyOnCreate => "ONLY_ON_CREATE",
            Self::OnlyOnUpdate => "ONLY_ON_UPDATE",
            Self::OnlyOnForm => "ONLY_ON_FORM",
        }
    }
}

/// The UI context a field is being rendered for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisibilityContext {
    /// Index / list view
    List,
    Detail,
    Create,
    Update,
    Preview,
}

impl VisibilityContext {
    pub const ALL: [VisibilityContext; 5] = [
        Self::List,
        Self::Detail,
        Self::Create,
        Self::Update,
        Self::Preview,
    ];

    /// Create and update are form contexts
    pub fn is_form(self) -> bool {
        matches!(self, Self::Create | Self::Update)
    }
}

/// Visibility truth table
///
/// A field with no stored override renders everywhere; otherwise each
/// requested context excludes a fixed set of stored overrides.
pub fn is_visible(stored: Option<ElementContext>, requested: VisibilityContext) -> bool {
    use ElementContext::*;

    let Some(stored) = stored else {
        return true;
    };

    let excluded = match requested {
        VisibilityContext::List => matches!(
            stored,
            HideOnList | OnlyOnDetail | OnlyOnForm | OnlyOnCreate | OnlyOnUpdate
        ),
        VisibilityContext::Detail => matches!(
            stored,
            HideOnDetail | OnlyOnList | OnlyOnForm | OnlyOnCreate | OnlyOnUpdate
        ),
        VisibilityContext::Create => matches!(
            stored,
            HideOnCreate | HideOnForm | OnlyOnList | OnlyOnDetail | OnlyOnUpdate
        ),
        VisibilityContext::Update => matches!(
            stored,
            HideOnUpdate | HideOnForm | OnlyOnList | OnlyOnDetail | OnlyOnCreate
        ),
        VisibilityContext::Preview => matches!(
            stored,
            OnlyOnList | OnlyOnForm | OnlyOnCreate | OnlyOnUpdate
        ),
    };

    !excluded
}
