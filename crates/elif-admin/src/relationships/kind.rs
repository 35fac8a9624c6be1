//! Relationship kinds and loading hints

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The six association kinds a relationship field can describe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationshipKind {
    /// Many-to-one through a foreign key on this record
    BelongsTo,
    /// One-to-many through a foreign key on the related records
    HasMany,
    /// One-to-one through a foreign key on the related record
    HasOne,
    /// Many-to-many through a pivot table
    BelongsToMany,
    /// Inverse polymorphic, the target type is stored per record
    MorphTo,
    /// Polymorphic many-to-many through a pivot table
    MorphToMany,
}

impl RelationshipKind {
    pub const ALL: [RelationshipKind; 6] = [
        Self::BelongsTo,
        Self::HasMany,
        Self::HasOne,
        Self::BelongsToMany,
        Self::MorphTo,
        Self::MorphToMany,
    ];

    /// Wire name used in serialized descriptors
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BelongsTo => "belongsTo",
            Self::HasMany => "hasMany",
            Self::HasOne => "hasOne",
            Self::BelongsToMany => "belongsToMany",
            Self::MorphTo => "morphTo",
            Self::MorphToMany => "morphToMany",
        }
    }

    /// Returns true if this relationship kind is polymorphic
    pub fn is_polymorphic(self) -> bool {
        matches!(self, Self::MorphTo | Self::MorphToMany)
    }

    /// Returns true if this relationship resolves to a collection
    pub fn is_collection(self) -> bool {
        matches!(self, Self::HasMany | Self::BelongsToMany | Self::MorphToMany)
    }

    /// Returns true if this relationship requires a pivot table
    pub fn requires_pivot(self) -> bool {
        matches!(self, Self::BelongsToMany | Self::MorphToMany)
    }
}

impl fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declarative hint for the query layer; it performs no loading itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadingStrategy {
    Eager,
    #[default]
    Lazy,
}

impl LoadingStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Eager => "eager",
            Self::Lazy => "lazy",
        }
    }
}

impl FromStr for LoadingStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "eager" => Ok(Self::Eager),
            "lazy" => Ok(Self::Lazy),
            other => Err(format!("unknown loading strategy '{}'", other)),
        }
    }
}
