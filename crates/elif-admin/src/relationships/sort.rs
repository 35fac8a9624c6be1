//! Sorting a listing by a relationship column

use super::query::SortDirection;
use super::Relationship;
use serde::Serialize;

/// How the query layer should order parents by a relationship
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum SortPlan {
    /// Join the related table and order by one of its columns
    Join {
        table: String,
        local_column: String,
        foreign_column: String,
        sort_column: String,
        direction: SortDirection,
    },
    /// Order by the number of related rows in `table`
    Count {
        table: String,
        foreign_column: String,
        local_column: String,
        direction: SortDirection,
    },
    /// Order by a column of the parent itself
    Column { column: String, direction: SortDirection },
    Unsortable,
}

impl SortPlan {
    /// `ORDER BY` expression for the plan, if sortable
    pub fn order_by_sql(&self) -> Option<String> {
        match self {
            Self::Join { table, sort_column, direction, .. } => {
                Some(format!("{}.{} {}", table, sort_column, direction.to_sql()))
            }
            Self::Count { table, direction, .. } => Some(format!("{}_count {}", table, direction.to_sql())),
            Self::Column { column, direction } => Some(format!("{} {}", column, direction.to_sql())),
            Self::Unsortable => None,
        }
    }
}

pub struct RelationshipSort;

impl RelationshipSort {
    /// Plan ordering by `relationship`; fields not marked sortable are unsortable
    pub fn plan(relationship: &Relationship, direction: SortDirection) -> SortPlan {
        if !relationship.field().flags().sortable {
            return SortPlan::Unsortable;
        }

        let config = relationship.config();
        match relationship {
            Relationship::BelongsTo(_) => SortPlan::Join {
                table: config.related_slug().to_string(),
                local_column: config.foreign_key().to_string(),
                foreign_column: config.owner_key().to_string(),
                sort_column: config.display_key().to_string(),
                direction,
            },
            Relationship::HasOne(_) => SortPlan::Join {
                table: config.related_slug().to_string(),
                local_column: config.owner_key().to_string(),
                foreign_column: config.foreign_key().to_string(),
                sort_column: config.display_key().to_string(),
                direction,
            },
            Relationship::HasMany(_) => SortPlan::Count {
                table: config.related_slug().to_string(),
                foreign_column: config.foreign_key().to_string(),
                local_column: config.owner_key().to_string(),
                direction,
            },
            Relationship::BelongsToMany(r) => pivot_count(r.pivot.as_ref(), config.owner_key(), direction),
            Relationship::MorphToMany(r) => pivot_count(r.pivot.as_ref(), config.owner_key(), direction),
            Relationship::MorphTo(r) => SortPlan::Column {
                column: r.morph.type_column.clone(),
                direction,
            },
        }
    }
}

fn pivot_count(pivot: Option<&super::PivotTable>, owner_key: &str, direction: SortDirection) -> SortPlan {
    match pivot {
        Some(pivot) => SortPlan::Count {
            table: pivot.table.clone(),
            foreign_column: pivot.foreign_pivot_key.clone(),
            local_column: owner_key.to_string(),
            direction,
        },
        None => SortPlan::Unsortable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldBuilder;
    use crate::relationships::{BelongsTo, BelongsToMany, HasMany, MorphTo, RelationshipBuilder};

    #[test]
    fn test_unsortable_by_default() {
        let author: Relationship = BelongsTo::new("Author", "author_id", "authors").into();
        assert_eq!(RelationshipSort::plan(&author, SortDirection::Asc), SortPlan::Unsortable);
        assert_eq!(SortPlan::Unsortable.order_by_sql(), None);
    }

    #[test]
    fn test_belongs_to_joins_display_column() {
        let author: Relationship = BelongsTo::new("Author", "author_id", "authors")
            .display_key("name")
            .sortable()
            .into();
        let plan = RelationshipSort::plan(&author, SortDirection::Desc);

        assert_eq!(
            plan,
            SortPlan::Join {
                table: "authors".into(),
                local_column: "author_id".into(),
                foreign_column: "id".into(),
                sort_column: "name".into(),
                direction: SortDirection::Desc,
            }
        );
        assert_eq!(plan.order_by_sql().unwrap(), "authors.name DESC");
    }

    #[test]
    fn test_collections_sort_by_count() {
        let comments: Relationship = HasMany::new("Comments", "comments", "comments")
            .foreign_key("post_id")
            .sortable()
            .into();
        let plan = RelationshipSort::plan(&comments, SortDirection::Asc);
        assert_eq!(plan.order_by_sql().unwrap(), "comments_count ASC");

        let tags: Relationship = BelongsToMany::new("Tags", "tags", "tags").sortable().into();
        assert_eq!(RelationshipSort::plan(&tags, SortDirection::Asc), SortPlan::Unsortable);
    }

    #[test]
    fn test_morph_to_sorts_by_type_column() {
        let commentable: Relationship = MorphTo::new("Commentable", "commentable").sortable().into();
        let plan = RelationshipSort::plan(&commentable, SortDirection::Asc);
        assert_eq!(plan.order_by_sql().unwrap(), "commentable_type ASC");
    }
}
