//! Category domain entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Category together with the number of posts filed under it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryUsage {
    pub category: Category,
    pub post_count: u64,
}

impl CategoryUsage {
    pub fn is_in_use(&self) -> bool {
        self.post_count > 0
    }
}

/// Collapse runs of whitespace and trim, so "  Rust   tips " and
/// "Rust tips" name the same category.
pub fn normalize_category_name(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CategoryResponse {
    pub id: Uuid,
    #[schema(example = "Engineering")]
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
            created_at: category.created_at,
        }
    }
}

/// Admin console view of a category
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CategoryUsageResponse {
    pub id: Uuid,
    pub name: String,
    pub post_count: u64,
    /// False while posts still reference the category
    pub deletable: bool,
    pub created_at: DateTime<Utc>,
}

impl From<CategoryUsage> for CategoryUsageResponse {
    fn from(usage: CategoryUsage) -> Self {
        let deletable = !usage.is_in_use();
        Self {
            id: usage.category.id,
            name: usage.category.name,
            post_count: usage.post_count,
            deletable,
            created_at: usage.category.created_at,
        }
    }
}
