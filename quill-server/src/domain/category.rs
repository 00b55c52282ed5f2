use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::slug::slugify;

pub const DEFAULT_COLOR: &str = "#000000";

/// A post category. As with posts, the slug is derived from the name once at
/// construction time.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub color: String,
    pub created_at: DateTime<Utc>,
}

impl Category {
    pub fn new(id: String, req: CreateCategoryRequest) -> Self {
        let slug = slugify(&req.name);
        Self {
            id,
            name: req.name,
            slug,
            description: req.description,
            color: req.color.unwrap_or_else(|| DEFAULT_COLOR.to_string()),
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
}
