use async_trait::async_trait;
use sqlx::{postgres::PgRow, PgPool, Row};

use crate::domain::{Category, DomainError};

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn insert(&self, category: &Category) -> Result<(), DomainError>;
    async fn find_by_name(&self, name: &str) -> Result<Option<Category>, DomainError>;
    async fn list(&self) -> Result<Vec<Category>, DomainError>;
}

pub struct PostgresCategoryRepository {
    pool: PgPool,
}

impl PostgresCategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_category_row(row: &PgRow) -> Result<Category, DomainError> {
    Ok(Category {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        slug: row.try_get("slug")?,
        description: row.try_get("description")?,
        color: row.try_get("color")?,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn insert(&self, category: &Category) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO categories (id, name, slug, description, color, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&category.id)
        .bind(&category.name)
        .bind(&category.slug)
        .bind(&category.description)
        .bind(&category.color)
        .bind(category.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if e.to_string().contains("duplicate key") {
                DomainError::Validation("Category already exists".to_string())
            } else {
                DomainError::Database(e.to_string())
            }
        })?;

        Ok(())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Category>, DomainError> {
        let row = sqlx::query(
            "SELECT id, name, slug, description, color, created_at FROM categories WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_category_row).transpose()
    }

    async fn list(&self) -> Result<Vec<Category>, DomainError> {
        let rows = sqlx::query(
            "SELECT id, name, slug, description, color, created_at FROM categories ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_category_row).collect()
    }
}
