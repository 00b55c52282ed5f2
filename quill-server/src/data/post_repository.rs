use async_trait::async_trait;
use sqlx::{postgres::PgRow, PgPool, Row};

use crate::domain::post::{
    AuthorSummary, CategorySummary, PostFilter, PostStatus, PostWithRefs, SortOrder,
};
use crate::domain::validation::Pagination;
use crate::domain::{DomainError, Post};

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn insert(&self, post: &Post) -> Result<(), DomainError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<PostWithRefs>, DomainError>;
    /// Whole-document write of the mutable fields; the slug and counters are
    /// deliberately excluded.
    async fn update(&self, post: &Post) -> Result<(), DomainError>;
    async fn delete(&self, id: &str) -> Result<(), DomainError>;
    async fn list(
        &self,
        filter: &PostFilter,
        pagination: Pagination,
        sort: SortOrder,
    ) -> Result<(Vec<PostWithRefs>, i64), DomainError>;
    /// Counter writes are plain value stores: the caller reads, increments,
    /// and writes back. Concurrent increments can lose updates; that is the
    /// accepted behavior, so these must not become atomic SQL increments.
    async fn set_views(&self, id: &str, views: i64) -> Result<(), DomainError>;
    async fn set_likes(&self, id: &str, likes: i64) -> Result<(), DomainError>;
}

pub struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const POST_SELECT: &str = r#"
    SELECT p.id, p.title, p.content, p.slug, p.author_id, p.category_id, p.tags,
           p.status, p.views, p.likes, p.featured, p.published_at, p.created_at, p.updated_at,
           u.username AS author_username, u.email AS author_email,
           c.name AS category_name, c.slug AS category_slug
    FROM posts p
    LEFT JOIN users u ON u.id = p.author_id
    LEFT JOIN categories c ON c.id = p.category_id
"#;

fn map_post_row(row: &PgRow) -> Result<PostWithRefs, DomainError> {
    let status: String = row.try_get("status")?;
    let author_id: String = row.try_get("author_id")?;
    let category_id: Option<String> = row.try_get("category_id")?;

    let author = row
        .try_get::<Option<String>, _>("author_username")?
        .map(|username| {
            Ok::<_, DomainError>(AuthorSummary {
                id: author_id.clone(),
                username,
                email: row.try_get("author_email")?,
            })
        })
        .transpose()?;

    let category = row
        .try_get::<Option<String>, _>("category_name")?
        .zip(category_id.clone())
        .map(|(name, id)| {
            Ok::<_, DomainError>(CategorySummary {
                id,
                name,
                slug: row.try_get("category_slug")?,
            })
        })
        .transpose()?;

    let post = Post {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        content: row.try_get("content")?,
        slug: row.try_get("slug")?,
        author_id,
        category_id,
        tags: row.try_get("tags")?,
        status: PostStatus::from_db(&status),
        views: row.try_get("views")?,
        likes: row.try_get("likes")?,
        featured: row.try_get("featured")?,
        published_at: row.try_get("published_at")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    };

    Ok(PostWithRefs {
        post,
        author,
        category,
    })
}

/// Builds the WHERE clause shared by the listing and count queries. Returns
/// the clause and the string values to bind, in order.
fn filter_clause(filter: &PostFilter) -> (String, Vec<String>) {
    let mut conditions = Vec::new();
    let mut binds = Vec::new();

    if let Some(category) = &filter.category {
        binds.push(category.clone());
        conditions.push(format!("p.category_id = ${}", binds.len()));
    }
    if let Some(status) = &filter.status {
        binds.push(status.clone());
        conditions.push(format!("p.status = ${}", binds.len()));
    }
    if let Some(author) = &filter.author {
        binds.push(author.clone());
        conditions.push(format!("p.author_id = ${}", binds.len()));
    }

    let clause = if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    };

    (clause, binds)
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn insert(&self, post: &Post) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO posts (id, title, content, slug, author_id, category_id, tags,
                               status, views, likes, featured, published_at, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(&post.id)
        .bind(&post.title)
        .bind(&post.content)
        .bind(&post.slug)
        .bind(&post.author_id)
        .bind(&post.category_id)
        .bind(&post.tags)
        .bind(post.status.as_str())
        .bind(post.views)
        .bind(post.likes)
        .bind(post.featured)
        .bind(post.published_at)
        .bind(post.created_at)
        .bind(post.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert post: {}", e);
            DomainError::Database(e.to_string())
        })?;

        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<PostWithRefs>, DomainError> {
        let row = sqlx::query(&format!("{POST_SELECT} WHERE p.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(map_post_row).transpose()
    }

    async fn update(&self, post: &Post) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE posts
            SET title = $2, content = $3, category_id = $4, tags = $5,
                status = $6, published_at = $7, updated_at = $8
            WHERE id = $1
            "#,
        )
        .bind(&post.id)
        .bind(&post.title)
        .bind(&post.content)
        .bind(&post.category_id)
        .bind(&post.tags)
        .bind(post.status.as_str())
        .bind(post.published_at)
        .bind(post.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound("Post not found".to_string()));
        }

        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound("Post not found".to_string()));
        }

        Ok(())
    }

    async fn list(
        &self,
        filter: &PostFilter,
        pagination: Pagination,
        sort: SortOrder,
    ) -> Result<(Vec<PostWithRefs>, i64), DomainError> {
        let (clause, binds) = filter_clause(filter);

        let count_sql = format!("SELECT COUNT(*) AS count FROM posts p{clause}");
        let mut count_query = sqlx::query(&count_sql);
        for value in &binds {
            count_query = count_query.bind(value);
        }
        let total: i64 = count_query.fetch_one(&self.pool).await?.try_get("count")?;

        let direction = match sort {
            SortOrder::Newest => "DESC",
            SortOrder::Oldest => "ASC",
        };
        // limit/skip are clamped integers, safe to inline.
        let list_sql = format!(
            "{POST_SELECT}{clause} ORDER BY p.created_at {direction} LIMIT {} OFFSET {}",
            pagination.limit,
            pagination.skip()
        );
        let mut list_query = sqlx::query(&list_sql);
        for value in &binds {
            list_query = list_query.bind(value);
        }

        let rows = list_query.fetch_all(&self.pool).await?;
        let posts = rows
            .iter()
            .map(map_post_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((posts, total))
    }

    async fn set_views(&self, id: &str, views: i64) -> Result<(), DomainError> {
        sqlx::query("UPDATE posts SET views = $2 WHERE id = $1")
            .bind(id)
            .bind(views)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn set_likes(&self, id: &str, likes: i64) -> Result<(), DomainError> {
        sqlx::query("UPDATE posts SET likes = $2 WHERE id = $1")
            .bind(id)
            .bind(likes)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
