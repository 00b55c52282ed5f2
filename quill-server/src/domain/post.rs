use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::slug::slugify;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Published,
    Archived,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Archived => "archived",
        }
    }

    pub fn from_db(value: &str) -> Self {
        match value {
            "published" => Self::Published,
            "archived" => Self::Archived,
            _ => Self::Draft,
        }
    }
}

/// A blog post. The slug is derived from the title exactly once at creation
/// and never regenerated; `published_at` is stamped the first time the status
/// reaches `published` and never again.
#[derive(Debug, Clone)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub content: String,
    pub slug: String,
    pub author_id: String,
    pub category_id: Option<String>,
    pub tags: Vec<String>,
    pub status: PostStatus,
    pub views: i64,
    pub likes: i64,
    pub featured: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Explicit construction step: slug derivation and the publish timestamp
    /// happen here, not in hidden persistence hooks.
    pub fn new(id: String, author_id: String, req: CreatePostRequest) -> Self {
        let now = Utc::now();
        let status = req.status.unwrap_or(PostStatus::Draft);
        let slug = slugify(&req.title);

        Self {
            id,
            title: req.title,
            content: req.content,
            slug,
            author_id,
            category_id: req.category,
            tags: req.tags.unwrap_or_default(),
            status,
            views: 0,
            likes: 0,
            featured: false,
            published_at: (status == PostStatus::Published).then_some(now),
            created_at: now,
            updated_at: now,
        }
    }

    /// Partial update: only provided fields change. The slug is immutable,
    /// and `published_at` is set at most once.
    pub fn apply_update(&mut self, req: UpdatePostRequest) {
        if let Some(title) = req.title {
            self.title = title;
        }
        if let Some(content) = req.content {
            self.content = content;
        }
        if let Some(category) = req.category {
            self.category_id = Some(category);
        }
        if let Some(tags) = req.tags {
            self.tags = tags;
        }
        if let Some(status) = req.status {
            if status == PostStatus::Published && self.published_at.is_none() {
                self.published_at = Some(Utc::now());
            }
            self.status = status;
        }
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub status: Option<PostStatus>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub status: Option<PostStatus>,
}

/// Filters for the post listing. Values are matched verbatim; an unknown
/// status or id simply matches nothing, it is not an error.
#[derive(Debug, Default, Clone)]
pub struct PostFilter {
    pub category: Option<String>,
    pub status: Option<String>,
    pub author: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Newest,
    Oldest,
}

impl SortOrder {
    pub fn from_param(sort: Option<&str>) -> Self {
        match sort {
            Some("oldest") => Self::Oldest,
            _ => Self::Newest,
        }
    }
}

/// Populated author reference carried alongside a post.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorSummary {
    pub id: String,
    pub username: String,
    pub email: String,
}

/// Populated category reference carried alongside a post.
#[derive(Debug, Clone, Serialize)]
pub struct CategorySummary {
    pub id: String,
    pub name: String,
    pub slug: String,
}

/// A post together with its resolved weak references. The author may be
/// absent (accounts are never deleted in practice, but the reference is not
/// enforced by the storage layer).
#[derive(Debug, Clone)]
pub struct PostWithRefs {
    pub post: Post,
    pub author: Option<AuthorSummary>,
    pub category: Option<CategorySummary>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: String,
    pub title: String,
    pub content: String,
    pub slug: String,
    pub author: Option<AuthorSummary>,
    pub category: Option<CategorySummary>,
    pub tags: Vec<String>,
    pub status: PostStatus,
    pub views: i64,
    pub likes: i64,
    pub featured: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PostWithRefs> for PostResponse {
    fn from(entry: PostWithRefs) -> Self {
        let PostWithRefs {
            post,
            author,
            category,
        } = entry;

        Self {
            id: post.id,
            title: post.title,
            content: post.content,
            slug: post.slug,
            author,
            category,
            tags: post.tags,
            status: post.status,
            views: post.views,
            likes: post.likes,
            featured: post.featured,
            published_at: post.published_at,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

/// One page of the post listing plus the collection totals.
#[derive(Debug)]
pub struct PostPage {
    pub posts: Vec<PostResponse>,
    pub total: i64,
    pub page: i64,
    pub pages: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request(title: &str, status: Option<PostStatus>) -> CreatePostRequest {
        CreatePostRequest {
            title: title.to_string(),
            content: "Some content for the post".to_string(),
            category: None,
            tags: None,
            status,
        }
    }

    #[test]
    fn new_post_derives_slug_and_defaults_to_draft() {
        let post = Post::new(
            "a".repeat(24),
            "b".repeat(24),
            create_request("Hello, Quill World!", None),
        );

        assert_eq!(post.slug, "hello-quill-world");
        assert_eq!(post.status, PostStatus::Draft);
        assert_eq!(post.views, 0);
        assert_eq!(post.likes, 0);
        assert!(post.published_at.is_none());
    }

    #[test]
    fn post_created_published_gets_publish_timestamp() {
        let post = Post::new(
            "a".repeat(24),
            "b".repeat(24),
            create_request("Shipped", Some(PostStatus::Published)),
        );
        assert!(post.published_at.is_some());
    }

    #[test]
    fn slug_survives_title_update() {
        let mut post = Post::new(
            "a".repeat(24),
            "b".repeat(24),
            create_request("Original Title", None),
        );
        post.apply_update(UpdatePostRequest {
            title: Some("Completely Different".to_string()),
            ..Default::default()
        });

        assert_eq!(post.title, "Completely Different");
        assert_eq!(post.slug, "original-title");
    }

    #[test]
    fn published_at_is_set_exactly_once() {
        let mut post = Post::new(
            "a".repeat(24),
            "b".repeat(24),
            create_request("Lifecycle", None),
        );

        post.apply_update(UpdatePostRequest {
            status: Some(PostStatus::Published),
            ..Default::default()
        });
        let first = post.published_at.expect("set on first publish");

        post.apply_update(UpdatePostRequest {
            status: Some(PostStatus::Archived),
            ..Default::default()
        });
        post.apply_update(UpdatePostRequest {
            status: Some(PostStatus::Published),
            ..Default::default()
        });

        assert_eq!(post.published_at, Some(first));
    }

    #[test]
    fn partial_update_leaves_other_fields_alone() {
        let mut post = Post::new(
            "a".repeat(24),
            "b".repeat(24),
            create_request("Untouched", None),
        );
        let original_content = post.content.clone();

        post.apply_update(UpdatePostRequest {
            tags: Some(vec!["rust".to_string()]),
            ..Default::default()
        });

        assert_eq!(post.content, original_content);
        assert_eq!(post.tags, vec!["rust".to_string()]);
        assert_eq!(post.status, PostStatus::Draft);
    }

    #[test]
    fn sort_order_defaults_to_newest() {
        assert_eq!(SortOrder::from_param(None), SortOrder::Newest);
        assert_eq!(SortOrder::from_param(Some("oldest")), SortOrder::Oldest);
        assert_eq!(SortOrder::from_param(Some("anything")), SortOrder::Newest);
    }
}
