use std::sync::Arc;

use crate::data::post_repository::PostRepository;
use crate::domain::post::{
    CreatePostRequest, PostFilter, PostPage, PostResponse, SortOrder, UpdatePostRequest,
};
use crate::domain::user::{Role, User};
use crate::domain::validation::{validate_object_id, Pagination};
use crate::domain::{DomainError, Post};
use crate::infrastructure::object_id;

pub struct PostService {
    post_repo: Arc<dyn PostRepository>,
}

/// Id format is checked before any repository access.
fn require_post_id(id: &str) -> Result<(), DomainError> {
    if validate_object_id(id) {
        Ok(())
    } else {
        Err(DomainError::Validation("Invalid post ID".to_string()))
    }
}

impl PostService {
    pub fn new(post_repo: Arc<dyn PostRepository>) -> Self {
        Self { post_repo }
    }

    pub async fn list_posts(
        &self,
        filter: PostFilter,
        pagination: Pagination,
        sort: SortOrder,
    ) -> Result<PostPage, DomainError> {
        let (entries, total) = self.post_repo.list(&filter, pagination, sort).await?;

        Ok(PostPage {
            posts: entries.into_iter().map(PostResponse::from).collect(),
            total,
            page: pagination.page,
            pages: pagination.pages(total),
        })
    }

    /// Fetch by id. Every call bumps the view counter with a read-then-write
    /// round trip; concurrent readers can lose increments, which is accepted.
    pub async fn get_post(&self, id: &str) -> Result<PostResponse, DomainError> {
        require_post_id(id)?;

        let mut entry = self
            .post_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Post not found".to_string()))?;

        entry.post.views += 1;
        self.post_repo.set_views(id, entry.post.views).await?;

        Ok(PostResponse::from(entry))
    }

    pub async fn create_post(
        &self,
        author: &User,
        req: CreatePostRequest,
    ) -> Result<PostResponse, DomainError> {
        if req.title.trim().is_empty() || req.content.trim().is_empty() {
            return Err(DomainError::Validation(
                "Please provide title and content".to_string(),
            ));
        }

        let post = Post::new(object_id::generate(), author.id.clone(), req);
        self.post_repo.insert(&post).await?;

        tracing::info!("Post created: {} by {}", post.slug, author.username);

        // Re-read to populate the author and category references.
        self.post_repo
            .find_by_id(&post.id)
            .await?
            .map(PostResponse::from)
            .ok_or_else(|| DomainError::Internal("Post missing after insert".to_string()))
    }

    pub async fn update_post(
        &self,
        user: &User,
        id: &str,
        req: UpdatePostRequest,
    ) -> Result<PostResponse, DomainError> {
        require_post_id(id)?;

        let mut entry = self
            .post_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Post not found".to_string()))?;

        if entry.post.author_id != user.id && user.role.authorize(&[Role::Admin]).is_err() {
            tracing::warn!(
                "User {} attempted to update post {} owned by {}",
                user.id,
                id,
                entry.post.author_id
            );
            return Err(DomainError::Forbidden(
                "Not authorized to update this post".to_string(),
            ));
        }

        entry.post.apply_update(req);
        self.post_repo.update(&entry.post).await?;

        tracing::info!("Post updated: {} by {}", id, user.username);

        self.post_repo
            .find_by_id(id)
            .await?
            .map(PostResponse::from)
            .ok_or_else(|| DomainError::NotFound("Post not found".to_string()))
    }

    pub async fn delete_post(&self, user: &User, id: &str) -> Result<(), DomainError> {
        require_post_id(id)?;

        let entry = self
            .post_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Post not found".to_string()))?;

        if entry.post.author_id != user.id && user.role.authorize(&[Role::Admin]).is_err() {
            tracing::warn!(
                "User {} attempted to delete post {} owned by {}",
                user.id,
                id,
                entry.post.author_id
            );
            return Err(DomainError::Forbidden(
                "Not authorized to delete this post".to_string(),
            ));
        }

        self.post_repo.delete(id).await?;
        tracing::info!("Post deleted: {} by {}", id, user.username);

        Ok(())
    }

    /// Likes are a bare counter: no dedup, no cap, no unlike. Same
    /// read-then-write pattern as views.
    pub async fn like_post(&self, id: &str) -> Result<i64, DomainError> {
        require_post_id(id)?;

        let mut entry = self
            .post_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Post not found".to_string()))?;

        entry.post.likes += 1;
        self.post_repo.set_likes(id, entry.post.likes).await?;

        Ok(entry.post.likes)
    }
}
