//! Typed HTTP client for the quill API.
//!
//! `HttpClient` is the low-level surface; `QuillClient` wraps it behind a
//! shared handle so it can be cloned across tasks while keeping one token.

pub mod error;
pub mod http_client;
pub mod models;

use std::sync::Arc;

use tokio::sync::Mutex;

pub use error::QuillClientError;
pub use models::*;

/// Cloneable client handle. All clones share the same session token.
#[derive(Debug, Clone)]
pub struct QuillClient {
    inner: Arc<Mutex<http_client::HttpClient>>,
}

impl QuillClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(http_client::HttpClient::new(base_url))),
        }
    }

    /// Set the JWT token for authenticated requests
    pub async fn set_token(&self, token: String) {
        self.inner.lock().await.set_token(token);
    }

    /// Get the current JWT token
    pub async fn token(&self) -> Option<String> {
        self.inner.lock().await.token().cloned()
    }

    /// Clear the current JWT token (logout)
    pub async fn clear_token(&self) {
        self.inner.lock().await.clear_token();
    }

    pub async fn register(
        &self,
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<AuthResponse, QuillClientError> {
        let req = RegisterRequest {
            username: username.into(),
            email: email.into(),
            password: password.into(),
        };
        self.inner.lock().await.register(req).await
    }

    pub async fn login(
        &self,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<AuthResponse, QuillClientError> {
        let req = LoginRequest {
            email: email.into(),
            password: password.into(),
        };
        self.inner.lock().await.login(req).await
    }

    pub async fn me(&self) -> Result<UserResponse, QuillClientError> {
        self.inner.lock().await.me().await
    }

    pub async fn update_profile(
        &self,
        req: UpdateProfileRequest,
    ) -> Result<UserResponse, QuillClientError> {
        self.inner.lock().await.update_profile(req).await
    }

    pub async fn change_password(
        &self,
        current_password: impl Into<String>,
        new_password: impl Into<String>,
    ) -> Result<MessageResponse, QuillClientError> {
        let req = ChangePasswordRequest {
            current_password: current_password.into(),
            new_password: new_password.into(),
        };
        self.inner.lock().await.change_password(req).await
    }

    pub async fn list_posts(
        &self,
        params: &ListPostsParams,
    ) -> Result<PostListResponse, QuillClientError> {
        self.inner.lock().await.list_posts(params).await
    }

    pub async fn get_post(&self, id: &str) -> Result<PostResponse, QuillClientError> {
        self.inner.lock().await.get_post(id).await
    }

    pub async fn create_post(
        &self,
        req: CreatePostRequest,
    ) -> Result<PostResponse, QuillClientError> {
        self.inner.lock().await.create_post(req).await
    }

    pub async fn update_post(
        &self,
        id: &str,
        req: UpdatePostRequest,
    ) -> Result<PostResponse, QuillClientError> {
        self.inner.lock().await.update_post(id, req).await
    }

    pub async fn delete_post(&self, id: &str) -> Result<MessageResponse, QuillClientError> {
        self.inner.lock().await.delete_post(id).await
    }

    pub async fn like_post(&self, id: &str) -> Result<LikesResponse, QuillClientError> {
        self.inner.lock().await.like_post(id).await
    }

    pub async fn list_categories(&self) -> Result<CategoryListResponse, QuillClientError> {
        self.inner.lock().await.list_categories().await
    }

    pub async fn create_category(
        &self,
        req: CreateCategoryRequest,
    ) -> Result<CategoryResponse, QuillClientError> {
        self.inner.lock().await.create_category(req).await
    }

    pub async fn health(&self) -> Result<HealthResponse, QuillClientError> {
        self.inner.lock().await.health().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn clones_share_one_token() {
        let a = QuillClient::new("http://localhost:5000");
        let b = a.clone();

        a.set_token("shared".to_string()).await;
        assert_eq!(b.token().await.as_deref(), Some("shared"));

        b.clear_token().await;
        assert!(a.token().await.is_none());
    }
}
