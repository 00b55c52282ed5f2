use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::QuillClientError;
use crate::models::*;

/// A 2xx body that fails to parse is a malformed server response, not a
/// transport failure.
fn decode_body<T: DeserializeOwned>(body: &str) -> Result<T, QuillClientError> {
    serde_json::from_str(body).map_err(|e| QuillClientError::Serialization(e.to_string()))
}

#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.into(),
            token: None,
        }
    }

    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    pub fn clear_token(&mut self) {
        self.token = None;
    }

    pub fn token(&self) -> Option<&String> {
        self.token.as_ref()
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut builder = self.client.request(method, self.url(path));
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    /// Sends the request and decodes the body. Non-2xx responses are turned
    /// into `Api` errors carrying the server's `error` field when the body
    /// is a well-formed envelope, or a generic status message otherwise.
    async fn send<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T, QuillClientError> {
        let response = builder.send().await?;
        let status = response.status();
        tracing::debug!("Response status: {}", status);

        if status.is_success() {
            let body = response.text().await?;
            return decode_body(&body);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorEnvelope>(&body)
            .map(|e| e.error)
            .unwrap_or_else(|_| format!("HTTP error! status: {}", status.as_u16()));

        Err(QuillClientError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, QuillClientError> {
        self.send(self.request(Method::GET, path)).await
    }

    async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, QuillClientError> {
        self.send(self.request(Method::POST, path).json(body)).await
    }

    async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, QuillClientError> {
        self.send(self.request(Method::PUT, path).json(body)).await
    }

    async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, QuillClientError> {
        self.send(self.request(Method::DELETE, path)).await
    }

    // ============== Auth ==============

    /// Registers a new account and remembers the returned token.
    pub async fn register(
        &mut self,
        req: RegisterRequest,
    ) -> Result<AuthResponse, QuillClientError> {
        tracing::debug!("Registering user: {}", req.username);
        let response: AuthResponse = self.post("/api/auth/register", &req).await?;
        self.set_token(response.token.clone());
        Ok(response)
    }

    /// Logs in and remembers the returned token.
    pub async fn login(&mut self, req: LoginRequest) -> Result<AuthResponse, QuillClientError> {
        tracing::debug!("Logging in: {}", req.email);
        let response: AuthResponse = self.post("/api/auth/login", &req).await?;
        self.set_token(response.token.clone());
        Ok(response)
    }

    pub async fn me(&self) -> Result<UserResponse, QuillClientError> {
        self.get("/api/auth/me").await
    }

    pub async fn update_profile(
        &self,
        req: UpdateProfileRequest,
    ) -> Result<UserResponse, QuillClientError> {
        self.put("/api/auth/me", &req).await
    }

    pub async fn change_password(
        &self,
        req: ChangePasswordRequest,
    ) -> Result<MessageResponse, QuillClientError> {
        self.put("/api/auth/password", &req).await
    }

    // ============== Posts ==============

    pub async fn list_posts(
        &self,
        params: &ListPostsParams,
    ) -> Result<PostListResponse, QuillClientError> {
        let builder = self
            .request(Method::GET, "/api/posts")
            .query(&params.to_query());
        self.send(builder).await
    }

    pub async fn get_post(&self, id: &str) -> Result<PostResponse, QuillClientError> {
        self.get(&format!("/api/posts/{}", id)).await
    }

    pub async fn create_post(
        &self,
        req: CreatePostRequest,
    ) -> Result<PostResponse, QuillClientError> {
        self.post("/api/posts", &req).await
    }

    pub async fn update_post(
        &self,
        id: &str,
        req: UpdatePostRequest,
    ) -> Result<PostResponse, QuillClientError> {
        self.put(&format!("/api/posts/{}", id), &req).await
    }

    pub async fn delete_post(&self, id: &str) -> Result<MessageResponse, QuillClientError> {
        self.delete(&format!("/api/posts/{}", id)).await
    }

    pub async fn like_post(&self, id: &str) -> Result<LikesResponse, QuillClientError> {
        self.send(self.request(Method::PUT, &format!("/api/posts/{}/like", id)))
            .await
    }

    // ============== Categories ==============

    pub async fn list_categories(&self) -> Result<CategoryListResponse, QuillClientError> {
        self.get("/api/categories").await
    }

    pub async fn create_category(
        &self,
        req: CreateCategoryRequest,
    ) -> Result<CategoryResponse, QuillClientError> {
        self.post("/api/categories", &req).await
    }

    // ============== Misc ==============

    pub async fn health(&self) -> Result<HealthResponse, QuillClientError> {
        self.get("/health").await
    }
}
