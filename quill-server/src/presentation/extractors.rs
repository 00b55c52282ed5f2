use std::sync::Arc;

use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{web, FromRequest, HttpRequest};
use futures::future::LocalBoxFuture;

use crate::data::user_repository::UserRepository;
use crate::domain::{DomainError, User};
use crate::infrastructure::jwt::{extract_token, TokenService};

/// Resolve the bearer credential on a request to an active user record.
/// Failure modes are distinguished by message so clients can tell a missing
/// token from a stale one.
async fn authenticate(req: &HttpRequest) -> Result<User, DomainError> {
    let tokens = req
        .app_data::<web::Data<Arc<TokenService>>>()
        .ok_or_else(|| DomainError::Internal("Token service not configured".to_string()))?;
    let users = req
        .app_data::<web::Data<Arc<dyn UserRepository>>>()
        .ok_or_else(|| DomainError::Internal("User repository not configured".to_string()))?;

    let header_value = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let token = extract_token(header_value).ok_or_else(|| {
        DomainError::Unauthorized("Access denied. No token provided.".to_string())
    })?;

    let claims = tokens.verify(token)?;

    let user = users
        .find_by_id(&claims.sub)
        .await?
        .ok_or_else(|| DomainError::Unauthorized("Invalid token. User not found.".to_string()))?;

    if !user.is_active {
        tracing::warn!("Authentication failed: inactive account {}", user.id);
        return Err(DomainError::Unauthorized("Account is inactive.".to_string()));
    }

    Ok(user)
}

/// Mandatory authentication: rejects the request with a 401 envelope unless
/// a valid token resolves to an active user.
pub struct AuthUser(pub User);

impl FromRequest for AuthUser {
    type Error = DomainError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move { authenticate(&req).await.map(AuthUser) })
    }
}

/// Optional authentication: any failure silently continues without an
/// attached identity.
pub struct MaybeAuthUser(pub Option<User>);

impl FromRequest for MaybeAuthUser {
    type Error = DomainError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move { Ok(MaybeAuthUser(authenticate(&req).await.ok())) })
    }
}
