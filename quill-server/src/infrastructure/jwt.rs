use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::domain::user::{Role, User};
use crate::domain::DomainError;

pub const DEFAULT_EXPIRE_DAYS: i64 = 7;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: String,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub exp: usize,
}

/// Issues and verifies the signed, time-limited bearer credentials used by
/// the authentication extractors.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        if secret.len() < 32 {
            tracing::warn!(
                "JWT secret is short ({} chars); 32+ recommended",
                secret.len()
            );
        }

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    pub fn issue(&self, user: &User) -> Result<String, DomainError> {
        let exp = Utc::now()
            .checked_add_signed(self.ttl)
            .unwrap_or_else(Utc::now)
            .timestamp() as usize;

        let claims = Claims {
            sub: user.id.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role,
            exp,
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to encode token: {}", e);
            DomainError::Internal(format!("Failed to generate token: {}", e))
        })
    }

    pub fn verify(&self, token: &str) -> Result<Claims, DomainError> {
        let mut validation = Validation::default();
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("Token verification failed: {}", e);
                DomainError::Unauthorized("Invalid or expired token.".to_string())
            })
    }
}

/// Parse a `Bearer <token>` authorization header. Anything else, including a
/// missing header, yields `None`.
pub fn extract_token(header: Option<&str>) -> Option<&str> {
    header.and_then(|h| h.strip_prefix("Bearer "))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-that-is-long-enough!";

    fn test_user() -> User {
        User::new(
            "507f1f77bcf86cd799439011".to_string(),
            "alice".to_string(),
            "alice@example.com".to_string(),
            "hash".to_string(),
        )
    }

    #[test]
    fn issued_token_round_trips_identity_claims() {
        let service = TokenService::new(SECRET, Duration::days(DEFAULT_EXPIRE_DAYS));
        let user = test_user();

        let token = service.issue(&user).unwrap();
        let claims = service.verify(&token).unwrap();

        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.username, user.username);
        assert_eq!(claims.email, user.email);
        assert_eq!(claims.role, Role::User);
    }

    #[test]
    fn expired_token_fails_verification() {
        let service = TokenService::new(SECRET, Duration::seconds(-120));
        let token = service.issue(&test_user()).unwrap();

        let err = service.verify(&token).unwrap_err();
        assert_eq!(err.http_status(), 401);
    }

    #[test]
    fn token_signed_with_other_secret_fails() {
        let issuer = TokenService::new("another-secret-also-long-enough-here", Duration::days(1));
        let verifier = TokenService::new(SECRET, Duration::days(1));

        let token = issuer.issue(&test_user()).unwrap();
        assert!(verifier.verify(&token).is_err());
    }

    #[test]
    fn extract_token_requires_bearer_scheme() {
        assert_eq!(extract_token(Some("Bearer abc.def.ghi")), Some("abc.def.ghi"));
        assert_eq!(extract_token(Some("bearer abc")), None);
        assert_eq!(extract_token(Some("Basic abc")), None);
        assert_eq!(extract_token(Some("Bearerabc")), None);
        assert_eq!(extract_token(Some("")), None);
        assert_eq!(extract_token(None), None);
    }
}
