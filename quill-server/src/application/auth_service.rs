use std::sync::Arc;

use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

use crate::data::user_repository::UserRepository;
use crate::domain::user::{
    ChangePasswordRequest, LoginRequest, RegisterRequest, UpdateProfileRequest, User, UserResponse,
};
use crate::domain::validation::validate_email;
use crate::domain::DomainError;
use crate::infrastructure::jwt::TokenService;
use crate::infrastructure::object_id;

pub struct AuthService {
    user_repo: Arc<dyn UserRepository>,
    tokens: Arc<TokenService>,
}

pub fn hash_password(password: &str) -> Result<String, DomainError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            tracing::error!("Password hashing failed: {}", e);
            DomainError::Internal(format!("Password hashing failed: {}", e))
        })
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::error!("Invalid password hash format: {}", e);
            false
        }
    }
}

impl AuthService {
    pub fn new(user_repo: Arc<dyn UserRepository>, tokens: Arc<TokenService>) -> Self {
        Self { user_repo, tokens }
    }

    pub async fn register(
        &self,
        req: RegisterRequest,
    ) -> Result<(String, UserResponse), DomainError> {
        if req.username.is_empty() || req.email.is_empty() || req.password.is_empty() {
            return Err(DomainError::Validation(
                "Please provide all required fields".to_string(),
            ));
        }
        if !validate_email(&req.email) {
            return Err(DomainError::Validation(
                "Please provide a valid email".to_string(),
            ));
        }

        let email_taken = self.user_repo.find_by_email(&req.email).await?.is_some();
        let username_taken = self
            .user_repo
            .find_by_username(&req.username)
            .await?
            .is_some();
        if email_taken || username_taken {
            tracing::warn!("Registration rejected: duplicate email or username");
            return Err(DomainError::Validation(
                "User with this email or username already exists".to_string(),
            ));
        }

        let password_hash = hash_password(&req.password)?;
        let user = User::new(object_id::generate(), req.username, req.email, password_hash);
        self.user_repo.insert(&user).await?;

        let token = self.tokens.issue(&user)?;
        tracing::info!("User registered: {} ({})", user.username, user.id);

        Ok((token, UserResponse::from(user)))
    }

    pub async fn login(&self, req: LoginRequest) -> Result<(String, UserResponse), DomainError> {
        if req.email.is_empty() || req.password.is_empty() {
            return Err(DomainError::Validation(
                "Please provide email and password".to_string(),
            ));
        }

        let user = match self.user_repo.find_by_email(&req.email).await? {
            Some(user) => user,
            None => {
                tracing::warn!("Failed login attempt for email: {}", req.email);
                return Err(DomainError::Unauthorized("Invalid credentials".to_string()));
            }
        };

        if !verify_password(&req.password, &user.password_hash) {
            tracing::warn!("Failed login attempt for user: {}", user.username);
            return Err(DomainError::Unauthorized("Invalid credentials".to_string()));
        }

        if !user.is_active {
            return Err(DomainError::Unauthorized("Account is inactive".to_string()));
        }

        let token = self.tokens.issue(&user)?;
        tracing::info!("User logged in: {} ({})", user.username, user.id);

        Ok((token, UserResponse::from(user)))
    }

    /// Applies only the provided fields; the email is re-validated on change.
    pub async fn update_profile(
        &self,
        mut user: User,
        req: UpdateProfileRequest,
    ) -> Result<UserResponse, DomainError> {
        if let Some(username) = req.username.filter(|u| !u.is_empty()) {
            user.username = username;
        }
        if let Some(email) = req.email.filter(|e| !e.is_empty()) {
            if !validate_email(&email) {
                return Err(DomainError::Validation(
                    "Please provide a valid email".to_string(),
                ));
            }
            user.email = email;
        }
        user.updated_at = chrono::Utc::now();

        self.user_repo.update(&user).await?;
        tracing::info!("User profile updated: {} ({})", user.username, user.id);

        Ok(UserResponse::from(user))
    }

    pub async fn change_password(
        &self,
        mut user: User,
        req: ChangePasswordRequest,
    ) -> Result<(), DomainError> {
        if req.current_password.is_empty() || req.new_password.is_empty() {
            return Err(DomainError::Validation(
                "Please provide current and new password".to_string(),
            ));
        }

        if !verify_password(&req.current_password, &user.password_hash) {
            return Err(DomainError::Unauthorized(
                "Current password is incorrect".to_string(),
            ));
        }

        user.password_hash = hash_password(&req.new_password)?;
        user.updated_at = chrono::Utc::now();
        self.user_repo.update(&user).await?;

        tracing::info!("Password changed for user: {} ({})", user.username, user.id);
        Ok(())
    }
}
