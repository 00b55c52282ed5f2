pub mod extractors;
pub mod http_handlers;

use actix_web::{http::StatusCode, web, HttpResponse, ResponseError};
use serde::Serialize;

use crate::domain::DomainError;

/// The uniform error envelope: every failed request, whatever the layer it
/// failed in, renders as `{success: false, error: <message>}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

impl ResponseError for DomainError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        // Server-side failures keep their detail in the logs only.
        let message = match self {
            DomainError::Database(_) | DomainError::Internal(_) => {
                tracing::error!("Request failed: {}", self);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(ResponseError::status_code(self)).json(ErrorBody::new(message))
    }
}

/// Malformed JSON bodies get the same envelope as every other 400.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        DomainError::Validation(format!("Invalid request body: {err}")).into()
    })
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(http_handlers::health))
        .service(
            web::scope("/api/auth")
                .route("/register", web::post().to(http_handlers::register))
                .route("/login", web::post().to(http_handlers::login))
                .route("/me", web::get().to(http_handlers::me))
                .route("/me", web::put().to(http_handlers::update_profile))
                .route("/password", web::put().to(http_handlers::change_password)),
        )
        .service(
            web::scope("/api/posts")
                .route("", web::get().to(http_handlers::list_posts))
                .route("", web::post().to(http_handlers::create_post))
                .route("/{id}", web::get().to(http_handlers::get_post))
                .route("/{id}", web::put().to(http_handlers::update_post))
                .route("/{id}", web::delete().to(http_handlers::delete_post))
                .route("/{id}/like", web::put().to(http_handlers::like_post)),
        )
        .service(
            web::scope("/api/categories")
                .route("", web::get().to(http_handlers::list_categories))
                .route("", web::post().to(http_handlers::create_category)),
        );
}
