use dotenvy::dotenv;
use std::sync::Arc;

mod application;
mod data;
mod domain;
mod infrastructure;
mod presentation;

use application::{AuthService, CategoryService, PostService};
use data::category_repository::{CategoryRepository, PostgresCategoryRepository};
use data::post_repository::{PostRepository, PostgresPostRepository};
use data::user_repository::{PostgresUserRepository, UserRepository};
use infrastructure::{
    database::{create_pool, run_migrations},
    jwt::{TokenService, DEFAULT_EXPIRE_DAYS},
    logging::{init_logging, install_panic_hook},
};
use presentation::{configure, http_handlers, json_config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logging
    init_logging();

    // No recovery from uncaught panics: log and terminate
    install_panic_hook();

    // Get configuration from environment
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let jwt_secret = std::env::var("JWT_SECRET").expect("JWT_SECRET must be set");
    let http_port = std::env::var("HTTP_PORT").unwrap_or_else(|_| "5000".to_string());

    let expire_days: i64 = std::env::var("JWT_EXPIRE_DAYS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_EXPIRE_DAYS);

    let cors_allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".to_string());

    let http_addr = format!("0.0.0.0:{}", http_port);

    tracing::info!("Starting quill server...");
    tracing::info!("HTTP server will listen on {}", http_addr);
    tracing::info!("CORS allowed origins: {}", cors_allowed_origins);

    // Initialize database connection pool
    tracing::info!("Connecting to database...");
    let pool = create_pool(&database_url).await?;

    // Run database migrations
    tracing::info!("Running database migrations...");
    run_migrations(&pool).await?;
    tracing::info!("Migrations completed successfully");

    // Initialize services
    tracing::info!("Initializing services...");

    let tokens = Arc::new(TokenService::new(
        &jwt_secret,
        chrono::Duration::days(expire_days),
    ));

    // Repositories, behind trait objects so handlers and extractors share them
    let user_repo: Arc<dyn UserRepository> =
        Arc::new(PostgresUserRepository::new(pool.clone()));
    let post_repo: Arc<dyn PostRepository> =
        Arc::new(PostgresPostRepository::new(pool.clone()));
    let category_repo: Arc<dyn CategoryRepository> =
        Arc::new(PostgresCategoryRepository::new(pool.clone()));

    // Application services
    let auth_service = Arc::new(AuthService::new(user_repo.clone(), tokens.clone()));
    let post_service = Arc::new(PostService::new(post_repo));
    let category_service = Arc::new(CategoryService::new(category_repo));

    tracing::info!("Services initialized successfully");

    run_http_server(
        http_addr,
        auth_service,
        post_service,
        category_service,
        tokens,
        user_repo,
        cors_allowed_origins,
    )
    .await
}

/// Configure CORS for the HTTP server with allowed origins from .env
fn configure_cors(allowed_origins: &str) -> actix_cors::Cors {
    use actix_cors::Cors;
    use actix_web::http::header;

    let origins: Vec<&str> = allowed_origins.split(',').map(|s| s.trim()).collect();

    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
        ])
        .expose_headers(vec![header::AUTHORIZATION])
        .max_age(3600);

    for origin in origins {
        if !origin.is_empty() {
            cors = cors.allowed_origin(origin);
            tracing::debug!("Added allowed CORS origin: {}", origin);
        }
    }

    cors
}

#[allow(clippy::too_many_arguments)]
async fn run_http_server(
    addr: String,
    auth_service: Arc<AuthService>,
    post_service: Arc<PostService>,
    category_service: Arc<CategoryService>,
    tokens: Arc<TokenService>,
    user_repo: Arc<dyn UserRepository>,
    cors_allowed_origins: String,
) -> anyhow::Result<()> {
    use actix_web::{middleware::Logger, web, App, HttpServer};

    tracing::info!("Configuring HTTP server...");

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(configure_cors(&cors_allowed_origins))
            .app_data(json_config())
            .app_data(web::Data::new(auth_service.clone()))
            .app_data(web::Data::new(post_service.clone()))
            .app_data(web::Data::new(category_service.clone()))
            .app_data(web::Data::new(tokens.clone()))
            .app_data(web::Data::new(user_repo.clone()))
            .configure(configure)
            .default_service(web::route().to(http_handlers::not_found))
    })
    .bind(&addr)?
    .run();

    tracing::info!("HTTP server running on {}", addr);

    server.await?;

    Ok(())
}
