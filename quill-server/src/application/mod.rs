pub mod auth_service;
pub mod category_service;
pub mod post_service;

pub use auth_service::AuthService;
pub use category_service::CategoryService;
pub use post_service::PostService;
