pub mod category;
pub mod error;
pub mod post;
pub mod slug;
pub mod user;
pub mod validation;

pub use category::Category;
pub use error::DomainError;
pub use post::Post;
pub use user::User;
