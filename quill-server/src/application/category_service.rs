use std::sync::Arc;

use crate::data::category_repository::CategoryRepository;
use crate::domain::category::CreateCategoryRequest;
use crate::domain::user::{Role, User};
use crate::domain::{Category, DomainError};
use crate::infrastructure::object_id;

pub struct CategoryService {
    category_repo: Arc<dyn CategoryRepository>,
}

impl CategoryService {
    pub fn new(category_repo: Arc<dyn CategoryRepository>) -> Self {
        Self { category_repo }
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>, DomainError> {
        self.category_repo.list().await
    }

    /// Admin only, enforced through the role gate.
    pub async fn create_category(
        &self,
        user: &User,
        req: CreateCategoryRequest,
    ) -> Result<Category, DomainError> {
        user.role.authorize(&[Role::Admin])?;

        if req.name.trim().is_empty() {
            return Err(DomainError::Validation(
                "Please provide a category name".to_string(),
            ));
        }

        if self.category_repo.find_by_name(&req.name).await?.is_some() {
            return Err(DomainError::Validation("Category already exists".to_string()));
        }

        let category = Category::new(object_id::generate(), req);
        self.category_repo.insert(&category).await?;

        tracing::info!("Category created: {}", category.slug);
        Ok(category)
    }
}
