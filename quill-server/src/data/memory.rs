//! In-memory repository implementations used by service and handler tests.
//! They mirror the Postgres implementations' observable behavior, including
//! duplicate-key mapping and plain value-store counter writes.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::data::category_repository::CategoryRepository;
use crate::data::post_repository::PostRepository;
use crate::data::user_repository::UserRepository;
use crate::domain::post::{
    AuthorSummary, CategorySummary, PostFilter, PostWithRefs, SortOrder,
};
use crate::domain::validation::Pagination;
use crate::domain::{Category, DomainError, Post, User};

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
}

impl InMemoryUserRepository {
    pub fn get(&self, id: &str) -> Option<User> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: &User) -> Result<(), DomainError> {
        let mut users = self.users.lock().unwrap();
        if users
            .iter()
            .any(|u| u.email == user.email || u.username == user.username)
        {
            return Err(DomainError::Validation(
                "User with this email or username already exists".to_string(),
            ));
        }
        users.push(user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, DomainError> {
        Ok(self.get(id))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn update(&self, user: &User) -> Result<(), DomainError> {
        let mut users = self.users.lock().unwrap();
        if users
            .iter()
            .any(|u| u.id != user.id && (u.email == user.email || u.username == user.username))
        {
            return Err(DomainError::Validation(
                "User with this email or username already exists".to_string(),
            ));
        }
        match users.iter_mut().find(|u| u.id == user.id) {
            Some(existing) => {
                *existing = user.clone();
                Ok(())
            }
            None => Err(DomainError::NotFound("User not found".to_string())),
        }
    }
}

#[derive(Default)]
pub struct InMemoryCategoryRepository {
    categories: Mutex<Vec<Category>>,
}

impl InMemoryCategoryRepository {
    pub fn get(&self, id: &str) -> Option<Category> {
        self.categories
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned()
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn insert(&self, category: &Category) -> Result<(), DomainError> {
        let mut categories = self.categories.lock().unwrap();
        if categories.iter().any(|c| c.name == category.name) {
            return Err(DomainError::Validation("Category already exists".to_string()));
        }
        categories.push(category.clone());
        Ok(())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Category>, DomainError> {
        Ok(self
            .categories
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.name == name)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<Category>, DomainError> {
        let mut categories = self.categories.lock().unwrap().clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }
}

pub struct InMemoryPostRepository {
    posts: Mutex<Vec<Post>>,
    users: Arc<InMemoryUserRepository>,
    categories: Arc<InMemoryCategoryRepository>,
    /// Number of `find_by_id` calls; lets tests assert that malformed ids
    /// never reach the repository.
    pub find_calls: Mutex<usize>,
}

impl InMemoryPostRepository {
    pub fn new(
        users: Arc<InMemoryUserRepository>,
        categories: Arc<InMemoryCategoryRepository>,
    ) -> Self {
        Self {
            posts: Mutex::new(Vec::new()),
            users,
            categories,
            find_calls: Mutex::new(0),
        }
    }

    fn with_refs(&self, post: Post) -> PostWithRefs {
        let author = self.users.get(&post.author_id).map(|u| AuthorSummary {
            id: u.id,
            username: u.username,
            email: u.email,
        });
        let category = post
            .category_id
            .as_deref()
            .and_then(|id| self.categories.get(id))
            .map(|c| CategorySummary {
                id: c.id,
                name: c.name,
                slug: c.slug,
            });

        PostWithRefs {
            post,
            author,
            category,
        }
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn insert(&self, post: &Post) -> Result<(), DomainError> {
        let mut posts = self.posts.lock().unwrap();
        if posts.iter().any(|p| p.slug == post.slug) {
            return Err(DomainError::Database("duplicate key: posts_slug".to_string()));
        }
        posts.push(post.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<PostWithRefs>, DomainError> {
        *self.find_calls.lock().unwrap() += 1;
        let post = self
            .posts
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned();
        Ok(post.map(|p| self.with_refs(p)))
    }

    async fn update(&self, post: &Post) -> Result<(), DomainError> {
        let mut posts = self.posts.lock().unwrap();
        match posts.iter_mut().find(|p| p.id == post.id) {
            Some(existing) => {
                existing.title = post.title.clone();
                existing.content = post.content.clone();
                existing.category_id = post.category_id.clone();
                existing.tags = post.tags.clone();
                existing.status = post.status;
                existing.published_at = post.published_at;
                existing.updated_at = post.updated_at;
                Ok(())
            }
            None => Err(DomainError::NotFound("Post not found".to_string())),
        }
    }

    async fn delete(&self, id: &str) -> Result<(), DomainError> {
        let mut posts = self.posts.lock().unwrap();
        let before = posts.len();
        posts.retain(|p| p.id != id);
        if posts.len() == before {
            return Err(DomainError::NotFound("Post not found".to_string()));
        }
        Ok(())
    }

    async fn list(
        &self,
        filter: &PostFilter,
        pagination: Pagination,
        sort: SortOrder,
    ) -> Result<(Vec<PostWithRefs>, i64), DomainError> {
        let mut matched: Vec<Post> = self
            .posts
            .lock()
            .unwrap()
            .iter()
            .filter(|p| {
                filter
                    .category
                    .as_deref()
                    .map_or(true, |c| p.category_id.as_deref() == Some(c))
                    && filter
                        .status
                        .as_deref()
                        .map_or(true, |s| p.status.as_str() == s)
                    && filter
                        .author
                        .as_deref()
                        .map_or(true, |a| p.author_id == a)
            })
            .cloned()
            .collect();

        let total = matched.len() as i64;

        match sort {
            SortOrder::Newest => matched.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            SortOrder::Oldest => matched.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        }

        let page: Vec<PostWithRefs> = matched
            .into_iter()
            .skip(pagination.skip() as usize)
            .take(pagination.limit as usize)
            .map(|p| self.with_refs(p))
            .collect();

        Ok((page, total))
    }

    async fn set_views(&self, id: &str, views: i64) -> Result<(), DomainError> {
        if let Some(post) = self.posts.lock().unwrap().iter_mut().find(|p| p.id == id) {
            post.views = views;
        }
        Ok(())
    }

    async fn set_likes(&self, id: &str, likes: i64) -> Result<(), DomainError> {
        if let Some(post) = self.posts.lock().unwrap().iter_mut().find(|p| p.id == id) {
            post.likes = likes;
        }
        Ok(())
    }
}
