use std::sync::Arc;

use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::{AuthService, CategoryService, PostService};
use crate::domain::category::CreateCategoryRequest;
use crate::domain::post::{
    CreatePostRequest, PostFilter, PostResponse, SortOrder, UpdatePostRequest,
};
use crate::domain::user::{
    ChangePasswordRequest, LoginRequest, RegisterRequest, UpdateProfileRequest, UserResponse,
};
use crate::domain::validation::Pagination;
use crate::domain::{Category, DomainError};
use crate::presentation::extractors::{AuthUser, MaybeAuthUser};
use crate::presentation::ErrorBody;

// ============== Response envelopes ==============

#[derive(Serialize)]
struct AuthBody {
    success: bool,
    token: String,
    user: UserResponse,
}

#[derive(Serialize)]
struct UserBody {
    success: bool,
    user: UserResponse,
}

#[derive(Serialize)]
struct MessageBody {
    success: bool,
    message: &'static str,
}

#[derive(Serialize)]
struct PostBody {
    success: bool,
    data: PostResponse,
}

#[derive(Serialize)]
struct PostListBody {
    success: bool,
    count: usize,
    total: i64,
    page: i64,
    pages: i64,
    data: Vec<PostResponse>,
}

#[derive(Serialize)]
struct LikesBody {
    success: bool,
    likes: i64,
}

#[derive(Serialize)]
struct CategoryBody {
    success: bool,
    data: Category,
}

#[derive(Serialize)]
struct CategoryListBody {
    success: bool,
    count: usize,
    data: Vec<Category>,
}

#[derive(Serialize)]
struct HealthBody {
    success: bool,
    message: &'static str,
    timestamp: DateTime<Utc>,
}

// ============== Auth handlers ==============

pub async fn register(
    auth_service: web::Data<Arc<AuthService>>,
    req: web::Json<RegisterRequest>,
) -> Result<HttpResponse, DomainError> {
    let (token, user) = auth_service.register(req.into_inner()).await?;
    Ok(HttpResponse::Created().json(AuthBody {
        success: true,
        token,
        user,
    }))
}

pub async fn login(
    auth_service: web::Data<Arc<AuthService>>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse, DomainError> {
    let (token, user) = auth_service.login(req.into_inner()).await?;
    Ok(HttpResponse::Ok().json(AuthBody {
        success: true,
        token,
        user,
    }))
}

pub async fn me(user: AuthUser) -> Result<HttpResponse, DomainError> {
    Ok(HttpResponse::Ok().json(UserBody {
        success: true,
        user: user.0.into(),
    }))
}

pub async fn update_profile(
    user: AuthUser,
    auth_service: web::Data<Arc<AuthService>>,
    req: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse, DomainError> {
    let updated = auth_service.update_profile(user.0, req.into_inner()).await?;
    Ok(HttpResponse::Ok().json(UserBody {
        success: true,
        user: updated,
    }))
}

pub async fn change_password(
    user: AuthUser,
    auth_service: web::Data<Arc<AuthService>>,
    req: web::Json<ChangePasswordRequest>,
) -> Result<HttpResponse, DomainError> {
    auth_service.change_password(user.0, req.into_inner()).await?;
    Ok(HttpResponse::Ok().json(MessageBody {
        success: true,
        message: "Password updated successfully",
    }))
}

// ============== Post handlers ==============

#[derive(Debug, Deserialize)]
pub struct ListPostsQuery {
    pub category: Option<String>,
    pub status: Option<String>,
    pub author: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
    pub sort: Option<String>,
}

pub async fn list_posts(
    _user: MaybeAuthUser,
    post_service: web::Data<Arc<PostService>>,
    query: web::Query<ListPostsQuery>,
) -> Result<HttpResponse, DomainError> {
    let query = query.into_inner();
    let filter = PostFilter {
        category: query.category,
        status: query.status,
        author: query.author,
    };
    let pagination = Pagination::from_params(query.page.as_deref(), query.limit.as_deref());
    let sort = SortOrder::from_param(query.sort.as_deref());

    let page = post_service.list_posts(filter, pagination, sort).await?;

    Ok(HttpResponse::Ok().json(PostListBody {
        success: true,
        count: page.posts.len(),
        total: page.total,
        page: page.page,
        pages: page.pages,
        data: page.posts,
    }))
}

pub async fn get_post(
    _user: MaybeAuthUser,
    post_service: web::Data<Arc<PostService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, DomainError> {
    let post = post_service.get_post(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(PostBody {
        success: true,
        data: post,
    }))
}

pub async fn create_post(
    user: AuthUser,
    post_service: web::Data<Arc<PostService>>,
    req: web::Json<CreatePostRequest>,
) -> Result<HttpResponse, DomainError> {
    let post = post_service.create_post(&user.0, req.into_inner()).await?;
    Ok(HttpResponse::Created().json(PostBody {
        success: true,
        data: post,
    }))
}

pub async fn update_post(
    user: AuthUser,
    post_service: web::Data<Arc<PostService>>,
    path: web::Path<String>,
    req: web::Json<UpdatePostRequest>,
) -> Result<HttpResponse, DomainError> {
    let post = post_service
        .update_post(&user.0, &path.into_inner(), req.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(PostBody {
        success: true,
        data: post,
    }))
}

pub async fn delete_post(
    user: AuthUser,
    post_service: web::Data<Arc<PostService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, DomainError> {
    post_service.delete_post(&user.0, &path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(MessageBody {
        success: true,
        message: "Post deleted successfully",
    }))
}

pub async fn like_post(
    _user: AuthUser,
    post_service: web::Data<Arc<PostService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, DomainError> {
    let likes = post_service.like_post(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(LikesBody {
        success: true,
        likes,
    }))
}

// ============== Category handlers ==============

pub async fn list_categories(
    category_service: web::Data<Arc<CategoryService>>,
) -> Result<HttpResponse, DomainError> {
    let categories = category_service.list_categories().await?;
    Ok(HttpResponse::Ok().json(CategoryListBody {
        success: true,
        count: categories.len(),
        data: categories,
    }))
}

pub async fn create_category(
    user: AuthUser,
    category_service: web::Data<Arc<CategoryService>>,
    req: web::Json<CreateCategoryRequest>,
) -> Result<HttpResponse, DomainError> {
    let category = category_service
        .create_category(&user.0, req.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(CategoryBody {
        success: true,
        data: category,
    }))
}

// ============== Misc ==============

pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(HealthBody {
        success: true,
        message: "Server is running",
        timestamp: Utc::now(),
    })
}

pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorBody::new("Route not found"))
}
