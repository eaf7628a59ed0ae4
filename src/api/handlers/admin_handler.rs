//! Admin console handlers.
//!
//! Mounted behind the admin middleware, which re-checks the caller's role
//! on every request.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::config::MAX_CATEGORY_NAME_LENGTH;
use crate::domain::{
    CategoryResponse, CategoryUsageResponse, PostResponse, PostStatus, UserResponse, UserRole,
};
use crate::errors::AppResult;
use crate::services::{DashboardStats, ResetSummary};
use crate::types::{Created, NoContent, Paginated, PaginatedPosts, PaginationParams};

static CATEGORY_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\p{L}\p{N} _&-]+$").expect("category name pattern is valid"));

/// Category create/rename request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CategoryRequest {
    #[validate(
        length(min = 1, max = MAX_CATEGORY_NAME_LENGTH, message = "Category name must be between 1 and 50 characters"),
        regex(path = *CATEGORY_NAME_RE, message = "Category name may only contain letters, digits, spaces, '-', '_' and '&'")
    )]
    #[schema(example = "Engineering")]
    pub name: String,
}

/// Role change request; unknown roles are rejected while parsing
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ChangeRoleRequest {
    pub role: UserRole,
}

/// Moderation queue filter
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ModerationFilter {
    /// Defaults to PENDING
    pub status: Option<PostStatus>,
}

/// Create admin routes
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/stats", get(stats))
        .route("/users", get(list_users))
        .route("/users/:id/role", put(change_role))
        .route("/users/:id", delete(delete_user))
        .route("/posts", get(list_posts))
        .route("/posts/:id/approve", post(approve_post))
        .route("/posts/:id/reject", post(reject_post))
        .route("/posts/:id", delete(delete_post))
        .route("/categories", get(list_categories).post(create_category))
        .route("/categories/:id", put(rename_category).delete(delete_category))
        .route("/reset", post(reset_data))
}

/// Dashboard counts
#[utoipa::path(
    get,
    path = "/admin/stats",
    tag = "Admin",
    responses(
        (status = 200, description = "Dashboard figures", body = DashboardStats),
        (status = 403, description = "Admin role required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn stats(State(state): State<AppState>) -> AppResult<Json<DashboardStats>> {
    Ok(Json(state.admin_service.stats().await?))
}

/// All accounts
#[utoipa::path(
    get,
    path = "/admin/users",
    tag = "Admin",
    responses(
        (status = 200, description = "Users, oldest first", body = [UserResponse]),
        (status = 403, description = "Admin role required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<UserResponse>>> {
    let users = state.user_service.list_users().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Change another user's role
#[utoipa::path(
    put,
    path = "/admin/users/{id}/role",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = ChangeRoleRequest,
    responses(
        (status = 200, description = "Role changed", body = UserResponse),
        (status = 400, description = "Own role or invalid role"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn change_role(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<ChangeRoleRequest>,
) -> AppResult<Json<UserResponse>> {
    let user = state
        .user_service
        .change_role(current_user.id, id, payload.role)
        .await?;
    Ok(Json(UserResponse::from(user)))
}

/// Delete another user with their posts and messages
#[utoipa::path(
    delete,
    path = "/admin/users/{id}",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 400, description = "Cannot delete yourself"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_user(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    state.user_service.delete_user(current_user.id, id).await?;
    Ok(NoContent)
}

/// Moderation queue
#[utoipa::path(
    get,
    path = "/admin/posts",
    tag = "Admin",
    params(ModerationFilter, PaginationParams),
    responses(
        (status = 200, description = "Posts in the requested status", body = PaginatedPosts)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_posts(
    State(state): State<AppState>,
    Query(filter): Query<ModerationFilter>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Paginated<PostResponse>>> {
    let status = filter.status.unwrap_or(PostStatus::Pending);
    let page = state
        .post_service
        .list_for_moderation(status, params)
        .await?;
    Ok(Json(page.map(PostResponse::from)))
}

/// Approve a pending post
#[utoipa::path(
    post,
    path = "/admin/posts/{id}/approve",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post approved", body = PostResponse),
        (status = 404, description = "Post not found"),
        (status = 409, description = "Post was already moderated")
    ),
    security(("bearer_auth" = []))
)]
pub async fn approve_post(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<PostResponse>> {
    let post = state.post_service.approve(current_user.id, id).await?;
    Ok(Json(PostResponse::from(post)))
}

/// Reject a pending post
#[utoipa::path(
    post,
    path = "/admin/posts/{id}/reject",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post rejected", body = PostResponse),
        (status = 404, description = "Post not found"),
        (status = 409, description = "Post was already moderated")
    ),
    security(("bearer_auth" = []))
)]
pub async fn reject_post(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<PostResponse>> {
    let post = state.post_service.reject(current_user.id, id).await?;
    Ok(Json(PostResponse::from(post)))
}

/// Delete a post
#[utoipa::path(
    delete,
    path = "/admin/posts/{id}",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 204, description = "Post deleted"),
        (status = 404, description = "Post not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_post(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    state.post_service.delete(current_user.id, id).await?;
    Ok(NoContent)
}

/// Categories with the number of posts filed under each
#[utoipa::path(
    get,
    path = "/admin/categories",
    tag = "Admin",
    responses(
        (status = 200, description = "Categories with usage", body = [CategoryUsageResponse])
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<CategoryUsageResponse>>> {
    let usage = state.category_service.list_with_usage().await?;
    Ok(Json(usage.into_iter().map(CategoryUsageResponse::from).collect()))
}

/// Create a category
#[utoipa::path(
    post,
    path = "/admin/categories",
    tag = "Admin",
    request_body = CategoryRequest,
    responses(
        (status = 201, description = "Category created", body = CategoryResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Category already exists")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_category(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CategoryRequest>,
) -> AppResult<Created<CategoryResponse>> {
    let category = state.category_service.create(payload.name).await?;
    Ok(Created(CategoryResponse::from(category)))
}

/// Rename a category
#[utoipa::path(
    put,
    path = "/admin/categories/{id}",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "Category ID")),
    request_body = CategoryRequest,
    responses(
        (status = 200, description = "Category renamed", body = CategoryResponse),
        (status = 404, description = "Category not found"),
        (status = 409, description = "Name already taken")
    ),
    security(("bearer_auth" = []))
)]
pub async fn rename_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<CategoryRequest>,
) -> AppResult<Json<CategoryResponse>> {
    let category = state.category_service.rename(id, payload.name).await?;
    Ok(Json(CategoryResponse::from(category)))
}

/// Delete a category no post references
#[utoipa::path(
    delete,
    path = "/admin/categories/{id}",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 404, description = "Category not found"),
        (status = 409, description = "Category still has posts")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    state.category_service.delete(id).await?;
    Ok(NoContent)
}

/// Delete all content and every non-admin account
#[utoipa::path(
    post,
    path = "/admin/reset",
    tag = "Admin",
    responses(
        (status = 200, description = "Rows removed", body = ResetSummary)
    ),
    security(("bearer_auth" = []))
)]
pub async fn reset_data(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<ResetSummary>> {
    Ok(Json(state.admin_service.reset_data(current_user.id).await?))
}
