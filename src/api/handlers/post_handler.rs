//! Post handlers - the public feed, single posts, and submission.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::config::{MAX_CONTENT_LENGTH, MAX_TITLE_LENGTH};
use crate::domain::{NewPost, PostResponse};
use crate::errors::AppResult;
use crate::services::Viewer;
use crate::types::{Created, Paginated, PaginatedPosts, PaginationParams};

/// Post submission request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePostRequest {
    #[validate(length(min = 1, max = MAX_TITLE_LENGTH, message = "Title must be between 1 and 200 characters"))]
    #[schema(example = "Notes on the Analytical Engine")]
    pub title: String,
    #[validate(length(min = 1, max = MAX_CONTENT_LENGTH, message = "Content must be between 1 and 20000 characters"))]
    pub content: String,
    #[validate(url(message = "Image URL must be a valid URL"))]
    #[schema(example = "https://example.com/engine.png")]
    pub image_url: Option<String>,
    pub category_id: Option<Uuid>,
}

impl From<CreatePostRequest> for NewPost {
    fn from(request: CreatePostRequest) -> Self {
        Self {
            title: request.title,
            content: request.content,
            image_url: request.image_url,
            category_id: request.category_id,
        }
    }
}

/// Optional feed filter
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CategoryFilter {
    /// Only posts filed under this category
    pub category_id: Option<Uuid>,
}

/// Create post routes
pub fn post_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_posts).post(create_post))
        .route("/mine", get(my_posts))
        .route("/:id", get(get_post))
}

/// Approved posts, newest first
#[utoipa::path(
    get,
    path = "/posts",
    tag = "Posts",
    params(PaginationParams, CategoryFilter),
    responses(
        (status = 200, description = "Published posts", body = PaginatedPosts)
    )
)]
pub async fn list_posts(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
    Query(filter): Query<CategoryFilter>,
) -> AppResult<Json<Paginated<PostResponse>>> {
    let page = state
        .post_service
        .list_published(filter.category_id, params)
        .await?;

    Ok(Json(page.map(PostResponse::from)))
}

/// Single post; pending and rejected posts are only shown to their author and admins
#[utoipa::path(
    get,
    path = "/posts/{id}",
    tag = "Posts",
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post found", body = PostResponse),
        (status = 404, description = "Post not found")
    )
)]
pub async fn get_post(
    State(state): State<AppState>,
    current_user: Option<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<PostResponse>> {
    let viewer = current_user
        .map(|user| user.viewer())
        .unwrap_or_else(Viewer::anonymous);
    let post = state.post_service.get_visible(id, viewer).await?;

    Ok(Json(PostResponse::from(post)))
}

/// Submit a post for moderation
#[utoipa::path(
    post,
    path = "/posts",
    tag = "Posts",
    request_body = CreatePostRequest,
    responses(
        (status = 201, description = "Post submitted, pending moderation", body = PostResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "No session")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_post(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ValidatedJson(payload): ValidatedJson<CreatePostRequest>,
) -> AppResult<Created<PostResponse>> {
    let post = state
        .post_service
        .submit(current_user.id, payload.into())
        .await?;

    Ok(Created(PostResponse::from(post)))
}

/// The caller's own posts in every status
#[utoipa::path(
    get,
    path = "/posts/mine",
    tag = "Posts",
    responses(
        (status = 200, description = "Own posts", body = [PostResponse]),
        (status = 401, description = "No session")
    ),
    security(("bearer_auth" = []))
)]
pub async fn my_posts(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<PostResponse>>> {
    let posts = state
        .post_service
        .list_by_author(current_user.id, Some(current_user.id))
        .await?;

    Ok(Json(posts.into_iter().map(PostResponse::from).collect()))
}
