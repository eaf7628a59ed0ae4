//! User profile handlers.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, put},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::config::{MAX_BIO_LENGTH, MAX_NAME_LENGTH, MIN_NAME_LENGTH};
use crate::domain::{PostResponse, ProfileResponse, ProfileUpdate, UserResponse};
use crate::errors::AppResult;

/// Profile edit request; omitted fields stay unchanged, an empty bio clears it
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    #[validate(length(
        min = MIN_NAME_LENGTH,
        max = MAX_NAME_LENGTH,
        message = "Name must be between 1 and 100 characters"
    ))]
    #[schema(example = "Ada King")]
    pub name: Option<String>,
    #[validate(length(max = MAX_BIO_LENGTH, message = "Bio must be at most 500 characters"))]
    #[schema(example = "Mathematician and writer")]
    pub bio: Option<String>,
}

impl From<UpdateProfileRequest> for ProfileUpdate {
    fn from(request: UpdateProfileRequest) -> Self {
        Self {
            name: request.name,
            bio: request.bio,
        }
    }
}

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/me", put(update_me))
        .route("/:id", get(get_profile))
        .route("/:id/posts", get(user_posts))
}

/// Public profile
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Profile", body = ProfileResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_profile(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ProfileResponse>> {
    let user = state.user_service.get_user(id).await?;
    Ok(Json(ProfileResponse::from(user)))
}

/// A user's approved posts; the author also sees pending and rejected ones
#[utoipa::path(
    get,
    path = "/users/{id}/posts",
    tag = "Users",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Posts by the user", body = [PostResponse]),
        (status = 404, description = "User not found")
    )
)]
pub async fn user_posts(
    State(state): State<AppState>,
    current_user: Option<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<PostResponse>>> {
    let viewer_id = current_user.map(|user| user.id);
    let posts = state.post_service.list_by_author(id, viewer_id).await?;

    Ok(Json(posts.into_iter().map(PostResponse::from).collect()))
}

/// Edit the caller's own name and bio
#[utoipa::path(
    put,
    path = "/users/me",
    tag = "Users",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "No session")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_me(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ValidatedJson(payload): ValidatedJson<UpdateProfileRequest>,
) -> AppResult<Json<UserResponse>> {
    let user = state
        .user_service
        .update_profile(current_user.id, payload.into())
        .await?;

    Ok(Json(UserResponse::from(user)))
}
