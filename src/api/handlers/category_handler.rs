//! Public category listing.

use axum::{extract::State, response::Json, routing::get, Router};

use crate::api::AppState;
use crate::domain::CategoryResponse;
use crate::errors::AppResult;

/// Create category routes
pub fn category_routes() -> Router<AppState> {
    Router::new().route("/", get(list_categories))
}

/// All categories, sorted by name
#[utoipa::path(
    get,
    path = "/categories",
    tag = "Categories",
    responses(
        (status = 200, description = "Categories", body = [CategoryResponse])
    )
)]
pub async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<CategoryResponse>>> {
    let categories = state.category_service.list().await?;
    Ok(Json(categories.into_iter().map(CategoryResponse::from).collect()))
}
