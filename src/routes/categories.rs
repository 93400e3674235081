use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::categories::{CategoryFilterOption, CategoryList},
    error::AppResult,
    response::ApiResponse,
    services::category_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories))
        .route("/filters", get(category_filters))
}

#[utoipa::path(
    get,
    path = "/api/categories",
    responses(
        (status = 200, description = "Categories ordered by name", body = ApiResponse<CategoryList>)
    ),
    tag = "Categories"
)]
pub async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<CategoryList>>> {
    let resp = category_service::list_categories(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/categories/filters",
    responses(
        (status = 200, description = "Slugs offered by the marketplace filter bar", body = ApiResponse<Vec<CategoryFilterOption>>)
    ),
    tag = "Categories"
)]
pub async fn category_filters() -> Json<ApiResponse<Vec<CategoryFilterOption>>> {
    Json(category_service::filter_options())
}
