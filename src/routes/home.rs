use axum::{Json, extract::State};

use crate::{
    dto::products::ProductCardList, response::ApiResponse, services::catalog_service,
    state::AppState,
};

#[utoipa::path(
    get,
    path = "/api/home",
    responses(
        (status = 200, description = "Newest available listings for the landing page", body = ApiResponse<ProductCardList>)
    ),
    tag = "Products"
)]
pub async fn home_feed(State(state): State<AppState>) -> Json<ApiResponse<ProductCardList>> {
    Json(catalog_service::home_feed(&state).await)
}
