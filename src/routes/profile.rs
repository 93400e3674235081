use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::profile::{ProfileOverview, UpdateProfileRequest},
    error::AppResult,
    models::Profile,
    response::ApiResponse,
    services::{profile_service, session_service::Session},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_profile).put(update_profile))
}

#[utoipa::path(
    get,
    path = "/api/profile",
    responses(
        (status = 200, description = "Caller's profile and own listings", body = ApiResponse<ProfileOverview>),
        (status = 401, description = "Not signed in"),
    ),
    security(("bearer_auth" = [])),
    tag = "Profile"
)]
pub async fn get_profile(
    State(state): State<AppState>,
    session: Session,
) -> AppResult<Json<ApiResponse<ProfileOverview>>> {
    let resp = profile_service::overview(&state, session.user_id, session.email.clone()).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile saved", body = ApiResponse<Profile>),
        (status = 401, description = "Not signed in"),
    ),
    security(("bearer_auth" = [])),
    tag = "Profile"
)]
pub async fn update_profile(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<UpdateProfileRequest>,
) -> AppResult<Json<ApiResponse<Profile>>> {
    let resp = profile_service::update_profile(&state, session.user_id, payload).await?;
    Ok(Json(resp))
}
