use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};

use crate::{
    dto::auth::SessionResponse,
    response::{ApiResponse, Meta},
    services::session_service::Session,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/session", get(current_session))
        .route("/sign-out", post(sign_out))
}

#[utoipa::path(
    get,
    path = "/api/auth/session",
    responses(
        (status = 200, description = "Identity behind the bearer token", body = ApiResponse<SessionResponse>),
        (status = 401, description = "Missing, invalid or signed-out token")
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn current_session(session: Session) -> Json<ApiResponse<SessionResponse>> {
    let data = SessionResponse {
        user_id: session.user_id,
        email: session.email,
        expires_at: session.expires_at,
    };
    Json(ApiResponse::success("Session", data, Some(Meta::empty())))
}

#[utoipa::path(
    post,
    path = "/api/auth/sign-out",
    responses(
        (status = 200, description = "Token revoked for this service"),
        (status = 401, description = "Not signed in")
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn sign_out(
    State(state): State<AppState>,
    session: Session,
) -> Json<ApiResponse<serde_json::Value>> {
    state.sessions.sign_out(&session).await;
    Json(ApiResponse::ack("Signed out"))
}
