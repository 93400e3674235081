#![allow(dead_code)]

use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    body::{Body, to_bytes},
    http::Response,
};
use campus_market::{
    app::{AppOptions, build_app},
    dto::auth::Claims,
    services::session_service::SessionProvider,
    state::AppState,
    storage::{MemoryObjectStore, PRODUCT_BUCKET},
};
use jsonwebtoken::{EncodingKey, Header, encode};
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

pub const SECRET: &str = "integration-secret";

/// Sign a token the way the hosted identity service would.
pub fn token_for(user_id: Uuid) -> String {
    let claims = Claims {
        sub: user_id.to_string(),
        email: Some(format!("{user_id}@campus.example")),
        exp: (chrono::Utc::now().timestamp() + 3600) as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .expect("sign token")
}

pub fn bearer(user_id: Uuid) -> String {
    format!("Bearer {}", token_for(user_id))
}

/// State over a pool that never connects; any handler touching the database fails.
pub fn offline_state() -> (AppState, Arc<MemoryObjectStore>) {
    let pool = PgPoolOptions::new()
        .acquire_timeout(Duration::from_millis(200))
        .connect_lazy("postgres://nobody@127.0.0.1:1/none")
        .expect("lazy pool");
    state_with_pool(pool)
}

pub fn state_with_pool(pool: sqlx::PgPool) -> (AppState, Arc<MemoryObjectStore>) {
    let storage = Arc::new(MemoryObjectStore::new(PRODUCT_BUCKET));
    let sessions = Arc::new(SessionProvider::new(SECRET));
    let state = AppState::new(pool, storage.clone(), sessions, Duration::from_secs(30));
    (state, storage)
}

pub fn app(state: AppState) -> Router {
    build_app(state, AppOptions::default())
}

pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}
