use axum::{Router, routing::get};

use crate::state::AppState;

pub mod auth;
pub mod categories;
pub mod doc;
pub mod health;
pub mod home;
pub mod products;
pub mod profile;
pub mod reviews;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .route("/home", get(home::home_feed))
        .nest("/products", products::router())
        .nest("/categories", categories::router())
        .nest("/profile", profile::router())
        .nest("/reviews", reviews::router())
        .nest("/auth", auth::router())
}
