use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use uuid::Uuid;

use crate::{error::AppError, services::session_service::Session, state::AppState};

/// Session for handlers that may be called anonymously.
#[derive(Debug, Clone)]
pub struct MaybeSession(pub Option<Session>);

impl MaybeSession {
    /// Turn an anonymous caller into a 401 carrying `message`.
    pub fn require(self, message: &str) -> Result<Session, AppError> {
        self.0.ok_or_else(|| AppError::Unauthorized(message.to_string()))
    }
}

pub fn ensure_owner(user_id: Uuid, owner_id: Uuid) -> Result<(), AppError> {
    if user_id != owner_id {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

fn bearer_token(parts: &Parts) -> Result<Option<&str>, AppError> {
    let Some(auth_header) = parts.headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };

    let auth_str = auth_header
        .to_str()
        .map_err(|_| AppError::BadRequest("Invalid Authorization header".into()))?;

    let Some(token) = auth_str.strip_prefix("Bearer ") else {
        return Err(AppError::BadRequest("Invalid Authorization scheme".into()));
    };
    Ok(Some(token.trim()))
}

impl FromRequestParts<AppState> for MaybeSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match bearer_token(parts)? {
            Some(token) => Ok(MaybeSession(Some(state.sessions.resolve(token).await?))),
            None => Ok(MaybeSession(None)),
        }
    }
}

impl FromRequestParts<AppState> for Session {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        MaybeSession::from_request_parts(parts, state)
            .await?
            .require("Please sign in")
    }
}
