//! Current-identity tracking.
//!
//! Tokens are minted by the hosted identity service; this provider only
//! verifies them, remembers sign-outs until the token would have expired
//! anyway, and broadcasts sign-in/sign-out transitions to subscribers. A
//! sign-in is the first use of a token, so each device counts on its own.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use jsonwebtoken::{DecodingKey, Validation, decode};
use tokio::sync::{RwLock, broadcast};
use uuid::Uuid;

use crate::{dto::auth::Claims, error::AppError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub expires_at: DateTime<Utc>,
    token: String,
}

impl Session {
    pub fn owns(&self, owner_id: Uuid) -> bool {
        self.user_id == owner_id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn(Uuid),
    SignedOut(Uuid),
}

/// Receiving half of an auth-state subscription. Dropping it unsubscribes.
pub struct Subscription {
    rx: broadcast::Receiver<AuthEvent>,
}

impl Subscription {
    /// Next event, or `None` once the provider is gone. Lagged events are skipped.
    pub async fn recv(&mut self) -> Option<AuthEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "auth subscriber lagged");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

pub struct SessionProvider {
    key: DecodingKey,
    validation: Validation,
    revoked: RwLock<HashMap<String, i64>>,
    /// Tokens seen since they were issued, with their expiry.
    active: RwLock<HashMap<String, i64>>,
    events: broadcast::Sender<AuthEvent>,
}

impl SessionProvider {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::default();
        // Hosted identity tokens carry an audience we do not pin.
        validation.validate_aud = false;
        let (events, _) = broadcast::channel(64);
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            revoked: RwLock::new(HashMap::new()),
            active: RwLock::new(HashMap::new()),
            events,
        }
    }

    pub async fn resolve(&self, token: &str) -> Result<Session, AppError> {
        let decoded = decode::<Claims>(token, &self.key, &self.validation)
            .map_err(|_| AppError::Unauthorized("Invalid or expired token".into()))?;

        if self.revoked.read().await.contains_key(token) {
            return Err(AppError::Unauthorized("Session has been signed out".into()));
        }

        let user_id = Uuid::parse_str(&decoded.claims.sub)
            .map_err(|_| AppError::Unauthorized("Invalid user id in token".into()))?;
        let exp = i64::try_from(decoded.claims.exp).unwrap_or(i64::MAX);
        let expires_at = DateTime::<Utc>::from_timestamp(exp, 0).unwrap_or(DateTime::<Utc>::MAX_UTC);

        let first_use = {
            let now = Utc::now().timestamp();
            let mut active = self.active.write().await;
            active.retain(|_, exp| *exp > now);
            active.insert(token.to_string(), exp).is_none()
        };
        if first_use {
            tracing::debug!(%user_id, "session signed in");
            let _ = self.events.send(AuthEvent::SignedIn(user_id));
        }

        Ok(Session {
            user_id,
            email: decoded.claims.email,
            expires_at,
            token: token.to_string(),
        })
    }

    /// Reject `session`'s token from now on and announce the sign-out.
    pub async fn sign_out(&self, session: &Session) {
        let now = Utc::now().timestamp();
        {
            let mut revoked = self.revoked.write().await;
            revoked.retain(|_, exp| *exp > now);
            revoked.insert(session.token.clone(), session.expires_at.timestamp());
        }
        self.active.write().await.remove(&session.token);
        tracing::info!(user_id = %session.user_id, "session signed out");
        let _ = self.events.send(AuthEvent::SignedOut(session.user_id));
    }

    pub fn subscribe(&self) -> Subscription {
        Subscription {
            rx: self.events.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.events.receiver_count()
    }

    /// Number of unexpired tokens seen and not signed out.
    pub async fn active_sessions(&self) -> usize {
        self.active.read().await.len()
    }
}
