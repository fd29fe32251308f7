//! Caller authentication extractors
//!
//! The web API authenticates with a session cookie, the public API with a
//! bearer API key. Both resolve to the calling user's id.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use tower_cookies::Cookies;
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::session::Session;
use crate::domain::user::{User, UserId};
use crate::domain::DomainError;

/// An authenticated caller
pub trait Caller {
    fn user_id(&self) -> &UserId;
}

/// Extractor that requires a valid session cookie
#[derive(Debug, Clone)]
pub struct RequireSession {
    pub user: User,
    pub session: Session,
    /// Raw cookie value, needed to clear it on logout
    pub token: String,
}

impl FromRequestParts<AppState> for RequireSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let cookies = Cookies::from_request_parts(parts, state)
            .await
            .map_err(|(_, message)| ApiError::internal(message))?;

        let token = cookies
            .get(&state.web.cookie_name)
            .map(|cookie| cookie.value().to_string())
            .filter(|value| !value.is_empty())
            .ok_or_else(|| ApiError::unauthorized("can't get session token from cookie"))?;

        let (session, user) = state
            .sessions
            .validate(&token)
            .await
            .map_err(|e| auth_failure(e, "cannot validate session"))?;

        Ok(RequireSession {
            user,
            session,
            token,
        })
    }
}

impl Caller for RequireSession {
    fn user_id(&self) -> &UserId {
        self.user.id()
    }
}

/// Extractor that requires `Authorization: Bearer <api key>`
#[derive(Debug, Clone)]
pub struct RequireApiKey {
    pub user_id: UserId,
}

impl FromRequestParts<AppState> for RequireApiKey {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let raw_key = extract_bearer_token(&parts.headers)?;

        debug!(
            key_prefix = %raw_key.chars().take(8).collect::<String>(),
            "Validating API key"
        );

        let user_id = state
            .api_keys
            .validate(&raw_key)
            .await
            .map_err(|e| auth_failure(e, "invalid api key"))?;

        Ok(RequireApiKey { user_id })
    }
}

impl Caller for RequireApiKey {
    fn user_id(&self) -> &UserId {
        &self.user_id
    }
}

/// Backing-service failures stay 500; everything else is a plain 401
fn auth_failure(err: DomainError, message: &str) -> ApiError {
    if err.is_server_side() {
        ApiError::from(err)
    } else {
        debug!(error = %err, "Authentication rejected");
        ApiError::unauthorized(message)
    }
}

fn extract_bearer_token(headers: &HeaderMap) -> Result<String, ApiError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| ApiError::unauthorized("malformed authorization header"))?
        .to_str()
        .map_err(|_| ApiError::unauthorized("malformed authorization header"))?;

    match value.split_once(' ') {
        Some(("Bearer", token)) if !token.trim().is_empty() && !token.trim().contains(' ') => {
            Ok(token.trim().to_string())
        }
        _ => Err(ApiError::unauthorized("malformed authorization header")),
    }
}
