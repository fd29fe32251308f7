//! Current user and account deletion

use axum::{extract::State, http::StatusCode};
use serde::Serialize;
use tower_cookies::Cookies;
use tracing::info;

use crate::api::middleware::RequireSession;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};

use super::auth::removal_cookie;

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub name: String,
}

pub async fn me(auth: RequireSession) -> Json<UserResponse> {
    Json(UserResponse {
        id: auth.user.id().to_string(),
        email: auth.user.email().to_string(),
        name: auth.user.name().to_string(),
    })
}

/// Delete the caller's documents, keys, sessions and finally the user
pub async fn delete_account(
    State(state): State<AppState>,
    cookies: Cookies,
    auth: RequireSession,
) -> Result<StatusCode, ApiError> {
    let user_id = *auth.user.id();

    let documents = state.documents.delete_all(&user_id).await?;
    let api_keys = state.api_keys.delete_all(&user_id).await?;
    state.sessions.invalidate_all(&user_id).await?;
    state.users.delete(&user_id).await?;

    cookies.remove(removal_cookie(state.web.cookie_name.clone(), "/"));

    info!(user_id = %user_id, documents, api_keys, "Deleted account");
    Ok(StatusCode::NO_CONTENT)
}
