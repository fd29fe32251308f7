//! API key management

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::api::middleware::RequireSession;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::api_key::ApiKey;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyResponse {
    pub api_key: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyMetadata {
    pub hash: String,
    pub created_at: DateTime<Utc>,
    pub last_used_at: Option<DateTime<Utc>>,
}

impl From<&ApiKey> for ApiKeyMetadata {
    fn from(key: &ApiKey) -> Self {
        Self {
            hash: key.key_hash().to_string(),
            created_at: key.created_at(),
            last_used_at: key.last_used_at(),
        }
    }
}

/// Issue a key; the raw value is only ever shown here
pub async fn create(
    State(state): State<AppState>,
    auth: RequireSession,
) -> Result<Json<ApiKeyResponse>, ApiError> {
    let created = state.api_keys.create(auth.user.id()).await?;

    Ok(Json(ApiKeyResponse {
        api_key: created.secret,
    }))
}

pub async fn list(
    State(state): State<AppState>,
    auth: RequireSession,
) -> Result<Json<Vec<ApiKeyMetadata>>, ApiError> {
    let keys = state.api_keys.list(auth.user.id()).await?;
    Ok(Json(keys.iter().map(ApiKeyMetadata::from).collect()))
}

pub async fn delete(
    State(state): State<AppState>,
    auth: RequireSession,
    Path(key_hash): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.api_keys.delete(auth.user.id(), &key_hash).await?;
    Ok(StatusCode::NO_CONTENT)
}
