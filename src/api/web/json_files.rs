//! Document management for the signed-in user

use axum::{extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::middleware::{DocumentContext, OwnedDocument, RequireSession};
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::document::DocumentMetadata;
use crate::domain::resource::{discover_routes, Route};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileNameRequest {
    pub file_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonFileResponse {
    pub id: String,
    pub user_id: String,
    pub file_name: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl From<DocumentMetadata> for JsonFileResponse {
    fn from(metadata: DocumentMetadata) -> Self {
        Self {
            id: metadata.id.to_string(),
            user_id: metadata.user_id.to_string(),
            file_name: metadata.file_name,
            url: metadata.url,
            created_at: metadata.created_at,
            modified_at: metadata.updated_at,
        }
    }
}

pub async fn create(
    State(state): State<AppState>,
    auth: RequireSession,
    Json(request): Json<FileNameRequest>,
) -> Result<(StatusCode, Json<JsonFileResponse>), ApiError> {
    let metadata = state.documents.create(&auth.user, &request.file_name).await?;
    Ok((StatusCode::CREATED, Json(metadata.into())))
}

pub async fn list(
    State(state): State<AppState>,
    auth: RequireSession,
) -> Result<Json<Vec<JsonFileResponse>>, ApiError> {
    let documents = state.documents.list(auth.user.id()).await?;
    Ok(Json(documents.into_iter().map(Into::into).collect()))
}

pub async fn get(document: DocumentContext<RequireSession>) -> Json<Value> {
    Json(document.content)
}

pub async fn metadata(document: OwnedDocument<RequireSession>) -> Json<JsonFileResponse> {
    Json(document.metadata.into())
}

pub async fn rename(
    State(state): State<AppState>,
    document: OwnedDocument<RequireSession>,
    Json(request): Json<FileNameRequest>,
) -> Result<Json<JsonFileResponse>, ApiError> {
    let renamed = state
        .documents
        .rename(&document.metadata, &request.file_name)
        .await?;

    Ok(Json(renamed.into()))
}

/// Replace the whole document with the request body
pub async fn replace(
    State(state): State<AppState>,
    document: OwnedDocument<RequireSession>,
    Json(content): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    state.documents.save(&document.metadata, &content).await?;
    Ok(Json(content))
}

pub async fn delete(
    State(state): State<AppState>,
    document: OwnedDocument<RequireSession>,
) -> Result<StatusCode, ApiError> {
    state.documents.delete(&document.metadata).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn routes(document: DocumentContext<RequireSession>) -> Json<Vec<Route>> {
    Json(discover_routes(&document.content))
}
