//! Public API: a document served as a REST API
//!
//! Bearer API key authenticated and rate limited with the public bucket.
//! Every mutation loads the whole document, applies the change and writes
//! the whole document back.

use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{header, Method, StatusCode};
use axum::middleware;
use axum::routing::get;
use axum::Router;
use serde_json::Value;
use tower_http::cors::{Any, CorsLayer};

use crate::api::middleware::{public_rate_limit, DocumentContext, RequireApiKey};
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::resource;
use crate::domain::DomainError;

type PublicDocument = DocumentContext<RequireApiKey>;

pub fn create_public_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/{fileId}", get(get_document))
        .route(
            "/{fileId}/{resource}",
            get(get_resource)
                .put(replace_resource)
                .patch(merge_resource)
                .post(create_item),
        )
        .route(
            "/{fileId}/{resource}/{id}",
            get(get_item)
                .put(replace_item)
                .patch(merge_item)
                .delete(delete_item),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), public_rate_limit))
        .layer(public_cors())
}

fn public_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::ACCEPT, header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(Duration::from_secs(300))
}

/// Apply `mutate` to the loaded document and persist the result
async fn persist<F>(state: &AppState, document: PublicDocument, mutate: F) -> Result<Value, ApiError>
where
    F: FnOnce(&mut Value) -> Result<(), DomainError>,
{
    let DocumentContext {
        metadata,
        mut content,
        ..
    } = document;

    mutate(&mut content)?;
    state.documents.save(&metadata, &content).await?;

    Ok(content)
}

async fn get_document(document: PublicDocument) -> Json<Value> {
    Json(document.content)
}

async fn get_resource(
    document: PublicDocument,
    Path((_, key)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(resource::get_resource(&document.content, &key)?.clone()))
}

async fn replace_resource(
    State(state): State<AppState>,
    document: PublicDocument,
    Path((_, key)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let content = persist(&state, document, |doc| {
        resource::replace_resource(doc, &key, body)
    })
    .await?;

    Ok(Json(content))
}

async fn merge_resource(
    State(state): State<AppState>,
    document: PublicDocument,
    Path((_, key)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let content = persist(&state, document, |doc| {
        resource::merge_resource(doc, &key, body)
    })
    .await?;

    Ok(Json(content))
}

async fn create_item(
    State(state): State<AppState>,
    document: PublicDocument,
    Path((_, key)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let content = persist(&state, document, |doc| resource::create_item(doc, &key, body)).await?;

    Ok((StatusCode::CREATED, Json(content)))
}

async fn get_item(
    document: PublicDocument,
    Path((_, key, id)): Path<(String, String, String)>,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(resource::get_item(&document.content, &key, &id)?.clone()))
}

async fn replace_item(
    State(state): State<AppState>,
    document: PublicDocument,
    Path((_, key, id)): Path<(String, String, String)>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let content = persist(&state, document, |doc| {
        resource::replace_item(doc, &key, &id, body)
    })
    .await?;

    Ok(Json(content))
}

async fn merge_item(
    State(state): State<AppState>,
    document: PublicDocument,
    Path((_, key, id)): Path<(String, String, String)>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let content = persist(&state, document, |doc| {
        resource::merge_item(doc, &key, &id, body)
    })
    .await?;

    Ok(Json(content))
}

async fn delete_item(
    State(state): State<AppState>,
    document: PublicDocument,
    Path((_, key, id)): Path<(String, String, String)>,
) -> Result<Json<Value>, ApiError> {
    let content = persist(&state, document, |doc| resource::delete_item(doc, &key, &id)).await?;

    Ok(Json(content))
}
