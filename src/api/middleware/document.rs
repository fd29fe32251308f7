//! Document resolution extractors
//!
//! `OwnedDocument` authenticates the caller, parses `{fileId}` and checks
//! ownership. `DocumentContext` additionally loads the document body.

use std::collections::HashMap;

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use serde_json::Value;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::document::{DocumentId, DocumentMetadata};

use super::auth::Caller;

/// A document the authenticated caller owns
#[derive(Debug, Clone)]
pub struct OwnedDocument<A> {
    pub caller: A,
    pub metadata: DocumentMetadata,
}

impl<A> FromRequestParts<AppState> for OwnedDocument<A>
where
    A: FromRequestParts<AppState, Rejection = ApiError> + Caller + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let caller = A::from_request_parts(parts, state).await?;

        let Path(params) = Path::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::bad_request("file id not valid"))?;
        let raw_id = params
            .get("fileId")
            .ok_or_else(|| ApiError::bad_request("file id not valid"))?;
        let id = DocumentId::parse(raw_id)?;

        let metadata = state.documents.get_owned(caller.user_id(), &id).await?;

        Ok(OwnedDocument { caller, metadata })
    }
}

/// An owned document together with its current JSON value
#[derive(Debug, Clone)]
pub struct DocumentContext<A> {
    pub caller: A,
    pub metadata: DocumentMetadata,
    pub content: Value,
}

impl<A> FromRequestParts<AppState> for DocumentContext<A>
where
    A: FromRequestParts<AppState, Rejection = ApiError> + Caller + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let OwnedDocument { caller, metadata } =
            OwnedDocument::<A>::from_request_parts(parts, state).await?;

        let content = state.documents.load(&metadata).await?;

        Ok(DocumentContext {
            caller,
            metadata,
            content,
        })
    }
}
