//! Subscription status

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::api::middleware::RequireSession;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::subscription::SubscriptionSnapshot;

/// Cached snapshot of the caller's subscription, or `{"status":"none"}`
pub async fn status(
    State(state): State<AppState>,
    auth: RequireSession,
) -> Result<Response, ApiError> {
    let snapshot = match auth.user.stripe_customer_id() {
        Some(customer_id) => state.subscriptions.status(customer_id).await?,
        None => None,
    };

    Ok(match snapshot {
        Some(snapshot) => Json(snapshot).into_response(),
        None => Json(json!({ "status": SubscriptionSnapshot::STATUS_NONE })).into_response(),
    })
}
