//! Token bucket admission middleware

use std::net::SocketAddr;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{HeaderMap, HeaderValue, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::rate_limit::RateLimitDecision;
use crate::infrastructure::rate_limit::RateLimitScope;

const FORWARDED_FOR: &str = "x-forwarded-for";
const REAL_IP: &str = "x-real-ip";

/// Rate limit with the web API bucket
pub async fn web_rate_limit(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    enforce(&state, RateLimitScope::Web, request, next).await
}

/// Rate limit with the public API bucket
pub async fn public_rate_limit(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    enforce(&state, RateLimitScope::Public, request, next).await
}

async fn enforce(
    state: &AppState,
    scope: RateLimitScope,
    request: Request<Body>,
    next: Next,
) -> Response {
    let client = client_address(&request);

    let decision = match state.rate_limiter.admit(scope, &client).await {
        Ok(decision) => decision,
        Err(err) => return ApiError::from(err).into_response(),
    };

    let mut response = if decision.allowed {
        next.run(request).await
    } else {
        ApiError::rate_limited("rate limit exceeded").into_response()
    };

    set_rate_limit_headers(response.headers_mut(), &decision);
    response
}

/// First hop of `X-Forwarded-For`, then `X-Real-IP`, then the peer address
fn client_address(request: &Request<Body>) -> String {
    let headers = request.headers();

    let forwarded = headers
        .get(FORWARDED_FOR)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty());

    let real_ip = headers
        .get(REAL_IP)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty());

    forwarded
        .or(real_ip)
        .map(str::to_string)
        .or_else(|| {
            request
                .extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip().to_string())
        })
        .unwrap_or_else(|| "unknown".to_string())
}

fn set_rate_limit_headers(headers: &mut HeaderMap, decision: &RateLimitDecision) {
    headers.insert("x-ratelimit-limit", HeaderValue::from(decision.limit));
    headers.insert("x-ratelimit-remaining", HeaderValue::from(decision.remaining));
}
