//! Login, callback and logout

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use rand::RngCore;
use serde::Deserialize;
use tower_cookies::cookie::{time, SameSite};
use tower_cookies::{Cookie, Cookies};
use tracing::info;

use crate::api::middleware::RequireSession;
use crate::api::state::{AppState, WebSettings};
use crate::api::types::ApiError;
use crate::domain::session::Session;

const OAUTH_STATE_COOKIE: &str = "oauthstate";
const OAUTH_STATE_PATH: &str = "/auth/callback";
const OAUTH_STATE_TTL_MINUTES: i64 = 10;

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub state: Option<String>,
    pub code: Option<String>,
}

/// Redirect to the identity provider with a fresh anti-forgery state
pub async fn login(State(state): State<AppState>, cookies: Cookies) -> Redirect {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    let oauth_state = hex::encode(bytes);

    let mut cookie = Cookie::new(OAUTH_STATE_COOKIE, oauth_state.clone());
    cookie.set_path(OAUTH_STATE_PATH);
    cookie.set_http_only(true);
    cookie.set_secure(state.web.secure_cookies);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_max_age(time::Duration::minutes(OAUTH_STATE_TTL_MINUTES));
    cookies.add(cookie);

    Redirect::temporary(&state.identity.authorization_url(&oauth_state))
}

/// Finish the login: verify state, exchange the code, start a session
pub async fn callback(
    State(state): State<AppState>,
    cookies: Cookies,
    Query(params): Query<CallbackParams>,
) -> Result<Response, ApiError> {
    let expected = cookies
        .get(OAUTH_STATE_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .ok_or_else(|| ApiError::bad_request("state cookie not found"))?;

    if params.state.as_deref() != Some(expected.as_str()) {
        return Err(ApiError::bad_request("invalid state"));
    }

    let code = params
        .code
        .filter(|code| !code.is_empty())
        .ok_or_else(|| ApiError::bad_request("auth code not found"))?;

    cookies.remove(removal_cookie(OAUTH_STATE_COOKIE, OAUTH_STATE_PATH));

    let identity = state.identity.exchange_code(&code).await?;
    let user = state.users.upsert_identity(&identity).await?;
    let created = state.sessions.create(user.id()).await?;

    info!(user_id = %user.id(), "User logged in");

    cookies.add(session_cookie(&state.web, created.token, &created.session));

    Ok((
        StatusCode::FOUND,
        [(header::LOCATION, format!("{}/app", state.web.client_url))],
    )
        .into_response())
}

/// Clear the session cookie and invalidate the session
pub async fn logout(
    State(state): State<AppState>,
    cookies: Cookies,
    auth: RequireSession,
) -> Result<StatusCode, ApiError> {
    cookies.remove(removal_cookie(state.web.cookie_name.clone(), "/"));
    state.sessions.invalidate(&auth.session.id).await?;

    Ok(StatusCode::NO_CONTENT)
}

fn session_cookie(web: &WebSettings, token: String, session: &Session) -> Cookie<'static> {
    let remaining = (session.expires_at - Utc::now()).num_seconds().max(0);

    let mut cookie = Cookie::new(web.cookie_name.clone(), token);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(web.secure_cookies);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_max_age(time::Duration::seconds(remaining));
    cookie
}

pub(super) fn removal_cookie(
    name: impl Into<std::borrow::Cow<'static, str>>,
    path: &'static str,
) -> Cookie<'static> {
    let mut cookie = Cookie::new(name, "");
    cookie.set_path(path);
    cookie
}
