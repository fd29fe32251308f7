//! Web API used by the browser client
//!
//! Session-cookie authenticated and rate limited with the web bucket,
//! except for the login flow itself.

pub mod api_keys;
pub mod auth;
pub mod json_files;
pub mod subscriptions;
pub mod users;

use std::time::Duration;

use axum::http::{header, HeaderValue, Method};
use axum::middleware;
use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_cookies::CookieManagerLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

use crate::api::middleware::web_rate_limit;
use crate::api::state::AppState;

pub fn create_web_router(state: &AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/me", get(users::me))
        .route("/logout", put(auth::logout))
        .route("/users", delete(users::delete_account))
        .route("/apikeys", post(api_keys::create).get(api_keys::list))
        .route("/apikeys/{keyHash}", delete(api_keys::delete))
        .route("/jsonfiles", post(json_files::create).get(json_files::list))
        .route(
            "/jsonfiles/{fileId}",
            get(json_files::get)
                .patch(json_files::rename)
                .put(json_files::replace)
                .delete(json_files::delete),
        )
        .route("/jsonfiles/{fileId}/metadata", get(json_files::metadata))
        .route("/jsonfiles/{fileId}/routes", get(json_files::routes))
        .route("/subscriptions", get(subscriptions::status))
        .route_layer(middleware::from_fn_with_state(state.clone(), web_rate_limit));

    Router::new()
        .route("/auth/login", get(auth::login))
        .route("/auth/callback", get(auth::callback))
        .merge(protected)
        .layer(CookieManagerLayer::new())
        .layer(web_cors(&state.web.client_url))
}

/// Credentialed CORS restricted to the browser client's origin
fn web_cors(client_url: &str) -> CorsLayer {
    let origin = match HeaderValue::from_str(client_url) {
        Ok(origin) => AllowOrigin::exact(origin),
        Err(_) => {
            warn!(client_url = %client_url, "Invalid client URL, CORS will reject browser requests");
            AllowOrigin::list(Vec::<HeaderValue>::new())
        }
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::ACCEPT, header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(300))
}
