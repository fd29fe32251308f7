//! Custom JSON extractor that returns errors in the API error shape

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json as AxumJson,
};
use serde::de::DeserializeOwned;

use super::error::ApiError;

/// JSON body extractor whose rejections are `{"error": ...}` with 400
#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

impl<T> Json<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> std::ops::Deref for Json<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S, T> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    /// Decodes the raw body whatever its `Content-Type`
    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| body_rejection(&rejection))?;

        serde_json::from_slice(&bytes)
            .map(Json)
            .map_err(|err| ApiError::bad_request(format!("invalid request body: {}", err)))
    }
}

fn body_rejection(rejection: &BytesRejection) -> ApiError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return ApiError::new(StatusCode::PAYLOAD_TOO_LARGE, "request body too large");
    }

    ApiError::bad_request(format!("cannot read request body: {}", rejection.body_text()))
}

impl<T> IntoResponse for Json<T>
where
    T: serde::Serialize,
{
    fn into_response(self) -> Response {
        AxumJson(self.0).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::extract::DefaultBodyLimit;
    use axum::http::header;
    use axum::routing::post;
    use axum::Router;
    use tower::ServiceExt;
    use serde_json::Value;

    fn request(content_type: Option<&str>, body: &'static str) -> Request {
        let mut builder = axum::http::Request::builder().method("POST").uri("/");
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        builder.body(Body::from(body)).unwrap()
    }

    #[tokio::test]
    async fn test_accepts_any_json_value() {
        let Json(value) = Json::<Value>::from_request(request(Some("application/json"), "[1,2]"), &())
            .await
            .unwrap();

        assert_eq!(value, serde_json::json!([1, 2]));
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let err = Json::<Value>::from_request(request(Some("application/json"), "{oops"), &())
            .await
            .unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.message.starts_with("invalid request body"));
    }

    #[tokio::test]
    async fn test_body_decoded_regardless_of_content_type() {
        for content_type in [None, Some("application/x-www-form-urlencoded"), Some("text/plain")] {
            let Json(value) = Json::<Value>::from_request(request(content_type, r#"{"a":1}"#), &())
                .await
                .unwrap();

            assert_eq!(value, serde_json::json!({"a": 1}));
        }
    }

    #[tokio::test]
    async fn test_wrong_shape_is_bad_request() {
        #[derive(Debug, serde::Deserialize)]
        struct Named {
            #[allow(dead_code)]
            name: String,
        }

        let err = Json::<Named>::from_request(request(None, r#"{"name":1}"#), &())
            .await
            .unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.message.starts_with("invalid request body"));
    }

    #[tokio::test]
    async fn test_body_over_limit_is_payload_too_large() {
        let app = Router::new()
            .route("/", post(|Json(value): Json<Value>| async move { Json(value) }))
            .layer(DefaultBodyLimit::max(8));

        let response = app
            .oneshot(request(None, r#"{"key":"a long value"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, serde_json::json!({"error": "request body too large"}));
    }

    #[test]
    fn test_json_into_inner() {
        let json = Json(42);
        assert_eq!(json.into_inner(), 42);
    }
}
