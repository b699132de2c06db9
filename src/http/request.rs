//! Request handling.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) for every inbound request
//! - Put the request ID on the tracing span of the request
//! - Decode lookup bodies from JSON or url-encoded forms
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - An empty lookup body is treated as `{}`

use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::header::CONTENT_TYPE;
use axum::http::HeaderValue;
use axum::Form;
use serde_json::{Map, Value};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::http::response::ApiError;

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Request ID generator for `SetRequestIdLayer`.
#[derive(Clone, Copy, Default)]
pub struct MakeRequestUuidV4;

impl MakeRequestId for MakeRequestUuidV4 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Span for one inbound request, tagged with its ID.
pub fn make_span(request: &Request) -> tracing::Span {
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");
    tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %request.method(),
        path = %request.uri().path(),
    )
}

/// Lower-cased media type of the request, without parameters.
pub fn media_type(request: &Request) -> String {
    request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|v| v.trim().to_ascii_lowercase())
        .unwrap_or_default()
}

/// Decode a lookup body. Forms become a flat object of strings; anything
/// else is parsed as JSON.
pub async fn read_lookup_body(request: Request) -> Result<Value, ApiError> {
    if media_type(&request) == "application/x-www-form-urlencoded" {
        let Form(fields) = Form::<HashMap<String, String>>::from_request(request, &())
            .await
            .map_err(|r| ApiError::from_rejection(r.status(), r.body_text()))?;
        let object: Map<String, Value> = fields
            .into_iter()
            .map(|(k, v)| (k, Value::String(v)))
            .collect();
        return Ok(Value::Object(object));
    }

    let bytes = Bytes::from_request(request, &())
        .await
        .map_err(|r| ApiError::from_rejection(r.status(), r.body_text()))?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Map::new()));
    }
    serde_json::from_slice(&bytes)
        .map_err(|e| ApiError::BadRequest(format!("Malformed JSON body: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use serde_json::json;

    fn request(content_type: Option<&str>, body: &'static str) -> Request {
        let mut builder = axum::http::Request::builder().method("POST").uri("/");
        if let Some(ct) = content_type {
            builder = builder.header(CONTENT_TYPE, ct);
        }
        builder.body(Body::from(body)).unwrap()
    }

    #[tokio::test]
    async fn test_json_body() {
        let value = read_lookup_body(request(Some("application/json"), r#"{"query":"Kyiv"}"#))
            .await
            .unwrap();
        assert_eq!(value, json!({"query": "Kyiv"}));
    }

    #[tokio::test]
    async fn test_form_body() {
        let value = read_lookup_body(request(
            Some("application/x-www-form-urlencoded; charset=UTF-8"),
            "cityRef=abc-123",
        ))
        .await
        .unwrap();
        assert_eq!(value, json!({"cityRef": "abc-123"}));
    }

    #[tokio::test]
    async fn test_empty_body_is_empty_object() {
        let value = read_lookup_body(request(None, "")).await.unwrap();
        assert_eq!(value, json!({}));
    }

    #[tokio::test]
    async fn test_malformed_json_is_client_error() {
        let err = read_lookup_body(request(Some("application/json"), "{nope"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn test_request_ids_are_unique() {
        let mut make = MakeRequestUuidV4;
        let req = axum::http::Request::new(());
        let a = make.make_request_id(&req).unwrap();
        let b = make.make_request_id(&req).unwrap();
        assert_ne!(a.header_value(), b.header_value());
    }
}
