use axum::Json;
use serde_json::{json, Value};

use crate::http::response::ApiError;

/// `GET /`: liveness text.
pub async fn root() -> &'static str {
    "Order relay API running"
}

/// `GET /api/health`.
pub async fn health() -> Json<Value> {
    Json(json!({ "ok": true }))
}

/// Any unmatched route.
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}
