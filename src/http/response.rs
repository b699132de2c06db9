//! Response shaping.
//!
//! # Responsibilities
//! - Map every failure onto a status code and a `{ok: false, error}` body
//! - Keep upstream transport details out of caller-visible messages
//!
//! # Design Decisions
//! - Client mistakes → 4xx with a readable message
//! - Transport failures → 500 with a generic message (details only in logs)
//! - Upstream rejections → 502 carrying the upstream description

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::bot::BotError;
use crate::carrier::CarrierError;
use crate::order::ValidationError;

/// Caller-facing error.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or incomplete request.
    #[error("{0}")]
    BadRequest(String),

    /// Body over the configured limit.
    #[error("{0}")]
    PayloadTooLarge(String),

    /// No route matched.
    #[error("not found")]
    NotFound,

    /// Inbound request deadline exceeded.
    #[error("request timed out")]
    Timeout,

    /// Upstream unreachable, timed out or unreadable.
    #[error("{0}")]
    Upstream(String),

    /// Upstream answered but refused the request.
    #[error("{0}")]
    UpstreamRejected(String),

    /// Local failure (missing configuration, temp storage).
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Convert an axum extractor rejection, keeping its 4xx class.
    pub fn from_rejection(status: StatusCode, message: String) -> Self {
        if status == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(message)
        } else {
            ApiError::BadRequest(message)
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Timeout => StatusCode::REQUEST_TIMEOUT,
            ApiError::Upstream(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::UpstreamRejected(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = json!({ "ok": false, "error": self.to_string() });
        (status, Json(body)).into_response()
    }
}

impl From<CarrierError> for ApiError {
    fn from(err: CarrierError) -> Self {
        match err {
            CarrierError::InvalidRequest(msg) => ApiError::BadRequest(msg),
            CarrierError::MissingApiKey => ApiError::Internal(err.to_string()),
            CarrierError::Transport(_) | CarrierError::Decode { .. } => {
                ApiError::Upstream("Failed to connect to carrier API".to_string())
            }
        }
    }
}

impl From<BotError> for ApiError {
    fn from(err: BotError) -> Self {
        match err {
            BotError::NotConfigured => ApiError::Internal(err.to_string()),
            BotError::Photo(_) => ApiError::Internal("Send order failed".to_string()),
            BotError::Transport(_) | BotError::Decode { .. } => {
                ApiError::Upstream("Failed to reach messaging API".to_string())
            }
            BotError::Rejected { description, .. } => ApiError::UpstreamRejected(description),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}
