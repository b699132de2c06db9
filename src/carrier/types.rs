//! Carrier lookup types and error definitions.

use axum::http::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Upstream answer relayed to the caller as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct CarrierReply {
    pub status: StatusCode,
    pub body: Value,
}

/// Errors that can occur while talking to the carrier API.
#[derive(Debug, Error)]
pub enum CarrierError {
    /// The caller's request cannot be turned into an envelope.
    #[error("{0}")]
    InvalidRequest(String),

    /// A legacy route needs the server-held key but none is configured.
    #[error("carrier API key is not configured")]
    MissingApiKey,

    /// Network failure or timeout.
    #[error("carrier request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// The carrier answered with something that is not JSON.
    #[error("carrier returned an unreadable body (status {status})")]
    Decode { status: StatusCode },
}

/// Result type for carrier operations.
pub type CarrierResult<T> = Result<T, CarrierError>;
