//! Bot API wire types and error definitions.

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// JSON body of `sendMessage`.
#[derive(Debug, Serialize)]
pub struct SendMessage<'a> {
    pub chat_id: &'a str,
    pub text: &'a str,
    pub parse_mode: &'a str,
}

/// Acknowledgment returned by every bot API method.
#[derive(Debug, Clone, Deserialize)]
pub struct BotResponse {
    pub ok: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub error_code: Option<i64>,
}

/// Errors that can occur while notifying the operator.
#[derive(Debug, Error)]
pub enum BotError {
    /// Token or chat id missing from configuration.
    #[error("bot API is not configured")]
    NotConfigured,

    /// The spooled photo could not be read back.
    #[error("failed to read photo: {0}")]
    Photo(#[source] std::io::Error),

    /// Network failure or timeout. The URL (which embeds the token) is stripped.
    #[error("bot API request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// The bot API answered with something that is not its JSON envelope.
    #[error("bot API returned an unreadable body (status {status})")]
    Decode { status: StatusCode },

    /// The bot API answered `ok: false`.
    #[error("{description}")]
    Rejected {
        description: String,
        error_code: Option<i64>,
    },
}

impl BotError {
    pub(crate) fn transport(err: reqwest::Error) -> Self {
        BotError::Transport(err.without_url())
    }
}

/// Result type for bot operations.
pub type BotResult<T> = Result<T, BotError>;
