//! Messaging-bot API client.
//!
//! # Responsibilities
//! - `sendMessage` as JSON for text-only notifications
//! - `sendPhoto` as multipart for notifications with a photo
//! - Treat the API's own `ok` flag as the success criterion
//!
//! # Design Decisions
//! - One call per notification; no retry and no fallback from photo to text
//! - Token lives only in the request URL, which is stripped from errors

use std::time::Instant;

use reqwest::multipart::{Form, Part};

use crate::bot::types::{BotError, BotResponse, BotResult, SendMessage};
use crate::config::{BotConfig, ParseMode, Secret};
use crate::observability::metrics;
use crate::order::photo::PhotoAttachment;
use crate::resilience::failure_kind;

/// Client for the bot API's send operations.
#[derive(Clone)]
pub struct BotClient {
    http: reqwest::Client,
    api_base: String,
    token: Option<Secret>,
    chat_id: Option<String>,
    parse_mode: ParseMode,
}

impl BotClient {
    pub fn new(config: &BotConfig, http: reqwest::Client) -> Self {
        Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            token: config.token.clone().filter(|t| !t.is_blank()),
            chat_id: config.chat_id.clone().filter(|c| !c.trim().is_empty()),
            parse_mode: config.parse_mode,
        }
    }

    pub fn parse_mode(&self) -> ParseMode {
        self.parse_mode
    }

    /// Send a text-only message.
    pub async fn send_message(&self, text: &str) -> BotResult<()> {
        let (url, chat_id) = self.target("sendMessage")?;
        let body = SendMessage {
            chat_id,
            text,
            parse_mode: self.parse_mode.as_str(),
        };
        self.dispatch("sendMessage", self.http.post(url).json(&body)).await
    }

    /// Send a photo with `caption`.
    pub async fn send_photo(&self, caption: &str, photo: &PhotoAttachment) -> BotResult<()> {
        let (url, chat_id) = self.target("sendPhoto")?;
        let body = photo.body().await.map_err(BotError::Photo)?;

        let part = Part::stream_with_length(body, photo.len())
            .file_name(photo.file_name.clone())
            .mime_str(&photo.content_type)
            .map_err(BotError::transport)?;

        let form = Form::new()
            .text("chat_id", chat_id.to_string())
            .text("caption", caption.to_string())
            .text("parse_mode", self.parse_mode.as_str())
            .part("photo", part);

        self.dispatch("sendPhoto", self.http.post(url).multipart(form)).await
    }

    fn target(&self, method: &str) -> BotResult<(String, &str)> {
        match (&self.token, &self.chat_id) {
            (Some(token), Some(chat_id)) => Ok((
                format!("{}/bot{}/{}", self.api_base, token.expose(), method),
                chat_id.as_str(),
            )),
            _ => Err(BotError::NotConfigured),
        }
    }

    async fn dispatch(
        &self,
        method: &'static str,
        request: reqwest::RequestBuilder,
    ) -> BotResult<()> {
        let start = Instant::now();

        let response = match request.send().await {
            Ok(r) => r,
            Err(e) => {
                metrics::record_upstream("bot", failure_kind(&e), start);
                return Err(BotError::transport(e));
            }
        };

        let status = response.status();
        let bytes = match response.bytes().await {
            Ok(b) => b,
            Err(e) => {
                metrics::record_upstream("bot", failure_kind(&e), start);
                return Err(BotError::transport(e));
            }
        };

        let ack: BotResponse = match serde_json::from_slice(&bytes) {
            Ok(ack) => ack,
            Err(_) => {
                metrics::record_upstream("bot", "decode", start);
                return Err(BotError::Decode { status });
            }
        };

        if !ack.ok {
            metrics::record_upstream("bot", "rejected", start);
            return Err(BotError::Rejected {
                description: ack
                    .description
                    .unwrap_or_else(|| format!("Telegram {} failed", method)),
                error_code: ack.error_code,
            });
        }

        metrics::record_upstream("bot", "ok", start);
        tracing::debug!(method, "Bot API accepted notification");
        Ok(())
    }
}
