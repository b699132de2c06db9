//! Carrier API client.
//!
//! # Responsibilities
//! - POST envelopes to the carrier endpoint as JSON
//! - Relay the upstream status and JSON body unchanged
//! - Keep the server-held key out of everything sent back to the caller

use std::time::Instant;

use serde_json::Value;

use crate::carrier::envelope::{fill_api_key, redact_secret, LookupRequest};
use crate::carrier::types::{CarrierError, CarrierReply, CarrierResult};
use crate::config::{CarrierConfig, Secret};
use crate::observability::metrics;
use crate::resilience::failure_kind;

/// Stateless forwarder to the carrier endpoint.
#[derive(Clone)]
pub struct CarrierClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: Option<Secret>,
}

impl CarrierClient {
    pub fn new(config: &CarrierConfig, http: reqwest::Client) -> Self {
        Self {
            http,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone().filter(|k| !k.is_blank()),
        }
    }

    /// Send a caller-built envelope. The server key is added only when the
    /// caller left `apiKey` out.
    pub async fn forward(&self, mut payload: Value) -> CarrierResult<CarrierReply> {
        fill_api_key(&mut payload, self.api_key.as_ref());
        self.post(&payload).await
    }

    /// Dispatch a lookup chosen by one of the route strategies.
    pub async fn lookup(&self, request: LookupRequest) -> CarrierResult<CarrierReply> {
        match request {
            LookupRequest::PassThrough(payload) => self.forward(payload).await,
            LookupRequest::Legacy(lookup) => {
                let key = self.api_key.as_ref().ok_or(CarrierError::MissingApiKey)?;
                tracing::debug!(called_method = lookup.called_method(), "Wrapping legacy lookup");
                let envelope = lookup.into_envelope(key);
                self.post(&envelope).await
            }
        }
    }

    async fn post<T: serde::Serialize + ?Sized>(&self, body: &T) -> CarrierResult<CarrierReply> {
        let start = Instant::now();

        let response = match self.http.post(&self.endpoint).json(body).send().await {
            Ok(r) => r,
            Err(e) => {
                metrics::record_upstream("carrier", failure_kind(&e), start);
                return Err(CarrierError::Transport(e));
            }
        };

        let status = response.status();
        let bytes = match response.bytes().await {
            Ok(b) => b,
            Err(e) => {
                metrics::record_upstream("carrier", failure_kind(&e), start);
                return Err(CarrierError::Transport(e));
            }
        };

        let mut body: Value = match serde_json::from_slice(&bytes) {
            Ok(v) => v,
            Err(_) => {
                metrics::record_upstream("carrier", "decode", start);
                return Err(CarrierError::Decode { status });
            }
        };

        if let Some(key) = &self.api_key {
            redact_secret(&mut body, key.expose());
        }

        metrics::record_upstream("carrier", "ok", start);
        Ok(CarrierReply { status, body })
    }
}
