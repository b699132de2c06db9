//! Timeout enforcement.
//!
//! # Responsibilities
//! - Build the shared upstream client with connect and total-call deadlines
//! - Classify timed-out calls for logging and metrics
//!
//! # Design Decisions
//! - Every upstream call has a deadline; a slow carrier or bot API cannot pin
//!   request handlers indefinitely
//! - Timed-out calls surface as transport errors (500), never retried

use std::time::Duration;

use crate::config::TimeoutConfig;

/// Build the HTTP client shared by every upstream call.
pub fn upstream_client(config: &TimeoutConfig) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(config.connect_secs))
        .timeout(Duration::from_secs(config.upstream_secs))
        .user_agent(concat!("order-relay/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Outcome label for an upstream error.
pub fn failure_kind(err: &reqwest::Error) -> &'static str {
    if err.is_timeout() {
        "timeout"
    } else if err.is_connect() {
        "connect"
    } else if err.is_decode() {
        "decode"
    } else {
        "transport"
    }
}
