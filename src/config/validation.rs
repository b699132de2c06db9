//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, body limit > 0)
//! - Check that addresses and upstream URLs parse
//! - Report missing secrets as warnings, never as errors
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RelayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::RelayConfig;

/// A semantic problem that prevents startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a fully merged configuration.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    for (field, value) in [
        ("timeouts.request_secs", config.timeouts.request_secs),
        ("timeouts.upstream_secs", config.timeouts.upstream_secs),
        ("timeouts.connect_secs", config.timeouts.connect_secs),
    ] {
        if value == 0 {
            errors.push(ValidationError::new(field, "must be greater than zero"));
        }
    }

    if config.timeouts.request_secs < config.timeouts.upstream_secs {
        errors.push(ValidationError::new(
            "timeouts.request_secs",
            "must not be shorter than timeouts.upstream_secs",
        ));
    }

    for (field, value) in [
        ("carrier.endpoint", &config.carrier.endpoint),
        ("bot.api_base", &config.bot.api_base),
    ] {
        if let Err(e) = url::Url::parse(value) {
            errors.push(ValidationError::new(field, format!("invalid URL '{}': {}", value, e)));
        }
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::new(
            "security.max_body_size",
            "must be greater than zero",
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!(
                "'{}' is not a socket address",
                config.observability.metrics_address
            ),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Names of the secrets the relay needs but does not have.
///
/// The relay still starts without them; affected routes fail per request.
pub fn missing_secrets(config: &RelayConfig) -> Vec<&'static str> {
    let mut missing = Vec::new();
    if config.bot.token.as_ref().map_or(true, |t| t.is_blank()) {
        missing.push("BOT_TOKEN");
    }
    if config
        .bot
        .chat_id
        .as_deref()
        .map_or(true, |c| c.trim().is_empty())
    {
        missing.push("CHAT_ID");
    }
    if config.carrier.api_key.as_ref().map_or(true, |k| k.is_blank()) {
        missing.push("NP_API_KEY");
    }
    missing
}
