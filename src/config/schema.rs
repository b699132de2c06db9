//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay.
//! All types derive Serde traits for deserialization from config files.

use std::fmt;
use std::path::PathBuf;

use serde::Deserialize;

/// Root configuration for the order relay.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Shipping-carrier lookup API.
    pub carrier: CarrierConfig,

    /// Messaging-bot API used for order notifications.
    pub bot: BotConfig,

    /// Order intake policy.
    pub orders: OrderConfig,

    /// Photo upload handling.
    pub uploads: UploadConfig,

    /// Body limits and CORS.
    pub security: SecurityConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// A secret value that never shows up in `Debug` output.
#[derive(Clone, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw secret. Only for building outbound requests.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(\"***\")")
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:4000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:4000".to_string(),
        }
    }
}

/// Timeout configuration for inbound requests and upstream calls.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Inbound request deadline in seconds.
    pub request_secs: u64,

    /// Total time allowed for one upstream call, in seconds.
    pub upstream_secs: u64,

    /// Upstream connection establishment timeout in seconds.
    pub connect_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 30,
            upstream_secs: 10,
            connect_secs: 5,
        }
    }
}

/// Shipping-carrier API configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CarrierConfig {
    /// JSON-RPC-style endpoint receiving every lookup envelope.
    pub endpoint: String,

    /// Server-held key injected into envelopes built by the relay.
    pub api_key: Option<Secret>,
}

impl Default for CarrierConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.novaposhta.ua/v2.0/json/".to_string(),
            api_key: None,
        }
    }
}

/// Messaging-bot API configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Base URL; methods are called at `{api_base}/bot{token}/{method}`.
    pub api_base: String,

    /// Bot token.
    pub token: Option<Secret>,

    /// Chat receiving order notifications.
    pub chat_id: Option<String>,

    /// Markup dialect for notification text.
    pub parse_mode: ParseMode,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.telegram.org".to_string(),
            token: None,
            chat_id: None,
            parse_mode: ParseMode::Html,
        }
    }
}

/// Markup dialect understood by the bot API.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
pub enum ParseMode {
    #[default]
    #[serde(rename = "HTML", alias = "html")]
    Html,
    #[serde(rename = "Markdown", alias = "markdown")]
    Markdown,
}

impl ParseMode {
    /// Value sent as `parse_mode`.
    pub fn as_str(self) -> &'static str {
        match self {
            ParseMode::Html => "HTML",
            ParseMode::Markdown => "Markdown",
        }
    }
}

/// Order intake policy.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OrderConfig {
    /// Reject submissions without a phone number.
    pub require_phone: bool,
}

impl Default for OrderConfig {
    fn default() -> Self {
        Self {
            require_phone: true,
        }
    }
}

/// Photo upload handling.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Stream photos into temporary files instead of holding them in memory.
    pub spool_to_disk: bool,

    /// Directory for spooled photos. Defaults to the OS temp dir.
    pub dir: Option<PathBuf>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            spool_to_disk: true,
            dir: None,
        }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum body size in bytes.
    pub max_body_size: usize,

    /// Allowed CORS origins. Empty or `["*"]` allows any origin.
    pub cors_allowed_origins: Vec<String>,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 10 * 1024 * 1024, // 10MB, the bot API photo limit
            cors_allowed_origins: Vec::new(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default `EnvFilter` directive when `RUST_LOG` is unset.
    pub log_filter: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable the Prometheus exporter.
    pub metrics_enabled: bool,

    /// Metrics exporter bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_filter: "order_relay=info,tower_http=info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_yields_defaults() {
        let config: RelayConfig = toml::from_str("").unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:4000");
        assert_eq!(config.timeouts.upstream_secs, 10);
        assert!(config.orders.require_phone);
        assert!(config.uploads.spool_to_disk);
        assert_eq!(config.bot.parse_mode, ParseMode::Html);
    }

    #[test]
    fn test_partial_sections() {
        let config: RelayConfig = toml::from_str(
            r#"
            [bot]
            chat_id = "-100123"
            parse_mode = "Markdown"

            [carrier]
            api_key = "np-key"

            [observability]
            log_format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.bot.chat_id.as_deref(), Some("-100123"));
        assert_eq!(config.bot.parse_mode, ParseMode::Markdown);
        assert_eq!(config.bot.api_base, "https://api.telegram.org");
        assert_eq!(config.carrier.api_key.unwrap().expose(), "np-key");
        assert_eq!(config.observability.log_format, LogFormat::Json);
    }

    #[test]
    fn test_secret_debug_is_redacted() {
        let secret = Secret::new("123:ABC");
        let printed = format!("{:?}", secret);
        assert!(!printed.contains("123:ABC"));
    }
}
