//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults
//!     → config file (TOML, optional)
//!     → environment (BOT_TOKEN, CHAT_ID, NP_API_KEY, PORT, ...)
//!     → validation.rs (semantic checks)
//!     → RelayConfig (validated, immutable)
//!     → shared via Arc to all handlers
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Missing secrets degrade the affected routes instead of aborting startup

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    BotConfig, CarrierConfig, ListenerConfig, LogFormat, ObservabilityConfig, OrderConfig,
    ParseMode, RelayConfig, Secret, SecurityConfig, TimeoutConfig, UploadConfig,
};
