//! Order relay library: carrier lookup proxy and order notification forwarder.

pub mod bot;
pub mod carrier;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod order;
pub mod resilience;
pub mod security;

pub use config::schema::RelayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
