//! Messaging-bot API integration.

pub mod client;
pub mod types;

pub use client::BotClient;
pub use types::{BotError, BotResponse, BotResult};
