//! Request size limits.
//!
//! # Responsibilities
//! - Enforce maximum request body size for JSON, form and multipart bodies
//!
//! # Design Decisions
//! - Applied through axum's extractor limit so multipart photo uploads are
//!   capped while they stream
//! - Oversized bodies return 413 Payload Too Large

use axum::extract::DefaultBodyLimit;

use crate::config::SecurityConfig;

/// Body limit layer for the router.
pub fn body_limit(config: &SecurityConfig) -> DefaultBodyLimit {
    DefaultBodyLimit::max(config.max_body_size)
}
