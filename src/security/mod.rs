//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → cors.rs (preflight and origin check for the browser form)
//!     → limits.rs (body size cap)
//!     → Pass to handlers
//! ```
//!
//! # Design Decisions
//! - No caller authentication; the relay fronts a public order form
//! - Oversized bodies are rejected before they reach the upstream APIs

pub mod cors;
pub mod limits;

pub use cors::cors_layer;
pub use limits::body_limit;
