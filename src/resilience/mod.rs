//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to carrier / bot API:
//!     → timeouts.rs (shared client with connect and total deadlines)
//!     → on failure: local error response, no retry
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every external call has a deadline
//! - Orders are sent at most once, so nothing is retried

pub mod timeouts;

pub use timeouts::{failure_kind, upstream_client};
