//! Carrier lookup proxy.
//!
//! # Data Flow
//! ```text
//! /api/novaposhta body ─────────────────────────▶ LookupRequest::PassThrough
//! /api/getCities   body → envelope::city_search ─┐
//! /api/getWarehouses body → envelope::warehouse_listing ─┴▶ LookupRequest
//!     → client.rs (fill or build envelope, POST, redact key)
//!     → CarrierReply { status, body } relayed to caller
//! ```

pub mod client;
pub mod envelope;
pub mod types;

pub use client::CarrierClient;
pub use envelope::{city_search, warehouse_listing, Envelope, LegacyLookup, LookupRequest};
pub use types::{CarrierError, CarrierReply, CarrierResult};
