//! HTTP surface.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, trace, timeout, CORS, body limit)
//!     → request.rs (decode JSON / form bodies)
//!     → lookup.rs  → carrier proxy        (/api/novaposhta, getCities, getWarehouses)
//!     → order.rs   → intake + notifier    (/api/sendOrder)
//!     → health.rs                          (/, /api/health)
//!     → response.rs (error → status + {ok:false, error})
//! ```

pub mod health;
pub mod lookup;
pub mod order;
pub mod request;
pub mod response;
pub mod server;

pub use request::{MakeRequestUuidV4, X_REQUEST_ID};
pub use response::ApiError;
pub use server::{AppState, HttpServer};
