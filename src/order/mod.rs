//! Order intake and notification.
//!
//! # Data Flow
//! ```text
//! form fields + optional photo (photo.rs: memory or spooled temp file)
//!     → validation.rs (presence checks)
//!     → ValidatedOrder
//!     → notifier.rs (message.rs renders text, one bot API call)
//!     → order dropped: temp file removed
//! ```

pub mod message;
pub mod notifier;
pub mod photo;
pub mod validation;

pub use notifier::OrderNotifier;
pub use photo::{PhotoAttachment, PhotoSpool};
pub use validation::{validate, OrderFields, ValidatedOrder, ValidationError};
