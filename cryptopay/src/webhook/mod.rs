//! Inbound webhook verification and handler dispatch.
//!
//! A delivery goes through three steps:
//!
//! 1. **Verify**: HMAC-SHA256 of the raw body, keyed with SHA-256 of the API
//!    token, must equal the `Crypto-Pay-Api-Signature` header. Anything else
//!    is rejected and goes no further.
//! 2. **Parse**: the verified body is decoded into an [`Update`](crate::Update).
//!    A body that fails to decode is reported as a [`ValidationError`], which
//!    is distinct from a signature mismatch.
//! 3. **Dispatch**: every registered [`PaymentHandler`] runs in registration
//!    order. A handler that errors or panics is isolated; the rest still run.
//!
//! The outcome is returned as a [`Delivery`] for logging and tests. The HTTP
//! response to the gateway never depends on it.
//!
//! ```rust
//! use cryptopay::webhook::{WebhookDispatcher, WebhookError};
//!
//! let dispatcher = WebhookDispatcher::from_token("TOKEN");
//! let signature = dispatcher.secret().sign(b"{}");
//! assert!(matches!(
//!     dispatcher.verify_update(b"{}", Some(&signature)),
//!     Err(WebhookError::Validation(_))
//! ));
//! assert!(matches!(
//!     dispatcher.verify_update(b"{}", Some("")),
//!     Err(WebhookError::SignatureMismatch)
//! ));
//! ```

mod dispatch;
mod signature;

pub use dispatch::{
    BoxFuture, Delivery, DispatchReport, HandlerError, HandlerFailure, PaymentHandler,
    ValidationError, WebhookDispatcher, WebhookError,
};
pub use signature::{SIGNATURE_HEADER, WebhookSecret};
