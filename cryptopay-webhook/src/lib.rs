//! Standalone receiver for Crypto Pay webhook deliveries.
//!
//! Serves the signed webhook route from `cryptopay-http`, logs every paid
//! invoice, and exposes a `/health` probe.
//!
//! # Modules
//!
//! - [`config`] - Receiver configuration with environment variable expansion
//! - [`error`] - Configuration error types
//! - [`handlers`] - Payment handler, health probe and router builder
//! - [`util`] - Signal-driven shutdown

pub mod config;
pub mod error;
pub mod handlers;
pub mod util;

pub use config::WebhookConfig;
pub use handlers::receiver_router;
