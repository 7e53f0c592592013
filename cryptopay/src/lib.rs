#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Core types for the Crypto Pay API.
//!
//! This crate holds everything about the gateway that does not need an HTTP
//! stack: the JSON records returned by the API, the request parameter types,
//! the error-kind registry for gateway error codes, and the webhook signature
//! verifier and handler dispatcher.
//!
//! The HTTP client and the axum webhook route live in `cryptopay-http`.
//!
//! # Modules
//!
//! - [`error`] - Gateway errors and per-code [`ErrorKind`] identities
//! - [`network`] - Production and test gateway hosts
//! - [`proto`] - Wire format types: records, enums, request parameters, envelope
//! - [`webhook`] - Signature verification and payment handler dispatch
//!
//! # Feature Flags
//!
//! - `telemetry` - Emits `tracing` events for rejected deliveries and failing handlers

pub mod error;
pub mod network;
pub mod proto;
pub mod webhook;

pub use error::{ErrorKind, GatewayError};
pub use network::Network;
pub use proto::{Invoice, Update};
pub use rust_decimal::Decimal;
pub use webhook::{PaymentHandler, WebhookDispatcher, WebhookSecret};
