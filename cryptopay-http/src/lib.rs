#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! HTTP transport for the Crypto Pay API.
//!
//! Provides the [`client::CryptoPay`] API client (feature: `client`) and an
//! axum route that receives signed webhook deliveries (feature: `server`).
//! Everything transport-independent, from response records to signature
//! checks, lives in the `cryptopay` crate.
//!
//! # Modules
//!
//! - [`constants`] - HTTP header names and the webhook acknowledgement
//! - [`error`] - Errors returned by the API client (feature: `client`)
//! - [`client`] - API client and typed methods (feature: `client`)
//! - [`server`] - axum webhook route (feature: `server`)
//!
//! # Feature Flags
//!
//! - `client` (default) - reqwest-based API client
//! - `server` - axum router for the webhook endpoint
//! - `telemetry` - `tracing` spans and events for requests and deliveries

pub mod constants;

#[cfg(feature = "client")]
pub mod client;
#[cfg(feature = "client")]
pub mod error;
#[cfg(feature = "server")]
pub mod server;

#[cfg(feature = "client")]
pub use client::CryptoPay;
