//! HTTP-specific constants for the Crypto Pay API.

pub use cryptopay::webhook::SIGNATURE_HEADER;

/// Header carrying the API token on every outbound request.
pub const API_TOKEN_HEADER: &str = "Crypto-Pay-API-Token";

/// Message in the body acknowledging every webhook delivery.
pub const WEBHOOK_ACK_MESSAGE: &str = "Status OK!";
