//! Webhook signature scheme.
//!
//! The gateway signs each delivery with HMAC-SHA256 over the raw request
//! body. The key is not the API token itself but its SHA-256 digest. The
//! signature travels as lowercase hex in the `Crypto-Pay-Api-Signature`
//! header.

use std::fmt;

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Name of the header carrying the delivery signature.
pub const SIGNATURE_HEADER: &str = "crypto-pay-api-signature";

/// Key used to sign and verify webhook deliveries for one API token.
///
/// Holds only the token's digest, never the token.
#[derive(Clone)]
pub struct WebhookSecret([u8; 32]);

impl WebhookSecret {
    /// Derives the signing key for `token`.
    #[must_use]
    pub fn from_token(token: &str) -> Self {
        Self(Sha256::digest(token.as_bytes()).into())
    }

    /// Computes the signature header value the gateway would send for `body`.
    #[must_use]
    #[allow(clippy::missing_panics_doc)]
    pub fn sign(&self, body: &[u8]) -> String {
        let mut mac = HmacSha256::new_from_slice(&self.0).expect("HMAC can take key of any size");
        mac.update(body);
        hex::encode(mac.finalize().into_bytes())
    }

    /// Checks `signature` against the exact bytes of `body`.
    ///
    /// An absent header never matches. A header of the wrong length or in
    /// uppercase hex is a plain mismatch. Equal-length inputs are compared in
    /// constant time.
    ///
    /// ```rust
    /// use cryptopay::WebhookSecret;
    ///
    /// let secret = WebhookSecret::from_token("TOKEN");
    /// let body = br#"{"update_id":1}"#;
    /// let header = secret.sign(body);
    /// assert!(secret.verify(body, Some(&header)));
    /// assert!(!secret.verify(body, Some("")));
    /// assert!(!secret.verify(body, None));
    /// ```
    #[must_use]
    pub fn verify(&self, body: &[u8], signature: Option<&str>) -> bool {
        let Some(signature) = signature else {
            return false;
        };
        let expected = self.sign(body);
        expected.as_bytes().ct_eq(signature.as_bytes()).into()
    }
}

impl fmt::Debug for WebhookSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("WebhookSecret(<redacted>)")
    }
}
