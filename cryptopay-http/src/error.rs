//! Errors returned by the API client.

use cryptopay::GatewayError;
use http::StatusCode;

/// Errors that can occur while calling the gateway.
///
/// [`ClientError::Transport`] is the only variant worth retrying, and only by
/// the caller; the client never retries on its own.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// URL parse error.
    #[error("URL parse error: {context}: {source}")]
    UrlParse {
        /// Human-readable context.
        context: &'static str,
        /// The underlying parse error.
        #[source]
        source: url::ParseError,
    },
    /// Network fault or timeout.
    #[error("HTTP error: {context}: {source}")]
    Transport {
        /// Human-readable context.
        context: &'static str,
        /// The underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },
    /// A successful response whose JSON did not match the expected shape.
    #[error("Failed to deserialize JSON: {context}: {source}")]
    JsonDeserialization {
        /// Human-readable context.
        context: &'static str,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
    /// A failed response that was not a JSON envelope.
    #[error("Unexpected HTTP status {status}: {context}: {body}")]
    HttpStatus {
        /// Human-readable context.
        context: &'static str,
        /// The HTTP status code.
        status: StatusCode,
        /// The response body.
        body: String,
    },
    /// Failed to read the response body.
    #[error("Failed to read response body: {context}: {source}")]
    ResponseBodyRead {
        /// Human-readable context.
        context: &'static str,
        /// The underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },
    /// The gateway rejected the call.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    /// The envelope's `ok` flag disagreed with its contents.
    #[error("Malformed response envelope: {context}: {reason}")]
    MalformedEnvelope {
        /// Human-readable context.
        context: &'static str,
        /// What was missing.
        reason: &'static str,
    },
    /// The token cannot be sent as a header value.
    #[error("API token is not a valid header value")]
    InvalidToken,
}

impl ClientError {
    /// Returns the gateway error, if the gateway rejected the call.
    #[must_use]
    pub const fn as_gateway(&self) -> Option<&GatewayError> {
        match self {
            Self::Gateway(err) => Some(err),
            _ => None,
        }
    }

    /// Returns `true` if the request timed out.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport { source, .. } if source.is_timeout())
    }
}
