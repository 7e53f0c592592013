//! Error types for the webhook receiver.

/// Errors that can occur while loading the receiver configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file exists but could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// Path of the configuration file.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration is not valid TOML or has wrongly typed values.
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// No API token was configured, or its variable did not resolve.
    #[error("API token is not set (set `token` or CRYPTO_PAY_TOKEN)")]
    MissingToken,

    /// The webhook path is not an absolute route or collides with `/health`.
    #[error("invalid webhook path {0:?}")]
    InvalidPath(String),
}
