//! Webhook receiver configuration.
//!
//! Loads configuration from a TOML file with support for environment variable
//! expansion in string values. Variables use `$VAR` or `${VAR}` syntax.
//!
//! # Example Configuration
//!
//! ```toml
//! host = "0.0.0.0"
//! port = 8080
//! path = "/cryptopay"
//! token = "$CRYPTO_PAY_TOKEN"
//! testnet = true
//! timeout_secs = 10
//!
//! [startup_invoice]
//! asset = "USDT"
//! amount = "1.5"
//! description = "Smoke test"
//! ```
//!
//! # Environment Variables
//!
//! - `CONFIG` - Path to configuration file (default: `config.toml`)
//! - `HOST` - Override server bind address
//! - `PORT` - Override server port
//! - `CRYPTO_PAY_TOKEN` - API token, used when the file sets none

use std::net::{IpAddr, Ipv4Addr};
use std::path::Path;
use std::time::Duration;

use cryptopay::Decimal;
use cryptopay::proto::{Asset, CreateInvoiceParams};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Environment variable consulted when the file sets no token.
pub const TOKEN_ENV: &str = "CRYPTO_PAY_TOKEN";

/// Path reserved for the liveness probe.
pub const HEALTH_PATH: &str = "/health";

/// Top-level receiver configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Server bind address (default: `0.0.0.0`).
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// Server port (default: `8080`).
    #[serde(default = "default_port")]
    pub port: u16,

    /// Route receiving deliveries (default: `/`).
    #[serde(default = "default_path")]
    pub path: String,

    /// Crypto Pay API token. Also keys the webhook signature.
    #[serde(default)]
    pub token: String,

    /// Use the test network instead of production.
    #[serde(default)]
    pub testnet: bool,

    /// Timeout for outbound API calls, in seconds.
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Invoice to create at startup, to check the whole payment loop by hand.
    #[serde(default)]
    pub startup_invoice: Option<StartupInvoice>,
}

impl std::fmt::Debug for WebhookConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("path", &self.path)
            .field("token", &"<redacted>")
            .field("testnet", &self.testnet)
            .field("timeout_secs", &self.timeout_secs)
            .field("startup_invoice", &self.startup_invoice)
            .finish()
    }
}

/// An invoice created once when the receiver starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartupInvoice {
    /// Asset to invoice in.
    pub asset: Asset,
    /// Amount to invoice.
    pub amount: Decimal,
    /// Description shown to the payer.
    #[serde(default)]
    pub description: Option<String>,
}

impl StartupInvoice {
    /// Request parameters for this invoice.
    #[must_use]
    pub fn params(&self) -> CreateInvoiceParams {
        let mut params = CreateInvoiceParams::new(self.amount).with_asset(self.asset.clone());
        params.description.clone_from(&self.description);
        params
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

const fn default_port() -> u16 {
    8080
}

fn default_path() -> String {
    "/".to_owned()
}

impl WebhookConfig {
    /// Loads configuration from the path given by the `CONFIG` environment
    /// variable, falling back to `config.toml` in the current directory.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be read, does not parse,
    /// or leaves the token unset.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("CONFIG").unwrap_or_else(|_| "config.toml".to_owned());
        Self::load_from(&path)
    }

    /// Loads configuration from a specific file path.
    ///
    /// A missing file is treated as empty, so everything comes from defaults
    /// and the environment.
    ///
    /// # Errors
    ///
    /// See [`Self::load`].
    pub fn load_from(path: &str) -> Result<Self, ConfigError> {
        let content = if Path::new(path).exists() {
            std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.to_owned(),
                source,
            })?
        } else {
            String::new()
        };
        Self::from_toml(&content, |name| std::env::var(name).ok())
    }

    /// Parses configuration from TOML text, resolving variables through `lookup`.
    ///
    /// `$VAR` / `${VAR}` references are expanded first; `HOST` and `PORT`
    /// override the file; the token falls back to [`TOKEN_ENV`].
    ///
    /// # Errors
    ///
    /// See [`Self::load`].
    pub fn from_toml(
        content: &str,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let expanded = expand_env_vars(content, &lookup);
        let mut config: Self = toml::from_str(&expanded)?;

        if let Some(addr) = lookup("HOST").and_then(|host| host.parse().ok()) {
            config.host = addr;
        }
        if let Some(port) = lookup("PORT").and_then(|port| port.parse().ok()) {
            config.port = port;
        }
        if config.token.is_empty() {
            config.token = lookup(TOKEN_ENV).unwrap_or_default();
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let token = self.token.trim();
        if token.is_empty() || token.starts_with('$') {
            return Err(ConfigError::MissingToken);
        }
        if !self.path.starts_with('/') || self.path == HEALTH_PATH {
            return Err(ConfigError::InvalidPath(self.path.clone()));
        }
        Ok(())
    }

    /// Timeout for outbound API calls, if configured.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Expands `$VAR` and `${VAR}` patterns in a string through `lookup`.
///
/// Unresolved variables are left as-is.
fn expand_env_vars(input: &str, lookup: &impl Fn(&str) -> Option<String>) -> String {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '$' {
            result.push(ch);
            continue;
        }

        let braced = chars.peek() == Some(&'{');
        if braced {
            chars.next();
        }

        let mut var_name = String::new();
        while let Some(&c) = chars.peek() {
            if braced {
                if c == '}' {
                    chars.next();
                    break;
                }
            } else if !c.is_ascii_alphanumeric() && c != '_' {
                break;
            }
            var_name.push(c);
            chars.next();
        }

        match lookup(&var_name) {
            Some(value) if !var_name.is_empty() => result.push_str(&value),
            _ => {
                result.push('$');
                if braced {
                    result.push('{');
                }
                result.push_str(&var_name);
                if braced && !var_name.is_empty() {
                    result.push('}');
                }
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn expands_plain_and_braced_vars() {
        let lookup = env(&[("A", "one"), ("B_2", "two")]);
        assert_eq!(expand_env_vars("$A-${B_2}!", &lookup), "one-two!");
    }

    #[test]
    fn leaves_unresolved_vars() {
        let lookup = env(&[]);
        assert_eq!(expand_env_vars("x=$MISSING ${ALSO}", &lookup), "x=$MISSING ${ALSO}");
        assert_eq!(expand_env_vars("cost: $ 5", &lookup), "cost: $ 5");
    }

    #[test]
    fn defaults_with_token_from_env() {
        let config = WebhookConfig::from_toml("", env(&[(TOKEN_ENV, "1234:AAA")])).unwrap();
        assert_eq!(config.host, default_host());
        assert_eq!(config.port, 8080);
        assert_eq!(config.path, "/");
        assert_eq!(config.token, "1234:AAA");
        assert!(!config.testnet);
        assert!(config.timeout().is_none());
        assert!(config.startup_invoice.is_none());
    }

    #[test]
    fn file_values_and_overrides() {
        let toml = r#"
            host = "127.0.0.1"
            port = 9000
            path = "/cryptopay"
            token = "${MY_TOKEN}"
            testnet = true
            timeout_secs = 15

            [startup_invoice]
            asset = "USDT"
            amount = "1.5"
        "#;
        let config =
            WebhookConfig::from_toml(toml, env(&[("MY_TOKEN", "42:XYZ"), ("PORT", "7000")])).unwrap();
        assert_eq!(config.host.to_string(), "127.0.0.1");
        assert_eq!(config.port, 7000);
        assert_eq!(config.path, "/cryptopay");
        assert_eq!(config.token, "42:XYZ");
        assert!(config.testnet);
        assert_eq!(config.timeout(), Some(Duration::from_secs(15)));

        let params = config.startup_invoice.unwrap().params();
        assert_eq!(params.asset, Some(Asset::Usdt));
        assert_eq!(params.amount, Decimal::new(15, 1));
        assert!(params.description.is_none());
    }

    #[test]
    fn unresolved_token_is_missing() {
        let err = WebhookConfig::from_toml(r#"token = "$NOPE""#, env(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingToken));
        let err = WebhookConfig::from_toml("", env(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingToken));
    }

    #[test]
    fn bad_paths_are_rejected() {
        for path in ["hook", "/health"] {
            let toml = format!("token = \"t\"\npath = \"{path}\"");
            let err = WebhookConfig::from_toml(&toml, env(&[])).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidPath(_)), "{path}");
        }
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = WebhookConfig::from_toml("port = \"not a port\"", env(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn debug_redacts_token() {
        let config = WebhookConfig::from_toml(r#"token = "SECRET""#, env(&[])).unwrap();
        assert!(!format!("{config:?}").contains("SECRET"));
    }
}
