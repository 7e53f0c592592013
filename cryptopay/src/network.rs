//! Gateway hosts.
//!
//! Crypto Pay runs two fully separate environments. Tokens issued by one are
//! rejected by the other, so the choice is made once when a client is built.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The gateway environment a client talks to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Production gateway (`@CryptoBot`).
    #[default]
    Mainnet,
    /// Test gateway (`@CryptoTestnetBot`).
    Testnet,
}

impl Network {
    /// Base URL of the production gateway.
    pub const MAINNET_URL: &'static str = "https://pay.crypt.bot/";
    /// Base URL of the test gateway.
    pub const TESTNET_URL: &'static str = "https://testnet-pay.crypt.bot/";

    /// Returns the base URL for this environment, with a trailing slash.
    #[must_use]
    pub const fn base_url(&self) -> &'static str {
        match self {
            Self::Mainnet => Self::MAINNET_URL,
            Self::Testnet => Self::TESTNET_URL,
        }
    }

    /// Picks the environment from a "use test network" flag.
    #[must_use]
    pub const fn from_testnet_flag(testnet: bool) -> Self {
        if testnet { Self::Testnet } else { Self::Mainnet }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mainnet => f.write_str("mainnet"),
            Self::Testnet => f.write_str("testnet"),
        }
    }
}

/// Error returned when parsing an unknown network name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown network {0:?}, expected \"mainnet\" or \"testnet\"")]
pub struct UnknownNetwork(pub String);

impl FromStr for Network {
    type Err = UnknownNetwork;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mainnet" | "main" => Ok(Self::Mainnet),
            "testnet" | "test" => Ok(Self::Testnet),
            _ => Err(UnknownNetwork(s.to_owned())),
        }
    }
}
