//! String enumerations used on the wire.
//!
//! The gateway adds assets, fiat currencies and statuses over time. Every
//! enum here therefore carries an `Other(String)` variant: a value that is
//! not known to this SDK version still parses, and serializes back unchanged.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
            /// A value not known to this version of the SDK.
            Other(String),
        }

        impl $name {
            /// All values known to this version of the SDK.
            pub const KNOWN: &'static [Self] = &[$( Self::$variant, )+];

            /// Returns the wire representation.
            #[must_use]
            pub fn as_str(&self) -> &str {
                match self {
                    $( Self::$variant => $wire, )+
                    Self::Other(value) => value,
                }
            }

            /// Returns `false` for [`Self::Other`].
            #[must_use]
            pub const fn is_known(&self) -> bool {
                !matches!(self, Self::Other(_))
            }
        }

        impl FromStr for $name {
            type Err = Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self::from(s))
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                match value {
                    $( $wire => Self::$variant, )+
                    other => Self::Other(other.to_owned()),
                }
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                match value.as_str() {
                    $( $wire => Self::$variant, )+
                    _ => Self::Other(value),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                String::deserialize(deserializer).map(Self::from)
            }
        }
    };
}

wire_enum! {
    /// Cryptocurrency codes supported by the gateway.
    pub enum Asset {
        /// Bitcoin.
        Btc => "BTC",
        /// Toncoin.
        Ton => "TON",
        /// Ether.
        Eth => "ETH",
        /// Tether.
        Usdt => "USDT",
        /// USD Coin.
        Usdc => "USDC",
        /// BNB.
        Bnb => "BNB",
        /// TRON.
        Trx => "TRX",
        /// Litecoin.
        Ltc => "LTC",
        /// Gram.
        Gram => "GRAM",
        /// Notcoin.
        Not => "NOT",
        /// `MY`.
        My => "MY",
        /// Solana.
        Sol => "SOL",
    }
}

wire_enum! {
    /// Fiat currency codes accepted for fiat-denominated invoices.
    pub enum Fiat {
        /// US dollar.
        Usd => "USD",
        /// Euro.
        Eur => "EUR",
        /// Russian ruble.
        Rub => "RUB",
        /// Belarusian ruble.
        Byn => "BYN",
        /// Ukrainian hryvnia.
        Uah => "UAH",
        /// Pound sterling.
        Gbp => "GBP",
        /// Chinese yuan.
        Cny => "CNY",
        /// Kazakhstani tenge.
        Kzt => "KZT",
        /// Uzbekistani som.
        Uzs => "UZS",
        /// Georgian lari.
        Gel => "GEL",
        /// Turkish lira.
        Try => "TRY",
        /// Armenian dram.
        Amd => "AMD",
        /// Thai baht.
        Thb => "THB",
        /// Indian rupee.
        Inr => "INR",
        /// Brazilian real.
        Brl => "BRL",
        /// Indonesian rupiah.
        Idr => "IDR",
        /// Azerbaijani manat.
        Azn => "AZN",
        /// UAE dirham.
        Aed => "AED",
        /// Polish zloty.
        Pln => "PLN",
        /// Israeli new shekel.
        Ils => "ILS",
        /// Kyrgyzstani som.
        Kgs => "KGS",
        /// Tajikistani somoni.
        Tjs => "TJS",
    }
}

wire_enum! {
    /// Whether an invoice amount is denominated in crypto or fiat.
    pub enum CurrencyType {
        /// Amount is in [`Asset`] units.
        Crypto => "crypto",
        /// Amount is in [`Fiat`] units; the payer picks an accepted asset.
        Fiat => "fiat",
    }
}

wire_enum! {
    /// Invoice lifecycle: `active` until paid or expired.
    pub enum InvoiceStatus {
        /// Waiting for payment.
        Active => "active",
        /// Paid by a user.
        Paid => "paid",
        /// Expired before payment.
        Expired => "expired",
    }
}

wire_enum! {
    /// Check lifecycle: `active` until a user activates it.
    pub enum CheckStatus {
        /// Not yet activated.
        Active => "active",
        /// Redeemed by a user.
        Activated => "activated",
    }
}

wire_enum! {
    /// Transfer status.
    pub enum TransferStatus {
        /// The transfer was completed.
        Completed => "completed",
    }
}

wire_enum! {
    /// Label of the button shown to the user after an invoice is paid.
    pub enum PaidButton {
        /// "View Item".
        ViewItem => "viewItem",
        /// "View Channel".
        OpenChannel => "openChannel",
        /// "Open Bot".
        OpenBot => "openBot",
        /// "Return".
        Callback => "callback",
    }
}

wire_enum! {
    /// Type tag of a webhook [`Update`](super::Update).
    pub enum UpdateType {
        /// An invoice was paid.
        InvoicePaid => "invoice_paid",
    }
}

/// A currency code that may be either a crypto [`Asset`] or a [`Fiat`].
///
/// Kept as the raw code; use [`Self::asset`] or [`Self::fiat`] to interpret it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Wraps a raw code.
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Returns the raw code.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Interprets the code as a crypto asset.
    #[must_use]
    pub fn asset(&self) -> Asset {
        Asset::from(self.0.as_str())
    }

    /// Interprets the code as a fiat currency.
    #[must_use]
    pub fn fiat(&self) -> Fiat {
        Fiat::from(self.0.as_str())
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Asset> for CurrencyCode {
    fn from(asset: Asset) -> Self {
        Self(asset.as_str().to_owned())
    }
}

impl From<Fiat> for CurrencyCode {
    fn from(fiat: Fiat) -> Self {
        Self(fiat.as_str().to_owned())
    }
}
