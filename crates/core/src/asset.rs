//! Asset - Type-safe asset codes
//!
//! Collateral tokens are identified by asset codes. Common assets are
//! pre-defined for type safety; anything else uses the `Other` fallback.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur when parsing asset codes
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    #[error("Empty asset code")]
    EmptyCode,

    #[error("Asset code too long (max 10 chars): {0}")]
    TooLong(String),

    #[error("Invalid asset code format: {0}")]
    InvalidFormat(String),
}

/// Asset codes for pool currencies and collateral tokens.
///
/// # Examples
/// ```
/// use lendra_core::Asset;
///
/// let usdc: Asset = "USDC".parse().unwrap();
/// assert_eq!(usdc, Asset::Usdc);
/// assert_eq!(Asset::Weth.to_string(), "WETH");
///
/// // Custom token
/// let custom: Asset = "MYTOKEN".parse().unwrap();
/// assert!(matches!(custom, Asset::Other(_)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Asset {
    /// USD Coin
    Usdc,
    /// Tether USD
    Usdt,
    /// Dai
    Dai,
    /// Wrapped Ether
    Weth,
    /// Wrapped Bitcoin
    Wbtc,
    /// Any other token
    Other(String),
}

impl Asset {
    /// Returns the asset code as a string slice
    pub fn code(&self) -> &str {
        match self {
            Asset::Usdc => "USDC",
            Asset::Usdt => "USDT",
            Asset::Dai => "DAI",
            Asset::Weth => "WETH",
            Asset::Wbtc => "WBTC",
            Asset::Other(s) => s.as_str(),
        }
    }

    /// Returns true if this is a stablecoin
    pub fn is_stablecoin(&self) -> bool {
        matches!(self, Asset::Usdc | Asset::Usdt | Asset::Dai)
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Asset {
    type Err = AssetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_uppercase();

        if s.is_empty() {
            return Err(AssetError::EmptyCode);
        }

        if s.len() > 10 {
            return Err(AssetError::TooLong(s));
        }

        if !s.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(AssetError::InvalidFormat(s));
        }

        Ok(match s.as_str() {
            "USDC" => Asset::Usdc,
            "USDT" => Asset::Usdt,
            "DAI" => Asset::Dai,
            "WETH" => Asset::Weth,
            "WBTC" => Asset::Wbtc,
            _ => Asset::Other(s),
        })
    }
}

impl TryFrom<String> for Asset {
    type Error = AssetError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Asset> for String {
    fn from(a: Asset) -> Self {
        a.code().to_string()
    }
}
