//! Core oracle types and ports

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lendra_core::{Amount, Asset};

use crate::OracleError;

/// A price quote with freshness metadata.
///
/// `price` is the value of one unit of the asset, expressed in the pool
/// currency's smallest denomination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuote {
    /// The quoted asset
    pub asset: Asset,
    /// Pool-currency value of one asset unit
    pub price: Amount,
    /// When this quote was produced
    pub timestamp: DateTime<Utc>,
    /// Source of the quote (e.g. "mock", "chainlink")
    pub source: String,
}

impl PriceQuote {
    pub fn new(asset: Asset, price: Amount, timestamp: DateTime<Utc>) -> Self {
        Self {
            asset,
            price,
            timestamp,
            source: "unknown".to_string(),
        }
    }

    /// Quote age in whole seconds (clamped at zero)
    pub fn age_secs(&self, now: DateTime<Utc>) -> u64 {
        (now - self.timestamp).num_seconds().max(0) as u64
    }

    /// Check if the quote is older than the given window
    pub fn is_stale(&self, now: DateTime<Utc>, max_age_secs: u64) -> bool {
        self.age_secs(now) > max_age_secs
    }
}

/// Price feed port - interface to the external quote source
pub trait PriceFeed: Send + Sync {
    /// Get the latest quote for an asset
    fn price(&self, asset: &Asset) -> Result<PriceQuote, OracleError>;

    /// All assets the feed can quote
    fn supported_assets(&self) -> Vec<Asset>;

    /// Check if an asset is quotable
    fn is_supported(&self, asset: &Asset) -> bool {
        self.supported_assets().contains(asset)
    }
}

/// Collateral manager port - the collaborator holding user pledges.
///
/// The pool core consults it for valuation and eligibility and issues a
/// single seize call during liquidation; it never mutates pledges directly.
pub trait CollateralManager: Send + Sync {
    /// Current pool-currency value of the user's pledge.
    ///
    /// Fails with `NoCollateralDeposited` when the user has no pledge.
    fn collateral_value(&self, user: &str, token: &Asset) -> Result<Amount, OracleError>;

    /// Whether the position is eligible for liquidation at the given debt
    fn needs_liquidation(&self, user: &str, token: &Asset, debt: Amount)
        -> Result<bool, OracleError>;

    /// Seize collateral covering `debt`. Returns the pool-currency value of
    /// what was actually seized, which may fall short of the debt when the
    /// pledge is too small.
    fn liquidate_position(
        &self,
        user: &str,
        token: &Asset,
        debt: Amount,
    ) -> Result<Amount, OracleError>;
}
