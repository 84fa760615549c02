//! Oracle error types

use lendra_core::{Amount, AmountError, Asset};
use thiserror::Error;

/// Oracle and collateral-manager errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OracleError {
    /// No quote available for the asset
    #[error("Asset not found in feed: {asset}")]
    AssetNotFound { asset: Asset },

    /// The quote's freshness window has elapsed
    #[error("Stale price for {asset}: quote is {age_secs}s old, window is {max_age_secs}s")]
    StalePrice {
        asset: Asset,
        age_secs: u64,
        max_age_secs: u64,
    },

    /// The user has no pledge in the asset
    #[error("No collateral deposited by {user} in {asset}")]
    NoCollateralDeposited { user: String, asset: Asset },

    /// Withdrawal larger than the pledge
    #[error("Pledge too small: requested {requested}, pledged {pledged}")]
    InsufficientCollateralBalance { requested: Amount, pledged: Amount },

    /// Liquidation threshold outside (0, 10000]
    #[error("Invalid liquidation threshold: {bps} bps")]
    InvalidThreshold { bps: u64 },

    #[error(transparent)]
    Amount(#[from] AmountError),
}
