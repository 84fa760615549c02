//! Collateral vault - Reference collateral manager over a price feed
//!
//! Holds per-user pledges, values them against fresh quotes, and applies
//! per-asset liquidation thresholds. A quote older than the freshness
//! window aborts the valuation with `StalePrice`.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use lendra_core::math::{div_ceil, mul_div, BPS_DENOMINATOR};
use lendra_core::{Amount, Asset, Clock};

use crate::error::OracleError;
use crate::types::{CollateralManager, PriceFeed, PriceQuote};

/// Default freshness window for quotes (one hour)
pub const DEFAULT_MAX_QUOTE_AGE_SECS: u64 = 3_600;

/// Default liquidation threshold: eligible below a 125% collateral ratio
pub const DEFAULT_LIQUIDATION_THRESHOLD_BPS: u64 = 8_000;

/// Reference `CollateralManager` backed by a `PriceFeed`.
///
/// The liquidation threshold is expressed as the maximum debt-to-value in
/// basis points: a position is eligible when
/// `collateral_value < debt * 10000 / threshold_bps`. Thresholds are
/// per-asset and deliberately looser than the origination floor, giving
/// borrowers a buffer between the two.
pub struct CollateralVault {
    feed: Arc<dyn PriceFeed>,
    clock: Arc<dyn Clock>,
    max_quote_age_secs: u64,
    thresholds: RwLock<HashMap<Asset, u64>>,
    pledges: RwLock<HashMap<(String, Asset), Amount>>,
}

impl CollateralVault {
    pub fn new(feed: Arc<dyn PriceFeed>, clock: Arc<dyn Clock>) -> Self {
        Self {
            feed,
            clock,
            max_quote_age_secs: DEFAULT_MAX_QUOTE_AGE_SECS,
            thresholds: RwLock::new(HashMap::new()),
            pledges: RwLock::new(HashMap::new()),
        }
    }

    /// Override the quote freshness window
    pub fn with_max_quote_age(mut self, secs: u64) -> Self {
        self.max_quote_age_secs = secs;
        self
    }

    /// Set a per-asset liquidation threshold (admin operation)
    pub fn set_threshold(&self, asset: Asset, bps: u64) -> Result<(), OracleError> {
        if bps == 0 || u128::from(bps) > BPS_DENOMINATOR {
            return Err(OracleError::InvalidThreshold { bps });
        }
        self.thresholds.write().unwrap().insert(asset, bps);
        Ok(())
    }

    /// The threshold applied to an asset
    pub fn threshold_bps(&self, asset: &Asset) -> u64 {
        self.thresholds
            .read()
            .unwrap()
            .get(asset)
            .copied()
            .unwrap_or(DEFAULT_LIQUIDATION_THRESHOLD_BPS)
    }

    /// Add units to a user's pledge
    pub fn deposit_collateral(
        &self,
        user: &str,
        asset: Asset,
        units: Amount,
    ) -> Result<(), OracleError> {
        let mut pledges = self.pledges.write().unwrap();
        let entry = pledges
            .entry((user.to_string(), asset))
            .or_insert(Amount::ZERO);
        *entry = entry.checked_add(units)?;
        Ok(())
    }

    /// Remove units from a user's pledge
    pub fn withdraw_collateral(
        &self,
        user: &str,
        asset: &Asset,
        units: Amount,
    ) -> Result<(), OracleError> {
        let key = (user.to_string(), asset.clone());
        let mut pledges = self.pledges.write().unwrap();
        let pledged = pledges.get(&key).copied().unwrap_or(Amount::ZERO);
        if units > pledged {
            return Err(OracleError::InsufficientCollateralBalance {
                requested: units,
                pledged,
            });
        }
        pledges.insert(key, pledged.checked_sub(units)?);
        Ok(())
    }

    /// Units currently pledged by a user
    pub fn pledged(&self, user: &str, asset: &Asset) -> Amount {
        self.pledges
            .read()
            .unwrap()
            .get(&(user.to_string(), asset.clone()))
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    /// Fetch a quote and enforce the freshness window
    fn fresh_price(&self, asset: &Asset) -> Result<PriceQuote, OracleError> {
        let quote = self.feed.price(asset)?;
        let age_secs = quote.age_secs(self.clock.now());
        if age_secs > self.max_quote_age_secs {
            return Err(OracleError::StalePrice {
                asset: asset.clone(),
                age_secs,
                max_age_secs: self.max_quote_age_secs,
            });
        }
        Ok(quote)
    }

    fn pledged_nonzero(&self, user: &str, asset: &Asset) -> Result<Amount, OracleError> {
        let units = self.pledged(user, asset);
        if units.is_zero() {
            return Err(OracleError::NoCollateralDeposited {
                user: user.to_string(),
                asset: asset.clone(),
            });
        }
        Ok(units)
    }
}

impl CollateralManager for CollateralVault {
    fn collateral_value(&self, user: &str, token: &Asset) -> Result<Amount, OracleError> {
        let units = self.pledged_nonzero(user, token)?;
        let quote = self.fresh_price(token)?;
        let value = units
            .value()
            .checked_mul(quote.price.value())
            .ok_or(lendra_core::AmountError::Overflow {
                op: "collateral_value",
            })?;
        Ok(Amount::new(value))
    }

    fn needs_liquidation(
        &self,
        user: &str,
        token: &Asset,
        debt: Amount,
    ) -> Result<bool, OracleError> {
        if debt.is_zero() {
            return Ok(false);
        }
        let value = self.collateral_value(user, token)?;
        let floor = mul_div(
            debt.value(),
            BPS_DENOMINATOR,
            u128::from(self.threshold_bps(token)),
        )?;
        Ok(value.value() < floor)
    }

    fn liquidate_position(
        &self,
        user: &str,
        token: &Asset,
        debt: Amount,
    ) -> Result<Amount, OracleError> {
        let pledged = self.pledged_nonzero(user, token)?;
        let quote = self.fresh_price(token)?;

        // Smallest whole number of units covering the debt, capped at the
        // pledge; the rest stays with the borrower.
        let units_needed = div_ceil(debt.value(), quote.price.value())?;
        let units = pledged.min(Amount::new(units_needed));
        let seized_value = units
            .value()
            .checked_mul(quote.price.value())
            .ok_or(lendra_core::AmountError::Overflow { op: "seize" })?;

        let key = (user.to_string(), token.clone());
        let mut pledges = self.pledges.write().unwrap();
        pledges.insert(key, pledged.checked_sub(units)?);

        Ok(Amount::new(seized_value))
    }
}
