//! Mock oracle implementations for testing
//!
//! `MockPriceFeed` serves configurable quotes; `MockCollateralManager`
//! scripts valuation and eligibility answers so pool tests can drive every
//! branch without real price data.

use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use lendra_core::{Amount, Asset};

use crate::error::OracleError;
use crate::types::{CollateralManager, PriceFeed, PriceQuote};

/// Mock price feed with settable quotes
pub struct MockPriceFeed {
    quotes: RwLock<HashMap<Asset, PriceQuote>>,
}

impl MockPriceFeed {
    pub fn new() -> Self {
        Self {
            quotes: RwLock::new(HashMap::new()),
        }
    }

    /// Set a quote produced at the given instant
    pub fn set_price(&self, asset: Asset, price: Amount, timestamp: DateTime<Utc>) {
        let mut quote = PriceQuote::new(asset.clone(), price, timestamp);
        quote.source = "mock".to_string();
        self.quotes.write().unwrap().insert(asset, quote);
    }

    /// Remove a quote (for asset-not-found paths)
    pub fn remove_price(&self, asset: &Asset) {
        self.quotes.write().unwrap().remove(asset);
    }
}

impl Default for MockPriceFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl PriceFeed for MockPriceFeed {
    fn price(&self, asset: &Asset) -> Result<PriceQuote, OracleError> {
        self.quotes
            .read()
            .unwrap()
            .get(asset)
            .cloned()
            .ok_or_else(|| OracleError::AssetNotFound {
                asset: asset.clone(),
            })
    }

    fn supported_assets(&self) -> Vec<Asset> {
        self.quotes.read().unwrap().keys().cloned().collect()
    }
}

/// Mock collateral manager with scripted answers.
///
/// Valuations and eligibility flags are set directly; `liquidate_position`
/// hands back `min(value, debt)` and clears the scripted value, recording
/// the call for assertions.
pub struct MockCollateralManager {
    values: RwLock<HashMap<(String, Asset), Amount>>,
    liquidatable: RwLock<HashSet<(String, Asset)>>,
    seizures: RwLock<Vec<(String, Asset, Amount)>>,
}

impl MockCollateralManager {
    pub fn new() -> Self {
        Self {
            values: RwLock::new(HashMap::new()),
            liquidatable: RwLock::new(HashSet::new()),
            seizures: RwLock::new(Vec::new()),
        }
    }

    /// Script the valuation for a user's pledge
    pub fn set_value(&self, user: &str, asset: Asset, value: Amount) {
        self.values
            .write()
            .unwrap()
            .insert((user.to_string(), asset), value);
    }

    /// Script the eligibility answer for a user's position
    pub fn set_liquidatable(&self, user: &str, asset: Asset, eligible: bool) {
        let key = (user.to_string(), asset);
        let mut flags = self.liquidatable.write().unwrap();
        if eligible {
            flags.insert(key);
        } else {
            flags.remove(&key);
        }
    }

    /// Seizures recorded so far, in call order
    pub fn seizures(&self) -> Vec<(String, Asset, Amount)> {
        self.seizures.read().unwrap().clone()
    }
}

impl Default for MockCollateralManager {
    fn default() -> Self {
        Self::new()
    }
}

impl CollateralManager for MockCollateralManager {
    fn collateral_value(&self, user: &str, token: &Asset) -> Result<Amount, OracleError> {
        self.values
            .read()
            .unwrap()
            .get(&(user.to_string(), token.clone()))
            .copied()
            .ok_or_else(|| OracleError::NoCollateralDeposited {
                user: user.to_string(),
                asset: token.clone(),
            })
    }

    fn needs_liquidation(
        &self,
        user: &str,
        token: &Asset,
        _debt: Amount,
    ) -> Result<bool, OracleError> {
        Ok(self
            .liquidatable
            .read()
            .unwrap()
            .contains(&(user.to_string(), token.clone())))
    }

    fn liquidate_position(
        &self,
        user: &str,
        token: &Asset,
        debt: Amount,
    ) -> Result<Amount, OracleError> {
        let key = (user.to_string(), token.clone());
        let mut values = self.values.write().unwrap();
        let value = values
            .remove(&key)
            .ok_or_else(|| OracleError::NoCollateralDeposited {
                user: user.to_string(),
                asset: token.clone(),
            })?;

        let seized = value.min(debt);
        let remainder = value.saturating_sub(seized);
        if !remainder.is_zero() {
            values.insert(key, remainder);
        }

        self.seizures
            .write()
            .unwrap()
            .push((user.to_string(), token.clone(), seized));
        Ok(seized)
    }
}
