//! Utilization curve and accrual arithmetic

use lendra_core::math::{mul_div, BPS_DENOMINATOR};
use lendra_core::{Amount, AmountError};

use crate::config::{InterestRateConfig, RateConfigError};
use crate::{OPTIMAL_UTILIZATION_BPS, SECONDS_PER_YEAR};

/// Interest rate model over a validated configuration.
///
/// The borrow rate is piecewise linear in utilization with a kink at
/// `OPTIMAL_UTILIZATION_BPS`: gentle below it, steep above it, so borrowers
/// are priced away from draining the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterestRateModel {
    config: InterestRateConfig,
}

impl InterestRateModel {
    /// Create a model with the default configuration
    pub fn new() -> Self {
        Self {
            config: InterestRateConfig::default(),
        }
    }

    /// Create a model with a custom configuration
    pub fn with_config(config: InterestRateConfig) -> Result<Self, RateConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Get the active configuration
    pub fn config(&self) -> &InterestRateConfig {
        &self.config
    }

    /// Replace the configuration (admin operation)
    pub fn update(&mut self, config: InterestRateConfig) -> Result<(), RateConfigError> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Pool utilization in basis points.
    ///
    /// `total_borrowed * 10000 / total_pool_funds`, truncating; an empty
    /// pool reports zero utilization.
    pub fn utilization_bps(
        &self,
        total_borrowed: Amount,
        total_pool_funds: Amount,
    ) -> Result<u64, AmountError> {
        if total_pool_funds.is_zero() {
            return Ok(0);
        }
        let raw = mul_div(
            total_borrowed.value(),
            BPS_DENOMINATOR,
            total_pool_funds.value(),
        )?;
        Ok(raw as u64)
    }

    /// Current borrow rate in basis points for a given utilization.
    ///
    /// Below or at the kink: `base + u * util_mult / 10000`.
    /// Above it: the kink rate plus `(u - kink) * excess_mult / 10000`.
    /// The two segments meet at the kink, so the curve is continuous.
    pub fn rate_bps(&self, utilization_bps: u64) -> u64 {
        let u = u128::from(utilization_bps);
        let base = u128::from(self.config.base_rate_bps);
        let util_mult = u128::from(self.config.utilization_multiplier_bps);
        let excess_mult = u128::from(self.config.excess_multiplier_bps);
        let optimal = u128::from(OPTIMAL_UTILIZATION_BPS);

        let rate = if u <= optimal {
            base + u * util_mult / BPS_DENOMINATOR
        } else {
            base + optimal * util_mult / BPS_DENOMINATOR
                + (u - optimal) * excess_mult / BPS_DENOMINATOR
        };
        rate as u64
    }
}

/// Simple interest accrued over an elapsed window.
///
/// `principal * rate * elapsed / (10000 * SECONDS_PER_YEAR)` with one
/// truncating division at the end. Short windows or small principals
/// legitimately accrue zero; interest never rounds up.
pub fn accrue(principal: Amount, rate_bps: u64, elapsed_secs: u64) -> Result<Amount, AmountError> {
    let numerator = principal
        .value()
        .checked_mul(u128::from(rate_bps))
        .and_then(|n| n.checked_mul(u128::from(elapsed_secs)))
        .ok_or(AmountError::Overflow { op: "accrue" })?;
    let denominator = BPS_DENOMINATOR * u128::from(SECONDS_PER_YEAR);
    Ok(Amount::new(numerator / denominator))
}

impl Default for InterestRateModel {
    fn default() -> Self {
        Self::new()
    }
}
