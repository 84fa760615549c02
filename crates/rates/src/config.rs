//! Interest rate configuration

use serde::{Deserialize, Serialize};
use thiserror::Error;

use lendra_core::math::BPS_DENOMINATOR;

/// Errors from rate configuration validation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RateConfigError {
    #[error("Rate coefficient {field} out of range: {value} bps (max 10000)")]
    OutOfRange { field: &'static str, value: u64 },
}

/// Coefficients of the two-segment borrow rate curve.
///
/// All fields are basis points in [0, 10000]. Admin-set; read-only during
/// normal operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterestRateConfig {
    /// Rate floor at zero utilization
    pub base_rate_bps: u64,
    /// Slope below the optimal utilization point
    pub utilization_multiplier_bps: u64,
    /// Slope above the optimal utilization point
    pub excess_multiplier_bps: u64,
}

impl InterestRateConfig {
    /// Validate that every coefficient is a legal basis-point value
    pub fn validate(&self) -> Result<(), RateConfigError> {
        let fields = [
            ("base_rate_bps", self.base_rate_bps),
            ("utilization_multiplier_bps", self.utilization_multiplier_bps),
            ("excess_multiplier_bps", self.excess_multiplier_bps),
        ];
        for (field, value) in fields {
            if u128::from(value) > BPS_DENOMINATOR {
                return Err(RateConfigError::OutOfRange { field, value });
            }
        }
        Ok(())
    }
}

impl Default for InterestRateConfig {
    fn default() -> Self {
        Self {
            base_rate_bps: 200,                 // 2% floor
            utilization_multiplier_bps: 1_000,  // +8% at the kink
            excess_multiplier_bps: 7_500,       // steep past the kink
        }
    }
}
