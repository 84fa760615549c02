//! Pool configuration and policy constants

use serde::{Deserialize, Serialize};

use lendra_rates::{InterestRateConfig, MAX_UTILIZATION_BPS};

use crate::error::PoolError;

/// Origination floor: collateral must be worth 150% of the principal
pub const COLLATERAL_RATIO_BPS: u64 = 15_000;

/// Incentive paid on top of the seized value to whoever liquidates (10%)
pub const LIQUIDATION_BONUS_BPS: u64 = 1_000;

/// Pool-level configuration.
///
/// The origination floor and liquidation bonus are fixed policy constants;
/// everything here is admin-settable at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Borrow rate curve coefficients
    pub interest: InterestRateConfig,
    /// Haircut applied to emergency withdrawals of locked funds
    pub emergency_penalty_bps: u64,
    /// Utilization ceiling enforced on borrows
    pub max_utilization_bps: u64,
}

impl PoolConfig {
    pub fn validate(&self) -> Result<(), PoolError> {
        self.interest.validate()?;
        if self.emergency_penalty_bps > 10_000 {
            return Err(PoolError::InvalidConfig {
                field: "emergency_penalty_bps",
                value: self.emergency_penalty_bps,
            });
        }
        if self.max_utilization_bps > 10_000 {
            return Err(PoolError::InvalidConfig {
                field: "max_utilization_bps",
                value: self.max_utilization_bps,
            });
        }
        Ok(())
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            interest: InterestRateConfig::default(),
            emergency_penalty_bps: 500,
            max_utilization_bps: MAX_UTILIZATION_BPS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(PoolConfig::default().validate().is_ok());
    }

    #[test]
    fn test_oversized_penalty_rejected() {
        let config = PoolConfig {
            emergency_penalty_bps: 10_001,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(PoolError::InvalidConfig {
                field: "emergency_penalty_bps",
                ..
            })
        ));
    }

    #[test]
    fn test_serde_roundtrip() {
        let config = PoolConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: PoolConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, parsed);
    }
}
