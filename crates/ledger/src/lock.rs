//! Lock tiers - Deposit commitment periods with bonus rates

use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// A deposit commitment period granting a bonus interest rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockTier {
    /// Commitment period in seconds
    pub duration_secs: u64,
    /// Bonus added to the lender's accrual rate while the lock runs
    pub bonus_rate_bps: u64,
}

/// Ordered list of lock tiers.
///
/// Tier 0 is always the no-lock tier. Tiers are append-only: an admin can
/// add new tiers but never mutate or remove existing ones, so a stored tier
/// index stays valid for the lifetime of the pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockSchedule {
    tiers: Vec<LockTier>,
}

const DAY_SECS: u64 = 86_400;

impl LockSchedule {
    /// Schedule with only the no-lock tier
    pub fn none() -> Self {
        Self {
            tiers: vec![LockTier {
                duration_secs: 0,
                bonus_rate_bps: 0,
            }],
        }
    }

    /// The standard schedule: no lock, 30d, 90d, 180d
    pub fn standard() -> Self {
        Self {
            tiers: vec![
                LockTier {
                    duration_secs: 0,
                    bonus_rate_bps: 0,
                },
                LockTier {
                    duration_secs: 30 * DAY_SECS,
                    bonus_rate_bps: 100,
                },
                LockTier {
                    duration_secs: 90 * DAY_SECS,
                    bonus_rate_bps: 250,
                },
                LockTier {
                    duration_secs: 180 * DAY_SECS,
                    bonus_rate_bps: 500,
                },
            ],
        }
    }

    /// Look up a tier by index
    pub fn tier(&self, index: usize) -> Result<&LockTier, LedgerError> {
        self.tiers.get(index).ok_or(LedgerError::InvalidLockTier {
            index,
            tiers: self.tiers.len(),
        })
    }

    /// Append a new tier (admin operation). Returns the new tier's index.
    pub fn append(&mut self, tier: LockTier) -> Result<usize, LedgerError> {
        if tier.bonus_rate_bps > 10_000 {
            return Err(LedgerError::InvalidLockBonus {
                bps: tier.bonus_rate_bps,
            });
        }
        self.tiers.push(tier);
        Ok(self.tiers.len() - 1)
    }

    /// Number of tiers
    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }
}

impl Default for LockSchedule {
    fn default() -> Self {
        Self::standard()
    }
}
