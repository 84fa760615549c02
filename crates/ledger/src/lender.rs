//! Lender positions - Deposits, lock state, and earned interest

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use lendra_core::{Amount, AmountError};
use lendra_rates::accrue;

use crate::error::LedgerError;
use crate::lock::LockTier;

/// A single depositor's position.
///
/// Created on first deposit and never hard-deleted; the balance may return
/// to zero. `last_update` marks the last interest settlement, so pending
/// interest is always `accrue(balance, rate, now - last_update)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LenderPosition {
    pub balance: Amount,
    pub earned_interest: Amount,
    /// Set only by a deposit with a tier > 0
    pub locked_until: Option<DateTime<Utc>>,
    pub lock_tier: usize,
    pub last_update: DateTime<Utc>,
}

impl LenderPosition {
    /// Fresh position with no funds
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            balance: Amount::ZERO,
            earned_interest: Amount::ZERO,
            locked_until: None,
            lock_tier: 0,
            last_update: now,
        }
    }

    /// Whether the lock is still running
    pub fn is_locked(&self, now: DateTime<Utc>) -> bool {
        self.locked_until.is_some_and(|until| now < until)
    }

    /// Balance plus settled interest
    pub fn total_claim(&self) -> Result<Amount, AmountError> {
        self.balance.checked_add(self.earned_interest)
    }

    /// Whole seconds since the last settlement (clamped at zero)
    pub fn elapsed_secs(&self, now: DateTime<Utc>) -> u64 {
        (now - self.last_update).num_seconds().max(0) as u64
    }

    /// Interest accrued since the last settlement, without committing it
    pub fn pending_interest(
        &self,
        rate_bps: u64,
        now: DateTime<Utc>,
    ) -> Result<Amount, AmountError> {
        accrue(self.balance, rate_bps, self.elapsed_secs(now))
    }

    /// Commit pending interest into `earned_interest` and advance the
    /// settlement timestamp. Returns the amount settled.
    pub fn settle(&mut self, rate_bps: u64, now: DateTime<Utc>) -> Result<Amount, AmountError> {
        let pending = self.pending_interest(rate_bps, now)?;
        self.earned_interest = self.earned_interest.checked_add(pending)?;
        self.last_update = now;
        Ok(pending)
    }

    /// Add deposited funds to the balance
    pub fn credit(&mut self, amount: Amount) -> Result<(), AmountError> {
        self.balance = self.balance.checked_add(amount)?;
        Ok(())
    }

    /// Start (or restart) a lock from `now`
    pub fn apply_lock(&mut self, tier_index: usize, tier: &LockTier, now: DateTime<Utc>) {
        self.locked_until = Some(now + Duration::seconds(tier.duration_secs as i64));
        self.lock_tier = tier_index;
    }

    /// Reduce the claim by a withdrawal, drawing earned interest before
    /// principal so the interest-bearing balance survives partial exits.
    pub fn redeem(&mut self, amount: Amount) -> Result<(), LedgerError> {
        let claim = self.total_claim()?;
        if amount > claim {
            return Err(LedgerError::InsufficientBalance {
                requested: amount,
                available: claim,
            });
        }
        let from_interest = amount.min(self.earned_interest);
        self.earned_interest = self.earned_interest.checked_sub(from_interest)?;
        let from_balance = amount.checked_sub(from_interest)?;
        self.balance = self.balance.checked_sub(from_balance)?;
        Ok(())
    }
}

/// All lender positions, keyed by lender id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LenderBook {
    positions: HashMap<String, LenderPosition>,
}

impl LenderBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, lender: &str) -> Option<&LenderPosition> {
        self.positions.get(lender)
    }

    pub fn get_mut(&mut self, lender: &str) -> Option<&mut LenderPosition> {
        self.positions.get_mut(lender)
    }

    /// Fetch a position, creating an empty one on first touch
    pub fn get_or_create(&mut self, lender: &str, now: DateTime<Utc>) -> &mut LenderPosition {
        self.positions
            .entry(lender.to_string())
            .or_insert_with(|| LenderPosition::new(now))
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &LenderPosition)> {
        self.positions.iter()
    }
}
