//! Borrower positions - Loan principal, accumulated interest, collateral

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use lendra_core::math::mul_div;
use lendra_core::{Amount, AmountError, Asset};
use lendra_rates::accrue;

use crate::error::LedgerError;

/// A single borrower's position.
///
/// `borrowed + accumulated_interest` is the total debt. The position is
/// zeroed on full repayment or liquidation and never hard-deleted, so the
/// lifecycle is Uninitialized -> Active -> Closed (indistinguishable from
/// Uninitialized).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorrowerPosition {
    pub borrowed: Amount,
    pub accumulated_interest: Amount,
    /// The one asset backing this loan
    pub collateral_token: Asset,
    pub last_update: DateTime<Utc>,
}

impl BorrowerPosition {
    pub fn new(collateral_token: Asset, now: DateTime<Utc>) -> Self {
        Self {
            borrowed: Amount::ZERO,
            accumulated_interest: Amount::ZERO,
            collateral_token,
            last_update: now,
        }
    }

    /// Total debt: principal plus settled interest
    pub fn owed(&self) -> Result<Amount, AmountError> {
        self.borrowed.checked_add(self.accumulated_interest)
    }

    /// Whole seconds since the last settlement (clamped at zero)
    pub fn elapsed_secs(&self, now: DateTime<Utc>) -> u64 {
        (now - self.last_update).num_seconds().max(0) as u64
    }

    /// Interest accrued on the principal since the last settlement,
    /// without committing it
    pub fn pending_interest(
        &self,
        rate_bps: u64,
        now: DateTime<Utc>,
    ) -> Result<Amount, AmountError> {
        accrue(self.borrowed, rate_bps, self.elapsed_secs(now))
    }

    /// Commit pending interest and advance the settlement timestamp
    pub fn settle(&mut self, rate_bps: u64, now: DateTime<Utc>) -> Result<Amount, AmountError> {
        let pending = self.pending_interest(rate_bps, now)?;
        self.accumulated_interest = self.accumulated_interest.checked_add(pending)?;
        self.last_update = now;
        Ok(pending)
    }

    /// Add newly borrowed principal
    pub fn add_borrow(&mut self, amount: Amount) -> Result<(), AmountError> {
        self.borrowed = self.borrowed.checked_add(amount)?;
        Ok(())
    }

    /// Apply a repayment split to the position
    pub fn apply_repayment(
        &mut self,
        principal_portion: Amount,
        interest_portion: Amount,
    ) -> Result<(), AmountError> {
        self.borrowed = self.borrowed.checked_sub(principal_portion)?;
        self.accumulated_interest = self.accumulated_interest.checked_sub(interest_portion)?;
        Ok(())
    }

    /// Zero out the debt (full repayment or liquidation)
    pub fn clear(&mut self) {
        self.borrowed = Amount::ZERO;
        self.accumulated_interest = Amount::ZERO;
    }

    /// Whether the position carries no debt
    pub fn is_cleared(&self) -> bool {
        self.borrowed.is_zero() && self.accumulated_interest.is_zero()
    }
}

/// Split a repayment between interest and principal, proportionally to
/// their share of the total debt.
///
/// `interest_portion = amount * accumulated_interest / total_owed`, with
/// the division truncating toward zero; the remainder reduces principal.
/// The rule is proportional by design (not interest-first or
/// principal-first) and the truncation direction determines how fast large
/// loans deleverage, so both must stay exactly as written.
pub fn split_repayment(
    amount: Amount,
    accumulated_interest: Amount,
    total_owed: Amount,
) -> Result<(Amount, Amount), LedgerError> {
    if amount > total_owed {
        return Err(LedgerError::RepayExceedsDebt {
            amount,
            owed: total_owed,
        });
    }
    let interest_portion = Amount::new(mul_div(
        amount.value(),
        accumulated_interest.value(),
        total_owed.value(),
    )?);
    let principal_portion = amount.checked_sub(interest_portion)?;
    Ok((principal_portion, interest_portion))
}

/// All borrower positions, keyed by borrower id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorrowerBook {
    positions: HashMap<String, BorrowerPosition>,
}

impl BorrowerBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, borrower: &str) -> Option<&BorrowerPosition> {
        self.positions.get(borrower)
    }

    pub fn get_mut(&mut self, borrower: &str) -> Option<&mut BorrowerPosition> {
        self.positions.get_mut(borrower)
    }

    /// Fetch a position, creating a debt-free one on first touch
    pub fn get_or_create(
        &mut self,
        borrower: &str,
        collateral_token: &Asset,
        now: DateTime<Utc>,
    ) -> &mut BorrowerPosition {
        self.positions
            .entry(borrower.to_string())
            .or_insert_with(|| BorrowerPosition::new(collateral_token.clone(), now))
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &BorrowerPosition)> {
        self.positions.iter()
    }
}
