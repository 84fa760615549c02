//! Aggregate pool accounting
//!
//! `PoolState` carries the pool-wide totals. Reconciliation invariant:
//! `total_pool_funds == available_funds + total_borrowed` at every
//! quiescent point. Fields are private so every transition goes through a
//! checked method; overflow and underflow surface as errors, never wrap.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lendra_core::{Amount, AmountError};

/// Pool-wide totals
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolState {
    total_pool_funds: Amount,
    available_funds: Amount,
    total_borrowed: Amount,
    last_update: DateTime<Utc>,
}

impl PoolState {
    /// Empty pool
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            total_pool_funds: Amount::ZERO,
            available_funds: Amount::ZERO,
            total_borrowed: Amount::ZERO,
            last_update: now,
        }
    }

    pub fn total_pool_funds(&self) -> Amount {
        self.total_pool_funds
    }

    pub fn available_funds(&self) -> Amount {
        self.available_funds
    }

    pub fn total_borrowed(&self) -> Amount {
        self.total_borrowed
    }

    pub fn last_update(&self) -> DateTime<Utc> {
        self.last_update
    }

    /// Whether the totals reconcile: `total == available + borrowed`
    pub fn is_reconciled(&self) -> bool {
        self.available_funds
            .checked_add(self.total_borrowed)
            .map(|sum| sum == self.total_pool_funds)
            .unwrap_or(false)
    }

    /// Deposit: new funds enter the pool and sit available
    pub(crate) fn apply_deposit(
        &mut self,
        amount: Amount,
        now: DateTime<Utc>,
    ) -> Result<(), AmountError> {
        self.total_pool_funds = self.total_pool_funds.checked_add(amount)?;
        self.available_funds = self.available_funds.checked_add(amount)?;
        self.last_update = now;
        Ok(())
    }

    /// Withdrawal: the net payout leaves the pool. Any penalty withheld
    /// from the lender simply stays in the totals.
    pub(crate) fn apply_withdrawal(
        &mut self,
        net: Amount,
        now: DateTime<Utc>,
    ) -> Result<(), AmountError> {
        self.total_pool_funds = self.total_pool_funds.checked_sub(net)?;
        self.available_funds = self.available_funds.checked_sub(net)?;
        self.last_update = now;
        Ok(())
    }

    /// Borrow: available funds become borrowed funds, total unchanged
    pub(crate) fn apply_borrow(
        &mut self,
        amount: Amount,
        now: DateTime<Utc>,
    ) -> Result<(), AmountError> {
        self.available_funds = self.available_funds.checked_sub(amount)?;
        self.total_borrowed = self.total_borrowed.checked_add(amount)?;
        self.last_update = now;
        Ok(())
    }

    /// Repayment (or liquidation recovery): `amount` comes back to
    /// available funds; the principal portion leaves `total_borrowed` and
    /// the interest portion is new pool income.
    pub(crate) fn apply_repayment(
        &mut self,
        amount: Amount,
        principal_portion: Amount,
        interest_portion: Amount,
        now: DateTime<Utc>,
    ) -> Result<(), AmountError> {
        self.available_funds = self.available_funds.checked_add(amount)?;
        self.total_borrowed = self.total_borrowed.checked_sub(principal_portion)?;
        self.total_pool_funds = self.total_pool_funds.checked_add(interest_portion)?;
        self.last_update = now;
        Ok(())
    }

    /// Liquidator payout: paid out of available funds
    pub(crate) fn apply_payout(
        &mut self,
        payout: Amount,
        now: DateTime<Utc>,
    ) -> Result<(), AmountError> {
        self.available_funds = self.available_funds.checked_sub(payout)?;
        self.total_pool_funds = self.total_pool_funds.checked_sub(payout)?;
        self.last_update = now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn epoch() -> DateTime<Utc> {
        DateTime::<Utc>::UNIX_EPOCH
    }

    #[test]
    fn test_new_pool_is_reconciled() {
        let state = PoolState::new(epoch());
        assert!(state.is_reconciled());
        assert!(state.total_pool_funds().is_zero());
    }

    #[test]
    fn test_deposit_then_borrow_reconciles() {
        let mut state = PoolState::new(epoch());
        state.apply_deposit(Amount::new(1_000), epoch()).unwrap();
        state.apply_borrow(Amount::new(400), epoch()).unwrap();

        assert_eq!(state.total_pool_funds(), Amount::new(1_000));
        assert_eq!(state.available_funds(), Amount::new(600));
        assert_eq!(state.total_borrowed(), Amount::new(400));
        assert!(state.is_reconciled());
    }

    #[test]
    fn test_repayment_books_interest_as_income() {
        let mut state = PoolState::new(epoch());
        state.apply_deposit(Amount::new(1_000), epoch()).unwrap();
        state.apply_borrow(Amount::new(400), epoch()).unwrap();

        // Repay 420: 400 principal + 20 interest
        state
            .apply_repayment(
                Amount::new(420),
                Amount::new(400),
                Amount::new(20),
                epoch(),
            )
            .unwrap();

        assert_eq!(state.total_pool_funds(), Amount::new(1_020));
        assert_eq!(state.available_funds(), Amount::new(1_020));
        assert_eq!(state.total_borrowed(), Amount::ZERO);
        assert!(state.is_reconciled());
    }

    #[test]
    fn test_withdrawal_of_penalized_amount_keeps_reconciliation() {
        let mut state = PoolState::new(epoch());
        state.apply_deposit(Amount::new(1_000), epoch()).unwrap();

        // Lender claim shrinks by 100, pool pays out net 95
        state.apply_withdrawal(Amount::new(95), epoch()).unwrap();

        assert_eq!(state.total_pool_funds(), Amount::new(905));
        assert!(state.is_reconciled());
    }

    #[test]
    fn test_over_borrow_fails_loudly() {
        let mut state = PoolState::new(epoch());
        state.apply_deposit(Amount::new(100), epoch()).unwrap();

        let result = state.apply_borrow(Amount::new(101), epoch());
        assert!(matches!(result, Err(AmountError::Underflow { .. })));
    }

    #[test]
    fn test_payout_reduces_both_totals() {
        let mut state = PoolState::new(epoch());
        state.apply_deposit(Amount::new(1_000), epoch()).unwrap();
        state.apply_payout(Amount::new(110), epoch()).unwrap();

        assert_eq!(state.total_pool_funds(), Amount::new(890));
        assert_eq!(state.available_funds(), Amount::new(890));
        assert!(state.is_reconciled());
    }
}
