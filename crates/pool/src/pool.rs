//! The lending pool engine
//!
//! One `LendingPool` owns both position books, the aggregate totals, and
//! the event journal; operations take `&mut self`, so mutual exclusion is a
//! type-level property. Every operation follows the same shape:
//!
//! 1. validate input and preconditions against a preview of settled state
//! 2. checkpoint
//! 3. commit the ledger and pool mutations
//! 4. issue the external transfer last
//! 5. on any failure after the checkpoint, restore it in full
//!
//! A rejected call therefore leaves the pool byte-for-byte unchanged, and a
//! collaborator failure after the commit point rolls everything back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

use lendra_core::{Amount, Asset, Clock};
use lendra_ledger::{
    split_repayment, BorrowerBook, BorrowerPosition, LenderBook, LenderPosition, LedgerError,
    LockSchedule, LockTier,
};
use lendra_oracle::CollateralManager;
use lendra_rates::{InterestRateConfig, InterestRateModel};

use crate::config::{PoolConfig, COLLATERAL_RATIO_BPS, LIQUIDATION_BONUS_BPS};
use crate::custody::TokenCustody;
use crate::error::PoolError;
use crate::events::{PoolEvent, PoolEventKind};
use crate::liquidation::{liquidator_payout, LiquidationOutcome};
use crate::state::PoolState;

/// Result of a deposit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositOutcome {
    pub credited: Amount,
    pub interest_settled: Amount,
    pub locked_until: Option<DateTime<Utc>>,
}

/// Result of a withdrawal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawOutcome {
    pub requested: Amount,
    pub net_paid: Amount,
    pub penalty: Amount,
    pub interest_settled: Amount,
}

/// Result of a borrow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorrowOutcome {
    pub borrowed: Amount,
    pub total_debt: Amount,
    pub rate_bps: u64,
}

/// Result of a repayment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepayOutcome {
    pub principal_portion: Amount,
    pub interest_portion: Amount,
    pub remaining_debt: Amount,
}

/// Snapshot of everything an operation may mutate
struct Checkpoint {
    state: PoolState,
    lenders: LenderBook,
    borrowers: BorrowerBook,
}

/// The pool engine.
///
/// Holds the lender and borrower books, the aggregate totals, and the
/// injected collaborator ports. Construct one per pool currency.
pub struct LendingPool {
    config: PoolConfig,
    model: InterestRateModel,
    schedule: LockSchedule,
    state: PoolState,
    lenders: LenderBook,
    borrowers: BorrowerBook,
    events: Vec<PoolEvent>,
    collateral: Arc<dyn CollateralManager>,
    custody: Arc<dyn TokenCustody>,
    clock: Arc<dyn Clock>,
}

impl LendingPool {
    pub fn new(
        config: PoolConfig,
        schedule: LockSchedule,
        collateral: Arc<dyn CollateralManager>,
        custody: Arc<dyn TokenCustody>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, PoolError> {
        config.validate()?;
        let model = InterestRateModel::with_config(config.interest)?;
        let state = PoolState::new(clock.now());
        Ok(Self {
            config,
            model,
            schedule,
            state,
            lenders: LenderBook::new(),
            borrowers: BorrowerBook::new(),
            events: Vec::new(),
            collateral,
            custody,
            clock,
        })
    }

    // === Views ===

    pub fn state(&self) -> &PoolState {
        &self.state
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    pub fn lock_schedule(&self) -> &LockSchedule {
        &self.schedule
    }

    pub fn lender(&self, lender: &str) -> Option<&LenderPosition> {
        self.lenders.get(lender)
    }

    pub fn borrower(&self, borrower: &str) -> Option<&BorrowerPosition> {
        self.borrowers.get(borrower)
    }

    /// Utilization of the pool right now, in basis points
    pub fn utilization_bps(&self) -> Result<u64, PoolError> {
        Ok(self
            .model
            .utilization_bps(self.state.total_borrowed(), self.state.total_pool_funds())?)
    }

    /// Borrow rate at the current utilization, in basis points
    pub fn current_rate_bps(&self) -> Result<u64, PoolError> {
        Ok(self.model.rate_bps(self.utilization_bps()?))
    }

    /// A lender's full claim (balance + earned + pending interest)
    pub fn claim_of(&self, lender: &str) -> Result<Amount, PoolError> {
        let now = self.now();
        match self.lenders.get(lender) {
            None => Ok(Amount::ZERO),
            Some(pos) => {
                let rate_bps = self.lender_rate_bps(pos, now)?;
                let pending = pos.pending_interest(rate_bps, now)?;
                Ok(pos.total_claim()?.checked_add(pending)?)
            }
        }
    }

    /// A borrower's full debt (principal + accumulated + pending interest)
    pub fn debt_of(&self, borrower: &str) -> Result<Amount, PoolError> {
        let now = self.now();
        match self.borrowers.get(borrower) {
            None => Ok(Amount::ZERO),
            Some(pos) => {
                let pending = pos.pending_interest(self.current_rate_bps()?, now)?;
                Ok(pos.owed()?.checked_add(pending)?)
            }
        }
    }

    /// Events recorded so far
    pub fn events(&self) -> &[PoolEvent] {
        &self.events
    }

    /// Drain the event journal
    pub fn take_events(&mut self) -> Vec<PoolEvent> {
        std::mem::take(&mut self.events)
    }

    // === Admin ===

    /// Replace the rate curve coefficients
    pub fn update_interest_config(&mut self, config: InterestRateConfig) -> Result<(), PoolError> {
        self.model.update(config)?;
        self.config.interest = config;
        Ok(())
    }

    /// Append a new lock tier; returns its index
    pub fn append_lock_tier(&mut self, tier: LockTier) -> Result<usize, PoolError> {
        Ok(self.schedule.append(tier)?)
    }

    // === Operations ===

    /// Deposit funds, optionally committing to a lock tier.
    ///
    /// Pending interest is settled first at the lender's current rate, the
    /// balance and pool totals are credited, the lock (if any) starts from
    /// now, and the inbound transfer is pulled last.
    pub fn deposit(
        &mut self,
        lender: &str,
        amount: Amount,
        lock_tier: usize,
    ) -> Result<DepositOutcome, PoolError> {
        ensure_account(lender)?;
        ensure_positive(amount)?;
        let now = self.now();
        let tier = *self.schedule.tier(lock_tier)?;
        let rate_bps = match self.lenders.get(lender) {
            Some(pos) => self.lender_rate_bps(pos, now)?,
            None => self.current_rate_bps()?,
        };

        let cp = self.checkpoint();
        let (settled, locked_until) =
            match self.commit_deposit(lender, amount, lock_tier, tier, rate_bps, now) {
                Ok(result) => result,
                Err(e) => {
                    self.restore(cp);
                    return Err(e);
                }
            };

        // External transfer last: nothing above is visible if the pull fails
        if let Err(e) = self.custody.transfer_from(lender, amount) {
            warn!(lender, %amount, error = %e, "deposit transfer failed, rolling back");
            self.restore(cp);
            return Err(e.into());
        }

        self.record_interest(lender, settled, rate_bps, now);
        self.record(
            now,
            PoolEventKind::Deposited {
                lender: lender.to_string(),
                amount,
                lock_tier,
            },
        );
        debug!(lender, %amount, lock_tier, "deposit committed");
        debug_assert!(self.state.is_reconciled());

        Ok(DepositOutcome {
            credited: amount,
            interest_settled: settled,
            locked_until,
        })
    }

    /// Withdraw part of a claim.
    ///
    /// Locked positions reject the call unless `emergency` is set, in which
    /// case the configured penalty is withheld and stays in the pool. The
    /// claim is drawn from earned interest before principal.
    pub fn withdraw(
        &mut self,
        lender: &str,
        amount: Amount,
        emergency: bool,
    ) -> Result<WithdrawOutcome, PoolError> {
        ensure_account(lender)?;
        ensure_positive(amount)?;
        let now = self.now();

        let pos = self
            .lenders
            .get(lender)
            .ok_or(LedgerError::InsufficientBalance {
                requested: amount,
                available: Amount::ZERO,
            })?;
        let rate_bps = self.lender_rate_bps(pos, now)?;
        let pending = pos.pending_interest(rate_bps, now)?;
        let claim = pos.total_claim()?.checked_add(pending)?;

        let locked = pos.is_locked(now);
        if let Some(locked_until) = pos.locked_until {
            if locked && !emergency {
                return Err(LedgerError::FundsLocked { locked_until }.into());
            }
        }
        if amount > claim {
            return Err(LedgerError::InsufficientBalance {
                requested: amount,
                available: claim,
            }
            .into());
        }

        let penalty = if locked {
            amount.mul_bps(self.config.emergency_penalty_bps)?
        } else {
            Amount::ZERO
        };
        let net = amount.checked_sub(penalty)?;
        if net > self.state.available_funds() {
            return Err(PoolError::InsufficientPoolLiquidity {
                requested: net,
                available: self.state.available_funds(),
            });
        }

        let cp = self.checkpoint();
        if let Err(e) = self.commit_withdraw(lender, amount, net, rate_bps, now) {
            self.restore(cp);
            return Err(e);
        }

        if let Err(e) = self.custody.transfer(lender, net) {
            warn!(lender, %net, error = %e, "withdrawal transfer failed, rolling back");
            self.restore(cp);
            return Err(e.into());
        }

        self.record_interest(lender, pending, rate_bps, now);
        self.record(
            now,
            PoolEventKind::Withdrawn {
                lender: lender.to_string(),
                amount,
                net,
                penalty,
            },
        );
        debug!(lender, %amount, %net, emergency, "withdrawal committed");
        debug_assert!(self.state.is_reconciled());

        Ok(WithdrawOutcome {
            requested: amount,
            net_paid: net,
            penalty,
            interest_settled: pending,
        })
    }

    /// Borrow against pledged collateral.
    ///
    /// Requires free liquidity, a post-borrow utilization under the
    /// ceiling, and collateral worth at least 150% of the resulting
    /// principal. The payout to the borrower is the last step.
    pub fn borrow(
        &mut self,
        borrower: &str,
        amount: Amount,
        collateral_token: &Asset,
    ) -> Result<BorrowOutcome, PoolError> {
        ensure_account(borrower)?;
        ensure_positive(amount)?;
        let now = self.now();

        let available = self.state.available_funds();
        if amount > available {
            return Err(PoolError::InsufficientPoolLiquidity {
                requested: amount,
                available,
            });
        }

        let projected = self.state.total_borrowed().checked_add(amount)?;
        let utilization_bps = self
            .model
            .utilization_bps(projected, self.state.total_pool_funds())?;
        if utilization_bps > self.config.max_utilization_bps {
            return Err(PoolError::BorrowCapExceeded {
                utilization_bps,
                max_bps: self.config.max_utilization_bps,
            });
        }

        // One collateral asset per position while debt is outstanding
        if let Some(pos) = self.borrowers.get(borrower) {
            if !pos.is_cleared() && pos.collateral_token != *collateral_token {
                return Err(LedgerError::CollateralMismatch {
                    expected: pos.collateral_token.clone(),
                    actual: collateral_token.clone(),
                }
                .into());
            }
        }

        // Origination floor is checked on principal, not accrued interest
        let existing = self
            .borrowers
            .get(borrower)
            .map(|p| p.borrowed)
            .unwrap_or(Amount::ZERO);
        let new_principal = existing.checked_add(amount)?;
        let required = new_principal.mul_bps(COLLATERAL_RATIO_BPS)?;
        let value = self.collateral.collateral_value(borrower, collateral_token)?;
        if value < required {
            return Err(PoolError::InsufficientCollateral {
                required,
                actual: value,
            });
        }

        let rate_bps = self.current_rate_bps()?;
        let cp = self.checkpoint();
        let settled = match self.commit_borrow(borrower, amount, collateral_token, rate_bps, now) {
            Ok(settled) => settled,
            Err(e) => {
                self.restore(cp);
                return Err(e);
            }
        };

        if let Err(e) = self.custody.transfer(borrower, amount) {
            warn!(borrower, %amount, error = %e, "borrow payout failed, rolling back");
            self.restore(cp);
            return Err(e.into());
        }

        let total_debt = self
            .borrowers
            .get(borrower)
            .map(|p| p.owed())
            .transpose()?
            .unwrap_or(Amount::ZERO);

        self.record_interest(borrower, settled, rate_bps, now);
        self.record(
            now,
            PoolEventKind::Borrowed {
                borrower: borrower.to_string(),
                amount,
                collateral_token: collateral_token.clone(),
            },
        );
        debug!(borrower, %amount, token = %collateral_token, "borrow committed");
        debug_assert!(self.state.is_reconciled());

        Ok(BorrowOutcome {
            borrowed: amount,
            total_debt,
            rate_bps,
        })
    }

    /// Repay part or all of a debt.
    ///
    /// The payment splits proportionally between accumulated interest and
    /// principal (`interest = amount * interest / owed`, truncating); a
    /// payment equal to the full debt zeroes the position. The inbound
    /// transfer is pulled last.
    pub fn repay(&mut self, borrower: &str, amount: Amount) -> Result<RepayOutcome, PoolError> {
        ensure_account(borrower)?;
        ensure_positive(amount)?;
        let now = self.now();

        let pos = self
            .borrowers
            .get(borrower)
            .ok_or_else(|| LedgerError::NoActiveLoan {
                borrower: borrower.to_string(),
            })?;
        if pos.borrowed.is_zero() {
            return Err(LedgerError::NoActiveLoan {
                borrower: borrower.to_string(),
            }
            .into());
        }

        let rate_bps = self.current_rate_bps()?;
        let pending = pos.pending_interest(rate_bps, now)?;
        let interest_total = pos.accumulated_interest.checked_add(pending)?;
        let owed = pos.borrowed.checked_add(interest_total)?;
        let (principal_portion, interest_portion) =
            split_repayment(amount, interest_total, owed)?;

        let cp = self.checkpoint();
        if let Err(e) = self.commit_repay(
            borrower,
            amount,
            principal_portion,
            interest_portion,
            rate_bps,
            now,
        ) {
            self.restore(cp);
            return Err(e);
        }

        if let Err(e) = self.custody.transfer_from(borrower, amount) {
            warn!(borrower, %amount, error = %e, "repayment transfer failed, rolling back");
            self.restore(cp);
            return Err(e.into());
        }

        let remaining_debt = self
            .borrowers
            .get(borrower)
            .map(|p| p.owed())
            .transpose()?
            .unwrap_or(Amount::ZERO);

        self.record_interest(borrower, pending, rate_bps, now);
        self.record(
            now,
            PoolEventKind::Repaid {
                borrower: borrower.to_string(),
                principal_portion,
                interest_portion,
            },
        );
        debug!(borrower, %amount, %principal_portion, %interest_portion, "repayment committed");
        debug_assert!(self.state.is_reconciled());

        Ok(RepayOutcome {
            principal_portion,
            interest_portion,
            remaining_debt,
        })
    }

    /// Liquidate an undercollateralized position. Callable by anyone.
    ///
    /// Eligibility comes from the collateral manager's per-asset threshold,
    /// not the origination floor. On success the debt is written off
    /// against the seized collateral, the pool books the full owed amount
    /// back into available funds, and the caller is paid the seized value
    /// plus the liquidation bonus (capped at available funds).
    pub fn liquidate(
        &mut self,
        liquidator: &str,
        borrower: &str,
    ) -> Result<LiquidationOutcome, PoolError> {
        ensure_account(liquidator)?;
        ensure_account(borrower)?;
        let now = self.now();

        let pos = self
            .borrowers
            .get(borrower)
            .ok_or_else(|| LedgerError::NoActiveLoan {
                borrower: borrower.to_string(),
            })?;
        if pos.borrowed.is_zero() {
            return Err(LedgerError::NoActiveLoan {
                borrower: borrower.to_string(),
            }
            .into());
        }

        let token = pos.collateral_token.clone();
        let rate_bps = self.current_rate_bps()?;
        let pending = pos.pending_interest(rate_bps, now)?;
        let interest_total = pos.accumulated_interest.checked_add(pending)?;
        let principal = pos.borrowed;
        let owed = principal.checked_add(interest_total)?;

        // Collaborator read before any mutation: a healthy position must
        // leave the pool untouched
        let eligible = self.collateral.needs_liquidation(borrower, &token, owed)?;
        if !eligible {
            return Err(PoolError::PositionHealthy {
                borrower: borrower.to_string(),
            });
        }

        let cp = self.checkpoint();
        if let Some(pos) = self.borrowers.get_mut(borrower) {
            if let Err(e) = pos.settle(rate_bps, now) {
                self.restore(cp);
                return Err(e.into());
            }
        }

        let seized_value = match self.collateral.liquidate_position(borrower, &token, owed) {
            Ok(value) => value,
            Err(e) => {
                warn!(borrower, error = %e, "collateral seizure failed, rolling back");
                self.restore(cp);
                return Err(e.into());
            }
        };

        if let Err(e) = self.commit_liquidation(borrower, owed, principal, interest_total, now) {
            self.restore(cp);
            return Err(e);
        }

        let payout = match liquidator_payout(
            seized_value,
            LIQUIDATION_BONUS_BPS,
            self.state.available_funds(),
        ) {
            Ok(payout) => payout,
            Err(e) => {
                self.restore(cp);
                return Err(e.into());
            }
        };
        if let Err(e) = self.state.apply_payout(payout, now) {
            self.restore(cp);
            return Err(e.into());
        }

        if let Err(e) = self.custody.transfer(liquidator, payout) {
            warn!(liquidator, %payout, error = %e, "liquidation payout failed, rolling back");
            self.restore(cp);
            return Err(e.into());
        }

        self.record_interest(borrower, pending, rate_bps, now);
        self.record(
            now,
            PoolEventKind::Liquidated {
                borrower: borrower.to_string(),
                liquidator: liquidator.to_string(),
                debt_cleared: owed,
                seized_value,
                payout,
            },
        );
        debug!(borrower, liquidator, %owed, %seized_value, %payout, "liquidation committed");
        debug_assert!(self.state.is_reconciled());

        Ok(LiquidationOutcome {
            borrower: borrower.to_string(),
            liquidator: liquidator.to_string(),
            debt_cleared: owed,
            principal_cleared: principal,
            interest_cleared: interest_total,
            seized_value,
            payout,
        })
    }

    // === Internals ===

    fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// A lender accrues at the pool's current borrow rate, plus the tier
    /// bonus while the lock is running.
    fn lender_rate_bps(&self, pos: &LenderPosition, now: DateTime<Utc>) -> Result<u64, PoolError> {
        let base = self.current_rate_bps()?;
        if pos.is_locked(now) {
            let tier = self.schedule.tier(pos.lock_tier)?;
            Ok(base + tier.bonus_rate_bps)
        } else {
            Ok(base)
        }
    }

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            state: self.state.clone(),
            lenders: self.lenders.clone(),
            borrowers: self.borrowers.clone(),
        }
    }

    fn restore(&mut self, cp: Checkpoint) {
        self.state = cp.state;
        self.lenders = cp.lenders;
        self.borrowers = cp.borrowers;
    }

    fn record(&mut self, now: DateTime<Utc>, kind: PoolEventKind) {
        self.events.push(PoolEvent::record(now, kind));
    }

    fn record_interest(&mut self, account: &str, amount: Amount, rate_bps: u64, now: DateTime<Utc>) {
        if !amount.is_zero() {
            self.record(
                now,
                PoolEventKind::InterestAccrued {
                    account: account.to_string(),
                    amount,
                    rate_bps,
                },
            );
        }
    }

    fn commit_deposit(
        &mut self,
        lender: &str,
        amount: Amount,
        lock_tier: usize,
        tier: LockTier,
        rate_bps: u64,
        now: DateTime<Utc>,
    ) -> Result<(Amount, Option<DateTime<Utc>>), PoolError> {
        let (settled, locked_until) = {
            let pos = self.lenders.get_or_create(lender, now);
            let settled = pos.settle(rate_bps, now)?;
            pos.credit(amount)?;
            if lock_tier > 0 {
                pos.apply_lock(lock_tier, &tier, now);
            }
            (settled, pos.locked_until)
        };
        self.state.apply_deposit(amount, now)?;
        Ok((settled, locked_until))
    }

    fn commit_withdraw(
        &mut self,
        lender: &str,
        amount: Amount,
        net: Amount,
        rate_bps: u64,
        now: DateTime<Utc>,
    ) -> Result<(), PoolError> {
        if let Some(pos) = self.lenders.get_mut(lender) {
            pos.settle(rate_bps, now)?;
            pos.redeem(amount)?;
        }
        self.state.apply_withdrawal(net, now)?;
        Ok(())
    }

    fn commit_borrow(
        &mut self,
        borrower: &str,
        amount: Amount,
        collateral_token: &Asset,
        rate_bps: u64,
        now: DateTime<Utc>,
    ) -> Result<Amount, PoolError> {
        let settled = {
            let pos = self.borrowers.get_or_create(borrower, collateral_token, now);
            if pos.is_cleared() {
                pos.collateral_token = collateral_token.clone();
            }
            let settled = pos.settle(rate_bps, now)?;
            pos.add_borrow(amount)?;
            settled
        };
        self.state.apply_borrow(amount, now)?;
        Ok(settled)
    }

    fn commit_repay(
        &mut self,
        borrower: &str,
        amount: Amount,
        principal_portion: Amount,
        interest_portion: Amount,
        rate_bps: u64,
        now: DateTime<Utc>,
    ) -> Result<(), PoolError> {
        if let Some(pos) = self.borrowers.get_mut(borrower) {
            pos.settle(rate_bps, now)?;
            pos.apply_repayment(principal_portion, interest_portion)?;
        }
        self.state
            .apply_repayment(amount, principal_portion, interest_portion, now)?;
        Ok(())
    }

    fn commit_liquidation(
        &mut self,
        borrower: &str,
        owed: Amount,
        principal: Amount,
        interest_total: Amount,
        now: DateTime<Utc>,
    ) -> Result<(), PoolError> {
        if let Some(pos) = self.borrowers.get_mut(borrower) {
            pos.clear();
        }
        self.state
            .apply_repayment(owed, principal, interest_total, now)?;
        Ok(())
    }
}

fn ensure_account(id: &str) -> Result<(), PoolError> {
    if id.trim().is_empty() {
        return Err(PoolError::InvalidAddress);
    }
    Ok(())
}

fn ensure_positive(amount: Amount) -> Result<(), PoolError> {
    if amount.is_zero() {
        return Err(PoolError::InvalidAmount);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::custody::MockCustody;
    use lendra_core::ManualClock;
    use lendra_oracle::MockCollateralManager;

    fn pool() -> (
        Arc<MockCollateralManager>,
        Arc<MockCustody>,
        Arc<ManualClock>,
        LendingPool,
    ) {
        let collateral = Arc::new(MockCollateralManager::new());
        let custody = Arc::new(MockCustody::new());
        let clock = Arc::new(ManualClock::at_epoch());
        let pool = LendingPool::new(
            PoolConfig::default(),
            LockSchedule::standard(),
            collateral.clone(),
            custody.clone(),
            clock.clone(),
        )
        .unwrap();
        (collateral, custody, clock, pool)
    }

    #[test]
    fn test_invalid_config_rejected_at_construction() {
        let collateral = Arc::new(MockCollateralManager::new());
        let custody = Arc::new(MockCustody::new());
        let clock = Arc::new(ManualClock::at_epoch());
        let config = PoolConfig {
            max_utilization_bps: 20_000,
            ..Default::default()
        };
        let result = LendingPool::new(
            config,
            LockSchedule::standard(),
            collateral,
            custody,
            clock,
        );
        assert!(matches!(result, Err(PoolError::InvalidConfig { .. })));
    }

    #[test]
    fn test_deposit_rejects_zero_amount() {
        let (_, _, _, mut pool) = pool();
        let result = pool.deposit("alice", Amount::ZERO, 0);
        assert!(matches!(result, Err(PoolError::InvalidAmount)));
    }

    #[test]
    fn test_deposit_rejects_blank_account() {
        let (_, _, _, mut pool) = pool();
        let result = pool.deposit("  ", Amount::new(100), 0);
        assert!(matches!(result, Err(PoolError::InvalidAddress)));
    }

    #[test]
    fn test_deposit_rejects_unknown_tier() {
        let (_, _, _, mut pool) = pool();
        let result = pool.deposit("alice", Amount::new(100), 9);
        assert!(matches!(
            result,
            Err(PoolError::Ledger(LedgerError::InvalidLockTier { .. }))
        ));
        // Rejected before any mutation
        assert!(pool.lender("alice").is_none());
        assert!(pool.state().total_pool_funds().is_zero());
    }

    #[test]
    fn test_first_deposit_books_funds_and_event() {
        let (_, custody, _, mut pool) = pool();
        let outcome = pool.deposit("alice", Amount::new(1_000), 0).unwrap();

        assert_eq!(outcome.credited, Amount::new(1_000));
        assert_eq!(outcome.interest_settled, Amount::ZERO);
        assert_eq!(outcome.locked_until, None);

        assert_eq!(pool.state().total_pool_funds(), Amount::new(1_000));
        assert_eq!(pool.state().available_funds(), Amount::new(1_000));
        assert_eq!(pool.utilization_bps().unwrap(), 0);

        assert_eq!(custody.records().len(), 1);
        assert!(matches!(
            pool.events().last().unwrap().kind,
            PoolEventKind::Deposited { .. }
        ));
    }

    #[test]
    fn test_deposit_with_tier_sets_lock() {
        let (_, _, clock, mut pool) = pool();
        let outcome = pool.deposit("alice", Amount::new(1_000), 1).unwrap();

        let tier = *pool.lock_schedule().tier(1).unwrap();
        let expected = clock.now() + chrono::Duration::seconds(tier.duration_secs as i64);
        assert_eq!(outcome.locked_until, Some(expected));
        assert!(pool.lender("alice").unwrap().is_locked(clock.now()));
    }

    #[test]
    fn test_tier_zero_deposit_leaves_running_lock_alone() {
        let (_, _, _, mut pool) = pool();
        pool.deposit("alice", Amount::new(1_000), 2).unwrap();
        let locked_until = pool.lender("alice").unwrap().locked_until;

        pool.deposit("alice", Amount::new(500), 0).unwrap();
        assert_eq!(pool.lender("alice").unwrap().locked_until, locked_until);
    }

    #[test]
    fn test_failed_deposit_transfer_rolls_back() {
        let (_, custody, _, mut pool) = pool();
        custody.fail_for("alice");

        let result = pool.deposit("alice", Amount::new(1_000), 0);
        assert!(matches!(result, Err(PoolError::Custody(_))));

        assert!(pool.state().total_pool_funds().is_zero());
        assert!(pool.lender("alice").is_none());
        assert!(pool.events().is_empty());
    }

    #[test]
    fn test_withdraw_unknown_lender() {
        let (_, _, _, mut pool) = pool();
        let result = pool.withdraw("nobody", Amount::new(1), false);
        assert!(matches!(
            result,
            Err(PoolError::Ledger(LedgerError::InsufficientBalance { .. }))
        ));
    }

    #[test]
    fn test_repay_without_loan() {
        let (_, _, _, mut pool) = pool();
        let result = pool.repay("bob", Amount::new(1));
        assert!(matches!(
            result,
            Err(PoolError::Ledger(LedgerError::NoActiveLoan { .. }))
        ));
    }

    #[test]
    fn test_append_lock_tier_is_usable() {
        let (_, _, _, mut pool) = pool();
        let index = pool
            .append_lock_tier(LockTier {
                duration_secs: 86_400,
                bonus_rate_bps: 50,
            })
            .unwrap();
        assert_eq!(index, 4);

        pool.deposit("alice", Amount::new(100), index).unwrap();
        assert_eq!(pool.lender("alice").unwrap().lock_tier, index);
    }

    #[test]
    fn test_update_interest_config() {
        let (_, _, _, mut pool) = pool();
        let config = InterestRateConfig {
            base_rate_bps: 500,
            utilization_multiplier_bps: 2_000,
            excess_multiplier_bps: 5_000,
        };
        pool.update_interest_config(config).unwrap();
        assert_eq!(pool.current_rate_bps().unwrap(), 500);

        let bad = InterestRateConfig {
            base_rate_bps: 10_001,
            ..config
        };
        assert!(pool.update_interest_config(bad).is_err());
    }
}
