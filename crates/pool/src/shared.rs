//! Shared pool handle - One lock around the whole engine
//!
//! The origin execution model allows exactly one state-mutating operation
//! in flight at a time. `SharedPool` reproduces that contract for
//! multi-threaded hosts: a single mutex guards the entire pool (both books,
//! the totals, the event journal) and is held for the full duration of each
//! operation, including the collaborator calls. No caller can observe the
//! pool mid-operation.

use std::sync::{Arc, Mutex, MutexGuard};

use lendra_core::{Amount, Asset};
use lendra_ledger::{BorrowerPosition, LenderPosition};

use crate::error::PoolError;
use crate::events::PoolEvent;
use crate::liquidation::LiquidationOutcome;
use crate::pool::{BorrowOutcome, DepositOutcome, LendingPool, RepayOutcome, WithdrawOutcome};
use crate::state::PoolState;

/// Thread-safe handle to a `LendingPool`
#[derive(Clone)]
pub struct SharedPool {
    inner: Arc<Mutex<LendingPool>>,
}

impl SharedPool {
    pub fn new(pool: LendingPool) -> Self {
        Self {
            inner: Arc::new(Mutex::new(pool)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, LendingPool> {
        self.inner.lock().expect("pool lock poisoned")
    }

    /// Run a closure with exclusive access, e.g. for compound admin work
    pub fn with<R>(&self, f: impl FnOnce(&mut LendingPool) -> R) -> R {
        f(&mut self.lock())
    }

    pub fn deposit(
        &self,
        lender: &str,
        amount: Amount,
        lock_tier: usize,
    ) -> Result<DepositOutcome, PoolError> {
        self.lock().deposit(lender, amount, lock_tier)
    }

    pub fn withdraw(
        &self,
        lender: &str,
        amount: Amount,
        emergency: bool,
    ) -> Result<WithdrawOutcome, PoolError> {
        self.lock().withdraw(lender, amount, emergency)
    }

    pub fn borrow(
        &self,
        borrower: &str,
        amount: Amount,
        collateral_token: &Asset,
    ) -> Result<BorrowOutcome, PoolError> {
        self.lock().borrow(borrower, amount, collateral_token)
    }

    pub fn repay(&self, borrower: &str, amount: Amount) -> Result<RepayOutcome, PoolError> {
        self.lock().repay(borrower, amount)
    }

    pub fn liquidate(
        &self,
        liquidator: &str,
        borrower: &str,
    ) -> Result<LiquidationOutcome, PoolError> {
        self.lock().liquidate(liquidator, borrower)
    }

    /// Snapshot of the aggregate totals
    pub fn state(&self) -> PoolState {
        self.lock().state().clone()
    }

    pub fn lender(&self, lender: &str) -> Option<LenderPosition> {
        self.lock().lender(lender).cloned()
    }

    pub fn borrower(&self, borrower: &str) -> Option<BorrowerPosition> {
        self.lock().borrower(borrower).cloned()
    }

    pub fn utilization_bps(&self) -> Result<u64, PoolError> {
        self.lock().utilization_bps()
    }

    pub fn current_rate_bps(&self) -> Result<u64, PoolError> {
        self.lock().current_rate_bps()
    }

    /// Drain the event journal
    pub fn take_events(&self) -> Vec<PoolEvent> {
        self.lock().take_events()
    }
}
