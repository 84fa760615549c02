//! Pool engine errors
//!
//! Three families, per the engine's contract: validation errors reject bad
//! input before anything is read; state-precondition errors reject
//! deterministically against current state; collaborator failures surface
//! after the commit point and trigger a full rollback in the operation that
//! hit them. Nothing here is fatal - every rejection returns with the pool
//! unmodified.

use lendra_core::{Amount, AmountError};
use lendra_ledger::LedgerError;
use lendra_oracle::OracleError;
use lendra_rates::RateConfigError;
use thiserror::Error;

use crate::custody::CustodyError;

/// Errors from pool operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    // === Validation ===
    #[error("Invalid account id")]
    InvalidAddress,

    #[error("Amount must be greater than zero")]
    InvalidAmount,

    #[error("Invalid pool config {field}: {value}")]
    InvalidConfig { field: &'static str, value: u64 },

    // === State preconditions ===
    #[error("Insufficient pool liquidity: requested {requested}, available {available}")]
    InsufficientPoolLiquidity {
        requested: Amount,
        available: Amount,
    },

    #[error("Borrow cap exceeded: utilization would reach {utilization_bps} bps (max {max_bps})")]
    BorrowCapExceeded { utilization_bps: u64, max_bps: u64 },

    #[error("Insufficient collateral: required {required}, valued {actual}")]
    InsufficientCollateral { required: Amount, actual: Amount },

    #[error("Position for {borrower} is healthy, nothing to liquidate")]
    PositionHealthy { borrower: String },

    // === Wrapped collaborator and ledger failures ===
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    Custody(#[from] CustodyError),

    #[error(transparent)]
    Amount(#[from] AmountError),

    #[error(transparent)]
    RateConfig(#[from] RateConfigError),
}
