//! Ledger errors

use chrono::{DateTime, Utc};
use lendra_core::{Amount, AmountError, Asset};
use thiserror::Error;

/// Errors that can occur in ledger operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Invalid lock tier index {index}: schedule has {tiers} tiers")]
    InvalidLockTier { index: usize, tiers: usize },

    #[error("Lock tier bonus out of range: {bps} bps (max 10000)")]
    InvalidLockBonus { bps: u64 },

    #[error("Funds locked until {locked_until}")]
    FundsLocked { locked_until: DateTime<Utc> },

    #[error("Insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance {
        requested: Amount,
        available: Amount,
    },

    #[error("No active loan for borrower {borrower}")]
    NoActiveLoan { borrower: String },

    #[error("Repay amount {amount} exceeds total owed {owed}")]
    RepayExceedsDebt { amount: Amount, owed: Amount },

    #[error("Position is collateralized with {expected}, got {actual}")]
    CollateralMismatch { expected: Asset, actual: Asset },

    #[error(transparent)]
    Amount(#[from] AmountError),
}
