//! Pool events - In-memory journal of committed mutations
//!
//! Every committed operation appends an event the host can drain and ship
//! wherever it likes. This is a library-level record, not an emission
//! guarantee: events exist only for operations that fully succeeded.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::Display;

use lendra_core::{Amount, Asset};

/// A committed pool mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolEvent {
    /// Unique event id
    pub id: String,
    /// When the operation committed
    pub timestamp: DateTime<Utc>,
    pub kind: PoolEventKind,
}

impl PoolEvent {
    pub(crate) fn record(timestamp: DateTime<Utc>, kind: PoolEventKind) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp,
            kind,
        }
    }
}

/// What happened
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum PoolEventKind {
    Deposited {
        lender: String,
        amount: Amount,
        lock_tier: usize,
    },
    InterestAccrued {
        account: String,
        amount: Amount,
        rate_bps: u64,
    },
    Withdrawn {
        lender: String,
        amount: Amount,
        net: Amount,
        penalty: Amount,
    },
    Borrowed {
        borrower: String,
        amount: Amount,
        collateral_token: Asset,
    },
    Repaid {
        borrower: String,
        principal_portion: Amount,
        interest_portion: Amount,
    },
    Liquidated {
        borrower: String,
        liquidator: String,
        debt_cleared: Amount,
        seized_value: Amount,
        payout: Amount,
    },
}
