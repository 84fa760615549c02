//! Lendra Pool - The lending pool engine
//!
//! Ties the rate model, the position books, and the collaborator ports
//! together into the five pool operations: deposit, withdraw, borrow,
//! repay, liquidate. Operations are pure functions of current state plus a
//! single mutation commit; external transfers are issued last and any
//! collaborator failure rolls the operation back in full, so the
//! reconciliation invariant `total == available + borrowed` holds after
//! every call.
//!
//! Use `LendingPool` directly when ownership already serializes access, or
//! `SharedPool` to put one mutex around the whole engine.

pub mod config;
pub mod custody;
pub mod error;
pub mod events;
pub mod liquidation;
pub mod pool;
pub mod shared;
pub mod state;

pub use config::{PoolConfig, COLLATERAL_RATIO_BPS, LIQUIDATION_BONUS_BPS};
pub use custody::{CustodyError, MockCustody, TokenCustody, TransferDirection, TransferRecord};
pub use error::PoolError;
pub use events::{PoolEvent, PoolEventKind};
pub use liquidation::LiquidationOutcome;
pub use pool::{BorrowOutcome, DepositOutcome, LendingPool, RepayOutcome, WithdrawOutcome};
pub use shared::SharedPool;
pub use state::PoolState;
