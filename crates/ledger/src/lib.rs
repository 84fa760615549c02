//! Lendra Ledger - Per-user position books
//!
//! Tracks lender deposits (with lock tiers and earned interest) and borrower
//! loans (principal plus accumulated interest). Accrual is lazy: positions
//! carry a `last_update` timestamp and interest is computed exactly at the
//! point of access from the elapsed wall-clock seconds, never by a
//! background process.

pub mod borrower;
pub mod error;
pub mod lender;
pub mod lock;

pub use borrower::{split_repayment, BorrowerBook, BorrowerPosition};
pub use error::LedgerError;
pub use lender::{LenderBook, LenderPosition};
pub use lock::{LockSchedule, LockTier};
