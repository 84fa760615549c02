//! Lendra Core - Domain types
//!
//! This crate contains the fundamental types used across Lendra:
//! - `Amount`: Fixed-point integer wrapper for monetary quantities
//! - `Asset`: Type-safe asset codes for collateral tokens
//! - `Clock`: Time source abstraction for deterministic accrual

pub mod amount;
pub mod asset;
pub mod clock;
pub mod math;

pub use amount::{Amount, AmountError};
pub use asset::Asset;
pub use clock::{Clock, ManualClock, SystemClock};
pub use math::BPS_DENOMINATOR;
