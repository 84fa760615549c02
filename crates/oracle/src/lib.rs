//! Lendra Oracle - Collateral valuation ports
//!
//! The pool core never prices collateral itself. It talks to two ports:
//! `PriceFeed` for quotes and `CollateralManager` for valuation,
//! liquidation-eligibility, and seizure. `CollateralVault` is the reference
//! manager built on a feed; the mocks give tests full control.

mod error;
mod mock;
mod types;
mod vault;

pub use error::OracleError;
pub use mock::{MockCollateralManager, MockPriceFeed};
pub use types::{CollateralManager, PriceFeed, PriceQuote};
pub use vault::CollateralVault;
