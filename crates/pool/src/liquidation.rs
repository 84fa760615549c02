//! Liquidation outcome and payout arithmetic
//!
//! Liquidation is permissionless: monitoring is outsourced to whoever finds
//! an undercollateralized position first, paid a bonus on the seized value.
//! The pool books the event as a forced full repayment funded by the
//! seizure and absorbs the bonus as a cost of guaranteed liquidity.

use serde::{Deserialize, Serialize};

use lendra_core::math::{mul_div, BPS_DENOMINATOR};
use lendra_core::{Amount, AmountError};

/// Result of a completed liquidation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidationOutcome {
    pub borrower: String,
    pub liquidator: String,
    /// Total debt written off (principal + settled interest)
    pub debt_cleared: Amount,
    /// Principal component of the cleared debt
    pub principal_cleared: Amount,
    /// Interest component of the cleared debt
    pub interest_cleared: Amount,
    /// Pool-currency value the collateral manager seized
    pub seized_value: Amount,
    /// What the liquidator was actually paid
    pub payout: Amount,
}

/// Liquidator payout: seized value plus the bonus, capped at what the pool
/// can pay.
///
/// The cap resolves the surplus/shortfall question deliberately: a deficit
/// erodes the liquidator's bonus, never lender principal.
pub(crate) fn liquidator_payout(
    seized_value: Amount,
    bonus_bps: u64,
    available: Amount,
) -> Result<Amount, AmountError> {
    let with_bonus = mul_div(
        seized_value.value(),
        BPS_DENOMINATOR + u128::from(bonus_bps),
        BPS_DENOMINATOR,
    )?;
    Ok(Amount::new(with_bonus).min(available))
}
