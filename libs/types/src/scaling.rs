//! Token decimal and rate scaling
//!
//! Pool math runs on 18-decimal values regardless of how many decimals a
//! token uses on its own ledger. Native amounts are multiplied up by a
//! per-token scaling factor before any invariant math and divided back down
//! afterwards.
//!
//! ## Precision Requirements by Token
//!
//! - **WETH / DAI**: 18 decimals, scaling factor `1.0`
//! - **WBTC**: 8 decimals, scaling factor `1e10`
//! - **USDC / USDT**: 6 decimals, scaling factor `1e12`
//!
//! Rate-bearing tokens (wrapped or yield-accruing assets) fold their current
//! rate into the factor, so one upscaled unit is worth one unit of the
//! underlying.
//!
//! ## Critical Rules
//!
//! 1. Upscaling rounds down: the pool sees no more than it holds
//! 2. Amounts paid out are downscaled down, amounts paid in are downscaled up
//! 3. Tokens with more than 18 decimals are rejected

use crate::common::constants::DECIMALS;
use crate::common::errors::{MathError, MathResult};
use crate::common::fixed_point::FixedPoint;
use primitive_types::U256;

/// Scaling factor for a token with `decimals` decimals: `10^(18 - decimals)`
pub fn scaling_factor(decimals: u8) -> MathResult<FixedPoint> {
    let decimals_difference = DECIMALS
        .checked_sub(u32::from(decimals))
        .ok_or(MathError::UnsupportedDecimals { decimals })?;
    Ok(FixedPoint::from_integer(10u128.pow(decimals_difference)))
}

/// Scaling factor with the token's current rate folded in
pub fn rated_scaling_factor(decimals: u8, rate: FixedPoint) -> MathResult<FixedPoint> {
    scaling_factor(decimals)?.mul_down(rate)
}

/// Native token amount to 18-decimal pool units
pub fn upscale(amount: U256, scaling_factor: FixedPoint) -> MathResult<FixedPoint> {
    FixedPoint::from_raw(amount).mul_down(scaling_factor)
}

/// Upscale a full balance vector
pub fn upscale_all(amounts: &[U256], scaling_factors: &[FixedPoint]) -> MathResult<Vec<FixedPoint>> {
    if amounts.len() != scaling_factors.len() {
        return Err(MathError::InputLengthMismatch {
            expected: scaling_factors.len(),
            actual: amounts.len(),
        });
    }
    amounts
        .iter()
        .zip(scaling_factors)
        .map(|(amount, factor)| upscale(*amount, *factor))
        .collect()
}

/// 18-decimal pool units back to native units, truncating (amounts paid out)
pub fn downscale_down(amount: FixedPoint, scaling_factor: FixedPoint) -> MathResult<U256> {
    amount.div_down(scaling_factor).map(FixedPoint::raw)
}

/// 18-decimal pool units back to native units, rounding up (amounts paid in)
pub fn downscale_up(amount: FixedPoint, scaling_factor: FixedPoint) -> MathResult<U256> {
    amount.div_up(scaling_factor).map(FixedPoint::raw)
}
