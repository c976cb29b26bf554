//! Protocol fee accounting
//!
//! Protocol fees are collected by minting pool shares to the protocol rather
//! than by moving tokens. Between two liquidity events the pool's invariant
//! grows from swap fees (and, for rate-bearing tokens, from yield); the
//! protocol is owed a fraction of that growth, expressed as an ownership
//! percentage of the pool and converted into shares to mint.
//!
//! ## Accounting Flow
//!
//! 1. The caller persists the invariant after every join/exit (`last_post_invariant`)
//! 2. At the next join/exit, the pre-operation invariant is compared against it
//! 3. Growth is converted into an ownership percentage, times the fee rate
//! 4. [`ProtocolFees::bpt_for_pool_ownership_percentage`] gives the shares to mint
//!
//! Minted shares do not change the amounts of the user's own operation.

use crate::stable_math::StableMath;
use crate::weighted_math::check_lengths;
use poolmath_types::constants::MIN_POW_BASE_FREE_EXPONENT;
use poolmath_types::{FixedPoint, MathResult, Rounding};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Per-token rate snapshot used to separate yield from swap fee growth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateCache {
    /// Rate at the last fee checkpoint
    pub old_rate: FixedPoint,
    /// Rate now
    pub current_rate: FixedPoint,
    /// Yield on this token is exempt from protocol fees
    pub exempt: bool,
}

impl RateCache {
    /// Token without a rate provider
    pub fn unrated() -> Self {
        Self {
            old_rate: FixedPoint::ONE,
            current_rate: FixedPoint::ONE,
            exempt: false,
        }
    }

    pub fn new(old_rate: FixedPoint, current_rate: FixedPoint, exempt: bool) -> Self {
        Self {
            old_rate,
            current_rate,
            exempt,
        }
    }

    /// Balance expressed at the old rate, removing yield since the checkpoint
    ///
    /// `balance * old_rate / current_rate`, rounded down
    pub fn adjusted_balance(&self, balance: FixedPoint) -> MathResult<FixedPoint> {
        balance.mul_div_down(self.old_rate, self.current_rate)
    }
}

/// Protocol fee rates, each a fraction in [0, 1]; unset rates are zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProtocolFeePercentages {
    #[serde(default)]
    pub swap: FixedPoint,
    #[serde(default, rename = "yield")]
    pub yield_fee: FixedPoint,
}

/// Invariants of a stable pool measured three ways
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrowthInvariants {
    /// All rated balances adjusted: only swap fee growth remains
    pub swap_fee_growth: FixedPoint,
    /// Raw balances: swap fees plus all yield
    pub total_growth: FixedPoint,
    /// Only exempt balances adjusted: swap fees plus non-exempt yield
    pub total_non_exempt_growth: FixedPoint,
}

/// Protocol fee accounting functions
pub struct ProtocolFees;

impl ProtocolFees {
    /// Shares to mint so the protocol owns `pool_ownership_percentage` of the
    /// pool after minting
    ///
    /// `supply * pct / (1 - pct)`, rounded down
    pub fn bpt_for_pool_ownership_percentage(
        total_supply: FixedPoint,
        pool_ownership_percentage: FixedPoint,
    ) -> MathResult<FixedPoint> {
        total_supply
            .mul_down(pool_ownership_percentage)?
            .div_down(pool_ownership_percentage.complement())
    }

    /// Protocol share of invariant growth since the last join/exit
    ///
    /// `(1 - last_post / pre) * protocol_fee` when the invariant grew, else zero.
    pub fn swap_fee_ownership_percentage(
        pre_invariant: FixedPoint,
        last_post_invariant: FixedPoint,
        protocol_swap_fee: FixedPoint,
    ) -> MathResult<FixedPoint> {
        if pre_invariant <= last_post_invariant {
            return Ok(FixedPoint::ZERO);
        }
        let growth_share = last_post_invariant.div_up(pre_invariant)?.complement();
        growth_share.mul_down(protocol_swap_fee)
    }

    /// Protocol share of invariant growth that outpaced supply growth
    ///
    /// For pools whose supply changes between checkpoints: only invariant
    /// growth per share is attributable to fees.
    pub fn invariant_growth_ownership_percentage(
        invariant_growth_ratio: FixedPoint,
        supply_growth_ratio: FixedPoint,
        protocol_swap_fee: FixedPoint,
    ) -> MathResult<FixedPoint> {
        if invariant_growth_ratio <= supply_growth_ratio {
            return Ok(FixedPoint::ZERO);
        }
        let swap_fees_percentage = FixedPoint::ONE.sub(supply_growth_ratio.div_up(invariant_growth_ratio)?)?;
        swap_fees_percentage.mul_down(protocol_swap_fee)
    }

    /// Shares to mint for swap fees accrued since the last join/exit
    pub fn due_protocol_fee_bpt(
        pre_invariant: FixedPoint,
        last_post_invariant: FixedPoint,
        total_supply: FixedPoint,
        protocol_swap_fee: FixedPoint,
    ) -> MathResult<FixedPoint> {
        let ownership =
            Self::swap_fee_ownership_percentage(pre_invariant, last_post_invariant, protocol_swap_fee)?;
        if ownership.is_zero() {
            return Ok(FixedPoint::ZERO);
        }
        let bpt = Self::bpt_for_pool_ownership_percentage(total_supply, ownership)?;
        debug!(%pre_invariant, %last_post_invariant, %ownership, %bpt, "protocol swap fee due");
        Ok(bpt)
    }

    // STABLE POOL YIELD FEES

    /// Stable invariants with and without yield since the last checkpoint
    pub fn growth_invariants(
        amp: u64,
        balances: &[FixedPoint],
        rate_caches: &[RateCache],
    ) -> MathResult<GrowthInvariants> {
        check_lengths(balances.len(), rate_caches.len())?;

        let mut all_adjusted = Vec::with_capacity(balances.len());
        let mut exempt_adjusted = Vec::with_capacity(balances.len());
        for (balance, cache) in balances.iter().zip(rate_caches) {
            let adjusted = cache.adjusted_balance(*balance)?;
            all_adjusted.push(adjusted);
            exempt_adjusted.push(if cache.exempt { adjusted } else { *balance });
        }

        Ok(GrowthInvariants {
            swap_fee_growth: StableMath::invariant(amp, &all_adjusted, Rounding::Down)?,
            total_growth: StableMath::invariant(amp, balances, Rounding::Down)?,
            total_non_exempt_growth: StableMath::invariant(amp, &exempt_adjusted, Rounding::Down)?,
        })
    }

    /// Protocol ownership percentage owed for swap fees and non-exempt yield
    ///
    /// Swap fee growth is measured from `last_post_invariant` to the swap fee
    /// growth invariant; yield growth from there to the non-exempt growth
    /// invariant. Both gaps are normalised by the total growth invariant.
    pub fn protocol_ownership_percentage(
        growth: &GrowthInvariants,
        last_post_invariant: FixedPoint,
        fees: &ProtocolFeePercentages,
    ) -> MathResult<FixedPoint> {
        let swap_fee_delta = growth
            .swap_fee_growth
            .sub(last_post_invariant)
            .unwrap_or(FixedPoint::ZERO);
        let yield_delta = growth
            .total_non_exempt_growth
            .sub(growth.swap_fee_growth)
            .unwrap_or(FixedPoint::ZERO);

        let swap_percentage = swap_fee_delta
            .div_down(growth.total_growth)?
            .mul_down(fees.swap)?;
        let yield_percentage = yield_delta
            .div_down(growth.total_growth)?
            .mul_down(fees.yield_fee)?;

        swap_percentage.add(yield_percentage)
    }

    /// Per-token swap fee owed by a stable pool, in that token
    ///
    /// The token balance that would restore `last_invariant` is solved for;
    /// the excess above it is accrued fees.
    pub fn stable_due_token_protocol_swap_fee(
        amp: u64,
        balances: &[FixedPoint],
        last_invariant: FixedPoint,
        token_index: usize,
        protocol_swap_fee: FixedPoint,
    ) -> MathResult<FixedPoint> {
        let final_balance = StableMath::token_balance_given_invariant_and_all_other_balances(
            amp,
            balances,
            last_invariant,
            token_index,
        )?;
        match balances[token_index].sub(final_balance) {
            Ok(accrued) => accrued.mul_down(protocol_swap_fee),
            Err(_) => Ok(FixedPoint::ZERO),
        }
    }

    // WEIGHTED POOL FEES

    /// Per-token swap fee owed by a weighted pool, in that token
    ///
    /// `balance * (1 - (previous / current) ^ (1 / weight)) * pct`. The base
    /// is clamped to `MIN_POW_BASE_FREE_EXPONENT` to keep the power accurate.
    pub fn weighted_due_token_protocol_swap_fee(
        balance: FixedPoint,
        normalized_weight: FixedPoint,
        previous_invariant: FixedPoint,
        current_invariant: FixedPoint,
        protocol_swap_fee: FixedPoint,
    ) -> MathResult<FixedPoint> {
        if current_invariant <= previous_invariant {
            return Ok(FixedPoint::ZERO);
        }

        let base = previous_invariant
            .div_up(current_invariant)?
            .max(FixedPoint::from_raw(MIN_POW_BASE_FREE_EXPONENT));
        let exponent = FixedPoint::ONE.div_down(normalized_weight)?;
        let power = base.pow_up(exponent)?;

        let accrued = balance.mul_down(power.complement())?;
        accrued.mul_down(protocol_swap_fee)
    }

    /// Weighted product of token rates `Π rate_i ^ weight_i`, rounded down
    ///
    /// Scaling every balance by its rate scales the weighted invariant by
    /// exactly this product, so its growth measures yield.
    pub fn rate_product(normalized_weights: &[FixedPoint], rates: &[FixedPoint]) -> MathResult<FixedPoint> {
        check_lengths(normalized_weights.len(), rates.len())?;
        rates
            .iter()
            .zip(normalized_weights)
            .try_fold(FixedPoint::ONE, |product, (rate, weight)| {
                product.mul_down(rate.pow_down(*weight)?)
            })
    }

    /// Protocol ownership percentage owed for yield above the all-time-high
    /// rate product
    ///
    /// Returns zero when the rate product has not exceeded its previous high
    /// (or no high has been recorded yet). The caller records
    /// `max(rate_product, ath_rate_product)` as the new high.
    pub fn yield_fee_ownership_percentage(
        rate_product: FixedPoint,
        ath_rate_product: FixedPoint,
        protocol_yield_fee: FixedPoint,
    ) -> MathResult<FixedPoint> {
        if ath_rate_product.is_zero() || rate_product <= ath_rate_product {
            return Ok(FixedPoint::ZERO);
        }
        let growth = rate_product.div_down(ath_rate_product)?;
        let yield_percentage = growth.sub(FixedPoint::ONE)?;
        yield_percentage
            .div_down(growth)?
            .mul_down(protocol_yield_fee)
    }
}
