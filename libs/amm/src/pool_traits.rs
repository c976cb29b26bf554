//! Pool trait definitions for unified AMM interface

use crate::{StableMath, StablePoolState, WeightedMath, WeightedPoolState};
use anyhow::{bail, Context, Result};
use poolmath_types::{FixedPoint, Rounding};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Pool type identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolType {
    Weighted,
    Stable,
}

impl std::fmt::Display for PoolType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PoolType::Weighted => write!(f, "weighted"),
            PoolType::Stable => write!(f, "stable"),
        }
    }
}

/// Unified pool interface for swap quoting
///
/// Amounts are 18-decimal upscaled values. Swap fees are applied by the
/// implementation: taken from the input for exact-in quotes and added on
/// top of the input for exact-out quotes.
pub trait AmmPool {
    /// Calculate output amount for given input
    fn get_amount_out(&self, token_in: usize, token_out: usize, amount_in: FixedPoint) -> Result<FixedPoint>;

    /// Calculate required input for desired output
    fn get_amount_in(&self, token_in: usize, token_out: usize, amount_out: FixedPoint) -> Result<FixedPoint>;

    /// Current invariant, rounded down
    fn invariant(&self) -> Result<FixedPoint>;

    /// Get current balances
    fn get_liquidity(&self) -> &[FixedPoint];

    /// Swap fee as a fraction
    fn swap_fee(&self) -> FixedPoint;

    fn pool_type(&self) -> PoolType;
}

fn check_pair(token_in: usize, token_out: usize, tokens: usize) -> Result<()> {
    if token_in >= tokens || token_out >= tokens {
        bail!(
            "Token pair ({}, {}) out of range for a {}-token pool",
            token_in,
            token_out,
            tokens
        );
    }
    if token_in == token_out {
        bail!("Cannot swap token {} for itself", token_in);
    }
    Ok(())
}

impl WeightedPoolState {
    fn check_quote(&self, token_in: usize, token_out: usize) -> Result<()> {
        if self.normalized_weights.len() != self.balances.len() {
            bail!(
                "{} weights for {} balances",
                self.normalized_weights.len(),
                self.balances.len()
            );
        }
        check_pair(token_in, token_out, self.balances.len())
    }
}

impl AmmPool for WeightedPoolState {
    fn get_amount_out(&self, token_in: usize, token_out: usize, amount_in: FixedPoint) -> Result<FixedPoint> {
        self.check_quote(token_in, token_out)?;
        let amount_out = WeightedMath::out_given_in(
            self.balances[token_in],
            self.normalized_weights[token_in],
            self.balances[token_out],
            self.normalized_weights[token_out],
            amount_in,
            self.swap_fee,
        )
        .context("weighted exact-in quote failed")?;
        debug!(pool = %PoolType::Weighted, token_in, token_out, %amount_in, %amount_out, "quote");
        Ok(amount_out)
    }

    fn get_amount_in(&self, token_in: usize, token_out: usize, amount_out: FixedPoint) -> Result<FixedPoint> {
        self.check_quote(token_in, token_out)?;
        let amount_in = WeightedMath::in_given_out(
            self.balances[token_in],
            self.normalized_weights[token_in],
            self.balances[token_out],
            self.normalized_weights[token_out],
            amount_out,
            self.swap_fee,
        )
        .context("weighted exact-out quote failed")?;
        debug!(pool = %PoolType::Weighted, token_in, token_out, %amount_in, %amount_out, "quote");
        Ok(amount_in)
    }

    fn invariant(&self) -> Result<FixedPoint> {
        Ok(WeightedMath::invariant(&self.normalized_weights, &self.balances)?)
    }

    fn get_liquidity(&self) -> &[FixedPoint] {
        &self.balances
    }

    fn swap_fee(&self) -> FixedPoint {
        self.swap_fee
    }

    fn pool_type(&self) -> PoolType {
        PoolType::Weighted
    }
}

impl AmmPool for StablePoolState {
    fn get_amount_out(&self, token_in: usize, token_out: usize, amount_in: FixedPoint) -> Result<FixedPoint> {
        check_pair(token_in, token_out, self.balances.len())?;
        let fee_amount = amount_in.mul_up(self.swap_fee)?;
        let amount_in_after_fee = amount_in.sub(fee_amount)?;

        let invariant = StableMath::invariant(self.amp, &self.balances, Rounding::Up)
            .context("stable invariant failed")?;
        let amount_out = StableMath::out_given_in(
            self.amp,
            &self.balances,
            token_in,
            token_out,
            amount_in_after_fee,
            invariant,
        )
        .context("stable exact-in quote failed")?;
        debug!(pool = %PoolType::Stable, token_in, token_out, %amount_in, %amount_out, "quote");
        Ok(amount_out)
    }

    fn get_amount_in(&self, token_in: usize, token_out: usize, amount_out: FixedPoint) -> Result<FixedPoint> {
        check_pair(token_in, token_out, self.balances.len())?;
        if self.swap_fee >= FixedPoint::ONE {
            bail!("Swap fee {} must be below 1", self.swap_fee);
        }

        let invariant = StableMath::invariant(self.amp, &self.balances, Rounding::Up)
            .context("stable invariant failed")?;
        let amount_in_before_fee = StableMath::in_given_out(
            self.amp,
            &self.balances,
            token_in,
            token_out,
            amount_out,
            invariant,
        )
        .context("stable exact-out quote failed")?;
        let amount_in = amount_in_before_fee.div_up(self.swap_fee.complement())?;
        debug!(pool = %PoolType::Stable, token_in, token_out, %amount_in, %amount_out, "quote");
        Ok(amount_in)
    }

    fn invariant(&self) -> Result<FixedPoint> {
        Ok(StableMath::invariant(self.amp, &self.balances, Rounding::Down)?)
    }

    fn get_liquidity(&self) -> &[FixedPoint] {
        &self.balances
    }

    fn swap_fee(&self) -> FixedPoint {
        self.swap_fee
    }

    fn pool_type(&self) -> PoolType {
        PoolType::Stable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fp(s: &str) -> FixedPoint {
        FixedPoint::from_decimal_str(s).unwrap()
    }

    fn weighted_pool() -> WeightedPoolState {
        WeightedPoolState {
            balances: vec![fp("100"), fp("200")],
            normalized_weights: vec![fp("0.5"), fp("0.5")],
            swap_fee: fp("0.003"),
        }
    }

    fn stable_pool() -> StablePoolState {
        StablePoolState {
            balances: vec![fp("1000"), fp("1000"), fp("1000")],
            amp: 200_000,
            swap_fee: fp("0.0004"),
        }
    }

    #[test]
    fn test_pools_behind_trait_objects() {
        let pools: Vec<Box<dyn AmmPool>> = vec![Box::new(weighted_pool()), Box::new(stable_pool())];
        for pool in &pools {
            let out = pool.get_amount_out(0, 1, fp("1")).unwrap();
            assert!(out > FixedPoint::ZERO);
            assert!(pool.invariant().unwrap() > FixedPoint::ZERO);
        }
        assert_eq!(pools[0].pool_type(), PoolType::Weighted);
        assert_eq!(pools[1].pool_type(), PoolType::Stable);
    }

    #[test]
    fn test_stable_fee_applied_to_both_directions() {
        let pool = stable_pool();
        let no_fee = StablePoolState {
            swap_fee: FixedPoint::ZERO,
            ..stable_pool()
        };
        assert!(pool.get_amount_out(0, 1, fp("10")).unwrap() < no_fee.get_amount_out(0, 1, fp("10")).unwrap());
        assert!(pool.get_amount_in(0, 1, fp("10")).unwrap() > no_fee.get_amount_in(0, 1, fp("10")).unwrap());
    }

    #[test]
    fn test_invalid_pairs_rejected() {
        let pool = weighted_pool();
        assert!(pool.get_amount_out(0, 0, fp("1")).is_err());
        assert!(pool.get_amount_out(0, 5, fp("1")).is_err());
        assert!(stable_pool().get_amount_in(3, 0, fp("1")).is_err());
    }

    #[test]
    fn test_pool_type_serde() {
        assert_eq!(serde_json::to_string(&PoolType::Stable).unwrap(), "\"stable\"");
        assert_eq!(PoolType::Weighted.to_string(), "weighted");
    }
}
