//! Weighted pool math: constant weighted product invariant
//!
//! Invariant `V = Π B_i ^ W_i` over normalized weights. Every operation
//! rounds in the pool's favour: amounts paid out are rounded down, amounts
//! paid in are rounded up, and fractional powers are biased by their error
//! bound in the same direction.

use poolmath_types::constants::MAX_SWAP_FEE;
use poolmath_types::constants::weighted::{
    MAX_INVARIANT_RATIO, MAX_IN_RATIO, MAX_OUT_RATIO, MIN_INVARIANT_RATIO, MIN_WEIGHT,
};
use poolmath_types::{FixedPoint, MathError, MathResult};
use tracing::trace;

/// Weighted pool balances, normalized weights and swap fee
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedPoolState {
    pub balances: Vec<FixedPoint>,
    pub normalized_weights: Vec<FixedPoint>,
    pub swap_fee: FixedPoint, // Fraction, e.g. 0.003 = 0.3%
}

/// Weighted pool math functions, all rounding in the pool's favour
pub struct WeightedMath;

impl WeightedMath {
    /// Invariant `Π balances[i] ^ weights[i]`, rounded down
    ///
    /// # Errors
    /// `ZeroInvariant` if any balance is zero or the product truncates to zero.
    pub fn invariant(
        normalized_weights: &[FixedPoint],
        balances: &[FixedPoint],
    ) -> MathResult<FixedPoint> {
        check_lengths(normalized_weights.len(), balances.len())?;

        let mut invariant = FixedPoint::ONE;
        for (balance, weight) in balances.iter().zip(normalized_weights) {
            if balance.is_zero() {
                return Err(MathError::ZeroInvariant);
            }
            invariant = invariant.mul_down(balance.pow_down(*weight)?)?;
        }

        if invariant.is_zero() {
            return Err(MathError::ZeroInvariant);
        }
        trace!(%invariant, tokens = balances.len(), "weighted invariant");
        Ok(invariant)
    }

    /// Exact-in swap: tokens out for `amount_in` tokens in, after the swap fee
    ///
    /// The fee is taken from the input as `amount_in.mul_up(fee)`.
    /// `amount_out = balance_out * (1 - (balance_in / (balance_in + amount_in)) ^ (weight_in / weight_out))`
    pub fn out_given_in(
        balance_in: FixedPoint,
        weight_in: FixedPoint,
        balance_out: FixedPoint,
        weight_out: FixedPoint,
        amount_in: FixedPoint,
        swap_fee: FixedPoint,
    ) -> MathResult<FixedPoint> {
        check_swap_fee(swap_fee)?;
        let fee_amount = amount_in.mul_up(swap_fee)?;
        let amount_in_after_fee = amount_in.sub(fee_amount)?;

        if amount_in_after_fee > balance_in.mul_down(FixedPoint::from_raw(MAX_IN_RATIO))? {
            return Err(MathError::MaxInRatio);
        }

        let denominator = balance_in.add(amount_in_after_fee)?;
        let base = balance_in.div_up(denominator)?;
        let exponent = weight_in.div_down(weight_out)?;
        let power = base.pow_up(exponent)?;

        balance_out.mul_down(power.complement())
    }

    /// Exact-out swap: tokens in required for `amount_out` tokens out, fee included
    ///
    /// `amount_in = balance_in * ((balance_out / (balance_out - amount_out)) ^ (weight_out / weight_in) - 1)`,
    /// then grossed up by `1 / (1 - fee)`.
    pub fn in_given_out(
        balance_in: FixedPoint,
        weight_in: FixedPoint,
        balance_out: FixedPoint,
        weight_out: FixedPoint,
        amount_out: FixedPoint,
        swap_fee: FixedPoint,
    ) -> MathResult<FixedPoint> {
        check_swap_fee(swap_fee)?;
        if amount_out > balance_out.mul_down(FixedPoint::from_raw(MAX_OUT_RATIO))? {
            return Err(MathError::MaxOutRatio);
        }

        let base = balance_out.div_up(balance_out.sub(amount_out)?)?;
        let exponent = weight_out.div_up(weight_in)?;
        let power = base.pow_up(exponent)?;

        // power >= 1 because base >= 1
        let ratio = power.sub(FixedPoint::ONE)?;
        let amount_in_before_fee = balance_in.mul_up(ratio)?;

        amount_in_before_fee.div_up(swap_fee.complement())
    }

    /// Spot price of `token_out` in units of `token_in`, fee included
    ///
    /// `(balance_in / weight_in) / (balance_out / weight_out) / (1 - fee)`, rounded up
    pub fn spot_price(
        balance_in: FixedPoint,
        weight_in: FixedPoint,
        balance_out: FixedPoint,
        weight_out: FixedPoint,
        swap_fee: FixedPoint,
    ) -> MathResult<FixedPoint> {
        check_swap_fee(swap_fee)?;
        let numerator = balance_in.div_up(weight_in)?;
        let denominator = balance_out.div_down(weight_out)?;
        numerator
            .div_up(denominator)?
            .div_up(swap_fee.complement())
    }

    /// Normalize raw weights so that they sum to exactly `ONE`
    ///
    /// Each weight is rounded down and the last one absorbs the remainder.
    /// The result is validated with [`WeightedMath::validate_normalized_weights`].
    pub fn normalize_weights(raw_weights: &[FixedPoint]) -> MathResult<Vec<FixedPoint>> {
        let total = raw_weights
            .iter()
            .try_fold(FixedPoint::ZERO, |sum, weight| sum.add(*weight))?;

        let mut normalized = Vec::with_capacity(raw_weights.len());
        let mut assigned = FixedPoint::ZERO;
        for (i, weight) in raw_weights.iter().enumerate() {
            let share = if i + 1 == raw_weights.len() {
                FixedPoint::ONE.sub(assigned)?
            } else {
                weight.div_down(total)?
            };
            assigned = assigned.add(share)?;
            normalized.push(share);
        }

        Self::validate_normalized_weights(&normalized)?;
        Ok(normalized)
    }

    /// Every weight at least `MIN_WEIGHT` and the sum exactly `ONE`
    pub fn validate_normalized_weights(normalized_weights: &[FixedPoint]) -> MathResult<()> {
        let min_weight = FixedPoint::from_raw(MIN_WEIGHT);
        let mut sum = FixedPoint::ZERO;
        for weight in normalized_weights {
            if *weight < min_weight {
                return Err(MathError::MinWeight);
            }
            sum = sum.add(*weight)?;
        }
        if sum != FixedPoint::ONE {
            return Err(MathError::NormalizedWeightInvariant);
        }
        Ok(())
    }

    // JOINS

    /// Pool shares minted for an arbitrary (possibly unbalanced) deposit
    ///
    /// The part of each deposit above the proportional amount is treated as
    /// an implicit swap and charged the swap fee.
    pub fn bpt_out_given_exact_tokens_in(
        balances: &[FixedPoint],
        normalized_weights: &[FixedPoint],
        amounts_in: &[FixedPoint],
        bpt_total_supply: FixedPoint,
        swap_fee: FixedPoint,
    ) -> MathResult<FixedPoint> {
        check_lengths(balances.len(), normalized_weights.len())?;
        check_lengths(balances.len(), amounts_in.len())?;
        check_swap_fee(swap_fee)?;

        let mut balance_ratios_with_fee = Vec::with_capacity(balances.len());
        let mut invariant_ratio_with_fees = FixedPoint::ZERO;
        for ((balance, weight), amount_in) in balances.iter().zip(normalized_weights).zip(amounts_in) {
            let ratio = balance.add(*amount_in)?.div_down(*balance)?;
            invariant_ratio_with_fees = invariant_ratio_with_fees.add(ratio.mul_down(*weight)?)?;
            balance_ratios_with_fee.push(ratio);
        }

        let mut invariant_ratio = FixedPoint::ONE;
        for (i, balance) in balances.iter().enumerate() {
            let amount_in_without_fee = if balance_ratios_with_fee[i] > invariant_ratio_with_fees {
                let non_taxable_amount = if invariant_ratio_with_fees > FixedPoint::ONE {
                    balance.mul_down(invariant_ratio_with_fees.sub(FixedPoint::ONE)?)?
                } else {
                    FixedPoint::ZERO
                };
                let taxable_amount = amounts_in[i].sub(non_taxable_amount)?;
                let fee = taxable_amount.mul_up(swap_fee)?;
                non_taxable_amount.add(taxable_amount.sub(fee)?)?
            } else {
                amounts_in[i]
            };
            // untouched tokens leave the invariant unchanged
            if amount_in_without_fee.is_zero() {
                continue;
            }

            let balance_ratio = balance.add(amount_in_without_fee)?.div_down(*balance)?;
            invariant_ratio = invariant_ratio.mul_down(balance_ratio.pow_down(normalized_weights[i])?)?;
        }

        if invariant_ratio > FixedPoint::from_raw(MAX_INVARIANT_RATIO) {
            return Err(MathError::MaxInvariantRatio);
        }
        if invariant_ratio > FixedPoint::ONE {
            bpt_total_supply.mul_down(invariant_ratio.sub(FixedPoint::ONE)?)
        } else {
            Ok(FixedPoint::ZERO)
        }
    }

    /// Tokens of one kind required to mint exactly `bpt_amount_out` shares
    pub fn token_in_given_exact_bpt_out(
        balance: FixedPoint,
        normalized_weight: FixedPoint,
        bpt_amount_out: FixedPoint,
        bpt_total_supply: FixedPoint,
        swap_fee: FixedPoint,
    ) -> MathResult<FixedPoint> {
        check_swap_fee(swap_fee)?;
        let invariant_ratio = bpt_total_supply
            .add(bpt_amount_out)?
            .div_up(bpt_total_supply)?;
        if invariant_ratio > FixedPoint::from_raw(MAX_INVARIANT_RATIO) {
            return Err(MathError::MaxInvariantRatio);
        }

        // balance_ratio = invariant_ratio ^ (1 / weight)
        let balance_ratio = invariant_ratio.pow_up(FixedPoint::ONE.div_up(normalized_weight)?)?;
        let amount_in_without_fee = balance.mul_up(balance_ratio.sub(FixedPoint::ONE)?)?;

        // only the share beyond the token's weight is an implicit swap
        let taxable_amount = amount_in_without_fee.mul_up(normalized_weight.complement())?;
        let non_taxable_amount = amount_in_without_fee.sub(taxable_amount)?;
        let taxable_amount_plus_fees = taxable_amount.div_up(swap_fee.complement())?;

        non_taxable_amount.add(taxable_amount_plus_fees)
    }

    /// Tokens required for each share minted in a proportional join, rounded up
    pub fn tokens_in_given_exact_bpt_out(
        balances: &[FixedPoint],
        bpt_amount_out: FixedPoint,
        bpt_total_supply: FixedPoint,
    ) -> MathResult<Vec<FixedPoint>> {
        let bpt_ratio = bpt_amount_out.div_up(bpt_total_supply)?;
        balances
            .iter()
            .map(|balance| balance.mul_up(bpt_ratio))
            .collect()
    }

    // EXITS

    /// Pool shares burned for an arbitrary (possibly unbalanced) withdrawal
    pub fn bpt_in_given_exact_tokens_out(
        balances: &[FixedPoint],
        normalized_weights: &[FixedPoint],
        amounts_out: &[FixedPoint],
        bpt_total_supply: FixedPoint,
        swap_fee: FixedPoint,
    ) -> MathResult<FixedPoint> {
        check_lengths(balances.len(), normalized_weights.len())?;
        check_lengths(balances.len(), amounts_out.len())?;
        check_swap_fee(swap_fee)?;

        let mut balance_ratios_without_fee = Vec::with_capacity(balances.len());
        let mut invariant_ratio_without_fees = FixedPoint::ZERO;
        for ((balance, weight), amount_out) in balances.iter().zip(normalized_weights).zip(amounts_out) {
            let ratio = balance.sub(*amount_out)?.div_up(*balance)?;
            invariant_ratio_without_fees = invariant_ratio_without_fees.add(ratio.mul_up(*weight)?)?;
            balance_ratios_without_fee.push(ratio);
        }

        let mut invariant_ratio = FixedPoint::ONE;
        for (i, balance) in balances.iter().enumerate() {
            let amount_out_with_fee = if invariant_ratio_without_fees > balance_ratios_without_fee[i] {
                let non_taxable_amount = balance.mul_down(invariant_ratio_without_fees.complement())?;
                let taxable_amount = amounts_out[i].sub(non_taxable_amount)?;
                let taxable_amount_plus_fees = taxable_amount.div_up(swap_fee.complement())?;
                non_taxable_amount.add(taxable_amount_plus_fees)?
            } else {
                amounts_out[i]
            };
            if amount_out_with_fee.is_zero() {
                continue;
            }

            let balance_ratio = balance.sub(amount_out_with_fee)?.div_down(*balance)?;
            invariant_ratio = invariant_ratio.mul_down(balance_ratio.pow_down(normalized_weights[i])?)?;
        }

        if invariant_ratio < FixedPoint::from_raw(MIN_INVARIANT_RATIO) {
            return Err(MathError::MinInvariantRatio);
        }
        bpt_total_supply.mul_up(invariant_ratio.complement())
    }

    /// Tokens of one kind received for burning exactly `bpt_amount_in` shares
    pub fn token_out_given_exact_bpt_in(
        balance: FixedPoint,
        normalized_weight: FixedPoint,
        bpt_amount_in: FixedPoint,
        bpt_total_supply: FixedPoint,
        swap_fee: FixedPoint,
    ) -> MathResult<FixedPoint> {
        check_swap_fee(swap_fee)?;
        let invariant_ratio = bpt_total_supply
            .sub(bpt_amount_in)?
            .div_up(bpt_total_supply)?;
        if invariant_ratio < FixedPoint::from_raw(MIN_INVARIANT_RATIO) {
            return Err(MathError::MinInvariantRatio);
        }

        // balance_ratio = invariant_ratio ^ (1 / weight)
        let balance_ratio = invariant_ratio.pow_up(FixedPoint::ONE.div_down(normalized_weight)?)?;
        let amount_out_without_fee = balance.mul_down(balance_ratio.complement())?;

        let taxable_amount = amount_out_without_fee.mul_up(normalized_weight.complement())?;
        let non_taxable_amount = amount_out_without_fee.sub(taxable_amount)?;
        let taxable_amount_minus_fees = taxable_amount.mul_up(swap_fee.complement())?;

        non_taxable_amount.add(taxable_amount_minus_fees)
    }

    /// Proportional exit: every balance scaled by `bpt_amount_in / supply`, rounded down
    pub fn tokens_out_given_exact_bpt_in(
        balances: &[FixedPoint],
        bpt_amount_in: FixedPoint,
        bpt_total_supply: FixedPoint,
    ) -> MathResult<Vec<FixedPoint>> {
        let bpt_ratio = bpt_amount_in.div_down(bpt_total_supply)?;
        balances
            .iter()
            .map(|balance| balance.mul_down(bpt_ratio))
            .collect()
    }
}

pub(crate) fn check_lengths(expected: usize, actual: usize) -> MathResult<()> {
    if expected != actual {
        return Err(MathError::InputLengthMismatch { expected, actual });
    }
    Ok(())
}

pub(crate) fn check_swap_fee(swap_fee: FixedPoint) -> MathResult<()> {
    if swap_fee.raw() >= MAX_SWAP_FEE {
        return Err(MathError::SwapFeeOutOfBounds);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fp(s: &str) -> FixedPoint {
        FixedPoint::from_decimal_str(s).unwrap()
    }

    fn assert_close(actual: FixedPoint, expected: FixedPoint, tolerance: &str) {
        let diff = if actual > expected {
            actual.sub(expected).unwrap()
        } else {
            expected.sub(actual).unwrap()
        };
        assert!(
            diff <= fp(tolerance),
            "actual {} expected {} (tolerance {})",
            actual,
            expected,
            tolerance
        );
    }

    #[test]
    fn test_out_given_in_equal_weights() {
        // 100/1, 200/1, 10 in, no fee: 200 * (1 - 100/110) = 18.1818...
        let out = WeightedMath::out_given_in(
            fp("100"),
            fp("0.5"),
            fp("200"),
            fp("0.5"),
            fp("10"),
            FixedPoint::ZERO,
        )
        .unwrap();
        assert_close(out, fp("18.181818181818181818"), "0.000000001");
        // never more than the exact answer
        assert!(out <= fp("18.181818181818181819"));
    }

    #[test]
    fn test_out_given_in_unequal_weights() {
        // 80/20 pool: 100 * (1 - (1000 / 1010)^4) = 3.9019...
        let out = WeightedMath::out_given_in(
            fp("1000"),
            fp("0.8"),
            fp("100"),
            fp("0.2"),
            fp("10"),
            FixedPoint::ZERO,
        )
        .unwrap();
        assert_close(out, fp("3.901965551718371"), "0.000000001");
    }

    #[test]
    fn test_fee_reduces_output() {
        let no_fee = WeightedMath::out_given_in(fp("100"), fp("0.5"), fp("200"), fp("0.5"), fp("10"), FixedPoint::ZERO)
            .unwrap();
        let with_fee = WeightedMath::out_given_in(fp("100"), fp("0.5"), fp("200"), fp("0.5"), fp("10"), fp("0.003"))
            .unwrap();
        assert!(with_fee < no_fee);
    }

    #[test]
    fn test_in_given_out_equal_weights() {
        // 100 * (200 / 180 - 1) = 11.1111...
        let amount_in = WeightedMath::in_given_out(
            fp("100"),
            fp("0.5"),
            fp("200"),
            fp("0.5"),
            fp("20"),
            FixedPoint::ZERO,
        )
        .unwrap();
        assert_close(amount_in, fp("11.111111111111111111"), "0.000000001");
        assert!(amount_in >= fp("11.111111111111111111"));
    }

    #[test]
    fn test_in_given_out_grosses_up_fee() {
        let no_fee = WeightedMath::in_given_out(fp("100"), fp("0.5"), fp("200"), fp("0.5"), fp("20"), FixedPoint::ZERO)
            .unwrap();
        let with_fee = WeightedMath::in_given_out(fp("100"), fp("0.5"), fp("200"), fp("0.5"), fp("20"), fp("0.01"))
            .unwrap();
        assert_close(with_fee, no_fee.div_up(fp("0.99")).unwrap(), "0.000000000000000001");
    }

    #[test]
    fn test_swap_ratio_limits() {
        assert_eq!(
            WeightedMath::out_given_in(fp("100"), fp("0.5"), fp("100"), fp("0.5"), fp("30.1"), FixedPoint::ZERO),
            Err(MathError::MaxInRatio)
        );
        assert!(WeightedMath::out_given_in(fp("100"), fp("0.5"), fp("100"), fp("0.5"), fp("30"), FixedPoint::ZERO).is_ok());
        assert_eq!(
            WeightedMath::in_given_out(fp("100"), fp("0.5"), fp("100"), fp("0.5"), fp("30.1"), FixedPoint::ZERO),
            Err(MathError::MaxOutRatio)
        );
    }

    #[test]
    fn test_swap_fee_bounds() {
        assert_eq!(
            WeightedMath::out_given_in(fp("100"), fp("0.5"), fp("100"), fp("0.5"), fp("1"), FixedPoint::ONE),
            Err(MathError::SwapFeeOutOfBounds)
        );
    }

    #[test]
    fn test_invariant() {
        // sqrt(100 * 400) = 200
        let invariant = WeightedMath::invariant(&[fp("0.5"), fp("0.5")], &[fp("100"), fp("400")]).unwrap();
        assert_close(invariant, fp("200"), "0.00000001");
        assert!(invariant <= fp("200"));

        assert_eq!(
            WeightedMath::invariant(&[fp("0.5"), fp("0.5")], &[fp("100"), FixedPoint::ZERO]),
            Err(MathError::ZeroInvariant)
        );
        assert_eq!(
            WeightedMath::invariant(&[fp("0.5"), fp("0.5")], &[fp("100")]),
            Err(MathError::InputLengthMismatch {
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn test_normalize_weights() {
        let normalized = WeightedMath::normalize_weights(&[fp("1"), fp("1"), fp("1")]).unwrap();
        assert_eq!(normalized[0], fp("0.333333333333333333"));
        assert_eq!(normalized[2], fp("0.333333333333333334"));

        assert_eq!(
            WeightedMath::normalize_weights(&[fp("1000"), fp("1")]),
            Err(MathError::MinWeight)
        );
    }

    #[test]
    fn test_validate_normalized_weights() {
        assert!(WeightedMath::validate_normalized_weights(&[fp("0.8"), fp("0.2")]).is_ok());
        assert_eq!(
            WeightedMath::validate_normalized_weights(&[fp("0.8"), fp("0.1")]),
            Err(MathError::NormalizedWeightInvariant)
        );
        assert_eq!(
            WeightedMath::validate_normalized_weights(&[fp("0.995"), fp("0.005")]),
            Err(MathError::MinWeight)
        );
    }

    #[test]
    fn test_spot_price() {
        // (100 / 0.5) / (200 / 0.5) = 0.5 token_in per token_out
        let price = WeightedMath::spot_price(fp("100"), fp("0.5"), fp("200"), fp("0.5"), FixedPoint::ZERO).unwrap();
        assert_eq!(price, fp("0.5"));
    }

    #[test]
    fn test_proportional_join_mints_proportional_shares() {
        // depositing 10% of every balance mints ~10% of supply
        let bpt_out = WeightedMath::bpt_out_given_exact_tokens_in(
            &[fp("100"), fp("400")],
            &[fp("0.5"), fp("0.5")],
            &[fp("10"), fp("40")],
            fp("200"),
            fp("0.01"),
        )
        .unwrap();
        assert_close(bpt_out, fp("20"), "0.00000001");
        assert!(bpt_out <= fp("20"));
    }

    #[test]
    fn test_single_asset_join_pays_fee() {
        let with_fee = WeightedMath::bpt_out_given_exact_tokens_in(
            &[fp("100"), fp("400")],
            &[fp("0.5"), fp("0.5")],
            &[fp("10"), FixedPoint::ZERO],
            fp("200"),
            fp("0.01"),
        )
        .unwrap();
        let without_fee = WeightedMath::bpt_out_given_exact_tokens_in(
            &[fp("100"), fp("400")],
            &[fp("0.5"), fp("0.5")],
            &[fp("10"), FixedPoint::ZERO],
            fp("200"),
            FixedPoint::ZERO,
        )
        .unwrap();
        assert!(with_fee < without_fee);
        // 200 * (sqrt(1.1) - 1) = 9.7617...
        assert_close(without_fee, fp("9.761769634030309"), "0.00000001");
    }

    #[test]
    fn test_token_in_given_exact_bpt_out() {
        // doubling the supply with a 50% token quadruples its balance
        let amount_in = WeightedMath::token_in_given_exact_bpt_out(
            fp("100"),
            fp("0.5"),
            fp("200"),
            fp("200"),
            FixedPoint::ZERO,
        )
        .unwrap();
        assert_close(amount_in, fp("300"), "0.00000001");

        assert_eq!(
            WeightedMath::token_in_given_exact_bpt_out(fp("100"), fp("0.5"), fp("401"), fp("200"), FixedPoint::ZERO),
            Err(MathError::MaxInvariantRatio)
        );
    }

    #[test]
    fn test_token_out_given_exact_bpt_in() {
        // burning 19% of supply with a 50% token leaves 0.81 of its balance
        let amount_out = WeightedMath::token_out_given_exact_bpt_in(
            fp("100"),
            fp("0.5"),
            fp("19"),
            fp("100"),
            FixedPoint::ZERO,
        )
        .unwrap();
        assert_close(amount_out, fp("34.39"), "0.00000001");
        assert!(amount_out <= fp("34.39"));

        assert_eq!(
            WeightedMath::token_out_given_exact_bpt_in(fp("100"), fp("0.5"), fp("31"), fp("100"), FixedPoint::ZERO),
            Err(MathError::MinInvariantRatio)
        );
    }

    #[test]
    fn test_bpt_in_given_exact_tokens_out() {
        let bpt_in = WeightedMath::bpt_in_given_exact_tokens_out(
            &[fp("100"), fp("400")],
            &[fp("0.5"), fp("0.5")],
            &[fp("10"), fp("40")],
            fp("200"),
            fp("0.01"),
        )
        .unwrap();
        // proportional withdrawal of 10% burns ~10% of supply, rounded up
        assert_close(bpt_in, fp("20"), "0.00000001");
        assert!(bpt_in >= fp("20"));
    }

    #[test]
    fn test_untouched_tokens_move_no_shares() {
        let balances = [fp("100"), fp("400")];
        let weights = [fp("0.5"), fp("0.5")];
        let nothing = [FixedPoint::ZERO, FixedPoint::ZERO];

        let bpt_out =
            WeightedMath::bpt_out_given_exact_tokens_in(&balances, &weights, &nothing, fp("200"), fp("0.01")).unwrap();
        assert_eq!(bpt_out, FixedPoint::ZERO);
        let bpt_in =
            WeightedMath::bpt_in_given_exact_tokens_out(&balances, &weights, &nothing, fp("200"), fp("0.01")).unwrap();
        assert_eq!(bpt_in, FixedPoint::ZERO);

        // one-sided exit: 200 * (1 - sqrt(0.9)) = 10.26334038989724008...
        let bpt_in = WeightedMath::bpt_in_given_exact_tokens_out(
            &balances,
            &weights,
            &[fp("10"), FixedPoint::ZERO],
            fp("200"),
            FixedPoint::ZERO,
        )
        .unwrap();
        assert_close(bpt_in, fp("10.263340389897240080"), "0.00000001");
        assert!(bpt_in >= fp("10.263340389897240080"));
    }

    #[test]
    fn test_proportional_exit() {
        let amounts = WeightedMath::tokens_out_given_exact_bpt_in(&[fp("100"), fp("400")], fp("50"), fp("200")).unwrap();
        assert_eq!(amounts, vec![fp("25"), fp("100")]);

        let amounts = WeightedMath::tokens_in_given_exact_bpt_out(&[fp("100"), fp("400")], fp("50"), fp("200")).unwrap();
        assert_eq!(amounts, vec![fp("25"), fp("100")]);
    }
}
