//! Reference pool scenarios with hand-checked results

use poolmath_amm::{AmmPool, StableMath, StablePoolState, WeightedMath, WeightedPoolState};
use poolmath_types::{FixedPoint, Rounding, U256};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn fp(value: Decimal) -> FixedPoint {
    FixedPoint::try_from_decimal(value).unwrap()
}

fn raw_diff(a: FixedPoint, b: FixedPoint) -> U256 {
    if a > b {
        a.raw() - b.raw()
    } else {
        b.raw() - a.raw()
    }
}

#[test]
fn test_equal_weight_swap_matches_constant_product() {
    // 200 * 10 / 110 with unit weights and no fee
    let amount_out = WeightedMath::out_given_in(
        fp(dec!(100)),
        fp(dec!(1)),
        fp(dec!(200)),
        fp(dec!(1)),
        fp(dec!(10)),
        FixedPoint::ZERO,
    )
    .unwrap();

    let expected = fp(dec!(18.181818181818181818));
    assert!(amount_out <= expected, "pool paid out {} > {}", amount_out, expected);
    assert!(raw_diff(amount_out, expected) <= U256::from(1_000u16));
}

#[test]
fn test_weighted_pool_state_quotes_through_trait() {
    let pool = WeightedPoolState {
        balances: vec![fp(dec!(100)), fp(dec!(200))],
        normalized_weights: vec![fp(dec!(0.5)), fp(dec!(0.5))],
        swap_fee: FixedPoint::ZERO,
    };

    let amount_out = pool.get_amount_out(0, 1, fp(dec!(10))).unwrap();
    let decimal = amount_out.to_decimal().unwrap();
    assert!((decimal - dec!(18.1818)).abs() < dec!(0.0001));

    // Exact-out for the same amount lands back on the input
    let amount_in = pool.get_amount_in(0, 1, amount_out).unwrap();
    let decimal_in = amount_in.to_decimal().unwrap();
    assert!((decimal_in - dec!(10)).abs() < dec!(0.000000001));
}

#[test]
fn test_stable_swap_keeps_invariant() {
    let amp = 200_000; // A = 200
    let balances = vec![fp(dec!(100)), fp(dec!(100))];
    let invariant_before = StableMath::invariant(amp, &balances, Rounding::Down).unwrap();

    let amount_in = fp(dec!(10));
    let amount_out = StableMath::out_given_in(amp, &balances, 0, 1, amount_in, invariant_before).unwrap();
    // A flat curve this close to balance trades nearly one for one
    assert!(amount_out < amount_in);
    assert!(amount_out > fp(dec!(9.99)));

    let balances_after = vec![
        balances[0].add(amount_in).unwrap(),
        balances[1].sub(amount_out).unwrap(),
    ];
    let invariant_after = StableMath::invariant(amp, &balances_after, Rounding::Down).unwrap();
    assert!(
        raw_diff(invariant_before, invariant_after) <= U256::from(10_000u16),
        "invariant moved from {} to {}",
        invariant_before,
        invariant_after
    );
}

#[test]
fn test_stable_pool_state_charges_fee() {
    let pool = StablePoolState {
        balances: vec![fp(dec!(100)), fp(dec!(100))],
        amp: 200_000,
        swap_fee: fp(dec!(0.01)),
    };
    let amount_out = pool.get_amount_out(0, 1, fp(dec!(10))).unwrap();
    // Roughly 9.9 in after the fee, and slightly less out
    assert!(amount_out < fp(dec!(9.9)));
    assert!(amount_out > fp(dec!(9.89)));
}

#[test]
fn test_square_root_of_two() {
    let root = fp(dec!(2)).pow(fp(dec!(0.5))).unwrap();
    let expected = fp(dec!(1.414213562373095049));

    // 1e-8 relative
    let tolerance = expected.mul_up(fp(dec!(0.00000001))).unwrap();
    assert!(raw_diff(root, expected) <= tolerance.raw());
}

#[test]
fn test_mul_down_truncates_sub_unit_remainder() {
    let x = fp(dec!(1.000000000000000001));
    // Exact product is 1.000000000000000002000000000000000001
    assert_eq!(x.mul_down(x).unwrap(), fp(dec!(1.000000000000000002)));
    assert_eq!(x.mul_up(x).unwrap(), fp(dec!(1.000000000000000003)));
}

#[test]
fn test_eighty_twenty_pool_prices() {
    let balances = [fp(dec!(800)), fp(dec!(200))];
    let weights = [fp(dec!(0.8)), fp(dec!(0.2))];

    // Balanced value: 800 / 0.8 == 200 / 0.2, so spot price is 1
    let price = WeightedMath::spot_price(balances[0], weights[0], balances[1], weights[1], FixedPoint::ZERO).unwrap();
    assert!(raw_diff(price, FixedPoint::ONE) <= U256::from(10u8));

    let invariant = WeightedMath::invariant(&weights, &balances).unwrap();
    let decimal = invariant.to_decimal().unwrap();
    // 800^0.8 * 200^0.2 = 606.2866...
    assert!((decimal - dec!(606.28662)).abs() < dec!(0.0001));
}
