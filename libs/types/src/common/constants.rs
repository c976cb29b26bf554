//! Named compile-time constants for the fixed-point and pool math
//!
//! Every scale factor, breakpoint table entry and domain bound used by the
//! math core lives here so that results stay bit-exact across callers.
//! Values that exceed `u128` are written as little-endian 64-bit limbs with
//! their decimal value alongside.

use primitive_types::U256;

/// Build a `U256` from a `u128` in const context
pub const fn u256(value: u128) -> U256 {
    U256([value as u64, (value >> 64) as u64, 0, 0])
}

// ============================================================================
// Fixed-point scale
// ============================================================================

/// Number of fractional digits carried by a `FixedPoint`
pub const DECIMALS: u32 = 18;

/// 1.0 in 18-decimal fixed point
pub const ONE: U256 = u256(1_000_000_000_000_000_000);

/// 2.0 in 18-decimal fixed point
pub const TWO: U256 = u256(2_000_000_000_000_000_000);

/// 4.0 in 18-decimal fixed point
pub const FOUR: U256 = u256(4_000_000_000_000_000_000);

/// Relative error bound applied to fractional powers: 1e-14
pub const MAX_POW_RELATIVE_ERROR: U256 = u256(10_000);

/// Smallest base accepted by `FixedPoint::pow` (one raw unit)
pub const MIN_POW_BASE: U256 = u256(1);

/// Largest base accepted by `FixedPoint::pow` (2^255 - 1, the signed 256-bit ceiling)
pub const MAX_POW_BASE: U256 = U256([u64::MAX, u64::MAX, u64::MAX, u64::MAX >> 1]);

/// Below this base the fractional pow error grows; protocol fee math clamps to it
pub const MIN_POW_BASE_FREE_EXPONENT: U256 = u256(700_000_000_000_000_000);

// ============================================================================
// Exponential / logarithm engine
// ============================================================================

pub mod log_exp {
    use super::u256;
    use primitive_types::U256;

    /// 1.0 with 18 decimals
    pub const ONE_18: U256 = u256(1_000_000_000_000_000_000);

    /// 1.0 with 20 decimals, used for the breakpoint products
    pub const ONE_20: U256 = u256(100_000_000_000_000_000_000);

    /// 1.0 with 36 decimals, used by the high precision logarithm
    pub const ONE_36: U256 = u256(1_000_000_000_000_000_000_000_000_000_000_000_000);

    /// Largest exponent accepted by `natural_exp`. The true bound is
    /// ln((2^255 - 1) / 10^20) = 130.700829182905140221.
    pub const MAX_NATURAL_EXPONENT: i128 = 130_000_000_000_000_000_000;

    /// Smallest exponent accepted by `natural_exp`. The true bound is
    /// ln(10^-18) = -41.446531673892822312.
    pub const MIN_NATURAL_EXPONENT: i128 = -41_000_000_000_000_000_000;

    /// Arguments strictly inside (0.9, 1.1) use the 36-decimal logarithm
    pub const LN_36_LOWER_BOUND: U256 = u256(900_000_000_000_000_000);
    pub const LN_36_UPPER_BOUND: U256 = u256(1_100_000_000_000_000_000);

    /// 2^254 / ONE_20 = 289480223093290488558927462521719769633174961664101410098
    pub const MILD_EXPONENT_BOUND: U256 = U256([
        0x4181_ea80_59f7_6532,
        0xa88f_4bb1_ca6b_cf58,
        0x0bce_5086_4921_11ae,
        0,
    ]);

    // 18 decimal breakpoints; their exponentials are stored without decimals.

    /// 2^7
    pub const X0: U256 = u256(128_000_000_000_000_000_000);
    /// e^(x0) = 38877084059945950922200000000000000000000000000000000000
    pub const A0: U256 = U256([
        0x0262_8270_0000_0000,
        0xf53a_2717_2fa9_ec63,
        0x0195_e54c_5dd4_2177,
        0,
    ]);
    /// 2^6
    pub const X1: U256 = u256(64_000_000_000_000_000_000);
    /// e^(x1)
    pub const A1: U256 = u256(6_235_149_080_811_616_882_910_000_000);

    // 20 decimal breakpoints and their exponentials.

    /// 2^5
    pub const X2: U256 = u256(3_200_000_000_000_000_000_000);
    pub const A2: U256 = u256(7_896_296_018_268_069_516_100_000_000_000_000);
    /// 2^4
    pub const X3: U256 = u256(1_600_000_000_000_000_000_000);
    pub const A3: U256 = u256(888_611_052_050_787_263_676_000_000);
    /// 2^3
    pub const X4: U256 = u256(800_000_000_000_000_000_000);
    pub const A4: U256 = u256(298_095_798_704_172_827_474_000);
    /// 2^2
    pub const X5: U256 = u256(400_000_000_000_000_000_000);
    pub const A5: U256 = u256(5_459_815_003_314_423_907_810);
    /// 2^1
    pub const X6: U256 = u256(200_000_000_000_000_000_000);
    pub const A6: U256 = u256(738_905_609_893_065_022_723);
    /// 2^0
    pub const X7: U256 = u256(100_000_000_000_000_000_000);
    pub const A7: U256 = u256(271_828_182_845_904_523_536);
    /// 2^-1
    pub const X8: U256 = u256(50_000_000_000_000_000_000);
    pub const A8: U256 = u256(164_872_127_070_012_814_685);
    /// 2^-2
    pub const X9: U256 = u256(25_000_000_000_000_000_000);
    pub const A9: U256 = u256(128_402_541_668_774_148_407);
    /// 2^-3
    pub const X10: U256 = u256(12_500_000_000_000_000_000);
    pub const A10: U256 = u256(113_314_845_306_682_631_683);
    /// 2^-4
    pub const X11: U256 = u256(6_250_000_000_000_000_000);
    pub const A11: U256 = u256(106_449_445_891_785_942_956);

    /// (x_n, a_n) pairs applied by `natural_exp` after the first two terms
    pub const EXP_BREAKPOINTS: [(U256, U256); 8] = [
        (X2, A2),
        (X3, A3),
        (X4, A4),
        (X5, A5),
        (X6, A6),
        (X7, A7),
        (X8, A8),
        (X9, A9),
    ];

    /// (x_n, a_n) pairs applied by `natural_log` after the first two terms
    pub const LN_BREAKPOINTS: [(U256, U256); 10] = [
        (X2, A2),
        (X3, A3),
        (X4, A4),
        (X5, A5),
        (X6, A6),
        (X7, A7),
        (X8, A8),
        (X9, A9),
        (X10, A10),
        (X11, A11),
    ];

    /// Taylor terms used for e^x on the decomposition remainder
    pub const EXP_SERIES_TERMS: u64 = 12;
}

// ============================================================================
// Weighted pools
// ============================================================================

pub mod weighted {
    use super::u256;
    use primitive_types::U256;

    /// Swaps may not move more than 30% of the in balance
    pub const MAX_IN_RATIO: U256 = u256(300_000_000_000_000_000);

    /// Swaps may not take more than 30% of the out balance
    pub const MAX_OUT_RATIO: U256 = u256(300_000_000_000_000_000);

    /// Single-asset joins may at most triple the invariant
    pub const MAX_INVARIANT_RATIO: U256 = u256(3_000_000_000_000_000_000);

    /// Single-asset exits may at most remove 30% of the invariant
    pub const MIN_INVARIANT_RATIO: U256 = u256(700_000_000_000_000_000);

    /// Smallest accepted normalized weight: 1%
    pub const MIN_WEIGHT: U256 = u256(10_000_000_000_000_000);
}

// ============================================================================
// Stable pools
// ============================================================================

pub mod stable {
    /// Amplification values are carried multiplied by this factor
    pub const AMP_PRECISION: u64 = 1_000;

    /// Smallest amplification coefficient before scaling
    pub const MIN_AMP: u64 = 1;

    /// Largest amplification coefficient before scaling
    pub const MAX_AMP: u64 = 5_000;

    /// Hard ceiling on Newton iterations for the invariant and balance solvers
    pub const MAX_SOLVER_ITERATIONS: usize = 255;
}

// ============================================================================
// Swap fees
// ============================================================================

/// Swap fees must lie in [0, 1); pools in practice stay far below this
pub const MAX_SWAP_FEE: U256 = ONE;
