//! Natural exponential and logarithm for 18-decimal fixed-point values
//!
//! Arbitrary-base powers and logarithms are reduced to `e^x` and `ln(a)`:
//!
//! - **exp**: `x` is decomposed into a sum of precomputed breakpoints
//!   `x_n = 2^(7-n)` whose exponentials `a_n` are tabulated; the remainder
//!   (below 0.25) goes through a 12-term Taylor series at 20 decimals.
//!   Negative arguments use `e^-x = 1 / e^x`.
//! - **ln**: the inverse decomposition divides out the `a_n` factors, then
//!   sums the odd-power series of `z = (a - 1) / (a + 1)` on the remainder.
//!   Arguments inside (0.9, 1.1) use a 36-decimal variant to avoid
//!   cancellation.
//! - **pow**: `x^y = exp(y * ln(x))`; **log**: `ln(arg) / ln(base)`.
//!
//! Signed values at the boundary are `i128` (the valid window is roughly
//! [-41, 130] units). Intermediates are unsigned 256-bit magnitudes with the
//! sign carried alongside; every division truncates the magnitude, which is
//! the same as truncating a signed quotient toward zero.

use crate::common::constants::log_exp::*;
use crate::common::constants::MAX_POW_BASE;
use crate::common::errors::{MathError, MathResult};
use primitive_types::U256;

/// Sign-magnitude intermediate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Signed {
    negative: bool,
    magnitude: U256,
}

impl Signed {
    fn positive(magnitude: U256) -> Self {
        Self {
            negative: false,
            magnitude,
        }
    }

    fn negate(self) -> Self {
        Self {
            negative: !self.negative,
            magnitude: self.magnitude,
        }
    }

    fn to_i128(self) -> MathResult<i128> {
        let magnitude = u128::try_from(self.magnitude)
            .ok()
            .and_then(|m| i128::try_from(m).ok())
            .ok_or(MathError::ArgumentOutOfDomain)?;
        Ok(if self.negative { -magnitude } else { magnitude })
    }
}

/// `x ^ y` with 18-decimal base and exponent
///
/// `0^0` is defined as one. Fails if `y * ln(x)` leaves the exp window.
pub fn pow(x: U256, y: U256) -> MathResult<U256> {
    if y.is_zero() {
        return Ok(ONE_18);
    }
    if x.is_zero() {
        return Ok(U256::zero());
    }
    if x > MAX_POW_BASE {
        return Err(MathError::BaseOutOfBounds);
    }
    // keeps y * ln(x) well inside 256 bits before the domain check
    if y >= MILD_EXPONENT_BOUND {
        return Err(MathError::ExponentTooLarge);
    }

    let logx_times_y = if LN_36_LOWER_BOUND < x && x < LN_36_UPPER_BOUND {
        let ln_36_x = ln_36(x);
        // ln_36_x carries 36 decimals; multiply by y in two 18-decimal halves
        let high = ln_36_x.magnitude / ONE_18;
        let low = ln_36_x.magnitude % ONE_18;
        Signed {
            negative: ln_36_x.negative,
            magnitude: high * y + low * y / ONE_18,
        }
    } else {
        let ln_x = ln_18(x);
        Signed {
            negative: ln_x.negative,
            magnitude: ln_x.magnitude * y,
        }
    };
    let logx_times_y = Signed {
        negative: logx_times_y.negative,
        magnitude: logx_times_y.magnitude / ONE_18,
    };

    let bound = if logx_times_y.negative {
        MIN_NATURAL_EXPONENT.unsigned_abs()
    } else {
        MAX_NATURAL_EXPONENT.unsigned_abs()
    };
    if logx_times_y.magnitude > U256::from(bound) {
        return Err(MathError::ArgumentOutOfDomain);
    }

    natural_exp(logx_times_y.to_i128()?)
}

/// `e ^ x` for a signed 18-decimal exponent in
/// [`MIN_NATURAL_EXPONENT`, `MAX_NATURAL_EXPONENT`]
pub fn natural_exp(x: i128) -> MathResult<U256> {
    if !(MIN_NATURAL_EXPONENT..=MAX_NATURAL_EXPONENT).contains(&x) {
        return Err(MathError::ArgumentOutOfDomain);
    }

    if x < 0 {
        // fixed point division: 1 / e^(-x)
        let exp_neg_x = exp_non_negative(U256::from(x.unsigned_abs()));
        return Ok(ONE_36 / exp_neg_x);
    }

    Ok(exp_non_negative(U256::from(x.unsigned_abs())))
}

fn exp_non_negative(mut x: U256) -> U256 {
    // a0 and a1 are too large to store with decimals, so they are plain
    // integers. x0 + x1 exceeds the domain so at most one of them applies.
    let first_an = if x >= X0 {
        x = x - X0;
        A0
    } else if x >= X1 {
        x = x - X1;
        A1
    } else {
        U256::one()
    };

    // switch to 20 decimals for the remaining terms
    x = x * 100u64;

    let mut product = ONE_20;
    for (x_n, a_n) in EXP_BREAKPOINTS {
        if x >= x_n {
            x = x - x_n;
            product = product * a_n / ONE_20;
        }
    }

    // Taylor series for the remainder: 1 + x + x^2/2! + ... + x^12/12!
    let mut series_sum = ONE_20;
    let mut term = x;
    series_sum = series_sum + term;
    for n in 2..=EXP_SERIES_TERMS {
        term = term * x / ONE_20 / U256::from(n);
        series_sum = series_sum + term;
    }

    product * series_sum / ONE_20 * first_an / U256::from(100u64)
}

/// Natural logarithm of a positive 18-decimal argument
pub fn natural_log(a: U256) -> MathResult<i128> {
    check_log_argument(a)?;
    if LN_36_LOWER_BOUND < a && a < LN_36_UPPER_BOUND {
        let ln_36_a = ln_36(a);
        Signed {
            negative: ln_36_a.negative,
            magnitude: ln_36_a.magnitude / ONE_18,
        }
        .to_i128()
    } else {
        ln_18(a).to_i128()
    }
}

/// `log_base(arg)` with 18-decimal arguments
///
/// Both logarithms are taken at 36 decimals before dividing.
pub fn log(arg: U256, base: U256) -> MathResult<i128> {
    check_log_argument(arg)?;
    check_log_argument(base)?;

    let log_base = ln_36_scaled(base);
    let log_arg = ln_36_scaled(arg);
    if log_base.magnitude.is_zero() {
        return Err(MathError::ZeroDivision);
    }

    Signed {
        negative: log_arg.negative != log_base.negative && !log_arg.magnitude.is_zero(),
        magnitude: log_arg.magnitude * ONE_18 / log_base.magnitude,
    }
    .to_i128()
}

fn check_log_argument(a: U256) -> MathResult<()> {
    if a.is_zero() || a > MAX_POW_BASE {
        return Err(MathError::ArgumentOutOfDomain);
    }
    Ok(())
}

fn ln_36_scaled(a: U256) -> Signed {
    if LN_36_LOWER_BOUND < a && a < LN_36_UPPER_BOUND {
        ln_36(a)
    } else {
        let ln_a = ln_18(a);
        Signed {
            negative: ln_a.negative,
            magnitude: ln_a.magnitude * ONE_18,
        }
    }
}

/// 18-decimal natural logarithm for any positive argument below 2^255
fn ln_18(a: U256) -> Signed {
    if a < ONE_18 {
        // ln(a) = -ln(1/a), and 1/a > 1
        return Signed::positive(ln_at_least_one(ONE_36 / a)).negate();
    }
    Signed::positive(ln_at_least_one(a))
}

fn ln_at_least_one(mut a: U256) -> U256 {
    let mut sum = U256::zero();

    // a0 and a1 are plain integers, so compare against them scaled up
    if a >= A0 * ONE_18 {
        a = a / A0;
        sum = sum + X0;
    }
    if a >= A1 * ONE_18 {
        a = a / A1;
        sum = sum + X1;
    }

    // switch to 20 decimals for the remaining terms
    sum = sum * 100u64;
    a = a * 100u64;

    for (x_n, a_n) in LN_BREAKPOINTS {
        if a >= a_n {
            a = a * ONE_20 / a_n;
            sum = sum + x_n;
        }
    }

    // a is now below a11 (~1.06) and at least one:
    // ln(a) = 2 * (z + z^3/3 + z^5/5 + ...), z = (a - 1) / (a + 1)
    let z = (a - ONE_20) * ONE_20 / (a + ONE_20);
    let z_squared = z * z / ONE_20;

    let mut num = z;
    let mut series_sum = num;
    for divisor in [3u64, 5, 7, 9, 11] {
        num = num * z_squared / ONE_20;
        series_sum = series_sum + num / U256::from(divisor);
    }
    series_sum = series_sum * 2u64;

    (sum + series_sum) / U256::from(100u64)
}

/// 36-decimal natural logarithm for arguments close to one
fn ln_36(x: U256) -> Signed {
    let x = x * ONE_18;

    let (negative, distance) = if x >= ONE_36 {
        (false, x - ONE_36)
    } else {
        (true, ONE_36 - x)
    };
    let z = distance * ONE_36 / (x + ONE_36);
    let z_squared = z * z / ONE_36;

    let mut num = z;
    let mut series_sum = num;
    for divisor in [3u64, 5, 7, 9, 11, 13, 15] {
        num = num * z_squared / ONE_36;
        series_sum = series_sum + num / U256::from(divisor);
    }

    Signed {
        negative,
        magnitude: series_sum * 2u64,
    }
}
