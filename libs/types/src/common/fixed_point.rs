//! 18-decimal fixed-point arithmetic for pool math
//!
//! `FixedPoint` stores an unsigned 256-bit integer semantically scaled by
//! 10^18. All arithmetic is checked: nothing wraps, and every operation whose
//! result must be truncated names its rounding direction.
//!
//! ## Design Principles
//!
//! - **No Precision Loss**: products and quotients use a 512-bit accumulator
//!   and are narrowed back with an overflow check
//! - **Explicit Rounding**: `*_down` rounds toward zero, `*_up` away from it.
//!   Amounts owed to the pool round up, amounts owed to a user round down
//! - **Bit-Exact**: no floating point anywhere, so independent callers agree
//! - **Transparency**: conversions to and from `Decimal` and decimal strings
//!   are explicit boundary points

use crate::common::constants::{self, MAX_POW_BASE, MAX_POW_RELATIVE_ERROR, MIN_POW_BASE};
use crate::common::errors::{MathError, MathResult};
use crate::common::log_exp;
use primitive_types::{U256, U512};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Rounding direction for operations that truncate a remainder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rounding {
    /// Toward zero; use for amounts paid out to a user
    Down,
    /// Away from zero; use for amounts paid into the pool
    Up,
}

impl Rounding {
    pub fn flip(self) -> Self {
        match self {
            Rounding::Down => Rounding::Up,
            Rounding::Up => Rounding::Down,
        }
    }
}

/// Unsigned fixed-point number with 18 decimal places
///
/// Examples:
/// - 1.0 = FixedPoint(1_000_000_000_000_000_000)
/// - 0.003 = FixedPoint(3_000_000_000_000_000)
/// - one raw unit = 0.000000000000000001
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FixedPoint(pub U256);

impl FixedPoint {
    /// Scale factor for 18 decimal places
    pub const SCALE: U256 = constants::ONE;

    pub const ZERO: Self = Self(U256([0, 0, 0, 0]));

    /// One raw unit, the smallest representable increment
    pub const EPSILON: Self = Self(U256([1, 0, 0, 0]));

    pub const ONE: Self = Self(constants::ONE);

    pub const TWO: Self = Self(constants::TWO);

    pub const FOUR: Self = Self(constants::FOUR);

    pub const MAX: Self = Self(U256::MAX);

    /// Create from raw scaled integer
    pub const fn from_raw(raw: U256) -> Self {
        Self(raw)
    }

    /// Get the raw scaled integer value
    pub const fn raw(self) -> U256 {
        self.0
    }

    /// Whole units, e.g. `from_integer(5)` is 5.0
    pub fn from_integer(units: u128) -> Self {
        // u128::MAX * 10^18 < 2^256, so this cannot overflow
        Self(U256::from(units) * constants::ONE)
    }

    /// Create from a decimal string with exact parsing
    ///
    /// Accepts plain non-negative decimals such as `"100"`, `"0.003"` or
    /// `"1.000000000000000001"`. Digits beyond the 18th decimal place are
    /// rejected rather than silently dropped.
    ///
    /// ```
    /// use poolmath_types::FixedPoint;
    ///
    /// let fee = FixedPoint::from_decimal_str("0.003").unwrap();
    /// assert_eq!(fee.raw().as_u128(), 3_000_000_000_000_000);
    /// ```
    pub fn from_decimal_str(s: &str) -> MathResult<Self> {
        let invalid = || MathError::InvalidDecimal {
            input: s.to_string(),
        };
        let trimmed = s.trim();
        let (whole, fraction) = match trimmed.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (trimmed, ""),
        };
        let whole = whole.replace('_', "");
        let fraction = fraction.replace('_', "");
        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        if !whole.chars().all(|c| c.is_ascii_digit())
            || !fraction.chars().all(|c| c.is_ascii_digit())
            || fraction.len() > constants::DECIMALS as usize
        {
            return Err(invalid());
        }

        let whole = if whole.is_empty() {
            U256::zero()
        } else {
            U256::from_dec_str(&whole).map_err(|_| invalid())?
        };
        let padded = format!("{:0<width$}", fraction, width = constants::DECIMALS as usize);
        let fraction = U256::from_dec_str(&padded).map_err(|_| invalid())?;

        whole
            .checked_mul(constants::ONE)
            .and_then(|scaled| scaled.checked_add(fraction))
            .map(Self)
            .ok_or(MathError::MulOverflow)
    }

    /// Convert from a non-negative `Decimal`, truncating past 18 decimals
    pub fn try_from_decimal(value: Decimal) -> MathResult<Self> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(MathError::InvalidDecimal {
                input: value.to_string(),
            });
        }
        let mantissa = U256::from(value.mantissa().unsigned_abs());
        let scale = value.scale();
        let raw = if scale <= constants::DECIMALS {
            mantissa * U256::exp10((constants::DECIMALS - scale) as usize)
        } else {
            mantissa / U256::exp10((scale - constants::DECIMALS) as usize)
        };
        Ok(Self(raw))
    }

    /// Convert to `Decimal` for display or interfacing with decimal systems
    ///
    /// Values with more significant digits than `Decimal` can hold lose
    /// trailing decimal places; `None` if even the integer part does not fit.
    pub fn to_decimal(self) -> Option<Decimal> {
        let mut raw = self.0;
        let mut scale = constants::DECIMALS;
        loop {
            // Mantissa must stay a positive i128
            if let Some(mantissa) = u128::try_from(raw).ok().and_then(|m| i128::try_from(m).ok()) {
                if let Ok(value) = Decimal::try_from_i128_with_scale(mantissa, scale) {
                    return Some(value.normalize());
                }
            }
            if scale == 0 {
                return None;
            }
            raw /= U256::from(10u8);
            scale -= 1;
        }
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    // CHECKED ARITHMETIC - fails instead of wrapping

    #[allow(clippy::should_implement_trait)]
    pub fn add(self, rhs: Self) -> MathResult<Self> {
        self.0
            .checked_add(rhs.0)
            .map(Self)
            .ok_or(MathError::AddOverflow)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn sub(self, rhs: Self) -> MathResult<Self> {
        self.0
            .checked_sub(rhs.0)
            .map(Self)
            .ok_or(MathError::SubUnderflow)
    }

    /// Fixed-point product, truncating the sub-unit remainder
    pub fn mul_down(self, rhs: Self) -> MathResult<Self> {
        let product = self.0.full_mul(rhs.0);
        narrow(product / U512::from(constants::ONE), MathError::MulOverflow)
    }

    /// Fixed-point product, rounding any remainder up
    pub fn mul_up(self, rhs: Self) -> MathResult<Self> {
        let product = self.0.full_mul(rhs.0);
        if product.is_zero() {
            return Ok(Self::ZERO);
        }
        let rounded = (product - U512::one()) / U512::from(constants::ONE) + U512::one();
        narrow(rounded, MathError::MulOverflow)
    }

    pub fn mul(self, rhs: Self, rounding: Rounding) -> MathResult<Self> {
        match rounding {
            Rounding::Down => self.mul_down(rhs),
            Rounding::Up => self.mul_up(rhs),
        }
    }

    /// Fixed-point quotient, truncating the sub-unit remainder
    pub fn div_down(self, rhs: Self) -> MathResult<Self> {
        if rhs.is_zero() {
            return Err(MathError::ZeroDivision);
        }
        if self.is_zero() {
            return Ok(Self::ZERO);
        }
        let inflated = self.0.full_mul(constants::ONE);
        narrow(inflated / U512::from(rhs.0), MathError::DivOverflow)
    }

    /// Fixed-point quotient, rounding any remainder up
    pub fn div_up(self, rhs: Self) -> MathResult<Self> {
        if rhs.is_zero() {
            return Err(MathError::ZeroDivision);
        }
        if self.is_zero() {
            return Ok(Self::ZERO);
        }
        let inflated = self.0.full_mul(constants::ONE);
        let rounded = (inflated - U512::one()) / U512::from(rhs.0) + U512::one();
        narrow(rounded, MathError::DivOverflow)
    }

    pub fn div(self, rhs: Self, rounding: Rounding) -> MathResult<Self> {
        match rounding {
            Rounding::Down => self.div_down(rhs),
            Rounding::Up => self.div_up(rhs),
        }
    }

    /// `self * numerator / denominator` with a single truncation at the end
    pub fn mul_div_down(self, numerator: Self, denominator: Self) -> MathResult<Self> {
        if denominator.is_zero() {
            return Err(MathError::ZeroDivision);
        }
        let product = self.0.full_mul(numerator.0);
        narrow(product / U512::from(denominator.0), MathError::DivOverflow)
    }

    /// `1 - self`, or zero when `self >= 1`
    pub fn complement(self) -> Self {
        if self.0 < constants::ONE {
            Self(constants::ONE - self.0)
        } else {
            Self::ZERO
        }
    }

    // POWERS

    /// Best-estimate `self ^ exponent`
    ///
    /// The exponent is split into an integral part, computed exactly by
    /// squaring, and a fractional remainder evaluated through
    /// [`log_exp::pow`] only when non-zero. The base must lie in
    /// `[MIN_POW_BASE, MAX_POW_BASE]`.
    pub fn pow(self, exponent: Self) -> MathResult<Self> {
        self.pow_rounded(exponent, Rounding::Down, false)
    }

    /// `self ^ exponent`, biased down by the fractional power error bound
    pub fn pow_down(self, exponent: Self) -> MathResult<Self> {
        self.pow_rounded(exponent, Rounding::Down, true)
    }

    /// `self ^ exponent`, biased up by the fractional power error bound
    pub fn pow_up(self, exponent: Self) -> MathResult<Self> {
        self.pow_rounded(exponent, Rounding::Up, true)
    }

    fn pow_rounded(self, exponent: Self, rounding: Rounding, bias: bool) -> MathResult<Self> {
        if self.0 < MIN_POW_BASE || self.0 > MAX_POW_BASE {
            return Err(MathError::BaseOutOfBounds);
        }

        let whole = exponent.0 / constants::ONE;
        let remain = exponent.0 % constants::ONE;

        let whole_pow = self.powi(whole, rounding)?;
        if remain.is_zero() {
            return Ok(whole_pow);
        }

        let raw = Self(log_exp::pow(self.0, remain)?);
        let partial = if bias {
            let max_error = raw.mul_up(Self(MAX_POW_RELATIVE_ERROR))?.add(Self::EPSILON)?;
            match rounding {
                Rounding::Down => raw.sub(max_error).unwrap_or(Self::ZERO),
                Rounding::Up => raw.add(max_error)?,
            }
        } else {
            raw
        };

        whole_pow.mul(partial, rounding)
    }

    /// Integral power by squaring
    fn powi(self, exponent: U256, rounding: Rounding) -> MathResult<Self> {
        let mut result = Self::ONE;
        let mut base = self;
        let mut remaining = exponent;
        while !remaining.is_zero() {
            if remaining.low_u64() & 1 == 1 {
                result = result.mul(base, rounding)?;
            }
            remaining = remaining >> 1;
            if remaining.is_zero() || result.is_zero() {
                break;
            }
            base = base.mul(base, rounding)?;
        }
        Ok(result)
    }
}

fn narrow(value: U512, overflow: MathError) -> MathResult<FixedPoint> {
    U256::try_from(value).map(FixedPoint).map_err(|_| overflow)
}

impl From<U256> for FixedPoint {
    fn from(raw: U256) -> Self {
        Self(raw)
    }
}

impl From<FixedPoint> for U256 {
    fn from(value: FixedPoint) -> Self {
        value.0
    }
}

impl FromStr for FixedPoint {
    type Err = MathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_decimal_str(s)
    }
}

impl TryFrom<String> for FixedPoint {
    type Error = MathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_decimal_str(&value)
    }
}

impl From<FixedPoint> for String {
    fn from(value: FixedPoint) -> Self {
        value.to_string()
    }
}

/// Full 18-digit rendering, so that `Display` output parses back exactly
impl fmt::Display for FixedPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / constants::ONE;
        let fraction = (self.0 % constants::ONE).low_u64();
        write!(f, "{}.{:018}", whole, fraction)
    }
}
