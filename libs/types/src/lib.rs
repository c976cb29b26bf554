//! # Pool Math Types
//!
//! Fixed-point primitives shared by the weighted and stable pool math.
//!
//! ## Design Philosophy
//!
//! - **No Precision Loss**: all values are 18-decimal scaled integers over
//!   `U256`, with 512-bit intermediates for products and quotients
//! - **Explicit Rounding**: every truncating operation names its direction
//! - **Bit-Exact**: no floating point, so independent callers agree to the unit
//! - **Clear Boundaries**: `Decimal` and decimal strings are the only
//!   conversions in and out
//!
//! ## Quick Start
//!
//! ```rust
//! use poolmath_types::{FixedPoint, Rounding};
//!
//! let balance = FixedPoint::from_integer(100);
//! let fee = FixedPoint::from_decimal_str("0.003").unwrap();
//!
//! let fee_amount = balance.mul(fee, Rounding::Up).unwrap();
//! assert_eq!(fee_amount.to_string(), "0.300000000000000000");
//!
//! let root_two = FixedPoint::TWO
//!     .pow(FixedPoint::from_decimal_str("0.5").unwrap())
//!     .unwrap();
//! assert!(root_two > FixedPoint::from_decimal_str("1.41421356").unwrap());
//! ```
//!
//! ## Modules
//!
//! - [`common::fixed_point`]: `FixedPoint` arithmetic and powers
//! - [`common::log_exp`]: natural exp/ln on signed 18-decimal values
//! - [`common::constants`]: scale factors, breakpoint tables, pool bounds
//! - [`common::errors`]: `MathError` and its categories
//! - [`scaling`]: token decimal and rate scaling

pub mod common;

// Token decimal scaling for pool inputs and outputs
pub mod scaling;

pub use common::constants;
pub use common::errors::{ErrorCategory, MathError, MathResult, Solver};
pub use common::fixed_point::{FixedPoint, Rounding};
pub use common::log_exp;

pub use primitive_types::U256;
