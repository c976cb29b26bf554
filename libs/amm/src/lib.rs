//! # Pool Math AMM Library - Weighted and Stable Pool Mathematics
//!
//! ## Purpose
//!
//! Deterministic invariant math for a multi-pool AMM: swap pricing,
//! liquidity provisioning and protocol fee accounting for weighted
//! (constant weighted product) and stable (amplified) pools. All values are
//! 18-decimal [`FixedPoint`] numbers and every truncation rounds in the
//! pool's favour.
//!
//! ## Integration Points
//!
//! - **Input Sources**: upscaled pool balances, weights or amplification,
//!   swap fee and share supply, all read by the caller from its ledger
//! - **Output Destinations**: swap quotes, join/exit amounts and protocol fee
//!   shares, written back by the caller
//! - **Persisted Values**: last post-join/exit invariant, ATH rate product and
//!   rate caches are threaded in explicitly; nothing is stored here
//! - **Validation**: ratio limits, weight bounds and amplification bounds are
//!   checked on every call
//!
//! ## Architecture Role
//!
//! ```text
//! pool state ──► WeightedMath / StableMath ──► quotes, join/exit amounts
//!      │                    │
//!      └──────► ProtocolFees (invariant growth) ──► shares to mint
//! ```
//!
//! ## Performance Profile
//!
//! - **Stateless**: pure functions, safe to call from any number of threads
//! - **Bounded**: solvers stop after 255 iterations, series have fixed term counts
//! - **Bit-Exact**: no floating point anywhere

pub mod pool_traits;
pub mod protocol_fees;
pub mod stable_math;
pub mod weighted_math;

pub use pool_traits::{AmmPool, PoolType};
pub use protocol_fees::{GrowthInvariants, ProtocolFeePercentages, ProtocolFees, RateCache};
pub use stable_math::{StableMath, StablePoolState};
pub use weighted_math::{WeightedMath, WeightedPoolState};

/// Common types for AMM calculations
pub use poolmath_types::{FixedPoint, MathError, MathResult, Rounding};
