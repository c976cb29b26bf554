//! Error types for fixed-point arithmetic and pool math
//!
//! Every failure is fatal to the call that raised it: the math core never
//! retries and never returns a partial result. Callers group errors through
//! [`MathError::category`].

use thiserror::Error;

/// Broad classes of math failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// True result not representable (overflow, underflow, division by zero)
    Arithmetic,
    /// Input outside the mathematical domain of the operation
    Domain,
    /// Iterative solver exhausted its iteration bound
    NonConvergence,
}

/// Iterative solvers that can fail to converge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Solver {
    StableInvariant,
    StableTokenBalance,
}

impl std::fmt::Display for Solver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Solver::StableInvariant => write!(f, "stable invariant"),
            Solver::StableTokenBalance => write!(f, "stable token balance"),
        }
    }
}

/// Errors that can occur in fixed-point and pool math
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MathError {
    #[error("Addition overflow")]
    AddOverflow,

    #[error("Subtraction underflow")]
    SubUnderflow,

    #[error("Multiplication overflow")]
    MulOverflow,

    /// Quotient does not fit in 256 bits
    #[error("Division overflow")]
    DivOverflow,

    #[error("Division by zero")]
    ZeroDivision,

    /// Base outside the positive range accepted by `pow`
    #[error("Power base out of bounds")]
    BaseOutOfBounds,

    /// Argument (or y * ln(x)) outside the exp/ln validity window
    #[error("Argument outside exp/ln domain")]
    ArgumentOutOfDomain,

    /// Exponent large enough that y * ln(x) could overflow before the domain check
    #[error("Exponent too large")]
    ExponentTooLarge,

    #[error("Swap amount exceeds maximum in ratio")]
    MaxInRatio,

    #[error("Swap amount exceeds maximum out ratio")]
    MaxOutRatio,

    #[error("Invariant ratio above maximum")]
    MaxInvariantRatio,

    #[error("Invariant ratio below minimum")]
    MinInvariantRatio,

    #[error("Invariant is zero")]
    ZeroInvariant,

    #[error("Amplification {amp} outside [{min}, {max}]")]
    AmpOutOfBounds { amp: u64, min: u64, max: u64 },

    #[error("Normalized weight below minimum")]
    MinWeight,

    #[error("Normalized weights do not sum to one")]
    NormalizedWeightInvariant,

    #[error("Swap fee must lie in [0, 1)")]
    SwapFeeOutOfBounds,

    #[error("Input length mismatch: expected {expected}, got {actual}")]
    InputLengthMismatch { expected: usize, actual: usize },

    #[error("Token index {index} out of bounds for {len} tokens")]
    TokenIndexOutOfBounds { index: usize, len: usize },

    #[error("Token decimals {decimals} exceed 18")]
    UnsupportedDecimals { decimals: u8 },

    #[error("Invalid decimal string: '{input}' - expected numeric format")]
    InvalidDecimal { input: String },

    #[error("{solver} solver did not converge after {iterations} iterations")]
    NonConvergence { solver: Solver, iterations: usize },
}

impl MathError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            MathError::AddOverflow
            | MathError::SubUnderflow
            | MathError::MulOverflow
            | MathError::DivOverflow
            | MathError::ZeroDivision => ErrorCategory::Arithmetic,
            MathError::NonConvergence { .. } => ErrorCategory::NonConvergence,
            _ => ErrorCategory::Domain,
        }
    }
}

/// Result alias used throughout the math core
pub type MathResult<T> = std::result::Result<T, MathError>;
