//! Fixed-point primitives shared by every pool type

pub mod constants;
pub mod errors;
pub mod fixed_point;
pub mod log_exp;
