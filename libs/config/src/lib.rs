//! # Pool Math Configuration
//!
//! Loads pool definitions for quoting tools and turns them into validated
//! pool states from `poolmath-amm`.
//!
//! ## Features
//!
//! - **Pool Definitions**: weighted and stable pools as TOML, amounts as decimal strings
//! - **Environment Overrides**: any key via `POOLMATH_` variables, nested with `__`
//! - **Token Scaling**: per-token decimals and rates for native-unit amounts
//!
//! ## Usage
//!
//! ```rust
//! use poolmath_amm::AmmPool;
//! use poolmath_config::PoolsConfig;
//!
//! let config = PoolsConfig::from_toml_str(r#"
//! [[pools]]
//! name = "usdc-dai"
//! type = "stable"
//! balances = ["1000", "1000"]
//! amp = 200
//! "#).unwrap();
//!
//! let pool = config.pool("usdc-dai").unwrap().build().unwrap();
//! assert_eq!(pool.get_liquidity().len(), 2);
//! ```

pub mod defaults;
pub mod pools;

// Re-export commonly used types
pub use defaults::*;
pub use pools::{expand_path, PoolDefinition, PoolsConfig};
