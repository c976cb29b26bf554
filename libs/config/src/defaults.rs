//! Configuration defaults
//!
//! Default locations and environment conventions shared by the loader and
//! the command-line tools.

/// Pool definitions file used when no path is given
pub const DEFAULT_CONFIG_PATH: &str = "config/pools.toml";

/// Prefix for environment overrides, e.g. `POOLMATH_PROTOCOL_FEES__SWAP`
pub const ENV_PREFIX: &str = "POOLMATH";

/// Separator between nested keys in environment overrides
pub const ENV_SEPARATOR: &str = "__";

/// Log filter applied when neither `--log-level` nor `RUST_LOG` is set
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Decimals assumed for tokens without an explicit entry
pub const DEFAULT_TOKEN_DECIMALS: u8 = 18;
