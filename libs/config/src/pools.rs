//! Pool Definitions Module
//!
//! Loads pool definitions from TOML with environment overrides and turns
//! them into validated pool states ready for quoting.
//!
//! ```toml
//! [protocol_fees]
//! swap = "0.5"
//! yield = "0.1"
//!
//! [[pools]]
//! name = "bal-weth"
//! type = "weighted"
//! tokens = ["BAL", "WETH"]
//! balances = ["80000", "20"]
//! weights = ["80", "20"]
//! swap_fee = "0.003"
//! ```
//!
//! Amounts, weights and fees are decimal strings. Weights may be given in any
//! proportion and are normalized on load; stable pool amplification is the
//! plain `A`, scaled internally.

use crate::defaults::{DEFAULT_CONFIG_PATH, DEFAULT_TOKEN_DECIMALS, ENV_PREFIX, ENV_SEPARATOR};
use anyhow::{bail, ensure, Context, Result};
use config_crate::{Config, Environment, File, FileFormat};
use poolmath_amm::{
    AmmPool, PoolType, ProtocolFeePercentages, StableMath, StablePoolState, WeightedMath,
    WeightedPoolState,
};
use poolmath_types::constants::stable::AMP_PRECISION;
use poolmath_types::constants::MAX_SWAP_FEE;
use poolmath_types::scaling::{rated_scaling_factor, upscale_all};
use poolmath_types::{FixedPoint, U256};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// All configured pools plus protocol-wide fee settings
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct PoolsConfig {
    #[serde(default)]
    pub protocol_fees: ProtocolFeePercentages,

    #[serde(default)]
    pub pools: Vec<PoolDefinition>,
}

/// One pool as written in the configuration file
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PoolDefinition {
    pub name: String,

    #[serde(rename = "type")]
    pub pool_type: PoolType,

    /// Optional token symbols, usable in place of indices
    #[serde(default)]
    pub tokens: Vec<String>,

    /// Balances in whole token units, before rates are applied
    pub balances: Vec<FixedPoint>,

    /// Weighted pools only; any proportion, normalized on load
    #[serde(default)]
    pub weights: Vec<FixedPoint>,

    /// Stable pools only; unscaled amplification `A`
    pub amp: Option<u64>,

    #[serde(default)]
    pub swap_fee: FixedPoint,

    /// Token decimals for native-unit amounts; 18 when omitted
    #[serde(default)]
    pub decimals: Vec<u8>,

    /// Token rates for rate-bearing tokens; 1 when omitted
    #[serde(default)]
    pub rates: Vec<FixedPoint>,
}

impl PoolsConfig {
    /// Load pool definitions from a file with `POOLMATH_` environment overrides
    ///
    /// Nested keys are separated by `__`, e.g.
    /// `POOLMATH_PROTOCOL_FEES__SWAP=0.4`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => expand_path(DEFAULT_CONFIG_PATH)?,
        };
        info!("Loading pool config: {:?}", path);

        let config = Config::builder()
            .add_source(File::from(path.as_path()).required(true))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator(ENV_SEPARATOR),
            )
            .build()
            .with_context(|| format!("Failed to build configuration from {:?}", path))?;

        let pools: Self = config
            .try_deserialize()
            .context("Failed to deserialize pool configuration")?;
        pools.validate()?;
        debug!(pools = pools.pools.len(), "pool config loaded");
        Ok(pools)
    }

    /// Parse pool definitions from TOML text, without environment overrides
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from_str(contents, FileFormat::Toml))
            .build()
            .context("Failed to parse pool configuration")?;

        let pools: Self = config
            .try_deserialize()
            .context("Failed to deserialize pool configuration")?;
        pools.validate()?;
        Ok(pools)
    }

    /// Render the configuration back to TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize pool configuration")
    }

    /// Check protocol fees and every pool definition
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.protocol_fees.swap <= FixedPoint::ONE,
            "Protocol swap fee {} exceeds 1",
            self.protocol_fees.swap
        );
        ensure!(
            self.protocol_fees.yield_fee <= FixedPoint::ONE,
            "Protocol yield fee {} exceeds 1",
            self.protocol_fees.yield_fee
        );

        for (index, pool) in self.pools.iter().enumerate() {
            if self.pools[..index].iter().any(|other| other.name == pool.name) {
                bail!("Duplicate pool name '{}'", pool.name);
            }
            pool.validate()
                .with_context(|| format!("Invalid pool '{}'", pool.name))?;
        }
        Ok(())
    }

    /// Look up a pool by name
    pub fn pool(&self, name: &str) -> Result<&PoolDefinition> {
        self.pools
            .iter()
            .find(|pool| pool.name == name)
            .with_context(|| format!("Pool '{}' not found in configuration", name))
    }
}

impl PoolDefinition {
    /// Structural checks shared by all pool types
    pub fn validate(&self) -> Result<()> {
        let tokens = self.balances.len();
        ensure!(tokens >= 2, "Pool needs at least two balances, got {}", tokens);
        ensure!(
            self.swap_fee.raw() < MAX_SWAP_FEE,
            "Swap fee {} must be below 1",
            self.swap_fee
        );
        check_optional_len("tokens", self.tokens.len(), tokens)?;
        check_optional_len("decimals", self.decimals.len(), tokens)?;
        check_optional_len("rates", self.rates.len(), tokens)?;

        match self.pool_type {
            PoolType::Weighted => {
                ensure!(
                    self.weights.len() == tokens,
                    "Weighted pool needs {} weights, got {}",
                    tokens,
                    self.weights.len()
                );
                ensure!(self.amp.is_none(), "Weighted pool cannot set amp");
            }
            PoolType::Stable => {
                ensure!(self.amp.is_some(), "Stable pool needs amp");
                ensure!(self.weights.is_empty(), "Stable pool cannot set weights");
            }
        }
        Ok(())
    }

    /// Weighted pool state with normalized weights
    pub fn weighted_state(&self) -> Result<WeightedPoolState> {
        ensure!(
            self.pool_type == PoolType::Weighted,
            "Pool '{}' is {}, not weighted",
            self.name,
            self.pool_type
        );
        self.validate()?;

        let normalized_weights = WeightedMath::normalize_weights(&self.weights)
            .with_context(|| format!("Invalid weights for pool '{}'", self.name))?;
        Ok(WeightedPoolState {
            balances: self.pool_balances()?,
            normalized_weights,
            swap_fee: self.swap_fee,
        })
    }

    /// Stable pool state with amplification scaled by `AMP_PRECISION`
    pub fn stable_state(&self) -> Result<StablePoolState> {
        ensure!(
            self.pool_type == PoolType::Stable,
            "Pool '{}' is {}, not stable",
            self.name,
            self.pool_type
        );
        self.validate()?;

        let amp = self
            .amp
            .and_then(|amp| amp.checked_mul(AMP_PRECISION))
            .with_context(|| format!("Amplification out of range for pool '{}'", self.name))?;
        StableMath::validate_amp(amp)
            .with_context(|| format!("Invalid amplification for pool '{}'", self.name))?;

        Ok(StablePoolState {
            balances: self.pool_balances()?,
            amp,
            swap_fee: self.swap_fee,
        })
    }

    /// Build a quotable pool of the configured type
    pub fn build(&self) -> Result<Box<dyn AmmPool + Send + Sync>> {
        Ok(match self.pool_type {
            PoolType::Weighted => Box::new(self.weighted_state()?),
            PoolType::Stable => Box::new(self.stable_state()?),
        })
    }

    /// Resolve a token by symbol or index
    pub fn token_index(&self, token: &str) -> Result<usize> {
        if let Some(index) = self.tokens.iter().position(|symbol| symbol.eq_ignore_ascii_case(token)) {
            return Ok(index);
        }
        let index: usize = token
            .parse()
            .with_context(|| format!("Unknown token '{}' in pool '{}'", token, self.name))?;
        ensure!(
            index < self.balances.len(),
            "Token index {} out of range for pool '{}'",
            index,
            self.name
        );
        Ok(index)
    }

    /// Rate of a token, 1 unless configured
    pub fn rate(&self, index: usize) -> FixedPoint {
        self.rates.get(index).copied().unwrap_or(FixedPoint::ONE)
    }

    /// Balances with token rates applied, as the pool math sees them
    pub fn pool_balances(&self) -> Result<Vec<FixedPoint>> {
        let raw: Vec<U256> = self.balances.iter().map(|balance| balance.raw()).collect();
        let rates: Vec<FixedPoint> = (0..self.balances.len()).map(|index| self.rate(index)).collect();
        upscale_all(&raw, &rates).with_context(|| format!("Balances of pool '{}' overflow", self.name))
    }

    /// Per-token factors converting native amounts into pool units
    pub fn scaling_factors(&self) -> Result<Vec<FixedPoint>> {
        (0..self.balances.len())
            .map(|index| {
                let decimals = self.decimals.get(index).copied().unwrap_or(DEFAULT_TOKEN_DECIMALS);
                rated_scaling_factor(decimals, self.rate(index))
                    .with_context(|| format!("Invalid scaling for token {} of pool '{}'", index, self.name))
            })
            .collect()
    }
}

fn check_optional_len(field: &str, len: usize, tokens: usize) -> Result<()> {
    if len != 0 && len != tokens {
        bail!("Expected {} {} entries, got {}", tokens, field, len);
    }
    Ok(())
}

/// Expand `~` and environment variables in a configuration path
pub fn expand_path(path: &str) -> Result<PathBuf> {
    let expanded = shellexpand::full(path).context("Failed to expand config path")?;
    Ok(PathBuf::from(expanded.as_ref()))
}
