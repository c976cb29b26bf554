//! Pool quote tool - swap quotes against configured pools
//!
//! Usage:
//!   pool-quote --config config/pools.toml list
//!   pool-quote quote --pool bal-weth --token-in BAL --token-out WETH --amount 100
//!   pool-quote quote --pool usdc-dai --token-in DAI --token-out USDC --amount 2500000 --exact-out --native

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use poolmath_amm::{AmmPool, PoolType};
use poolmath_config::{PoolsConfig, DEFAULT_LOG_LEVEL};
use poolmath_types::scaling::{downscale_down, downscale_up, upscale};
use poolmath_types::{FixedPoint, U256};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "pool-quote")]
#[command(about = "Quote swaps against weighted and stable pools")]
#[command(version)]
struct Cli {
    /// Path to pool definitions (defaults to config/pools.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); overrides RUST_LOG
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Enable JSON logging format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List configured pools with their invariants
    List,
    /// Quote a single swap
    Quote(QuoteArgs),
}

#[derive(Args, Debug)]
struct QuoteArgs {
    /// Pool name from the configuration
    #[arg(short, long)]
    pool: String,

    /// Token sold, by symbol or index
    #[arg(long)]
    token_in: String,

    /// Token bought, by symbol or index
    #[arg(long)]
    token_out: String,

    /// Amount in, or amount out with --exact-out
    #[arg(short, long)]
    amount: String,

    /// Treat --amount as the exact output and quote the required input
    #[arg(long)]
    exact_out: bool,

    /// Amounts are integers in the token's smallest unit
    #[arg(long)]
    native: bool,

    /// Print the quote as JSON
    #[arg(long)]
    json: bool,
}

/// Result of a single quote, in whole token units
#[derive(Debug, Serialize)]
struct Quote {
    pool: String,
    pool_type: PoolType,
    token_in: usize,
    token_out: usize,
    amount_in: FixedPoint,
    amount_out: FixedPoint,
    swap_fee_paid: FixedPoint,
    protocol_fee_share: FixedPoint,
    #[serde(skip_serializing_if = "Option::is_none")]
    native_amount_in: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    native_amount_out: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(&cli)?;

    let config = PoolsConfig::load(cli.config.as_deref())?;
    info!("Loaded {} pool(s)", config.pools.len());

    match &cli.command {
        Commands::List => list_pools(&config)?,
        Commands::Quote(args) => {
            let quote = quote(&config, args)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&quote)?);
            } else {
                print_quote(&quote);
            }
        }
    }

    Ok(())
}

fn init_logging(cli: &Cli) -> Result<()> {
    let filter = match &cli.log_level {
        Some(level) => EnvFilter::try_new(level)
            .with_context(|| format!("Invalid log level '{}'", level))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL)),
    };

    // Logs go to stderr so quotes can be piped
    if cli.json_logs {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    Ok(())
}

fn list_pools(config: &PoolsConfig) -> Result<()> {
    println!(
        "Protocol fees: swap {} / yield {}",
        config.protocol_fees.swap, config.protocol_fees.yield_fee
    );
    for definition in &config.pools {
        let pool = definition.build()?;
        let invariant = pool
            .invariant()
            .with_context(|| format!("Failed to compute invariant for '{}'", definition.name))?;
        println!(
            "{} ({}, fee {}): invariant {}",
            definition.name,
            pool.pool_type(),
            pool.swap_fee(),
            invariant
        );
        for (index, balance) in pool.get_liquidity().iter().enumerate() {
            let symbol = definition.tokens.get(index).map(String::as_str).unwrap_or("-");
            println!("   [{}] {:<8} {}", index, symbol, balance);
        }
    }
    Ok(())
}

fn quote(config: &PoolsConfig, args: &QuoteArgs) -> Result<Quote> {
    let definition = config.pool(&args.pool)?;
    let token_in = definition.token_index(&args.token_in)?;
    let token_out = definition.token_index(&args.token_out)?;
    let pool = definition.build()?;

    let scaling_factors = definition.scaling_factors()?;
    let given_token = if args.exact_out { token_out } else { token_in };
    let amount = parse_amount(
        &args.amount,
        args.native,
        scaling_factors[given_token],
        definition.rate(given_token),
    )?;
    debug!(pool = %definition.name, token_in, token_out, %amount, exact_out = args.exact_out, "quoting");

    // Pool units from here on
    let (pool_amount_in, pool_amount_out) = if args.exact_out {
        (pool.get_amount_in(token_in, token_out, amount)?, amount)
    } else {
        (amount, pool.get_amount_out(token_in, token_out, amount)?)
    };

    let amount_in = pool_amount_in.div_up(definition.rate(token_in))?;
    let amount_out = pool_amount_out.div_down(definition.rate(token_out))?;
    let swap_fee_paid = amount_in.mul_up(pool.swap_fee())?;
    let protocol_fee_share = swap_fee_paid.mul_down(config.protocol_fees.swap)?;

    let (native_amount_in, native_amount_out) = if args.native {
        (
            Some(downscale_up(pool_amount_in, scaling_factors[token_in])?.to_string()),
            Some(downscale_down(pool_amount_out, scaling_factors[token_out])?.to_string()),
        )
    } else {
        (None, None)
    };

    Ok(Quote {
        pool: definition.name.clone(),
        pool_type: pool.pool_type(),
        token_in,
        token_out,
        amount_in,
        amount_out,
        swap_fee_paid,
        protocol_fee_share,
        native_amount_in,
        native_amount_out,
    })
}

/// Amount in pool units: native amounts through the scaling factor, token amounts through the rate
fn parse_amount(amount: &str, native: bool, scaling_factor: FixedPoint, rate: FixedPoint) -> Result<FixedPoint> {
    if native {
        let raw = U256::from_dec_str(amount)
            .map_err(|e| anyhow::anyhow!("Invalid native amount '{}': {:?}", amount, e))?;
        Ok(upscale(raw, scaling_factor)?)
    } else {
        let tokens = FixedPoint::from_decimal_str(amount).with_context(|| format!("Invalid amount '{}'", amount))?;
        Ok(tokens.mul_down(rate)?)
    }
}

fn print_quote(quote: &Quote) {
    println!("Pool:          {} ({})", quote.pool, quote.pool_type);
    println!("Token in:      [{}] {}", quote.token_in, quote.amount_in);
    println!("Token out:     [{}] {}", quote.token_out, quote.amount_out);
    println!("Swap fee:      {}", quote.swap_fee_paid);
    println!("Protocol cut:  {}", quote.protocol_fee_share);
    if let (Some(native_in), Some(native_out)) = (&quote.native_amount_in, &quote.native_amount_out) {
        println!("Native in/out: {} / {}", native_in, native_out);
    }
}
