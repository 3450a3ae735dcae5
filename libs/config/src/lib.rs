//! # Orbital Pool Configuration
//!
//! Loads the description of a spherical pool from TOML and builds the
//! `orbital-amm` types the UI quotes against.
//!
//! ## Features
//!
//! - **Token Metadata**: Symbols and per-token decimals in pool index order
//! - **Reserves**: Decimal strings, scaled by each token's own decimals
//! - **Ticks**: Explicit radius/plane constant, or derived from a depeg limit
//! - **Overrides**: `environments/<name>.toml` files and `ORBITAL__*` variables
//!
//! ## Usage
//!
//! ```rust,no_run
//! use orbital_config::load_config;
//!
//! let config = load_config("$HOME/.orbital/pool.toml", Some("testnet")).unwrap();
//! let pool = config.build_pool().unwrap();
//! let quote = pool.quote(0, 1, "1000").unwrap();
//! println!("{} out, min {}", quote.amount_out,
//!     quote.quote.min_amount_out(config.quoting.slippage_bps));
//! ```

pub mod pool_config;

// Re-export commonly used types
pub use pool_config::{
    load_config, PoolConfig, PoolSettings, QuotingSettings, TickSettings, TokenSettings,
};
