//! Pool Configuration Module
//!
//! Describes a spherical pool (tokens, decimals, reserves, tick, quoting
//! policy) in TOML and turns it into an [`orbital_amm::SpherePool`].
//! Supports environment-specific override files and `ORBITAL__*`
//! environment variables.

use anyhow::{bail, Context, Result};
use config_crate::{Config, Environment, File};
use orbital_amm::fixed_point::PRECISION_DECIMALS;
use orbital_amm::{parse_amount, BigUint, SpherePool, TickBoundary, TokenInfo};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Main pool configuration structure
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PoolConfig {
    /// Pool identity
    pub pool: PoolSettings,

    /// Tokens in pool index order
    pub tokens: Vec<TokenSettings>,

    /// Optional concentrated-liquidity tick
    #[serde(default)]
    pub tick: Option<TickSettings>,

    /// Quoting policy
    #[serde(default)]
    pub quoting: QuotingSettings,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PoolSettings {
    pub name: String,
}

/// One token: its precision and current reserve as a decimal string
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TokenSettings {
    pub symbol: String,
    pub decimals: u8,
    pub reserve: String,
}

/// Tick given directly, or derived from a depeg price limit
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum TickSettings {
    Explicit {
        radius: String,
        plane_constant: String,
    },
    DepegLimit {
        depeg_limit: String,
    },
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct QuotingSettings {
    /// Slippage tolerance in basis points applied to quoted outputs
    #[serde(default = "default_slippage_bps")]
    pub slippage_bps: u32,
}

fn default_slippage_bps() -> u32 {
    50 // 0.5%
}

impl Default for QuotingSettings {
    fn default() -> Self {
        Self {
            slippage_bps: default_slippage_bps(),
        }
    }
}

impl PoolConfig {
    /// Load configuration from a file with environment overrides
    ///
    /// Overrides come from `<dir>/environments/<environment>.toml` when it
    /// exists, then from `ORBITAL__SECTION__KEY` variables.
    pub fn load(path: &Path, environment: Option<&str>) -> Result<Self> {
        let mut builder = Config::builder().add_source(File::from(path).required(true));

        if let Some(env) = environment {
            let env_file = path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."))
                .join("environments")
                .join(format!("{}.toml", env));

            if env_file.exists() {
                info!("Loading environment pool config: {:?}", env_file);
                builder = builder.add_source(File::from(env_file));
            } else {
                warn!("Environment pool config not found: {:?}", env_file);
            }
        }

        // Override with environment variables (ORBITAL__ prefix)
        builder = builder.add_source(
            Environment::with_prefix("ORBITAL")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .context("Failed to build pool configuration")?;

        let pool_config: Self = config
            .try_deserialize()
            .context("Failed to deserialize pool configuration")?;

        pool_config.validate()?;
        debug!(
            pool = %pool_config.pool.name,
            tokens = pool_config.tokens.len(),
            "Loaded pool configuration"
        );
        Ok(pool_config)
    }

    /// Parse an inline TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let pool_config: Self =
            toml::from_str(content).context("Failed to parse pool configuration TOML")?;
        pool_config.validate()?;
        Ok(pool_config)
    }

    /// Render back to TOML, e.g. to snapshot a pool after trades
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).context("Failed to serialize pool configuration")
    }

    /// Structural checks that do not need amount parsing
    pub fn validate(&self) -> Result<()> {
        if self.tokens.len() < 2 {
            bail!(
                "Pool '{}' needs at least 2 tokens, found {}",
                self.pool.name,
                self.tokens.len()
            );
        }

        let mut seen = HashSet::new();
        for token in &self.tokens {
            if !seen.insert(token.symbol.as_str()) {
                bail!("Duplicate token symbol '{}'", token.symbol);
            }
        }

        if self.quoting.slippage_bps > 10_000 {
            bail!(
                "Slippage tolerance {} bps exceeds 100%",
                self.quoting.slippage_bps
            );
        }

        Ok(())
    }

    /// Get settings for a token by symbol
    pub fn get_token(&self, symbol: &str) -> Option<&TokenSettings> {
        self.tokens.iter().find(|t| t.symbol == symbol)
    }

    /// Build the pool, scaling each reserve by its token's decimals
    pub fn build_pool(&self) -> Result<SpherePool> {
        let tokens = self
            .tokens
            .iter()
            .map(|t| TokenInfo::new(t.symbol.clone(), t.decimals))
            .collect();
        let reserves: Vec<&str> = self.tokens.iter().map(|t| t.reserve.as_str()).collect();

        SpherePool::from_decimal_reserves(tokens, &reserves)
            .with_context(|| format!("Invalid reserves for pool '{}'", self.pool.name))
    }

    /// Configured tick, if any
    ///
    /// Explicit amounts use the decimals of the first token. A depeg limit is
    /// a 10^18 fixed-point price and derives the tick from the average
    /// configured reserve.
    pub fn tick_boundary(&self) -> Result<Option<TickBoundary>> {
        let Some(tick) = &self.tick else {
            return Ok(None);
        };

        let decimals = self.tokens.first().map(|t| t.decimals).unwrap_or(PRECISION_DECIMALS);

        let boundary = match tick {
            TickSettings::Explicit {
                radius,
                plane_constant,
            } => TickBoundary::new(
                parse_amount(radius, decimals).context("Invalid tick radius")?,
                parse_amount(plane_constant, decimals).context("Invalid tick plane constant")?,
            ),
            TickSettings::DepegLimit { depeg_limit } => {
                let limit = parse_amount(depeg_limit, PRECISION_DECIMALS)
                    .context("Invalid tick depeg limit")?;
                let pool = self.build_pool()?;
                let total: BigUint = pool.reserves().iter().sum();
                let average = total / pool.reserves().token_count();

                TickBoundary::from_depeg_limit(&average, pool.reserves().token_count(), &limit)
                    .with_context(|| {
                        format!("Cannot derive tick for pool '{}'", self.pool.name)
                    })?
            }
        };

        Ok(Some(boundary))
    }
}

/// Convenience function to load configuration, expanding `$VARS` in the path
pub fn load_config(path: &str, environment: Option<&str>) -> Result<PoolConfig> {
    let expanded = shellexpand::env(path).context("Failed to expand pool config path")?;
    PoolConfig::load(Path::new(expanded.as_ref()), environment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use orbital_amm::TickClassification;
    use std::fs;
    use tempfile::tempdir;

    const FIVE_POOL: &str = r#"
[pool]
name = "MUSDC 5-pool"

[[tokens]]
symbol = "MUSDC-A"
decimals = 18
reserve = "10000"

[[tokens]]
symbol = "MUSDC-B"
decimals = 18
reserve = "10000"

[[tokens]]
symbol = "MUSDC-C"
decimals = 18
reserve = "10000"

[[tokens]]
symbol = "MUSDC-D"
decimals = 18
reserve = "10000"

[[tokens]]
symbol = "MUSDC-E"
decimals = 18
reserve = "10000"

[tick]
depeg_limit = "0.9"
"#;

    #[test]
    fn test_load_base_config() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("pool.toml");
        fs::write(&config_path, FIVE_POOL).unwrap();

        let config = PoolConfig::load(&config_path, None).unwrap();

        assert_eq!(config.pool.name, "MUSDC 5-pool");
        assert_eq!(config.tokens.len(), 5);
        assert_eq!(config.quoting.slippage_bps, 50);
        assert_eq!(config.get_token("MUSDC-C").unwrap().decimals, 18);

        let pool = config.build_pool().unwrap();
        let quote = pool.quote(0, 1, "1000").unwrap();
        assert_eq!(quote.amount_out, "1111.805582684411149909");
    }

    #[test]
    fn test_environment_override() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("pool.toml");
        fs::write(&config_path, FIVE_POOL).unwrap();

        let env_dir = dir.path().join("environments");
        fs::create_dir(&env_dir).unwrap();
        fs::write(
            env_dir.join("stress.toml"),
            "[quoting]\nslippage_bps = 10\n",
        )
        .unwrap();

        let config = PoolConfig::load(&config_path, Some("stress")).unwrap();
        assert_eq!(config.quoting.slippage_bps, 10);

        // Missing environment files are skipped
        let config = PoolConfig::load(&config_path, Some("absent")).unwrap();
        assert_eq!(config.quoting.slippage_bps, 50);
    }

    #[test]
    fn test_derived_tick_classifies_balanced_pool_as_interior() {
        let config = PoolConfig::from_toml_str(FIVE_POOL).unwrap();
        let tick = config.tick_boundary().unwrap().unwrap();

        let pool = config.build_pool().unwrap();
        assert_eq!(pool.classify(&tick).unwrap(), TickClassification::Interior);
    }

    #[test]
    fn test_explicit_tick() {
        let content = r#"
[pool]
name = "pair"

[[tokens]]
symbol = "USDC"
decimals = 6
reserve = "3"

[[tokens]]
symbol = "USDT"
decimals = 6
reserve = "4"

[tick]
radius = "5"
plane_constant = "5"

[quoting]
slippage_bps = 100
"#;
        let config = PoolConfig::from_toml_str(content).unwrap();
        let tick = config.tick_boundary().unwrap().unwrap();
        assert_eq!(tick.radius, BigUint::from(5_000_000u32));

        // radius(3, 4) = 5 sits exactly on the plane
        let pool = config.build_pool().unwrap();
        assert_eq!(pool.classify(&tick).unwrap(), TickClassification::Boundary);
    }

    #[test]
    fn test_rejects_invalid_configs() {
        let single = r#"
[pool]
name = "lonely"

[[tokens]]
symbol = "A"
decimals = 18
reserve = "1"
"#;
        assert!(PoolConfig::from_toml_str(single).is_err());

        let duplicate = FIVE_POOL.replace("MUSDC-B", "MUSDC-A");
        assert!(PoolConfig::from_toml_str(&duplicate).is_err());

        let bad_reserve = FIVE_POOL.replacen("\"10000\"", "\"10,000\"", 1);
        let config = PoolConfig::from_toml_str(&bad_reserve).unwrap();
        assert!(config.build_pool().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = PoolConfig::from_toml_str(FIVE_POOL).unwrap();
        let rendered = config.to_toml_string().unwrap();
        assert_eq!(PoolConfig::from_toml_str(&rendered).unwrap(), config);
    }

    #[test]
    fn test_no_tick_configured() {
        let without_tick = FIVE_POOL.replace("[tick]\ndepeg_limit = \"0.9\"\n", "");
        let config = PoolConfig::from_toml_str(&without_tick).unwrap();
        assert!(config.tick_boundary().unwrap().is_none());
    }
}
