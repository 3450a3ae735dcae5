//! Pool facade for decimal-string callers
//!
//! Bundles token metadata with a reserve vector so UI code can quote in
//! human units: amounts go in as decimal strings scaled by the input token's
//! decimals and come back formatted with the output token's decimals. The
//! pool is an immutable input bundle; every call is `&self`.

use crate::efficiency::{efficiency, price_impact};
use crate::errors::{Result, SphereError};
use crate::fixed_point::{format_amount, parse_amount, ScaledAmount};
use crate::invariant::{k_constant, radius, ReserveVector};
use crate::tick::{TickBoundary, TickClassification};
use crate::trade::{quote_trade, TradeQuote};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Token identity and precision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub symbol: String,
    pub decimals: u8,
}

impl TokenInfo {
    pub fn new(symbol: impl Into<String>, decimals: u8) -> Self {
        Self {
            symbol: symbol.into(),
            decimals,
        }
    }
}

/// Quote presented to display code
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoolQuote {
    pub quote: TradeQuote,
    pub amount_in: String,
    pub amount_out: String,
    /// Percent, advisory only
    pub price_impact_pct: f64,
}

/// Tokens and reserves of one spherical pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpherePool {
    tokens: Vec<TokenInfo>,
    reserves: ReserveVector,
}

impl SpherePool {
    pub fn new(tokens: Vec<TokenInfo>, reserves: ReserveVector) -> Result<Self> {
        if tokens.len() != reserves.token_count() {
            return Err(SphereError::InvalidReserves {
                reason: format!(
                    "{} tokens described but {} reserves supplied",
                    tokens.len(),
                    reserves.token_count()
                ),
            });
        }
        Ok(Self { tokens, reserves })
    }

    /// Build from decimal-string reserves, each scaled by its token's decimals
    pub fn from_decimal_reserves(tokens: Vec<TokenInfo>, reserves: &[&str]) -> Result<Self> {
        if tokens.len() != reserves.len() {
            return Err(SphereError::InvalidReserves {
                reason: format!(
                    "{} tokens described but {} reserves supplied",
                    tokens.len(),
                    reserves.len()
                ),
            });
        }

        let scaled = tokens
            .iter()
            .zip(reserves)
            .map(|(token, amount)| parse_amount(amount, token.decimals))
            .collect::<Result<Vec<_>>>()?;

        Self::new(tokens, ReserveVector::new(scaled)?)
    }

    pub fn tokens(&self) -> &[TokenInfo] {
        &self.tokens
    }

    pub fn reserves(&self) -> &ReserveVector {
        &self.reserves
    }

    /// Index of the token with `symbol`
    pub fn token_index(&self, symbol: &str) -> Result<usize> {
        self.tokens
            .iter()
            .position(|t| t.symbol == symbol)
            .ok_or_else(|| SphereError::UnknownToken {
                symbol: symbol.to_string(),
            })
    }

    pub fn k_constant(&self) -> BigUint {
        k_constant(&self.reserves)
    }

    pub fn radius(&self) -> BigUint {
        radius(&self.reserves)
    }

    /// Reserve of `index` formatted with that token's decimals
    pub fn display_reserve(&self, index: usize) -> Option<String> {
        let token = self.tokens.get(index)?;
        Some(format_amount(&self.reserves[index], token.decimals))
    }

    /// Quote `amount_in` (decimal string) of `token_in` into `token_out`
    pub fn quote(&self, token_in: usize, token_out: usize, amount_in: &str) -> Result<PoolQuote> {
        let (in_token, out_token) = match (self.tokens.get(token_in), self.tokens.get(token_out)) {
            (Some(i), Some(o)) => (i, o),
            _ => {
                return Err(SphereError::InvalidTokenSelection {
                    token_in,
                    token_out,
                    token_count: self.tokens.len(),
                })
            }
        };

        let scaled_in = parse_amount(amount_in, in_token.decimals)?;
        let quote = match quote_trade(&self.reserves, token_in, token_out, &scaled_in) {
            Ok(quote) => quote,
            Err(e @ SphereError::InsufficientLiquidity { .. }) => {
                warn!(
                    token_in = %in_token.symbol,
                    token_out = %out_token.symbol,
                    amount_in,
                    "Quote exceeds pool liquidity"
                );
                return Err(e);
            }
            Err(e) => return Err(e),
        };

        let impact = price_impact(
            &self.reserves,
            token_in,
            token_out,
            &quote.amount_in,
            &quote.amount_out,
        )?;

        let amount_out = format_amount(&quote.amount_out, out_token.decimals);
        debug!(
            token_in = %in_token.symbol,
            token_out = %out_token.symbol,
            amount_in,
            amount_out = %amount_out,
            price_impact_pct = impact,
            "Quoted sphere trade"
        );

        Ok(PoolQuote {
            amount_in: format_amount(&quote.amount_in, in_token.decimals),
            amount_out,
            price_impact_pct: impact,
            quote,
        })
    }

    /// Pool state after executing `quote`, as a new pool
    pub fn after_trade(&self, quote: &TradeQuote) -> Result<Self> {
        Ok(Self {
            tokens: self.tokens.clone(),
            reserves: quote.apply(&self.reserves)?,
        })
    }

    /// Classify the pool's reserves against `tick`
    pub fn classify(&self, tick: &TickBoundary) -> Result<TickClassification> {
        let classification = tick.classify(&self.reserves)?;
        debug!(
            radius = %self.radius(),
            tick_radius = %tick.radius,
            plane_constant = %tick.plane_constant,
            %classification,
            "Classified pool position"
        );
        Ok(classification)
    }

    /// Capital efficiency of this pool against `uniform` reserves
    pub fn efficiency_against(&self, uniform: &[ScaledAmount]) -> f64 {
        efficiency(&self.reserves, uniform)
    }
}
