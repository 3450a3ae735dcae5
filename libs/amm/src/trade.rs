//! Trade solver for the spherical invariant
//!
//! Holding every reserve except the output fixed, `K = Σ xᵢ²` reduces to one
//! quadratic in the new output reserve:
//!
//! ```text
//! newOut² = K − (x_in + Δ)² − Σ_{i ∉ {in, out}} xᵢ²
//! ```
//!
//! which is solved directly with one [`integer_sqrt`]. The floor in the
//! square root means the post-trade invariant never exceeds `K` and falls
//! short of it by less than `2·newOut + 1`.

use crate::errors::{Result, SphereError};
use crate::fixed_point::ScaledAmount;
use crate::invariant::{integer_sqrt, k_constant, ReserveVector};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

/// Basis-point denominator for slippage tolerances
pub const BPS_DENOMINATOR: u32 = 10_000;

/// Solved trade against a reserve vector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeQuote {
    pub token_in: usize,
    pub token_out: usize,
    pub amount_in: ScaledAmount,
    pub amount_out: ScaledAmount,
}

impl TradeQuote {
    /// Post-trade reserves as a fresh vector
    ///
    /// `reserves` must be the vector this quote was solved against.
    pub fn apply(&self, reserves: &ReserveVector) -> Result<ReserveVector> {
        validate_tokens(reserves, self.token_in, self.token_out)?;

        let out_reserve = &reserves[self.token_out];
        if self.amount_out > *out_reserve {
            return Err(SphereError::InvalidTrade {
                token_out: self.token_out,
            });
        }

        Ok(reserves.with_updated(
            self.token_in,
            &reserves[self.token_in] + &self.amount_in,
            self.token_out,
            out_reserve - &self.amount_out,
        ))
    }

    /// Minimum acceptable output under a slippage tolerance in basis points
    ///
    /// Rounds down. Tolerances above 100% yield zero.
    pub fn min_amount_out(&self, slippage_bps: u32) -> ScaledAmount {
        let kept = BPS_DENOMINATOR.saturating_sub(slippage_bps);
        &self.amount_out * kept / BPS_DENOMINATOR
    }
}

/// Check that `token_in` and `token_out` are distinct indices into the pool
pub(crate) fn validate_tokens(
    reserves: &[ScaledAmount],
    token_in: usize,
    token_out: usize,
) -> Result<()> {
    let token_count = reserves.len();
    if token_in == token_out || token_in >= token_count || token_out >= token_count {
        return Err(SphereError::InvalidTokenSelection {
            token_in,
            token_out,
            token_count,
        });
    }
    Ok(())
}

/// Solve for the output amount that keeps `K` constant
///
/// # Arguments
/// * `reserves` - Current pool reserves
/// * `token_in` - Index of the token paid in
/// * `token_out` - Index of the token paid out
/// * `amount_in` - Scaled input amount
///
/// # Returns
/// Scaled output amount `reserves[token_out] − ⌊√remaining⌋`
pub fn solve_trade(
    reserves: &ReserveVector,
    token_in: usize,
    token_out: usize,
    amount_in: &ScaledAmount,
) -> Result<ScaledAmount> {
    validate_tokens(reserves, token_in, token_out)?;

    let k = k_constant(reserves);
    let new_in = &reserves[token_in] + amount_in;

    let sum_others: BigUint = reserves
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != token_in && *i != token_out)
        .map(|(_, x)| x * x)
        .sum();

    // remaining = K - newIn² - sumOthers, which must stay strictly positive
    let consumed = &new_in * &new_in + sum_others;
    if consumed >= k {
        return Err(SphereError::InsufficientLiquidity { token_out });
    }
    let remaining = k - consumed;

    let new_out = integer_sqrt(&remaining);
    let out_reserve = &reserves[token_out];
    if new_out > *out_reserve {
        return Err(SphereError::InvalidTrade { token_out });
    }

    Ok(out_reserve - new_out)
}

/// Solve a trade and package it as a [`TradeQuote`]
pub fn quote_trade(
    reserves: &ReserveVector,
    token_in: usize,
    token_out: usize,
    amount_in: &ScaledAmount,
) -> Result<TradeQuote> {
    let amount_out = solve_trade(reserves, token_in, token_out, amount_in)?;
    Ok(TradeQuote {
        token_in,
        token_out,
        amount_in: amount_in.clone(),
        amount_out,
    })
}
