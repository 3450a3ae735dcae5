//! Price impact and capital efficiency
//!
//! Display-only ratios. Both are computed in `f64` and must not feed
//! settlement logic; amounts stay in exact integers up to the final
//! division.

use crate::errors::{Result, SphereError};
use crate::fixed_point::{to_f64, ScaledAmount};
use crate::invariant::k_constant;
use crate::trade::validate_tokens;
use num_bigint::BigUint;
use num_traits::Zero;

/// Upper bound reported by [`efficiency`]
pub const MAX_EFFICIENCY: f64 = 1000.0;

/// Price impact of a trade, in percent
///
/// Compares the execution price `amount_out / amount_in` with the pre-trade
/// ratio `reserves[token_out] / reserves[token_in]`.
pub fn price_impact(
    reserves: &[ScaledAmount],
    token_in: usize,
    token_out: usize,
    amount_in: &ScaledAmount,
    amount_out: &ScaledAmount,
) -> Result<f64> {
    validate_tokens(reserves, token_in, token_out)?;

    if reserves[token_in].is_zero() {
        return Err(SphereError::DivisionByZero {
            context: "input token reserve is zero",
        });
    }
    if amount_in.is_zero() {
        return Err(SphereError::DivisionByZero {
            context: "input amount is zero",
        });
    }
    if reserves[token_out].is_zero() {
        return Err(SphereError::DivisionByZero {
            context: "output token reserve is zero",
        });
    }

    let old_price = to_f64(&reserves[token_out]) / to_f64(&reserves[token_in]);
    let trade_price = to_f64(amount_out) / to_f64(amount_in);

    Ok((trade_price - old_price).abs() / old_price * 100.0)
}

/// Capital efficiency of a concentrated position over a uniform one
///
/// `uniformK / concentratedK`, capped at [`MAX_EFFICIENCY`]. A concentrated
/// position with zero invariant reports the cap.
pub fn efficiency(concentrated: &[ScaledAmount], uniform: &[ScaledAmount]) -> f64 {
    let concentrated_k = k_constant(concentrated);
    if concentrated_k.is_zero() {
        return MAX_EFFICIENCY;
    }

    let uniform_k = k_constant(uniform);

    // Compare in integers first so huge ratios never pass through f64
    let cap = BigUint::from(MAX_EFFICIENCY as u32);
    if uniform_k >= &concentrated_k * cap {
        return MAX_EFFICIENCY;
    }

    to_f64(&uniform_k) / to_f64(&concentrated_k)
}
