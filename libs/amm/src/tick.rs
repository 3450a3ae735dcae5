//! Concentrated-liquidity tick classification
//!
//! A tick is described by its radius `R` and plane constant `P`. A position
//! whose reserve-vector radius, normalized by `R`, reaches the normalized
//! plane constant is pinned to the tick's boundary; anything below it is
//! interior. Ties are boundary.
//!
//! Tick parameters for an n-token pool can also be derived from a per-token
//! reserve at the equal-price point and a depeg price limit `p`:
//!
//! - radius: `r = x / (1 − 1/√n)`
//! - plane constant: `k = r·√n − r·(p + n − 1) / √(n·(p² + n − 1))`
//! - boundary slice radius: `s = √(r² − (r·√n − k)²)`
//!
//! `p` and `√n` are carried in 10^18 fixed point; `r`, `k` and `s` are in the
//! reserves' own scale.

use crate::errors::{Result, SphereError};
use crate::fixed_point::{ScaledAmount, SCALE};
use crate::invariant::{integer_sqrt, radius, MIN_TOKENS};
use num_bigint::BigUint;
use num_traits::Zero;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a position sits relative to its tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TickClassification {
    Interior,
    Boundary,
}

impl fmt::Display for TickClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TickClassification::Interior => write!(f, "Interior"),
            TickClassification::Boundary => write!(f, "Boundary"),
        }
    }
}

/// Tick radius and plane constant, in the reserves' scale
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickBoundary {
    pub radius: ScaledAmount,
    pub plane_constant: ScaledAmount,
}

impl TickBoundary {
    pub fn new(radius: ScaledAmount, plane_constant: ScaledAmount) -> Self {
        Self {
            radius,
            plane_constant,
        }
    }

    /// Derive a tick from the equal-price reserve and a depeg limit
    ///
    /// # Arguments
    /// * `reserve` - Per-token reserve at the equal-price point
    /// * `token_count` - Number of tokens `n` in the pool
    /// * `depeg_limit` - Price limit `p` in (0, 1], 10^18 fixed point
    pub fn from_depeg_limit(
        reserve: &ScaledAmount,
        token_count: usize,
        depeg_limit: &BigUint,
    ) -> Result<Self> {
        let radius = equal_price_radius(reserve, token_count)?;
        let plane_constant = plane_constant(&radius, token_count, depeg_limit)?;
        Ok(Self {
            radius,
            plane_constant,
        })
    }

    /// Classify `reserves` against this tick
    pub fn classify(&self, reserves: &[ScaledAmount]) -> Result<TickClassification> {
        classify_tick(reserves, &self.radius, &self.plane_constant)
    }

    /// Radius of the sphere slice this tick's boundary plane cuts
    pub fn boundary_orthogonal_radius(&self, token_count: usize) -> Result<ScaledAmount> {
        boundary_orthogonal_radius(&self.radius, &self.plane_constant, token_count)
    }
}

/// Classify a position as interior to, or pinned at, a tick boundary
pub fn classify_tick(
    reserves: &[ScaledAmount],
    tick_radius: &ScaledAmount,
    plane_constant: &ScaledAmount,
) -> Result<TickClassification> {
    if tick_radius.is_zero() {
        return Err(SphereError::DivisionByZero {
            context: "tick radius is zero",
        });
    }

    let current_radius = radius(reserves);
    let normalized_position = current_radius * &*SCALE / tick_radius;
    let normalized_boundary = plane_constant * &*SCALE / tick_radius;

    if normalized_position >= normalized_boundary {
        Ok(TickClassification::Boundary)
    } else {
        Ok(TickClassification::Interior)
    }
}

/// `√n` in 10^18 fixed point
fn sqrt_token_count(token_count: usize) -> BigUint {
    integer_sqrt(&(BigUint::from(token_count) * &*SCALE * &*SCALE))
}

fn check_token_count(token_count: usize) -> Result<()> {
    if token_count < MIN_TOKENS {
        return Err(SphereError::InvalidTickParameters {
            reason: format!("token count {} is below {}", token_count, MIN_TOKENS),
        });
    }
    Ok(())
}

/// Tick radius for a pool holding `reserve` of every token: `x / (1 − 1/√n)`
pub fn equal_price_radius(reserve: &ScaledAmount, token_count: usize) -> Result<ScaledAmount> {
    check_token_count(token_count)?;
    if reserve.is_zero() {
        return Err(SphereError::InvalidTickParameters {
            reason: "equal-price reserve is zero".to_string(),
        });
    }

    let scale = &*SCALE;
    let inverse_sqrt_n = scale * scale / sqrt_token_count(token_count);
    let denominator = scale - inverse_sqrt_n;

    Ok(reserve * scale / denominator)
}

/// Plane constant `k` for a tick of radius `r` and depeg limit `p`
pub fn plane_constant(
    radius: &ScaledAmount,
    token_count: usize,
    depeg_limit: &BigUint,
) -> Result<ScaledAmount> {
    check_token_count(token_count)?;
    let scale = &*SCALE;
    if depeg_limit.is_zero() || depeg_limit > scale {
        return Err(SphereError::InvalidTickParameters {
            reason: format!("depeg limit {} is outside (0, {}]", depeg_limit, scale),
        });
    }

    let n = BigUint::from(token_count);
    let n_minus_one = BigUint::from(token_count - 1) * scale;

    // r·√n
    let centre_distance = radius * sqrt_token_count(token_count) / scale;

    // √(n·(p² + n − 1)), all in fixed point
    let p_squared = depeg_limit * depeg_limit / scale;
    let spread = n * (p_squared + &n_minus_one);
    let spread_root = integer_sqrt(&(spread * scale));

    // r·(p + n − 1) / √(n·(p² + n − 1))
    let offset = radius * (depeg_limit + n_minus_one) / spread_root;

    if offset > centre_distance {
        return Err(SphereError::InvalidTickParameters {
            reason: "plane offset exceeds centre distance".to_string(),
        });
    }
    Ok(centre_distance - offset)
}

/// Radius `s = √(r² − (r·√n − k)²)` of the boundary tick's sphere slice
///
/// The squared offset can exceed `r²` by rounding when `p = 1`; that case
/// yields zero.
pub fn boundary_orthogonal_radius(
    radius: &ScaledAmount,
    plane_constant: &ScaledAmount,
    token_count: usize,
) -> Result<ScaledAmount> {
    check_token_count(token_count)?;

    let centre_distance = radius * sqrt_token_count(token_count) / &*SCALE;
    if *plane_constant > centre_distance {
        return Err(SphereError::InvalidTickParameters {
            reason: "plane constant lies beyond the sphere centre".to_string(),
        });
    }

    let offset = centre_distance - plane_constant;
    let radius_squared = radius * radius;
    let offset_squared = &offset * &offset;
    if offset_squared >= radius_squared {
        return Ok(BigUint::zero());
    }

    Ok(integer_sqrt(&(radius_squared - offset_squared)))
}
