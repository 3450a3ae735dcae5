//! Spherical invariant and integer square root
//!
//! The pool's reserves are a point on an n-sphere: `K = Σ xᵢ²` and the
//! radius is `⌊√K⌋`. All arithmetic is exact on unbounded integers.
//!
//! `integer_sqrt` is part of the numeric contract: Newton's method from
//! `x₀ = n` with floor division, capped at [`MAX_SQRT_ITERATIONS`]. Other
//! square-root algorithms can disagree near perfect squares and must not be
//! substituted.

use crate::errors::{Result, SphereError};
use crate::fixed_point::ScaledAmount;
use num_bigint::BigUint;
use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// Iteration bound for [`integer_sqrt`]
pub const MAX_SQRT_ITERATIONS: usize = 100;

/// Minimum number of tokens in a pool
pub const MIN_TOKENS: usize = 2;

/// Ordered reserves, one per token; index is token identity
///
/// Radius and trade results are exact up to 10^28 raw units (ten billion
/// 18-decimal tokens) per reserve in a five-token pool. Past roughly 10^29
/// the square root hits the [`integer_sqrt`] iteration cap and trades start
/// failing with `InvalidTrade`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ScaledAmount>", into = "Vec<ScaledAmount>")]
pub struct ReserveVector(Vec<ScaledAmount>);

impl ReserveVector {
    /// Build a reserve vector; requires at least two tokens
    pub fn new(reserves: Vec<ScaledAmount>) -> Result<Self> {
        if reserves.len() < MIN_TOKENS {
            return Err(SphereError::InvalidReserves {
                reason: format!(
                    "pool needs at least {} tokens, got {}",
                    MIN_TOKENS,
                    reserves.len()
                ),
            });
        }
        Ok(Self(reserves))
    }

    /// Number of tokens
    pub fn token_count(&self) -> usize {
        self.0.len()
    }

    /// Copy of this vector with two entries replaced
    pub(crate) fn with_updated(
        &self,
        token_in: usize,
        new_in: ScaledAmount,
        token_out: usize,
        new_out: ScaledAmount,
    ) -> Self {
        let mut next = self.0.clone();
        next[token_in] = new_in;
        next[token_out] = new_out;
        Self(next)
    }

    pub fn into_inner(self) -> Vec<ScaledAmount> {
        self.0
    }
}

impl Deref for ReserveVector {
    type Target = [ScaledAmount];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl TryFrom<Vec<ScaledAmount>> for ReserveVector {
    type Error = SphereError;

    fn try_from(reserves: Vec<ScaledAmount>) -> Result<Self> {
        Self::new(reserves)
    }
}

impl From<ReserveVector> for Vec<ScaledAmount> {
    fn from(reserves: ReserveVector) -> Self {
        reserves.0
    }
}

/// Invariant `K = Σ xᵢ²`
pub fn k_constant(reserves: &[ScaledAmount]) -> BigUint {
    reserves.iter().map(|x| x * x).sum()
}

/// Sphere radius `⌊√K⌋`
pub fn radius(reserves: &[ScaledAmount]) -> BigUint {
    integer_sqrt(&k_constant(reserves))
}

/// Floor square root by Newton's method
///
/// Starts at `x = n`, `y = (x + 1) / 2` and steps `y = (x + n / x) / 2`
/// while `y < x`, for at most [`MAX_SQRT_ITERATIONS`] steps. The result is
/// the exact floor for `n < 2^187`. Larger inputs can hit the cap and return
/// the last iterate, which sits above the true floor.
pub fn integer_sqrt(n: &BigUint) -> BigUint {
    if n.is_zero() {
        return BigUint::zero();
    }
    if n.is_one() {
        return BigUint::one();
    }

    let mut x = n.clone();
    let mut y: BigUint = (&x + 1u32) >> 1;
    let mut iterations = 0;

    while y < x && iterations < MAX_SQRT_ITERATIONS {
        x = y;
        y = (&x + n / &x) >> 1;
        iterations += 1;
    }

    x
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reserves(values: &[u64]) -> ReserveVector {
        ReserveVector::new(values.iter().copied().map(BigUint::from).collect()).unwrap()
    }

    #[test]
    fn test_k_constant_sum_of_squares() {
        let pool = reserves(&[3, 4]);
        assert_eq!(k_constant(&pool), BigUint::from(25u32));
        assert_eq!(radius(&pool), BigUint::from(5u32));
    }

    #[test]
    fn test_k_constant_does_not_overflow_at_18_decimals() {
        // Five reserves of one billion tokens at 18 decimals: each square is ~1e54
        let billion = BigUint::from(10u32).pow(27);
        let pool = ReserveVector::new(vec![billion.clone(); 5]).unwrap();

        let k = k_constant(&pool);
        assert_eq!(k, &billion * &billion * 5u32);
    }

    #[test]
    fn test_integer_sqrt_small_values() {
        let expected = [0u32, 1, 1, 1, 2, 2, 2, 2, 2, 3, 3];
        for (n, root) in expected.iter().enumerate() {
            assert_eq!(
                integer_sqrt(&BigUint::from(n)),
                BigUint::from(*root),
                "sqrt({})",
                n
            );
        }
    }

    #[test]
    fn test_integer_sqrt_perfect_squares() {
        for root in [2u64, 10, 999, 65_535, 4_294_967_295] {
            let square = BigUint::from(root) * BigUint::from(root);
            assert_eq!(integer_sqrt(&square), BigUint::from(root));
            assert_eq!(integer_sqrt(&(&square - 1u32)), BigUint::from(root - 1));
        }
    }

    #[test]
    fn test_integer_sqrt_floor_bound_on_large_input() {
        // 79e42 is the remaining term of the 5 x 10_000 reference trade
        let n = BigUint::from(79u32) * BigUint::from(10u32).pow(42);
        let root = integer_sqrt(&n);

        assert!(&root * &root <= n);
        assert!((&root + 1u32) * (&root + 1u32) > n);
        assert_eq!(root.to_string(), "8888194417315588850091");
    }

    #[test]
    fn test_integer_sqrt_exact_below_cap_boundary() {
        let n = (BigUint::one() << 187) - 1u32;
        let root = integer_sqrt(&n);
        assert!(&root * &root <= n);
        assert!((&root + 1u32) * (&root + 1u32) > n);
    }

    #[test]
    fn test_integer_sqrt_stops_at_iteration_cap() {
        // Halving from 2^400 needs ~200 steps; the cap returns the 100th iterate
        let n = BigUint::one() << 400;
        let root = integer_sqrt(&n);

        assert_eq!(
            root.to_string(),
            "2037035976334486086268445688409378161051468393665936250636140871904581375839803871751132500"
        );
        assert!(root > BigUint::one() << 200);
    }

    #[test]
    fn test_radius_above_floor_for_oversized_pool() {
        // 1e20 tokens at 18 decimals per reserve puts K near 2^255
        let huge = BigUint::from(10u32).pow(38);
        let pool = ReserveVector::new(vec![huge; 5]).unwrap();

        let r = radius(&pool);
        assert!(&r * &r > k_constant(&pool));
    }

    #[test]
    fn test_reserve_vector_requires_two_tokens() {
        let err = ReserveVector::new(vec![BigUint::from(1u32)]).unwrap_err();
        assert!(matches!(err, SphereError::InvalidReserves { .. }));
        assert!(ReserveVector::new(Vec::new()).is_err());
    }

    #[test]
    fn test_reserve_vector_update_leaves_original_untouched() {
        let pool = reserves(&[10, 20, 30]);
        let next = pool.with_updated(0, BigUint::from(11u32), 2, BigUint::from(29u32));

        assert_eq!(&pool[..], &reserves(&[10, 20, 30])[..]);
        assert_eq!(next.into_inner(), reserves(&[11, 20, 29]).into_inner());
    }
}
