//! # Orbital AMM Library - Spherical Invariant Mathematics Engine
//!
//! ## Purpose
//!
//! Exact arithmetic for a multi-asset AMM whose reserves are a vector on an
//! n-dimensional sphere, `K = ‖r‖² = Σ xᵢ²`. Computes trade outputs, price
//! impact, tick classification and capital efficiency for UI callers that
//! speak in decimal strings.
//!
//! ## Integration Points
//!
//! - **Input Sources**: Decimal-string amounts with caller-supplied token
//!   decimals, token indices, reserve vectors sourced by the application
//! - **Output Destinations**: Display code (formatted amounts, advisory
//!   percentages), configuration layer (`orbital-config`)
//! - **Precision**: Native token precision preserved (18 decimals for most
//!   tokens, 6 for USDC-style); unbounded integers for every squared term
//! - **Validation**: Typed [`SphereError`] for every failure, no panics on
//!   caller input
//!
//! ## Architecture Role
//!
//! ```text
//! fixed_point ──> invariant ──> trade ──> efficiency (price impact)
//!                     │
//!                     └───────> tick ───> efficiency (capital ratio)
//!
//! pool: decimal-string facade over all of the above
//! ```
//!
//! Every function is pure: inputs are borrowed immutably, post-trade state is
//! always a fresh value, and nothing is cached between calls. Calls are safe
//! from any number of threads without synchronization.
//!
//! ## Determinism
//!
//! Trade results depend on [`integer_sqrt`], Newton's method with floor
//! division and a 100-iteration cap. Replacing it with a floating-point root
//! changes results near perfect squares.

pub mod efficiency;
pub mod errors;
pub mod fixed_point;
pub mod invariant;
pub mod pool;
pub mod tick;
pub mod trade;

pub use efficiency::{efficiency, price_impact, MAX_EFFICIENCY};
pub use errors::{Result, SphereError};
pub use fixed_point::{format_amount, parse_amount, ScaledAmount, SCALE};
pub use invariant::{integer_sqrt, k_constant, radius, ReserveVector, MAX_SQRT_ITERATIONS};
pub use pool::{PoolQuote, SpherePool, TokenInfo};
pub use tick::{classify_tick, TickBoundary, TickClassification};
pub use trade::{quote_trade, solve_trade, TradeQuote};

/// Unbounded unsigned integer used for all amounts and invariants
pub use num_bigint::BigUint;
