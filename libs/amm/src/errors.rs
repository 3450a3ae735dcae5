//! Error types for spherical AMM calculations
//!
//! Every failure is local and synchronous. Callers decide how to recover;
//! nothing here retries or falls back.

use thiserror::Error;

/// Errors returned by the sphere math engine
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SphereError {
    /// Decimal string contains something other than digits and one '.'
    #[error("Invalid decimal string: '{input}' - expected digits with an optional '.'")]
    InvalidFormat { input: String },

    /// Token traded against itself, or an index outside the pool
    #[error("Invalid token selection: {token_in} -> {token_out} in a {token_count}-token pool")]
    InvalidTokenSelection {
        token_in: usize,
        token_out: usize,
        token_count: usize,
    },

    /// No token in the pool carries this symbol
    #[error("Unknown token symbol '{symbol}'")]
    UnknownToken { symbol: String },

    /// Trade would leave no positive squared term for the output token
    #[error("Insufficient liquidity: trade exceeds the sphere along token {token_out}")]
    InsufficientLiquidity { token_out: usize },

    /// Solved output reserve is above the pre-trade reserve
    #[error("Invalid trade: solved reserve for token {token_out} exceeds its current reserve")]
    InvalidTrade { token_out: usize },

    /// Zero denominator in a ratio computation
    #[error("Division by zero: {context}")]
    DivisionByZero { context: &'static str },

    /// Reserve vector too short, or shape mismatch with token metadata
    #[error("Invalid reserves: {reason}")]
    InvalidReserves { reason: String },

    /// Tick parameters cannot be derived from the given inputs
    #[error("Invalid tick parameters: {reason}")]
    InvalidTickParameters { reason: String },
}

pub type Result<T> = std::result::Result<T, SphereError>;
