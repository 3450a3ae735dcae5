//! Fixed-point token amounts
//!
//! Token quantities are unbounded unsigned integers scaled by `10^decimals`,
//! where `decimals` is supplied per token by the caller (6 for USDC-style
//! tokens, 18 for most others). Conversions go through decimal strings only;
//! floating point never touches an amount.
//!
//! ## Conversion Rules
//!
//! - **Parse**: fractional digits are right-padded to `decimals` and excess
//!   digits are truncated, never rounded. Empty input is zero.
//! - **Format**: trailing fractional zeros are stripped, and a value with no
//!   fractional part is printed without a dot.
//!
//! ```rust
//! use orbital_amm::fixed_point::{format_amount, parse_amount};
//!
//! let raw = parse_amount("1.5", 6).unwrap();
//! assert_eq!(raw.to_string(), "1500000");
//! assert_eq!(format_amount(&raw, 6), "1.5");
//! ```

use crate::errors::{Result, SphereError};
use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};
use once_cell::sync::Lazy;

/// Token quantity in its smallest unit (`value * 10^decimals`)
pub type ScaledAmount = BigUint;

/// Decimal places of the shared precision unit used for normalized ratios
pub const PRECISION_DECIMALS: u8 = 18;

/// Precision unit (10^18) used when normalizing tick positions
pub static SCALE: Lazy<BigUint> = Lazy::new(|| pow10(PRECISION_DECIMALS));

/// `10^decimals` as an unbounded integer
pub fn pow10(decimals: u8) -> BigUint {
    BigUint::from(10u32).pow(u32::from(decimals))
}

/// Parse a decimal string into a scaled amount
///
/// # Arguments
/// * `input` - Unsigned decimal string such as `"1000"`, `"0.25"` or `".5"`
/// * `decimals` - Token decimals the result is scaled by
///
/// # Returns
/// The scaled amount, with any fractional digits past `decimals` dropped
pub fn parse_amount(input: &str, decimals: u8) -> Result<ScaledAmount> {
    if input.is_empty() {
        return Ok(BigUint::zero());
    }

    let (whole, fraction) = input.split_once('.').unwrap_or((input, ""));

    let is_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if !is_digits(whole) || !is_digits(fraction) {
        return Err(SphereError::InvalidFormat {
            input: input.to_string(),
        });
    }

    let decimals = usize::from(decimals);
    let kept = &fraction[..fraction.len().min(decimals)];

    let mut digits = String::with_capacity(whole.len() + decimals);
    digits.push_str(whole);
    digits.push_str(kept);
    digits.extend(std::iter::repeat('0').take(decimals - kept.len()));

    if digits.is_empty() {
        return Ok(BigUint::zero());
    }

    BigUint::parse_bytes(digits.as_bytes(), 10).ok_or_else(|| SphereError::InvalidFormat {
        input: input.to_string(),
    })
}

/// Format a scaled amount as a decimal string
pub fn format_amount(amount: &ScaledAmount, decimals: u8) -> String {
    let unit = pow10(decimals);
    let whole = amount / &unit;
    let fraction = amount % &unit;

    if fraction.is_zero() {
        return whole.to_string();
    }

    let padded = format!(
        "{:0>width$}",
        fraction.to_string(),
        width = usize::from(decimals)
    );
    format!("{}.{}", whole, padded.trim_end_matches('0'))
}

/// Lossy conversion for display ratios; saturates to infinity on huge values
pub(crate) fn to_f64(amount: &ScaledAmount) -> f64 {
    amount.to_f64().unwrap_or(f64::INFINITY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_whole_and_fraction() {
        let weth = parse_amount("1.5", 18).unwrap();
        assert_eq!(weth, BigUint::from(1_500_000_000_000_000_000u128));

        let usdc = parse_amount("2500", 6).unwrap();
        assert_eq!(usdc, BigUint::from(2_500_000_000u64));
    }

    #[test]
    fn test_parse_truncates_excess_fraction() {
        // 7 fractional digits into a 6-decimal token: the 7th is dropped, not rounded
        let amount = parse_amount("1.1234569", 6).unwrap();
        assert_eq!(amount, BigUint::from(1_123_456u64));
    }

    #[test]
    fn test_parse_partial_forms() {
        assert_eq!(parse_amount("", 18).unwrap(), BigUint::zero());
        assert_eq!(parse_amount(".", 6).unwrap(), BigUint::zero());
        assert_eq!(parse_amount(".5", 6).unwrap(), BigUint::from(500_000u64));
        assert_eq!(parse_amount("5.", 6).unwrap(), BigUint::from(5_000_000u64));
        assert_eq!(parse_amount("7.25", 0).unwrap(), BigUint::from(7u32));
    }

    #[test]
    fn test_parse_rejects_malformed_input() {
        for input in ["abc", "1.2.3", "-1", "1e18", " 1", "1,000", "+5"] {
            let err = parse_amount(input, 18).unwrap_err();
            assert_eq!(
                err,
                SphereError::InvalidFormat {
                    input: input.to_string()
                }
            );
        }
    }

    #[test]
    fn test_parse_beyond_u128() {
        let amount = parse_amount("1000000000000000000000", 18).unwrap();
        assert_eq!(amount, pow10(39));
    }

    #[test]
    fn test_format_strips_trailing_zeros() {
        assert_eq!(format_amount(&BigUint::from(1_500_000u64), 6), "1.5");
        assert_eq!(format_amount(&BigUint::from(1_000_001u64), 6), "1.000001");
        assert_eq!(format_amount(&BigUint::from(500u64), 6), "0.0005");
    }

    #[test]
    fn test_format_whole_values_have_no_dot() {
        assert_eq!(format_amount(&BigUint::from(3_000_000u64), 6), "3");
        assert_eq!(format_amount(&BigUint::zero(), 18), "0");
        assert_eq!(format_amount(&BigUint::from(42u32), 0), "42");
    }

    #[test]
    fn test_scale_is_ten_to_eighteen() {
        assert_eq!(*SCALE, BigUint::from(1_000_000_000_000_000_000u64));
    }
}
