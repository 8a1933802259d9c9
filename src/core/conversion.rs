//! Amount parsing, rounding and the conversion result

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::error::RateError;

/// Parse a user supplied amount. Surrounding whitespace is ignored, NaN and
/// infinities are rejected.
pub fn parse_amount(raw: &str) -> Result<f64, RateError> {
    let amount: f64 = raw.trim().parse().map_err(|_| RateError::InvalidAmount)?;
    if !amount.is_finite() {
        return Err(RateError::InvalidAmount);
    }
    Ok(amount)
}

/// Round to 2 decimal places, half to even, on the exact binary value of `value`.
///
/// `2.675` is stored as `2.67499999...` and therefore rounds down to `2.67`,
/// while the exactly representable `0.125` rounds to the even `0.12`.
pub fn round_to_cents(value: f64) -> f64 {
    Decimal::from_f64_retain(value)
        .map(|d| d.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven))
        // Parsing the decimal text gives the correctly rounded f64
        .and_then(|d| d.to_string().parse::<f64>().ok())
        // Beyond Decimal's range an f64 has no fractional digits left to round
        .unwrap_or(value)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionResult {
    pub from: String,
    pub to: String,
    pub rate: f64,
    pub amount: f64,
    pub converted_amount: f64,
}

impl ConversionResult {
    pub fn new(from: &str, to: &str, rate: f64, amount: f64) -> Result<Self, RateError> {
        let converted = amount * rate;
        if !converted.is_finite() {
            return Err(RateError::InvalidAmount);
        }

        Ok(ConversionResult {
            from: from.to_string(),
            to: to.to_string(),
            rate,
            amount,
            converted_amount: round_to_cents(converted),
        })
    }
}
