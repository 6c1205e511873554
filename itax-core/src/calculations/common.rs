//! Shared numeric helpers.
//!
//! The engine itself never rounds; these helpers exist for callers that want
//! to present amounts in whole cents.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a value to two decimal places using half-up rounding.
///
/// Values that cannot be represented as a [`Decimal`] (NaN, infinities,
/// magnitudes beyond its range) are returned unchanged.
///
/// # Examples
///
/// ```
/// use itax_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(123.454), 123.45);
/// assert_eq!(round_half_up(123.456), 123.46);
/// assert_eq!(round_half_up(0.1 + 0.2), 0.3);
/// ```
pub fn round_half_up(value: f64) -> f64 {
    to_cents(value)
        .and_then(|d| d.to_f64())
        .unwrap_or(value)
}

/// Converts a value to a [`Decimal`] rounded to whole cents.
pub fn to_cents(value: f64) -> Option<Decimal> {
    Decimal::try_from(value)
        .ok()
        .map(|d| d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}
