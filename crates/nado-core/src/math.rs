//! Fixed-point helpers for x18 amounts and prices.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::{Error, Result};

/// Scale an integer by `10^decimals`.
pub fn to_pow_10(value: i128, decimals: u32) -> Result<i128> {
    10i128
        .checked_pow(decimals)
        .and_then(|scale| value.checked_mul(scale))
        .ok_or_else(|| Error::encoding(format!("{value} x 10^{decimals} overflows int128")))
}

pub fn to_x18(value: i128) -> Result<i128> {
    to_pow_10(value, 18)
}

/// Convert a decimal to its x18 integer form, truncating past 18 places.
pub fn decimal_to_x18(value: Decimal) -> Result<i128> {
    let giga = Decimal::from(1_000_000_000u64);
    value
        .checked_mul(giga)
        .and_then(|v| v.checked_mul(giga))
        .and_then(|scaled| scaled.trunc().to_i128())
        .ok_or_else(|| Error::encoding(format!("{value} does not fit in x18 form")))
}

/// Integer division by `10^decimals`.
pub fn from_pow_10(value: i128, decimals: u32) -> i128 {
    10i128.checked_pow(decimals).map(|scale| value / scale).unwrap_or(0)
}

pub fn from_x18(value: i128) -> i128 {
    from_pow_10(value, 18)
}
