//! Order execution types and expiration timestamps.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::{Error, Result};

/// One hour in seconds.
pub const HOUR_SECS: u64 = 60 * 60;

/// Upper bound on how far in the future a TWAP order may expire.
pub const TWAP_MAX_EXPIRATION_SECS: u64 = 25 * HOUR_SECS;

/// Default lifetime of a price trigger order.
pub const PRICE_TRIGGER_DEFAULT_EXPIRATION_SECS: u64 = 7 * 24 * HOUR_SECS;

/// Execution style of an order, stored in bits 9..10 of the appendix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    #[default]
    Default = 0,
    /// Immediate-or-cancel.
    Ioc = 1,
    /// Fill-or-kill.
    Fok = 2,
    PostOnly = 3,
}

impl OrderType {
    pub const ALL: [OrderType; 4] = [
        OrderType::Default,
        OrderType::Ioc,
        OrderType::Fok,
        OrderType::PostOnly,
    ];

    /// Get the numeric value for encoding.
    pub fn as_u8(&self) -> u8 {
        *self as u8
    }

    /// Decode from the low two bits of `bits`.
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0 => OrderType::Default,
            1 => OrderType::Ioc,
            2 => OrderType::Fok,
            _ => OrderType::PostOnly,
        }
    }
}

impl std::fmt::Display for OrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderType::Default => write!(f, "DEFAULT"),
            OrderType::Ioc => write!(f, "IOC"),
            OrderType::Fok => write!(f, "FOK"),
            OrderType::PostOnly => write!(f, "POST_ONLY"),
        }
    }
}

impl FromStr for OrderType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "DEFAULT" => Ok(OrderType::Default),
            "IOC" => Ok(OrderType::Ioc),
            "FOK" => Ok(OrderType::Fok),
            "POST_ONLY" => Ok(OrderType::PostOnly),
            other => Err(Error::schema(format!(
                "Unsupported order type: {other}. Supported types: [DEFAULT, IOC, FOK, POST_ONLY]"
            ))),
        }
    }
}

/// Current unix time in seconds.
pub fn now_secs() -> u64 {
    Utc::now().timestamp().max(0) as u64
}

/// Returns a timestamp `seconds_from_now` in the future.
pub fn get_expiration_timestamp(seconds_from_now: u64) -> u64 {
    now_secs().saturating_add(seconds_from_now)
}

/// Default TWAP lifetime: the time needed for every execution plus an hour of
/// slack, capped at 25 hours.
pub fn twap_expiration_duration(times: u32, interval_seconds: u64) -> u64 {
    let min_duration = u64::from(times.saturating_sub(1)).saturating_mul(interval_seconds);
    min_duration
        .saturating_add(HOUR_SECS)
        .min(TWAP_MAX_EXPIRATION_SECS)
}
