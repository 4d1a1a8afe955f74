//! The 128-bit order appendix.
//!
//! Every order carries an appendix that tells the matching engine how to
//! execute it: order type, reduce-only, isolated margin, trigger kind, and a
//! 96-bit value whose meaning depends on the isolated flag and trigger kind.
//!
//! The value field is owned by at most one of isolated margin or TWAP data.
//! All appendix construction goes through [`AppendixFields::pack`], which
//! enforces that rule via [`validate_value_owner`].
//!
//! # Example
//!
//! ```ignore
//! use nado_core::appendix::{AppendixBuilder, TriggerType};
//! use nado_core::expiration::OrderType;
//!
//! let appendix = AppendixBuilder::new(OrderType::PostOnly)
//!     .isolated_margin(1_000_000_000_000_000_000_000)
//!     .build()?;
//!
//! assert!(appendix.is_isolated());
//! ```

pub mod bits;
pub mod twap;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

use crate::expiration::OrderType;
use crate::{Error, Result};
use bits::*;

pub use twap::{pack_twap, slippage_to_x6, unpack_twap, TwapData};

/// Current appendix format version.
pub const APPENDIX_VERSION: u8 = 0;

/// Trigger kind stored in bits 12..13. Zero means "no trigger".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerType {
    Price = 1,
    Twap = 2,
    TwapCustomAmounts = 3,
}

impl TriggerType {
    pub fn as_u8(&self) -> u8 {
        *self as u8
    }

    /// `None` for zero bits.
    pub fn from_bits(bits: u8) -> Option<Self> {
        match bits & 0b11 {
            1 => Some(TriggerType::Price),
            2 => Some(TriggerType::Twap),
            3 => Some(TriggerType::TwapCustomAmounts),
            _ => None,
        }
    }

    /// Whether this trigger stores TWAP data in the value field.
    pub fn is_twap(&self) -> bool {
        matches!(self, TriggerType::Twap | TriggerType::TwapCustomAmounts)
    }
}

/// Decoded logical fields of an appendix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppendixFields {
    pub version: u8,
    pub isolated: bool,
    pub order_type: OrderType,
    pub reduce_only: bool,
    pub trigger_type: Option<TriggerType>,
    /// Raw 96-bit value field.
    pub value: u128,
}

impl AppendixFields {
    /// Pack the fields into a wire appendix.
    pub fn pack(&self) -> Result<Appendix> {
        validate_value_owner(self.isolated, self.trigger_type)?;

        if self.value > VALUE_MASK {
            return Err(Error::encoding(format!(
                "Appendix value {} does not fit in {VALUE_BITS} bits",
                self.value
            )));
        }

        let trigger_bits = self.trigger_type.map(|t| t.as_u8()).unwrap_or(0);

        let raw = ((u128::from(self.version) & VERSION_MASK) << VERSION_SHIFT)
            | ((u128::from(self.isolated) & ISOLATED_MASK) << ISOLATED_SHIFT)
            | ((u128::from(self.order_type.as_u8()) & ORDER_TYPE_MASK) << ORDER_TYPE_SHIFT)
            | ((u128::from(self.reduce_only) & REDUCE_ONLY_MASK) << REDUCE_ONLY_SHIFT)
            | ((u128::from(trigger_bits) & TRIGGER_TYPE_MASK) << TRIGGER_TYPE_SHIFT)
            | ((self.value & VALUE_MASK) << VALUE_SHIFT);

        Ok(Appendix(raw))
    }
}

/// Reject appendices where isolated margin and TWAP data would both claim
/// the 96-bit value field.
pub fn validate_value_owner(isolated: bool, trigger_type: Option<TriggerType>) -> Result<()> {
    if isolated && trigger_type.is_some_and(|t| t.is_twap()) {
        return Err(Error::encoding(
            "An order cannot be both isolated and a TWAP order",
        ));
    }
    Ok(())
}

/// Fluent builder for appendices.
#[derive(Debug, Clone, PartialEq)]
pub struct AppendixBuilder {
    order_type: OrderType,
    isolated: bool,
    reduce_only: bool,
    trigger_type: Option<TriggerType>,
    isolated_margin: Option<u128>,
    twap_times: Option<u32>,
    twap_slippage_frac: Option<Decimal>,
    version: u8,
}

impl AppendixBuilder {
    pub fn new(order_type: OrderType) -> Self {
        Self {
            order_type,
            isolated: false,
            reduce_only: false,
            trigger_type: None,
            isolated_margin: None,
            twap_times: None,
            twap_slippage_frac: None,
            version: APPENDIX_VERSION,
        }
    }

    pub fn isolated(mut self, isolated: bool) -> Self {
        self.isolated = isolated;
        self
    }

    /// Set the isolated margin amount (x18). Also marks the order isolated.
    pub fn isolated_margin(mut self, margin: u128) -> Self {
        self.isolated = true;
        self.isolated_margin = Some(margin);
        self
    }

    pub fn reduce_only(mut self, reduce_only: bool) -> Self {
        self.reduce_only = reduce_only;
        self
    }

    pub fn trigger_type(mut self, trigger_type: TriggerType) -> Self {
        self.trigger_type = Some(trigger_type);
        self
    }

    /// Set TWAP execution count and slippage.
    pub fn twap(mut self, times: u32, slippage_frac: Decimal) -> Self {
        self.twap_times = Some(times);
        self.twap_slippage_frac = Some(slippage_frac);
        self
    }

    pub fn twap_times(mut self, times: u32) -> Self {
        self.twap_times = Some(times);
        self
    }

    pub fn twap_slippage_frac(mut self, slippage_frac: Decimal) -> Self {
        self.twap_slippage_frac = Some(slippage_frac);
        self
    }

    /// Override the format version.
    pub fn version(mut self, version: u8) -> Self {
        self.version = version;
        self
    }

    /// Check parameter combinations without building.
    pub fn validate(&self) -> Result<()> {
        if self.isolated_margin.is_some() && !self.isolated {
            return Err(Error::encoding(
                "isolated_margin can only be set when isolated=true",
            ));
        }

        validate_value_owner(self.isolated, self.trigger_type)?;

        if self.trigger_type.is_some_and(|t| t.is_twap())
            && (self.twap_times.is_none() || self.twap_slippage_frac.is_none())
        {
            return Err(Error::encoding(
                "twap_times and twap_slippage_frac are required for TWAP orders",
            ));
        }

        Ok(())
    }

    /// Build the appendix, rejecting invalid combinations.
    pub fn build(&self) -> Result<Appendix> {
        self.validate()?;

        let value = match (self.trigger_type, self.twap_times, self.twap_slippage_frac) {
            (Some(trigger), Some(times), Some(slippage)) if trigger.is_twap() => {
                pack_twap(times, slippage)?
            }
            _ if self.isolated => self.isolated_margin.unwrap_or(0),
            _ => 0,
        };

        AppendixFields {
            version: self.version,
            isolated: self.isolated,
            order_type: self.order_type,
            reduce_only: self.reduce_only,
            trigger_type: self.trigger_type,
            value,
        }
        .pack()
    }
}

/// Packed appendix as sent on the wire.
///
/// Serialized as a decimal string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Appendix(pub u128);

impl Appendix {
    pub fn raw(&self) -> u128 {
        self.0
    }

    pub fn unpack(&self) -> AppendixFields {
        AppendixFields {
            version: version(self.0),
            isolated: is_isolated(self.0),
            order_type: execution_type(self.0),
            reduce_only: is_reduce_only(self.0),
            trigger_type: trigger_type(self.0),
            value: value(self.0),
        }
    }

    pub fn version(&self) -> u8 {
        version(self.0)
    }

    pub fn execution_type(&self) -> OrderType {
        execution_type(self.0)
    }

    pub fn is_reduce_only(&self) -> bool {
        is_reduce_only(self.0)
    }

    pub fn is_isolated(&self) -> bool {
        is_isolated(self.0)
    }

    pub fn isolated_margin(&self) -> Option<u128> {
        isolated_margin(self.0)
    }

    pub fn trigger_type(&self) -> Option<TriggerType> {
        trigger_type(self.0)
    }

    pub fn is_trigger_order(&self) -> bool {
        is_trigger_order(self.0)
    }

    /// The raw 96-bit value field.
    pub fn value(&self) -> u128 {
        value(self.0)
    }

    pub fn twap_data(&self) -> Option<TwapData> {
        twap_data(self.0)
    }
}

impl From<u128> for Appendix {
    fn from(raw: u128) -> Self {
        Appendix(raw)
    }
}

impl From<Appendix> for u128 {
    fn from(appendix: Appendix) -> Self {
        appendix.0
    }
}

impl std::fmt::Display for Appendix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Appendix {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        s.trim()
            .parse::<u128>()
            .map(Appendix)
            .map_err(|e| Error::encoding(format!("Invalid appendix {s:?}: {e}")))
    }
}

impl Serialize for Appendix {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Appendix {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Format version, bits 0..7.
pub fn version(appendix: u128) -> u8 {
    ((appendix >> VERSION_SHIFT) & VERSION_MASK) as u8
}

/// Order execution type, bits 9..10.
pub fn execution_type(appendix: u128) -> OrderType {
    OrderType::from_bits(((appendix >> ORDER_TYPE_SHIFT) & ORDER_TYPE_MASK) as u8)
}

pub fn is_reduce_only(appendix: u128) -> bool {
    (appendix >> REDUCE_ONLY_SHIFT) & REDUCE_ONLY_MASK == 1
}

pub fn is_isolated(appendix: u128) -> bool {
    (appendix >> ISOLATED_SHIFT) & ISOLATED_MASK == 1
}

/// Raw 96-bit value field.
pub fn value(appendix: u128) -> u128 {
    (appendix >> VALUE_SHIFT) & VALUE_MASK
}

/// Isolated margin, or `None` for cross-margin orders.
pub fn isolated_margin(appendix: u128) -> Option<u128> {
    is_isolated(appendix).then(|| value(appendix))
}

pub fn trigger_type(appendix: u128) -> Option<TriggerType> {
    TriggerType::from_bits(((appendix >> TRIGGER_TYPE_SHIFT) & TRIGGER_TYPE_MASK) as u8)
}

pub fn is_trigger_order(appendix: u128) -> bool {
    trigger_type(appendix).is_some()
}

/// TWAP data, or `None` unless the trigger kind is TWAP-family.
pub fn twap_data(appendix: u128) -> Option<TwapData> {
    trigger_type(appendix)
        .filter(TriggerType::is_twap)
        .map(|_| unpack_twap(value(appendix)))
}
