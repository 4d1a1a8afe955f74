//! TWAP order construction and helpers.
//!
//! A TWAP order is a single signed IOC order whose appendix carries the
//! execution count and slippage; the schedule (interval and optional custom
//! per-execution amounts) travels beside it as a time trigger.

use alloy_primitives::B256;
use rust_decimal::Decimal;
use tracing::debug;

use super::trigger::{PlaceTriggerOrderParams, TimeTriggerData, TriggerCriteria};
use crate::appendix::{AppendixBuilder, TriggerType};
use crate::expiration::{now_secs, twap_expiration_duration, OrderType};
use crate::request::OrderParams;
use crate::{Error, Result};

pub const TWAP_MIN_TIMES: u32 = 1;
pub const TWAP_MAX_TIMES: u32 = 500;

/// Builder for TWAP trigger orders.
#[derive(Debug, Clone, PartialEq)]
pub struct TwapOrderBuilder {
    product_id: u32,
    sender: B256,
    price_x18: i128,
    total_amount_x18: i128,
    times: u32,
    slippage_frac: Decimal,
    interval_seconds: u64,
    custom_amounts_x18: Option<Vec<i128>>,
    reduce_only: bool,
    expiration: Option<u64>,
    nonce: Option<u64>,
    spot_leverage: Option<bool>,
    id: Option<u64>,
}

impl TwapOrderBuilder {
    /// `total_amount_x18` is signed: negative sells.
    pub fn new(
        product_id: u32,
        sender: B256,
        price_x18: i128,
        total_amount_x18: i128,
        times: u32,
        slippage_frac: Decimal,
        interval_seconds: u64,
    ) -> Self {
        Self {
            product_id,
            sender,
            price_x18,
            total_amount_x18,
            times,
            slippage_frac,
            interval_seconds,
            custom_amounts_x18: None,
            reduce_only: false,
            expiration: None,
            nonce: None,
            spot_leverage: None,
            id: None,
        }
    }

    /// Per-execution sizes; switches the trigger type to custom amounts.
    pub fn custom_amounts(mut self, amounts_x18: Vec<i128>) -> Self {
        self.custom_amounts_x18 = Some(amounts_x18);
        self
    }

    pub fn reduce_only(mut self, reduce_only: bool) -> Self {
        self.reduce_only = reduce_only;
        self
    }

    /// Absolute expiration (unix seconds).
    pub fn expiration(mut self, expiration: u64) -> Self {
        self.expiration = Some(expiration);
        self
    }

    pub fn nonce(mut self, nonce: u64) -> Self {
        self.nonce = Some(nonce);
        self
    }

    pub fn spot_leverage(mut self, spot_leverage: bool) -> Self {
        self.spot_leverage = Some(spot_leverage);
        self
    }

    pub fn id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(TWAP_MIN_TIMES..=TWAP_MAX_TIMES).contains(&self.times) {
            return Err(Error::encoding(format!(
                "TWAP times must be between {TWAP_MIN_TIMES} and {TWAP_MAX_TIMES}, got {}",
                self.times
            )));
        }
        if self.slippage_frac < Decimal::ZERO || self.slippage_frac > Decimal::ONE {
            return Err(Error::encoding(format!(
                "Slippage fraction must be between 0 and 1, got {}",
                self.slippage_frac
            )));
        }
        if self.interval_seconds == 0 {
            return Err(Error::encoding("Interval must be positive, got 0"));
        }
        if let Some(amounts) = &self.custom_amounts_x18 {
            validate_custom_amounts(self.total_amount_x18, self.times, amounts)?;
        }
        Ok(())
    }

    /// Build with expiration defaults relative to the current time.
    pub fn build(&self) -> Result<PlaceTriggerOrderParams> {
        self.build_at(now_secs())
    }

    /// Build with expiration defaults relative to `now` (unix seconds).
    ///
    /// Execution is always IOC; an unset nonce is filled at signing time.
    pub fn build_at(&self, now: u64) -> Result<PlaceTriggerOrderParams> {
        self.validate()?;

        let trigger_type = if self.custom_amounts_x18.is_some() {
            TriggerType::TwapCustomAmounts
        } else {
            TriggerType::Twap
        };

        let appendix = AppendixBuilder::new(OrderType::Ioc)
            .reduce_only(self.reduce_only)
            .trigger_type(trigger_type)
            .twap(self.times, self.slippage_frac)
            .build()?;

        let expiration = self.expiration.unwrap_or_else(|| {
            now + twap_expiration_duration(self.times, self.interval_seconds)
        });

        let amounts = self
            .custom_amounts_x18
            .as_ref()
            .map(|amounts| amounts.iter().map(i128::to_string).collect());

        debug!(
            product_id = self.product_id,
            times = self.times,
            interval = self.interval_seconds,
            appendix = %appendix,
            "twap order built"
        );

        Ok(PlaceTriggerOrderParams {
            product_id: self.product_id,
            order: OrderParams {
                sender: self.sender,
                price_x18: self.price_x18,
                amount: self.total_amount_x18,
                expiration,
                nonce: self.nonce,
                appendix,
            },
            trigger: TriggerCriteria::TimeTrigger(TimeTriggerData {
                interval: self.interval_seconds,
                amounts,
            }),
            signature: None,
            digest: None,
            spot_leverage: self.spot_leverage,
            id: self.id,
        })
    }
}

/// Shorthand for [`TwapOrderBuilder`] with optional custom amounts.
#[allow(clippy::too_many_arguments)]
pub fn create_twap_order(
    product_id: u32,
    sender: B256,
    price_x18: i128,
    total_amount_x18: i128,
    expiration: u64,
    nonce: u64,
    times: u32,
    slippage_frac: Decimal,
    interval_seconds: u64,
    custom_amounts_x18: Option<Vec<i128>>,
    reduce_only: bool,
) -> Result<PlaceTriggerOrderParams> {
    let mut builder = TwapOrderBuilder::new(
        product_id,
        sender,
        price_x18,
        total_amount_x18,
        times,
        slippage_frac,
        interval_seconds,
    )
    .expiration(expiration)
    .nonce(nonce)
    .reduce_only(reduce_only);
    if let Some(amounts) = custom_amounts_x18 {
        builder = builder.custom_amounts(amounts);
    }
    builder.build()
}

fn validate_custom_amounts(total_amount_x18: i128, times: u32, amounts: &[i128]) -> Result<()> {
    if amounts.len() != times as usize {
        return Err(Error::encoding(format!(
            "Custom amounts list length ({}) must equal times ({times})",
            amounts.len()
        )));
    }
    let sum = amounts
        .iter()
        .try_fold(0i128, |acc, a| acc.checked_add(*a))
        .ok_or_else(|| Error::encoding("Sum of custom amounts overflows i128"))?;
    if sum != total_amount_x18 {
        return Err(Error::encoding(format!(
            "Sum of custom amounts ({sum}) must equal total amount ({total_amount_x18})"
        )));
    }
    Ok(())
}

/// Check a TWAP size split.
///
/// Without custom amounts the total must divide evenly by `times`.
pub fn validate_twap_order(
    total_amount_x18: i128,
    times: u32,
    custom_amounts_x18: Option<&[i128]>,
) -> Result<()> {
    match custom_amounts_x18 {
        Some(amounts) => validate_custom_amounts(total_amount_x18, times, amounts),
        None => {
            if times == 0 || total_amount_x18 % i128::from(times) != 0 {
                return Err(Error::encoding(format!(
                    "Total amount {total_amount_x18} must be divisible by times {times} \
                     for equal distribution TWAP orders"
                )));
            }
            Ok(())
        }
    }
}

/// Seconds from first to last execution.
pub fn estimate_twap_completion_time(times: u32, interval_seconds: u64) -> u64 {
    u64::from(times.saturating_sub(1)) * interval_seconds
}

pub fn calculate_equal_amounts(total_amount_x18: i128, times: u32) -> Result<Vec<i128>> {
    if times == 0 || total_amount_x18 % i128::from(times) != 0 {
        return Err(Error::encoding(format!(
            "Total amount {total_amount_x18} is not divisible by times {times}"
        )));
    }
    let per_execution = total_amount_x18 / i128::from(times);
    Ok(vec![per_execution; times as usize])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expiration::TWAP_MAX_EXPIRATION_SECS;
    use std::str::FromStr;

    const NOW: u64 = 1_700_000_000;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn builder(times: u32, slippage: &str, interval: u64) -> TwapOrderBuilder {
        TwapOrderBuilder::new(
            1,
            B256::repeat_byte(0x11),
            30_000_000_000_000_000_000_000,
            1000,
            times,
            dec(slippage),
            interval,
        )
    }

    #[test]
    fn test_twap_forces_ioc() {
        let params = builder(10, "0.005", 60).build_at(NOW).unwrap();
        let appendix = params.order.appendix;

        assert_eq!(appendix.trigger_type(), Some(TriggerType::Twap));
        assert_eq!(appendix.execution_type(), OrderType::Ioc);
        assert!(!appendix.is_isolated());

        let twap = appendix.twap_data().unwrap();
        assert_eq!(twap.times, 10);
        assert_eq!(twap.slippage_frac, dec("0.005"));
    }

    #[test]
    fn test_times_bounds() {
        assert!(builder(0, "0.01", 60).build_at(NOW).is_err());
        assert!(builder(501, "0.01", 60).build_at(NOW).is_err());
        assert!(builder(1, "0.01", 60).build_at(NOW).is_ok());
        assert!(builder(500, "0.01", 60).build_at(NOW).is_ok());
    }

    #[test]
    fn test_slippage_bounds() {
        assert!(builder(5, "-0.0001", 60).build_at(NOW).is_err());
        assert!(builder(5, "1.0001", 60).build_at(NOW).is_err());
        assert!(builder(5, "0", 60).build_at(NOW).is_ok());
        assert!(builder(5, "1", 60).build_at(NOW).is_ok());
    }

    #[test]
    fn test_interval_must_be_positive() {
        let err = builder(5, "0.01", 0).build_at(NOW).unwrap_err();
        assert!(matches!(err, Error::Encoding { .. }));
    }

    #[test]
    fn test_custom_amounts_sum_must_match() {
        let err = builder(3, "0.01", 60)
            .custom_amounts(vec![400, 300, 200])
            .build_at(NOW)
            .unwrap_err();
        assert!(err.to_string().contains("(900)"));

        let params = builder(3, "0.01", 60)
            .custom_amounts(vec![400, 300, 300])
            .build_at(NOW)
            .unwrap();
        assert_eq!(
            params.order.appendix.trigger_type(),
            Some(TriggerType::TwapCustomAmounts)
        );
        match params.trigger {
            TriggerCriteria::TimeTrigger(t) => {
                assert_eq!(t.interval, 60);
                assert_eq!(
                    t.amounts,
                    Some(vec!["400".to_string(), "300".to_string(), "300".to_string()])
                );
            }
            other => panic!("expected time trigger, got {other:?}"),
        }
    }

    #[test]
    fn test_custom_amounts_length_must_match() {
        let err = builder(3, "0.01", 60)
            .custom_amounts(vec![500, 500])
            .build_at(NOW)
            .unwrap_err();
        assert!(err.to_string().contains("length (2)"));
    }

    #[test]
    fn test_default_expiration() {
        let params = builder(10, "0.01", 60).build_at(NOW).unwrap();
        assert_eq!(params.order.expiration, NOW + 9 * 60 + 3600);

        let capped = builder(500, "0.01", 3600).build_at(NOW).unwrap();
        assert_eq!(capped.order.expiration, NOW + TWAP_MAX_EXPIRATION_SECS);

        let explicit = builder(10, "0.01", 60).expiration(42).build_at(NOW).unwrap();
        assert_eq!(explicit.order.expiration, 42);
    }

    #[test]
    fn test_sell_side_and_reduce_only() {
        let params = TwapOrderBuilder::new(2, B256::ZERO, 1, -900, 3, dec("0.02"), 30)
            .reduce_only(true)
            .nonce(77)
            .build_at(NOW)
            .unwrap();
        assert_eq!(params.order.amount, -900);
        assert_eq!(params.order.nonce, Some(77));
        assert!(params.order.appendix.is_reduce_only());
        assert!(params.signature.is_none());
    }

    #[test]
    fn test_create_twap_order() {
        let params = create_twap_order(
            4,
            B256::ZERO,
            10,
            1000,
            NOW + 100,
            5,
            3,
            dec("0.01"),
            60,
            Some(vec![400, 300, 300]),
            false,
        )
        .unwrap();
        assert_eq!(params.product_id, 4);
        assert_eq!(params.order.expiration, NOW + 100);
        assert_eq!(params.order.nonce, Some(5));
    }

    #[test]
    fn test_validate_twap_order() {
        assert!(validate_twap_order(1000, 4, None).is_ok());
        assert!(validate_twap_order(1000, 3, None).is_err());
        assert!(validate_twap_order(-900, 3, None).is_ok());
        assert!(validate_twap_order(1000, 3, Some(&[400, 300, 300])).is_ok());
        assert!(validate_twap_order(1000, 3, Some(&[400, 300, 200])).is_err());
        assert!(validate_twap_order(1000, 2, Some(&[400, 300, 300])).is_err());
    }

    #[test]
    fn test_completion_time_and_equal_amounts() {
        assert_eq!(estimate_twap_completion_time(10, 60), 540);
        assert_eq!(estimate_twap_completion_time(1, 60), 0);

        assert_eq!(calculate_equal_amounts(1000, 4).unwrap(), vec![250; 4]);
        assert!(calculate_equal_amounts(1000, 3).is_err());
        assert!(calculate_equal_amounts(1000, 0).is_err());
    }
}
